//! Result reporting channel.
//!
//! Every command reports through a [`ResultSink`]: payload or failure lines
//! first, then the `You are currently in <path>` prompt. Each report is sent
//! as one block so concurrently completing commands cannot interleave inside
//! a block, only between blocks.

use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub const FAILURE_LINE: &str = "Operation failed";
pub const INVALID_LINE: &str = "Invalid input";

enum SinkMessage {
    Block(String),
    Shutdown(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct ResultSink {
    tx: mpsc::UnboundedSender<SinkMessage>,
}

impl ResultSink {
    /// Sink writing to the process stdout through a dedicated task.
    pub fn stdout() -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_blocks(rx, tokio::io::stdout()));
        (Self { tx }, handle)
    }

    /// Sink backed by a channel, for capturing blocks in tests.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (block_tx, block_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    SinkMessage::Block(block) => {
                        if block_tx.send(block).is_err() {
                            break;
                        }
                    }
                    SinkMessage::Shutdown(ack) => {
                        let _ = ack.send(());
                        break;
                    }
                }
            }
        });
        (Self { tx }, block_rx)
    }

    /// A single standalone line (banner, farewell). No prompt follows.
    pub fn line(&self, line: &str) {
        self.send(format!("{line}\n"));
    }

    /// The bare prompt, the successful outcome of side-effect-only commands.
    pub fn prompt(&self, cwd: &Path) {
        self.send(prompt_line(cwd));
    }

    /// Payload lines followed by the prompt.
    pub fn payload(&self, lines: &[String], cwd: &Path) {
        let mut block = String::new();
        for line in lines {
            block.push_str(line);
            if !line.ends_with('\n') {
                block.push('\n');
            }
        }
        block.push_str(&prompt_line(cwd));
        self.send(block);
    }

    /// "Operation failed" followed by the prompt.
    pub fn failure(&self, cwd: &Path) {
        self.send(format!("{FAILURE_LINE}\n{}", prompt_line(cwd)));
    }

    /// "Invalid input" followed by the prompt.
    pub fn invalid(&self, cwd: &Path) {
        self.send(format!("{INVALID_LINE}\n{}", prompt_line(cwd)));
    }

    /// Flushes pending blocks and stops the writer. Blocks sent after this
    /// are dropped, which is how exit abandons in-flight operations.
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(SinkMessage::Shutdown(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    fn send(&self, block: String) {
        // The writer being gone means the session is shutting down.
        let _ = self.tx.send(SinkMessage::Block(block));
    }
}

fn prompt_line(cwd: &Path) -> String {
    format!("You are currently in {}\n", cwd.display())
}

async fn write_blocks<W: AsyncWrite + Unpin>(
    mut rx: mpsc::UnboundedReceiver<SinkMessage>,
    mut writer: W,
) {
    while let Some(msg) = rx.recv().await {
        match msg {
            SinkMessage::Block(block) => {
                if writer.write_all(block.as_bytes()).await.is_err()
                    || writer.flush().await.is_err()
                {
                    tracing::error!("output stream failed, stopping result writer");
                    break;
                }
            }
            SinkMessage::Shutdown(ack) => {
                let _ = writer.flush().await;
                let _ = ack.send(());
                break;
            }
        }
    }
}
