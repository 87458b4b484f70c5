//! Command dispatch.
//!
//! Maps a parsed command onto a handler with an exact-arity match. Path
//! arguments are resolved against the current directory at dispatch time.
//! `up`, `os`, `.exit`, and arity rejection complete inline; everything that
//! touches the filesystem is spawned, so the read loop keeps accepting lines
//! while operations are in flight and completions may interleave.

use crate::command::Command;
use crate::error::{FmError, FmResult};
use crate::ops;
use crate::osinfo;
use crate::session::SessionHandle;
use crate::sink::ResultSink;
use crate::transfer::TransferJob;
use std::future::Future;

/// What the read loop should do after a line was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; the command's result block arrives on the sink.
    Handled,
    /// `.exit` was issued; the loop shuts the session down.
    Exit,
}

pub struct Dispatcher {
    session: SessionHandle,
    sink: ResultSink,
}

impl Dispatcher {
    pub fn new(session: SessionHandle, sink: ResultSink) -> Self {
        Self { session, sink }
    }

    pub fn dispatch(&self, line: &str) -> Outcome {
        let Some(cmd) = Command::parse(line) else {
            return Outcome::Handled;
        };
        let args: Vec<&str> = cmd.args.iter().map(String::as_str).collect();

        match (cmd.verb.as_str(), args.as_slice()) {
            (".exit", []) => return Outcome::Exit,

            ("up", []) => {
                let cwd = self.session.up();
                self.sink.prompt(&cwd);
            }

            ("cd", [target]) => {
                let path = self.session.resolve(target);
                let session = self.session.clone();
                self.spawn_report("cd", async move {
                    session.navigate_to(path).await.map(|_| Vec::new())
                });
            }

            ("ls", []) => {
                let dir = self.session.cwd();
                self.spawn_report("ls", ops::list_dir(dir));
            }

            ("cat", [path]) => {
                self.spawn_report("cat", ops::read_file(self.session.resolve(path)));
            }

            ("add", [path]) => {
                self.spawn_report("add", ops::create_file(self.session.resolve(path)));
            }

            ("rn", [from, to]) => {
                self.spawn_report(
                    "rn",
                    ops::rename_entry(self.session.resolve(from), self.session.resolve(to)),
                );
            }

            ("rm", [path]) => {
                self.spawn_report("rm", ops::remove_file(self.session.resolve(path)));
            }

            ("hash", [path]) => {
                self.spawn_report("hash", ops::hash_file(self.session.resolve(path)));
            }

            ("os", [flag]) => {
                report(&self.sink, &self.session, "os", osinfo::fact(flag));
            }

            ("cp", [source, destination]) => {
                self.spawn_transfer(
                    "cp",
                    TransferJob::copy(
                        self.session.resolve(source),
                        self.session.resolve(destination),
                    ),
                );
            }

            ("mv", [source, destination]) => {
                self.spawn_transfer(
                    "mv",
                    TransferJob::move_file(
                        self.session.resolve(source),
                        self.session.resolve(destination),
                    ),
                );
            }

            ("compress", [source, destination]) => {
                self.spawn_transfer(
                    "compress",
                    TransferJob::compress(
                        self.session.resolve(source),
                        self.session.resolve(destination),
                    ),
                );
            }

            ("decompress", [source, destination]) => {
                self.spawn_transfer(
                    "decompress",
                    TransferJob::decompress(
                        self.session.resolve(source),
                        self.session.resolve(destination),
                    ),
                );
            }

            // Unknown verb, or a known verb with the wrong argument count.
            _ => self.sink.invalid(&self.session.cwd()),
        }

        Outcome::Handled
    }

    fn spawn_report<F>(&self, label: &'static str, operation: F)
    where
        F: Future<Output = FmResult<Vec<String>>> + Send + 'static,
    {
        let session = self.session.clone();
        let sink = self.sink.clone();
        tokio::spawn(async move {
            report(&sink, &session, label, operation.await);
        });
    }

    fn spawn_transfer(&self, label: &'static str, job: TransferJob) {
        self.spawn_report(label, async move { job.run().await.map(|()| Vec::new()) });
    }
}

/// Uniform result reporting: payload then prompt, or one of the two
/// rejection tiers then prompt. The prompt path is read at emission time.
fn report(sink: &ResultSink, session: &SessionHandle, label: &str, result: FmResult<Vec<String>>) {
    match result {
        Ok(lines) => sink.payload(&lines, &session.cwd()),
        Err(FmError::InvalidInput) => sink.invalid(&session.cwd()),
        Err(err) => {
            tracing::warn!(command = label, error = %err, "operation failed");
            sink.failure(&session.cwd());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn fixture(start: &Path) -> (Dispatcher, SessionHandle, UnboundedReceiver<String>) {
        let (sink, rx) = ResultSink::channel();
        let session = SessionHandle::new(start.to_path_buf());
        (Dispatcher::new(session.clone(), sink), session, rx)
    }

    fn prompt_for(path: &Path) -> String {
        format!("You are currently in {}\n", path.display())
    }

    #[tokio::test]
    async fn unknown_verb_reports_invalid_input_and_keeps_state() {
        let tmp = tempfile::tempdir().unwrap();
        let (dispatcher, session, mut rx) = fixture(tmp.path());

        assert_eq!(dispatcher.dispatch("foo bar"), Outcome::Handled);
        let block = rx.recv().await.unwrap();
        assert_eq!(block, format!("Invalid input\n{}", prompt_for(tmp.path())));
        assert_eq!(session.cwd(), tmp.path());
    }

    #[tokio::test]
    async fn wrong_arity_is_invalid_input_for_every_verb() {
        let tmp = tempfile::tempdir().unwrap();
        let (dispatcher, session, mut rx) = fixture(tmp.path());

        for line in [
            "up extra", "cd", "cd a b", "ls x", "cat", "add", "rn only", "rn a b c", "cp one",
            "mv one", "rm", "os", "os --EOL --cpus", "hash", "compress one", "decompress one",
            ".exit now",
        ] {
            assert_eq!(dispatcher.dispatch(line), Outcome::Handled, "{line}");
            let block = rx.recv().await.unwrap();
            assert_eq!(
                block,
                format!("Invalid input\n{}", prompt_for(tmp.path())),
                "{line}"
            );
        }
        assert_eq!(session.cwd(), tmp.path());
    }

    #[tokio::test]
    async fn exit_is_a_terminal_outcome_with_no_output() {
        let tmp = tempfile::tempdir().unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        assert_eq!(dispatcher.dispatch(".exit"), Outcome::Exit);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn up_emits_the_parent_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let (dispatcher, session, mut rx) = fixture(&sub);

        dispatcher.dispatch("up");
        assert_eq!(rx.recv().await.unwrap(), prompt_for(tmp.path()));
        assert_eq!(session.cwd(), tmp.path());
    }

    #[tokio::test]
    async fn cd_updates_cwd_on_success_and_reports_failure_otherwise() {
        let tmp = tempfile::tempdir().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir(&docs).unwrap();
        let (dispatcher, session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("cd docs");
        assert_eq!(rx.recv().await.unwrap(), prompt_for(&docs));
        assert_eq!(session.cwd(), docs);

        dispatcher.dispatch("cd nowhere");
        let block = rx.recv().await.unwrap();
        assert_eq!(block, format!("Operation failed\n{}", prompt_for(&docs)));
        assert_eq!(session.cwd(), docs);
    }

    #[tokio::test]
    async fn add_twice_fails_the_second_time() {
        let tmp = tempfile::tempdir().unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("add note.txt");
        assert_eq!(rx.recv().await.unwrap(), prompt_for(tmp.path()));
        assert!(tmp.path().join("note.txt").exists());

        dispatcher.dispatch("add note.txt");
        let block = rx.recv().await.unwrap();
        assert_eq!(
            block,
            format!("Operation failed\n{}", prompt_for(tmp.path()))
        );
    }

    #[tokio::test]
    async fn cat_prints_contents_before_the_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("hello.txt"), b"hi there").unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("cat hello.txt");
        let block = rx.recv().await.unwrap();
        assert_eq!(block, format!("hi there\n{}", prompt_for(tmp.path())));
    }

    #[tokio::test]
    async fn mv_streams_then_deletes_the_source() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("src.txt"), b"payload").unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("mv src.txt dst.txt");
        assert_eq!(rx.recv().await.unwrap(), prompt_for(tmp.path()));
        assert!(!tmp.path().join("src.txt").exists());
        assert_eq!(fs::read(tmp.path().join("dst.txt")).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn failed_mv_keeps_the_source() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("src.txt"), b"payload").unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("mv src.txt missing/dst.txt");
        let block = rx.recv().await.unwrap();
        assert_eq!(
            block,
            format!("Operation failed\n{}", prompt_for(tmp.path()))
        );
        assert!(tmp.path().join("src.txt").exists());
    }

    #[tokio::test]
    async fn os_unknown_flag_is_invalid_but_still_prompts() {
        let tmp = tempfile::tempdir().unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("os --bogus");
        let block = rx.recv().await.unwrap();
        assert_eq!(block, format!("Invalid input\n{}", prompt_for(tmp.path())));

        dispatcher.dispatch("os --architecture");
        let block = rx.recv().await.unwrap();
        assert!(block.ends_with(&prompt_for(tmp.path())));
        assert!(block.lines().next().is_some());
    }

    #[tokio::test]
    async fn hash_digest_precedes_the_prompt() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("data.bin"), b"digest me").unwrap();
        let (dispatcher, _session, mut rx) = fixture(tmp.path());

        dispatcher.dispatch("hash data.bin");
        let block = rx.recv().await.unwrap();
        let digest = block.lines().next().unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
