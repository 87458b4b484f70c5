//! Streaming byte transfers, optionally through a gzip filter.
//!
//! A job reads the source as a byte stream, passes it through the selected
//! filter, and writes the destination, creating or truncating it. Transfers
//! run in constant memory regardless of file size. For the move variant the
//! source is deleted only after the stream has fully completed; a failed
//! stream never deletes the source. Partial destination output from a failed
//! job is not cleaned up.

use crate::error::{FmError, FmResult};
use crate::STREAM_CHUNK_SIZE;
use async_compression::tokio::bufread::GzipDecoder;
use async_compression::tokio::write::GzipEncoder;
use std::io;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Plain,
    Compress,
    Decompress,
}

#[derive(Debug)]
pub struct TransferJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: TransferMode,
    pub delete_source: bool,
}

impl TransferJob {
    pub fn copy(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            mode: TransferMode::Plain,
            delete_source: false,
        }
    }

    pub fn move_file(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            mode: TransferMode::Plain,
            delete_source: true,
        }
    }

    pub fn compress(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            mode: TransferMode::Compress,
            delete_source: false,
        }
    }

    pub fn decompress(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            mode: TransferMode::Decompress,
            delete_source: false,
        }
    }

    /// Runs the job to a terminal state. `Err(Failed(..))` means the stream
    /// stage failed and the source is untouched; `Err(SourceNotDeleted(..))`
    /// means the stream completed but the move could not remove the source.
    pub async fn run(&self) -> FmResult<()> {
        self.stream().await?;
        if self.delete_source {
            tokio::fs::remove_file(&self.source)
                .await
                .map_err(FmError::SourceNotDeleted)?;
        }
        Ok(())
    }

    async fn stream(&self) -> io::Result<()> {
        let source = File::open(&self.source).await?;
        let mut reader = BufReader::with_capacity(STREAM_CHUNK_SIZE, source);
        let destination = File::create(&self.destination).await?;
        let mut writer = BufWriter::with_capacity(STREAM_CHUNK_SIZE, destination);

        match self.mode {
            TransferMode::Plain => {
                tokio::io::copy(&mut reader, &mut writer).await?;
            }
            TransferMode::Compress => {
                let mut encoder = GzipEncoder::new(&mut writer);
                tokio::io::copy(&mut reader, &mut encoder).await?;
                encoder.shutdown().await?;
            }
            TransferMode::Decompress => {
                let mut decoder = GzipDecoder::new(&mut reader);
                tokio::io::copy(&mut decoder, &mut writer).await?;
            }
        }

        writer.flush().await?;
        Ok(())
    }
}
