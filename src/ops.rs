//! One-shot filesystem operations: list, read, create, rename, delete, hash.
//!
//! Each returns its payload lines on success; the dispatcher turns errors
//! into the generic failure line and logs the cause.

use crate::error::FmResult;
use crate::STREAM_CHUNK_SIZE;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Lists a directory as `name  kind` rows, sorted by name. Directories are
/// tagged `directory`; everything else, symlinks included, is tagged `file`.
pub async fn list_dir(path: PathBuf) -> FmResult<Vec<String>> {
    let mut reader = tokio::fs::read_dir(&path).await?;
    let mut entries: Vec<(String, &'static str)> = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let kind = match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => "directory",
            _ => "file",
        };
        entries.push((name, kind));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let width = entries.iter().map(|(name, _)| name.chars().count()).max();
    let width = width.unwrap_or(0);
    Ok(entries
        .into_iter()
        .map(|(name, kind)| format!("{name:<width$}  {kind}"))
        .collect())
}

/// Reads a file as raw bytes, rendered lossily as UTF-8 for display.
pub async fn read_file(path: PathBuf) -> FmResult<Vec<String>> {
    let bytes = tokio::fs::read(&path).await?;
    Ok(vec![String::from_utf8_lossy(&bytes).into_owned()])
}

/// Exclusive-create of an empty file; fails if the target already exists.
pub async fn create_file(path: PathBuf) -> FmResult<Vec<String>> {
    tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await?;
    Ok(Vec::new())
}

/// Atomic rename; cross-filesystem renames fail per platform rules.
pub async fn rename_entry(from: PathBuf, to: PathBuf) -> FmResult<Vec<String>> {
    tokio::fs::rename(&from, &to).await?;
    Ok(Vec::new())
}

pub async fn remove_file(path: PathBuf) -> FmResult<Vec<String>> {
    tokio::fs::remove_file(&path).await?;
    Ok(Vec::new())
}

/// Lowercase hex SHA-256 of the file's raw bytes, streamed in fixed-size
/// chunks so arbitrarily large files hash in constant memory.
pub async fn hash_file(path: PathBuf) -> FmResult<Vec<String>> {
    let mut file = tokio::fs::File::open(&path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(vec![hex::encode(hasher.finalize())])
}
