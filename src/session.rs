//! Session state: the current directory shared by every command.
//!
//! The current directory is the only mutable state in the shell. It is held
//! behind an `Arc<RwLock<..>>` handle so in-flight tasks can read it when
//! they emit their prompt; navigation is check-then-set against the real
//! filesystem, so two racing `cd` commands resolve last-writer-wins.

use crate::error::{FmError, FmResult};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Collapses `.` and `..` segments lexically, without touching the
/// filesystem. Popping past the root is a no-op, so the root is a fixed
/// point for parent traversal.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[derive(Debug, Clone)]
pub struct Session {
    cwd: PathBuf,
}

impl Session {
    pub fn new(start: PathBuf) -> Self {
        Self {
            cwd: normalize(&start),
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Lexical parent; staying put at the root.
    pub fn up(&mut self) {
        if let Some(parent) = self.cwd.parent() {
            self.cwd = parent.to_path_buf();
        }
    }

    pub fn set_cwd(&mut self, path: PathBuf) {
        self.cwd = path;
    }

    /// Resolves a user-supplied token against the current directory.
    /// Purely lexical; existence is the caller's concern.
    pub fn resolve(&self, token: &str) -> PathBuf {
        let candidate = Path::new(token);
        if candidate.is_absolute() {
            normalize(candidate)
        } else {
            normalize(&self.cwd.join(candidate))
        }
    }
}

/// Shared handle to the session, cloned into every spawned operation.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new(start: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::new(start))),
        }
    }

    /// Snapshot of the current directory.
    pub fn cwd(&self) -> PathBuf {
        self.inner.read().unwrap().cwd().to_path_buf()
    }

    pub fn resolve(&self, token: &str) -> PathBuf {
        self.inner.read().unwrap().resolve(token)
    }

    /// Unconditional lexical navigation to the parent. Returns the new
    /// current directory.
    pub fn up(&self) -> PathBuf {
        let mut session = self.inner.write().unwrap();
        session.up();
        session.cwd().to_path_buf()
    }

    /// Check-then-set navigation: the target must exist and be a directory,
    /// otherwise the current directory is left unchanged. The check is not
    /// atomic against outside filesystem mutation.
    pub async fn navigate_to(&self, path: PathBuf) -> FmResult<PathBuf> {
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_dir() {
            return Err(FmError::Failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }
        self.inner.write().unwrap().set_cwd(path.clone());
        Ok(path)
    }
}
