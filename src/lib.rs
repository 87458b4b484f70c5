//! fmsh - Interactive file manager shell
//!
//! This crate provides:
//! - A line-oriented shell over a session-held current directory
//! - Navigation, listing, reading, create/rename/delete, and SHA-256 hashing
//! - Streaming copy/move and gzip compress/decompress in constant memory
//! - Asynchronous dispatch: the read loop never blocks on a running command

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod osinfo;
pub mod session;
pub mod sink;
pub mod transfer;

pub use config::Config;
pub use dispatch::{Dispatcher, Outcome};
pub use error::{FmError, FmResult};
pub use session::{Session, SessionHandle};
pub use sink::ResultSink;
pub use transfer::{TransferJob, TransferMode};

pub(crate) const STREAM_CHUNK_SIZE: usize = 64 * 1024;
