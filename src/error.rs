//! Error types for fmsh

use thiserror::Error;

/// Result type alias for fmsh operations
pub type FmResult<T> = Result<T, FmError>;

/// Error types for fmsh shell operations.
///
/// Only two tiers are ever shown to the user: `InvalidInput` renders as
/// "Invalid input", everything else renders as "Operation failed". The
/// underlying cause is kept here for logging.
#[derive(Error, Debug)]
pub enum FmError {
    /// Malformed or unrecognized command shape, detected before any I/O
    #[error("Invalid input")]
    InvalidInput,

    /// An underlying filesystem or OS call rejected the request
    #[error("Operation failed: {0}")]
    Failed(#[from] std::io::Error),

    /// A move transfer completed but deleting the source did not
    #[error("Operation failed: source not deleted: {0}")]
    SourceNotDeleted(#[source] std::io::Error),
}
