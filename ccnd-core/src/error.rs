//! Error types for ccnd-core.

use thiserror::Error;

/// Failures a daemon core can report from `create`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure while the core was initializing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The core refused to initialize for a reason of its own.
    #[error("daemon core refused to start: {0}")]
    Refused(String),
}
