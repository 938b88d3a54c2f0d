use std::path::PathBuf;

use thiserror::Error;

/// Exit status for every fatal lifecycle failure.
pub const EXIT_FAILURE: i32 = 1;

/// Fatal failures of the startup sequence. `run` itself never produces one.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("unexpected arguments: {count} given, none accepted")]
    Usage { count: usize },

    #[error("failed to install signal policy: {0}")]
    SignalPolicy(#[source] std::io::Error),

    #[error("daemon handle creation failed: {0}")]
    HandleCreation(#[from] ccnd_core::CoreError),

    #[error("failed to create named pipe at {path}: {source}")]
    MonitoringCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open named pipe at {path} after creating it: {source}")]
    MonitoringReopen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LifecycleError {
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

pub(crate) fn create_err(path: impl Into<PathBuf>, source: std::io::Error) -> LifecycleError {
    LifecycleError::MonitoringCreate {
        path: path.into(),
        source,
    }
}

pub(crate) fn reopen_err(path: impl Into<PathBuf>, source: std::io::Error) -> LifecycleError {
    LifecycleError::MonitoringReopen {
        path: path.into(),
        source,
    }
}
