//! ccnd core library — the contract between the lifecycle shell and the
//! forwarding daemon.
//!
//! - [`contract`] — [`DaemonCore`] and [`CryptoSubsystem`] traits
//! - [`handle`] — [`DaemonHandle`] and [`MonitoringDescriptor`]
//! - [`logger`] — [`LoggerSink`] capability
//! - [`error`] — [`CoreError`]

pub mod contract;
pub mod error;
pub mod handle;
pub mod logger;

pub use contract::{CryptoSubsystem, DaemonCore};
pub use error::CoreError;
pub use handle::{DaemonHandle, MonitoringDescriptor};
pub use logger::{LogBuffer, LoggerSink};
