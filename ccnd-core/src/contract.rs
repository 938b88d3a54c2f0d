//! Contract between the lifecycle orchestrator and the daemon it drives.

use crate::error::CoreError;
use crate::handle::DaemonHandle;
use crate::logger::LoggerSink;

/// A forwarding daemon as seen from the outside: create, run, destroy.
///
/// The orchestrator calls each method at most once per process, in that
/// order, and owns the handle in between.
pub trait DaemonCore {
    /// Core-private state carried inside the handle.
    type State;

    /// Build a handle. `logger` is the only diagnostic destination the core
    /// should use.
    fn create(
        &mut self,
        name: &str,
        logger: LoggerSink,
    ) -> Result<DaemonHandle<Self::State>, CoreError>;

    /// Block until the daemon decides to stop. The monitoring descriptor on
    /// `handle` is resolved before this is called and stays attached until it
    /// returns.
    fn run(&mut self, handle: &mut DaemonHandle<Self::State>);

    /// Release everything the handle owns.
    fn destroy(&mut self, handle: DaemonHandle<Self::State>);
}

/// Process-wide state of the cryptographic library used by the core.
///
/// `release` consumes the value, so it can run at most once.
pub trait CryptoSubsystem {
    fn release(self: Box<Self>);
}
