//! Process-wide signal disposition applied once at startup.

use crate::error::LifecycleError;

/// Ignore SIGPIPE so a peer dropping a connection mid-write surfaces as an
/// `EPIPE` write error instead of terminating the process. Never reverted.
#[cfg(unix)]
pub fn apply_startup_policy() -> Result<(), LifecycleError> {
    use nix::sys::signal::{signal, SigHandler, Signal};

    // SAFETY: SigIgn installs no handler code, so no async-signal-safety
    // requirements apply.
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigIgn) }
        .map_err(|errno| LifecycleError::SignalPolicy(errno.into()))?;
    tracing::debug!(signal = "SIGPIPE", "signal disposition set to ignore");
    Ok(())
}

#[cfg(not(unix))]
pub fn apply_startup_policy() -> Result<(), LifecycleError> {
    Ok(())
}
