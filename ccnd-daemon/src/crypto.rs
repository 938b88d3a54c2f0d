//! Release of process-wide cryptographic library state.

use ccnd_core::CryptoSubsystem;

/// Release `crypto`. Must run after the daemon handle has been destroyed.
pub fn release_crypto_state(crypto: Box<dyn CryptoSubsystem>) {
    crypto.release();
    tracing::debug!("cryptographic library state released");
}

/// Crypto state of the bundled standby core.
///
/// The standby core links no cryptography at all, so release only records
/// the event.
#[derive(Debug, Default)]
pub struct RustCryptoState;

impl CryptoSubsystem for RustCryptoState {
    fn release(self: Box<Self>) {
        tracing::trace!(provider = "rust", "no global crypto tables to free");
    }
}
