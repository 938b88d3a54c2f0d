//! ccnd lifecycle shell: argument gate, signal policy, monitoring pipe,
//! daemon create/run/destroy and crypto cleanup.

pub mod config;
pub mod crypto;
mod error;
pub mod monitoring;
pub mod paths;
mod runtime;
pub mod signals;
pub mod standby;

pub use config::{LifecycleConfig, MonitoringConfig};
pub use crypto::{release_crypto_state, RustCryptoState};
pub use error::{LifecycleError, EXIT_FAILURE};
pub use runtime::{check_arguments, start_blocking, Lifecycle};
pub use signals::apply_startup_policy;
pub use standby::StandbyCore;
