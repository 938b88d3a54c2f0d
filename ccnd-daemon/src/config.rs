//! Runtime configuration resolved from the process environment.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;

use crate::paths::{
    default_monitor_pipe, DAEMON_NAME, DEFAULT_HEARTBEAT, HEARTBEAT_ENV, MONITORING_ENABLED_VALUE,
    MONITORING_ENV, MONITOR_PIPE_ENV,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub pipe_path: PathBuf,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pipe_path: default_monitor_pipe(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// Name handed to the core; `argv[0]` for the binary.
    pub process_name: String,
    pub monitoring: MonitoringConfig,
    pub heartbeat: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            process_name: DAEMON_NAME.to_string(),
            monitoring: MonitoringConfig::default(),
            heartbeat: DEFAULT_HEARTBEAT,
        }
    }
}

impl LifecycleConfig {
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var_os(key));
        if let Some(argv0) = std::env::args_os().next() {
            config.process_name = argv0.to_string_lossy().into_owned();
        }
        config
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let enabled = lookup(MONITORING_ENV).as_deref() == Some(OsStr::new(MONITORING_ENABLED_VALUE));
        let pipe_path = lookup(MONITOR_PIPE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_monitor_pipe);
        let heartbeat = lookup(HEARTBEAT_ENV)
            .and_then(|value| value.to_str()?.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HEARTBEAT);

        Self {
            process_name: DAEMON_NAME.to_string(),
            monitoring: MonitoringConfig { enabled, pipe_path },
            heartbeat,
        }
    }
}
