use std::path::PathBuf;
use std::time::Duration;

pub const DAEMON_NAME: &str = "ccnd";

/// Set to exactly `TRUE` to attach the monitoring channel.
pub const MONITORING_ENV: &str = "FMC_MONITORING";
pub const MONITORING_ENABLED_VALUE: &str = "TRUE";

/// Overrides [`DEFAULT_MONITOR_PIPE`].
pub const MONITOR_PIPE_ENV: &str = "CCND_MONITOR_PIPE";
pub const DEFAULT_MONITOR_PIPE: &str = "/tmp/interest_monitoring.log";

/// Line written to the monitoring channel at shutdown.
pub const EXIT_MARKER: &str = "exit";

pub const HEARTBEAT_ENV: &str = "CCND_HEARTBEAT_SECS";
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(30);

pub const USAGE: &str = "\
ccnd - CCNx forwarding daemon
  options: none
  arguments: none
  environment variables:
    FMC_MONITORING=TRUE
      attach the interest monitoring named pipe
    CCND_MONITOR_PIPE=<path>
      named pipe path (default /tmp/interest_monitoring.log)
    CCND_HEARTBEAT_SECS=<n>
      monitoring heartbeat interval in seconds (default 30)
    RUST_LOG=<filter>
      orchestrator tracing filter (default warn)
";

pub fn default_monitor_pipe() -> PathBuf {
    PathBuf::from(DEFAULT_MONITOR_PIPE)
}
