use std::ffi::OsString;

use ccnd_core::{CryptoSubsystem, DaemonCore, LoggerSink};

use crate::config::LifecycleConfig;
use crate::crypto::{release_crypto_state, RustCryptoState};
use crate::error::LifecycleError;
use crate::monitoring::{self, PipeOpener};
use crate::paths::USAGE;
use crate::signals::apply_startup_policy;
use crate::standby::StandbyCore;

/// Startup-to-shutdown sequence around one daemon core.
///
/// Phases, in order: gate, signal policy, create, attach monitoring, run,
/// teardown. Every phase before `run` is fatal on failure; `run` itself is
/// never treated as a failure.
pub struct Lifecycle<C: DaemonCore> {
    core: C,
    config: LifecycleConfig,
    logger: LoggerSink,
    crypto: Box<dyn CryptoSubsystem>,
    open_pipe: PipeOpener,
}

impl<C: DaemonCore> Lifecycle<C> {
    /// Lifecycle logging to stderr with the bundled crypto provider.
    pub fn new(core: C, config: LifecycleConfig) -> Self {
        Self {
            core,
            config,
            logger: LoggerSink::stderr(),
            crypto: Box::new(RustCryptoState),
            open_pipe: monitoring::open_read_write,
        }
    }

    pub fn with_logger(mut self, logger: LoggerSink) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_crypto(mut self, crypto: Box<dyn CryptoSubsystem>) -> Self {
        self.crypto = crypto;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_pipe_opener(mut self, open_pipe: PipeOpener) -> Self {
        self.open_pipe = open_pipe;
        self
    }

    /// Drive the core from creation to destruction.
    ///
    /// `args` are the positional arguments after the program name.
    pub fn run(self, args: &[OsString]) -> Result<(), LifecycleError> {
        let Self {
            mut core,
            config,
            logger,
            crypto,
            open_pipe,
        } = self;

        tracing::debug!(phase = "gate", "lifecycle phase");
        check_arguments(args, &logger)?;

        tracing::debug!(phase = "policy", "lifecycle phase");
        apply_startup_policy()?;

        tracing::debug!(phase = "create", name = %config.process_name, "lifecycle phase");
        let mut handle = match core.create(&config.process_name, logger.clone()) {
            Ok(handle) => handle,
            Err(err) => {
                tracing::error!(error = %err, "daemon core refused to start");
                return Err(LifecycleError::HandleCreation(err));
            }
        };

        tracing::debug!(
            phase = "attach",
            enabled = config.monitoring.enabled,
            path = %config.monitoring.pipe_path.display(),
            "lifecycle phase"
        );
        let descriptor = monitoring::attach_with(&config.monitoring, &handle, open_pipe)?;
        handle.set_monitoring(descriptor);

        tracing::debug!(phase = "run", "lifecycle phase");
        core.run(&mut handle);

        tracing::debug!(phase = "teardown", "lifecycle phase");
        monitoring::detach(handle.take_monitoring());
        handle.msg("exiting.");
        core.destroy(handle);
        release_crypto_state(crypto);
        Ok(())
    }
}

/// Reject any positional argument, writing the usage text to `logger`.
pub fn check_arguments(args: &[OsString], logger: &LoggerSink) -> Result<(), LifecycleError> {
    if args.is_empty() {
        return Ok(());
    }
    if let Err(err) = logger.write_str(USAGE) {
        tracing::warn!(error = %err, "failed to write usage text");
    }
    Err(LifecycleError::Usage { count: args.len() })
}

/// Run the bundled standby core with configuration from the environment and
/// return the process exit status.
pub fn start_blocking(args: &[OsString]) -> i32 {
    init_tracing();
    let config = LifecycleConfig::from_env();
    let core = StandbyCore::new(config.heartbeat);
    match Lifecycle::new(core, config).run(args) {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!(error = %err, "lifecycle aborted");
            err.exit_code()
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{self, Write};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use ccnd_core::{CoreError, DaemonHandle, LogBuffer};
    use tempfile::TempDir;

    use crate::config::MonitoringConfig;

    /// Core that records each lifecycle call into a shared list.
    struct RecordingCore(Arc<Mutex<Vec<&'static str>>>);

    impl RecordingCore {
        fn record(&self, event: &'static str) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl DaemonCore for RecordingCore {
        type State = ();

        fn create(&mut self, name: &str, logger: LoggerSink) -> Result<DaemonHandle<()>, CoreError> {
            self.record("create");
            Ok(DaemonHandle::new(name, logger, ()))
        }

        fn run(&mut self, _handle: &mut DaemonHandle<()>) {
            self.record("run");
        }

        fn destroy(&mut self, _handle: DaemonHandle<()>) {
            self.record("destroy");
        }
    }

    struct BrokenStream;

    impl Write for BrokenStream {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn refuse_open(_path: &Path) -> io::Result<File> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    #[test]
    fn empty_arguments_pass_the_gate() {
        let log = LogBuffer::new();
        check_arguments(&[], &LoggerSink::new(log.clone())).expect("no args is valid");
        assert!(log.contents().is_empty());
    }

    #[test]
    fn any_argument_prints_usage_and_fails() {
        let log = LogBuffer::new();
        let args = vec![OsString::from("-h"), OsString::from("extra")];

        let err = check_arguments(&args, &LoggerSink::new(log.clone())).unwrap_err();

        assert!(matches!(err, LifecycleError::Usage { count: 2 }), "got: {err}");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(log.contents(), USAGE);
    }

    #[test]
    fn usage_write_failure_still_rejects_arguments() {
        let args = vec![OsString::from("extra")];
        let err = check_arguments(&args, &LoggerSink::new(BrokenStream)).unwrap_err();
        assert!(matches!(err, LifecycleError::Usage { count: 1 }), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn failed_reopen_after_creation_never_runs_the_core() {
        let dir = TempDir::new().unwrap();
        let pipe = dir.path().join("monitor.fifo");
        let log = LogBuffer::new();
        let config = LifecycleConfig {
            monitoring: MonitoringConfig {
                enabled: true,
                pipe_path: pipe.clone(),
            },
            ..LifecycleConfig::default()
        };

        let events = Arc::new(Mutex::new(Vec::new()));
        let err = Lifecycle::new(RecordingCore(events.clone()), config)
            .with_logger(LoggerSink::new(log.clone()))
            .with_pipe_opener(refuse_open)
            .run(&[])
            .unwrap_err();

        assert!(matches!(err, LifecycleError::MonitoringReopen { .. }), "got: {err}");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(*events.lock().unwrap(), vec!["create"]);
        let contents = log.contents();
        assert!(contents.contains("after creation"), "got: {contents}");
        assert!(!contents.contains("exiting."), "got: {contents}");
        assert!(pipe.exists(), "mkfifo ran before the failed reopen");
    }
}
