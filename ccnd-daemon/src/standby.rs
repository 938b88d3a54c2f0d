//! Standby daemon core linked into the `ccnd` binary.
//!
//! Stands in for the forwarding engine: it holds a tokio runtime, emits a
//! heartbeat on the monitoring channel and returns from `run` on SIGTERM or
//! SIGINT.

use std::io;
use std::time::Duration;

use ccnd_core::{CoreError, DaemonCore, DaemonHandle, LoggerSink};
use tokio::runtime::Runtime;

const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct StandbyCore {
    heartbeat: Duration,
}

impl StandbyCore {
    pub fn new(heartbeat: Duration) -> Self {
        Self { heartbeat }
    }
}

/// Core state; the runtime is `None` only while `run` is driving it.
#[derive(Debug)]
pub struct StandbyState {
    runtime: Option<Runtime>,
}

impl DaemonCore for StandbyCore {
    type State = StandbyState;

    fn create(
        &mut self,
        name: &str,
        logger: LoggerSink,
    ) -> Result<DaemonHandle<StandbyState>, CoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let handle = DaemonHandle::new(
            name,
            logger,
            StandbyState {
                runtime: Some(runtime),
            },
        );
        tracing::debug!(heartbeat_secs = self.heartbeat.as_secs_f64(), "standby core created");
        Ok(handle)
    }

    fn run(&mut self, handle: &mut DaemonHandle<StandbyState>) {
        let Some(runtime) = handle.state_mut().runtime.take() else {
            handle.msg("standby runtime already consumed");
            return;
        };
        runtime.block_on(serve(handle, self.heartbeat));
        handle.state_mut().runtime = Some(runtime);
    }

    fn destroy(&mut self, handle: DaemonHandle<StandbyState>) {
        if let Some(runtime) = handle.into_state().runtime {
            runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
        }
    }
}

async fn serve(handle: &mut DaemonHandle<StandbyState>, heartbeat: Duration) {
    let mut termination = match Termination::register() {
        Ok(termination) => termination,
        Err(err) => {
            handle.msg(format_args!("failed to register termination signals: {err}"));
            return;
        }
    };
    handle.msg("waiting for termination signal");

    let mut ticker = tokio::time::interval(heartbeat.max(Duration::from_millis(1)));
    ticker.tick().await;
    let mut beats: u64 = 0;

    loop {
        tokio::select! {
            name = termination.recv() => {
                handle.msg(format_args!("received {name}"));
                break;
            }
            _ = ticker.tick() => {
                beats += 1;
                if let Err(err) = handle.trace(format_args!("heartbeat {beats}")) {
                    tracing::warn!(error = %err, "monitoring heartbeat write failed");
                }
            }
        }
    }
}

#[cfg(unix)]
struct Termination {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Termination {
    fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
        }
    }
}

#[cfg(not(unix))]
struct Termination;

#[cfg(not(unix))]
impl Termination {
    fn register() -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> &'static str {
        let _ = tokio::signal::ctrl_c().await;
        "ctrl-c"
    }
}
