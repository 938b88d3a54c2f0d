//! The daemon handle and its monitoring descriptor.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use crate::logger::LoggerSink;

static DROP_WARNED: AtomicBool = AtomicBool::new(false);

/// Side-channel trace stream attached to a running daemon.
///
/// Either an open named pipe or the disabled sentinel. The descriptor is
/// closed when the `Pipe` value is dropped. Pipes are expected to be opened
/// non-blocking: a full pipe drops lines rather than stalling the writer.
#[derive(Debug, Default)]
pub enum MonitoringDescriptor {
    #[default]
    Disabled,
    Pipe(File),
}

impl MonitoringDescriptor {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Pipe(_))
    }

    /// Write `line` followed by a newline. Disabled descriptors accept and
    /// drop everything; so does a pipe whose buffer is full (`Ok(0)`).
    pub fn write_line(&mut self, line: &str) -> io::Result<usize> {
        match self {
            Self::Disabled => Ok(0),
            Self::Pipe(file) => {
                let mut buf = String::with_capacity(line.len() + 1);
                buf.push_str(line);
                buf.push('\n');
                match file.write_all(buf.as_bytes()) {
                    Ok(()) => Ok(buf.len()),
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                        if !DROP_WARNED.swap(true, Ordering::Relaxed) {
                            tracing::warn!(
                                "monitoring pipe is full; dropping trace lines until a reader drains it"
                            );
                        }
                        Ok(0)
                    }
                    Err(err) => Err(err),
                }
            }
        }
    }
}

/// Owned handle to a created daemon core.
///
/// Built by [`crate::DaemonCore::create`], consumed by
/// [`crate::DaemonCore::destroy`]. Not `Clone`.
pub struct DaemonHandle<S> {
    name: String,
    logger: LoggerSink,
    monitoring: MonitoringDescriptor,
    state: S,
}

impl<S> DaemonHandle<S> {
    pub fn new(name: impl Into<String>, logger: LoggerSink, state: S) -> Self {
        Self {
            name: name.into(),
            logger,
            monitoring: MonitoringDescriptor::Disabled,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logger(&self) -> &LoggerSink {
        &self.logger
    }

    /// Emit one diagnostic line: `<secs>.<micros> <name>[<pid>]: <text>`.
    ///
    /// Logging failures are dropped; diagnostics never abort the caller.
    pub fn msg(&self, text: impl fmt::Display) {
        let now = Utc::now();
        let _ = self.logger.log(format_args!(
            "{}.{:06} {}[{}]: {}\n",
            now.timestamp(),
            now.timestamp_subsec_micros(),
            self.name,
            std::process::id(),
            text
        ));
    }

    /// Write one trace line to the monitoring channel, if attached.
    pub fn trace(&mut self, args: fmt::Arguments<'_>) -> io::Result<usize> {
        self.monitoring.write_line(&fmt::format(args))
    }

    pub fn monitoring(&self) -> &MonitoringDescriptor {
        &self.monitoring
    }

    pub fn set_monitoring(&mut self, descriptor: MonitoringDescriptor) {
        self.monitoring = descriptor;
    }

    /// Detach the monitoring descriptor, leaving the sentinel in its place.
    pub fn take_monitoring(&mut self) -> MonitoringDescriptor {
        std::mem::take(&mut self.monitoring)
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }
}

impl<S> fmt::Debug for DaemonHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonHandle")
            .field("name", &self.name)
            .field("monitoring", &self.monitoring)
            .finish_non_exhaustive()
    }
}
