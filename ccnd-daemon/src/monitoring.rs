//! Named-pipe monitoring channel: self-healing attach and shutdown.
//!
//! Attach sequence when enabled:
//!   open rw → on failure log + mkfifo 0666 → open rw again.
//! A failed mkfifo or a failed second open is fatal. When disabled nothing is
//! touched and nothing is logged. The pipe is opened non-blocking so trace
//! writes never stall the daemon when no reader drains it.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use ccnd_core::{DaemonHandle, MonitoringDescriptor};

use crate::config::MonitoringConfig;
use crate::error::{create_err, reopen_err, LifecycleError};
use crate::paths::EXIT_MARKER;

/// Opens the pipe path; swapped out in tests to force open failures.
pub(crate) type PipeOpener = fn(&Path) -> io::Result<File>;

/// Resolve the monitoring descriptor for `handle`. Diagnostics go through the
/// handle's logger.
pub fn attach<S>(
    config: &MonitoringConfig,
    handle: &DaemonHandle<S>,
) -> Result<MonitoringDescriptor, LifecycleError> {
    attach_with(config, handle, open_read_write)
}

pub(crate) fn attach_with<S>(
    config: &MonitoringConfig,
    handle: &DaemonHandle<S>,
    open: PipeOpener,
) -> Result<MonitoringDescriptor, LifecycleError> {
    if !config.enabled {
        return Ok(MonitoringDescriptor::Disabled);
    }

    let path = config.pipe_path.as_path();
    match open(path) {
        Ok(file) => {
            tracing::debug!(path = %path.display(), "monitoring pipe opened");
            return Ok(MonitoringDescriptor::Pipe(file));
        }
        Err(err) => {
            handle.msg(format_args!(
                "failed to open named pipe {}: {err}",
                path.display()
            ));
            handle.msg(format_args!("creating new named pipe {}", path.display()));
        }
    }

    if let Err(err) = create_fifo(path) {
        handle.msg(format_args!(
            "failed to create named pipe {}: {err}",
            path.display()
        ));
        return Err(create_err(path, err));
    }

    match open(path) {
        Ok(file) => {
            tracing::debug!(path = %path.display(), "monitoring pipe created and opened");
            Ok(MonitoringDescriptor::Pipe(file))
        }
        Err(err) => {
            handle.msg(format_args!(
                "failed to open named pipe {} after creation: {err}",
                path.display()
            ));
            Err(reopen_err(path, err))
        }
    }
}

/// Write the exit marker and close the channel. The sentinel is skipped.
pub fn detach(mut descriptor: MonitoringDescriptor) {
    if !descriptor.is_enabled() {
        return;
    }
    if let Err(err) = descriptor.write_line(EXIT_MARKER) {
        tracing::warn!(error = %err, "failed to write exit marker to monitoring pipe");
    }
    drop(descriptor);
    tracing::debug!("monitoring pipe closed");
}

#[cfg(unix)]
pub(crate) fn open_read_write(path: &Path) -> io::Result<File> {
    use nix::fcntl::OFlag;
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(OFlag::O_NONBLOCK.bits())
        .open(path)
}

#[cfg(not(unix))]
pub(crate) fn open_read_write(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).write(true).open(path)
}

#[cfg(unix)]
fn create_fifo(path: &Path) -> io::Result<()> {
    use nix::sys::stat::Mode;
    use nix::unistd::mkfifo;

    let mode = Mode::S_IRUSR
        | Mode::S_IWUSR
        | Mode::S_IRGRP
        | Mode::S_IWGRP
        | Mode::S_IROTH
        | Mode::S_IWOTH;
    mkfifo(path, mode).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn create_fifo(_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "named pipes require a unix platform",
    ))
}


/// Fill the pipe at `path` through a second non-blocking descriptor until the
/// kernel buffer is full. The returned writer keeps the pipe open.
#[cfg(all(test, unix))]
pub(crate) fn fill_pipe_for_test(path: &Path) -> File {
    use std::io::Write;

    let mut writer = open_read_write(path).expect("open filler");
    for chunk in [&[b'x'; 4096][..], &[b'x'][..]] {
        loop {
            match writer.write(chunk) {
                Ok(_) => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => panic!("filling pipe failed: {err}"),
            }
        }
    }
    writer
}
