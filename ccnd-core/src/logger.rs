//! Logger sink injected into the daemon core at creation time.
//!
//! A [`LoggerSink`] pairs a destination stream with a render operation. The
//! core never learns what the destination is; it only hands over format
//! arguments and gets back the number of bytes written.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

type Destination = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable diagnostic sink. Clones share the same destination.
#[derive(Clone)]
pub struct LoggerSink {
    destination: Destination,
}

impl LoggerSink {
    /// Sink writing to the process's standard error stream.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Sink writing to an arbitrary destination.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            destination: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Render `args` and write the result to the destination.
    ///
    /// Returns the number of bytes written.
    pub fn log(&self, args: fmt::Arguments<'_>) -> io::Result<usize> {
        let rendered = fmt::format(args);
        self.write_str(&rendered)
    }

    /// Write already-rendered text to the destination.
    pub fn write_str(&self, text: &str) -> io::Result<usize> {
        let mut destination = self
            .destination
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        destination.write_all(text.as_bytes())?;
        destination.flush()?;
        Ok(text.len())
    }
}

impl fmt::Debug for LoggerSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerSink").finish_non_exhaustive()
    }
}

/// In-memory destination, for capturing what a sink wrote.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
