//! Streams backed by the host process's stdout and stderr.

use std::io::{self, Write};

use minish_core::core::streams::OutputStream;
use tracing::warn;

pub struct StdoutStream(io::Stdout);

impl StdoutStream {
    pub fn new() -> Self {
        Self(io::stdout())
    }
}

impl OutputStream for StdoutStream {
    fn write(&mut self, text: &str) {
        let mut lock = self.0.lock();
        if let Err(e) = lock.write_all(text.as_bytes()).and_then(|()| lock.flush()) {
            warn!(error = %e, "failed to write to stdout");
        }
    }
}

pub struct StderrStream(io::Stderr);

impl StderrStream {
    pub fn new() -> Self {
        Self(io::stderr())
    }
}

impl OutputStream for StderrStream {
    fn write(&mut self, text: &str) {
        // Nowhere left to report a failure on stderr.
        let _ = self.0.lock().write_all(text.as_bytes());
    }
}
