//! Output abstraction for side-effecting nodes.
//!
//! Print-style nodes emit text through the [`PrintWriter`] carried by the
//! execution context, so hosts can route blueprint output to stdout, capture
//! it for tests, or drop it entirely.

use std::{
    borrow::Cow,
    io::{self, Write as _},
};

use crate::error::NodeError;

/// Trait for handling output emitted by node behaviors.
///
/// Implement this to capture or redirect text produced by print-style nodes.
/// The default implementation [`StdPrint`] writes to stdout.
pub trait PrintWriter {
    /// Called once per emitted line, without a trailing newline.
    fn write_line(&mut self, line: Cow<'_, str>) -> Result<(), NodeError>;
}

/// Default `PrintWriter` that writes one line per call to stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn write_line(&mut self, line: Cow<'_, str>) -> Result<(), NodeError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{line}").map_err(|err| NodeError::Output(err.to_string()))
    }
}

/// `PrintWriter` that discards all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn write_line(&mut self, _line: Cow<'_, str>) -> Result<(), NodeError> {
        Ok(())
    }
}

/// `PrintWriter` that collects emitted lines into a `Vec<String>`.
///
/// Used by tests and by hosts that surface blueprint output in their own UI.
#[derive(Debug, Default)]
pub struct CollectPrint {
    lines: Vec<String>,
}

impl CollectPrint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl PrintWriter for CollectPrint {
    fn write_line(&mut self, line: Cow<'_, str>) -> Result<(), NodeError> {
        self.lines.push(line.into_owned());
        Ok(())
    }
}
