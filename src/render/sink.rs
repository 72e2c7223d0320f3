//! Output sinks for rendered prompts.

use crate::error::{PipelineError, Result};
use std::io::{self, Write};

/// Receives the rendered text.
pub trait OutputSink {
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Writes to any `io::Write` and flushes.
#[derive(Debug, Default)]
pub struct WriterSink<W> {
    writer: W,
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write(&mut self, text: &str) -> Result<()> {
        let to_error = |e: io::Error| PipelineError::WriteError {
            message: e.to_string(),
        };
        self.writer.write_all(text.as_bytes()).map_err(to_error)?;
        self.writer.flush().map_err(to_error)
    }
}
