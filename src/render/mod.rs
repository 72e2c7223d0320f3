//! Rendering and output collaborators.
//!
//! The pipeline only sees two seams:
//!
//! - [`TemplateRenderer`]: template path + variable table to text
//! - [`OutputSink`]: where the rendered text goes
//!
//! [`FileTemplateRenderer`] and [`WriterSink`] are the defaults used by the CLI.

mod engine;
mod sink;

pub use engine::{RenderMode, TemplateError, render_template};
pub use sink::{OutputSink, WriterSink};

use crate::config::RenderSection;
use crate::error::{PipelineError, Result};
use crate::paths::path_to_string;
use crate::variables::VariableTable;
use std::path::Path;

/// Turns a template file and variables into text.
pub trait TemplateRenderer {
    fn render(&self, template: &Path, variables: &VariableTable) -> Result<String>;
}

/// Reads the template from disk and substitutes `{name}` placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTemplateRenderer {
    mode: RenderMode,
}

impl FileTemplateRenderer {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    pub fn from_config(render: &RenderSection) -> Self {
        Self::new(RenderMode::from_strict(render.strict))
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}

impl TemplateRenderer for FileTemplateRenderer {
    fn render(&self, template: &Path, variables: &VariableTable) -> Result<String> {
        let render_error = |message: String| PipelineError::RenderError {
            template: path_to_string(template),
            message,
        };

        let source = std::fs::read_to_string(template)
            .map_err(|e| render_error(format!("failed to read template: {}", e)))?;

        render_template(&source, variables, self.mode).map_err(|e| render_error(e.to_string()))
    }
}
