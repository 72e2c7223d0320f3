//! Breakdown: resolve a directive/layer command into a rendered prompt.
//!
//! A run validates the two positional tokens, optionally reads stdin,
//! resolves the input, output, template and schema paths, builds the
//! template variables, renders the template and writes the result.
//! See [`pipeline::Orchestrator`].

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod options;
pub mod params;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod stdin;
pub mod variables;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{PipelineError, PipelineFailure, Stage};
pub use pipeline::{Orchestrator, StageResult};

use render::WriterSink;
use serde_json::{Map, Value};
use stdin::ProcessStdin;

/// Run the pipeline against process stdin, writing the prompt to stdout.
pub fn run<S: AsRef<str>>(
    tokens: &[S],
    config: &Config,
    options: &Map<String, Value>,
) -> StageResult<()> {
    let mut sink = WriterSink::stdout();
    Orchestrator::from_config(config).run(tokens, config, options, ProcessStdin, &mut sink)
}
