//! CLI argument parsing for breakdown.
//!
//! Uses clap derive macros for the fixed flags. Custom template variables
//! (`--uv-NAME=VALUE`) have open-ended names, so they are pulled out of argv
//! before clap sees it and passed through as option-map entries.


use crate::config::Config;
use crate::error::{PipelineFailure, Stage};
use crate::pipeline::StageResult;
use clap::{ArgAction, Parser};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Flag form of the custom variable prefix, matched case-insensitively.
pub const CUSTOM_FLAG_PREFIX: &str = "--uv-";

/// Breakdown: turn a directive and a layer into a prompt.
///
/// The prompt template is looked up under the prompt base directory as
/// `{directive}/{layer}/f_{from_layer}[_{adaptation}].md`, filled with the
/// input text and variables, and written to stdout.
///
/// Custom variables are passed as `--uv-NAME=VALUE` and referenced in
/// templates as `{uv-NAME}`.
#[derive(Parser, Debug, Default)]
#[command(name = "breakdown")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directive and layer, e.g. `to project`.
    #[arg(value_name = "TOKEN")]
    pub tokens: Vec<String>,

    /// Input document; `-` reads stdin.
    #[arg(short = 'f', long = "from", value_name = "PATH", allow_hyphen_values = true)]
    pub from: Option<String>,

    /// Destination path exposed to the template as `destination_path`.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub destination: Option<String>,

    /// Template variant (`f_issue_<adaptation>.md`).
    #[arg(short, long, value_name = "NAME")]
    pub adaptation: Option<String>,

    /// Source layer used in the template filename.
    #[arg(short, long, value_name = "LAYER")]
    pub input: Option<String>,

    /// Resolve the `.json` schema-mode template instead of the markdown one.
    #[arg(long)]
    pub schema: bool,

    /// Never read stdin.
    #[arg(long)]
    pub skip_stdin: bool,

    /// Milliseconds to wait for stdin to reach EOF.
    #[arg(long, value_name = "MS")]
    pub stdin_timeout: Option<u64>,

    /// Configuration file (default: .breakdown/config.yaml).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print failures as JSON.
    #[arg(long)]
    pub json_errors: bool,

    /// `--uv-*` arguments as (key without dashes, value).
    #[arg(skip)]
    pub custom: Vec<(String, Option<String>)>,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_args() -> Self {
        let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
        Self::parse_from_args(args)
    }

    /// Parse an argv-style list (first element is the program name).
    pub fn parse_from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let (args, custom) = split_custom_args(args);
        let mut cli = Cli::parse_from(args);
        cli.custom = custom;
        cli
    }

    /// Like [`Cli::parse_from_args`], but returns clap errors instead of exiting.
    pub fn try_parse_from_args<I: IntoIterator<Item = String>>(
        args: I,
    ) -> Result<Self, clap::Error> {
        let (args, custom) = split_custom_args(args);
        let mut cli = Cli::try_parse_from(args)?;
        cli.custom = custom;
        Ok(cli)
    }

    /// Option map for the pipeline.
    pub fn option_map(&self) -> Map<String, Value> {
        let mut map = Map::new();

        let strings = [
            ("from", &self.from),
            ("destination", &self.destination),
            ("adaptation", &self.adaptation),
            ("input", &self.input),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value.clone()));
            }
        }

        if self.skip_stdin {
            map.insert("skipStdin".to_string(), Value::Bool(true));
        }
        if self.schema {
            map.insert("schemaMode".to_string(), Value::Bool(true));
        }
        if let Some(ms) = self.stdin_timeout {
            map.insert("stdinTimeout".to_string(), Value::from(ms));
        }

        for (key, value) in &self.custom {
            let value = value.clone().map(Value::String).unwrap_or(Value::Null);
            map.insert(key.clone(), value);
        }

        map
    }

    /// Load configuration for this invocation.
    pub fn load_config(&self) -> StageResult<Config> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Config::load_or_default(self.config.as_deref(), &cwd)
            .map_err(|e| PipelineFailure::new(Stage::Prepare, e))
    }
}

/// Split `--uv-NAME[=VALUE]` arguments from the rest.
///
/// Stops at a bare `--`. A flag without `=` yields `None` as its value.
pub fn split_custom_args<I: IntoIterator<Item = String>>(
    args: I,
) -> (Vec<String>, Vec<(String, Option<String>)>) {
    let mut rest = Vec::new();
    let mut custom = Vec::new();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            rest.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            rest.push(arg);
            continue;
        }
        if is_custom_flag(&arg) {
            let body = &arg[2..];
            match body.split_once('=') {
                Some((key, value)) => custom.push((key.to_string(), Some(value.to_string()))),
                None => custom.push((body.to_string(), None)),
            }
            continue;
        }
        rest.push(arg);
    }

    (rest, custom)
}

fn is_custom_flag(arg: &str) -> bool {
    arg.get(..CUSTOM_FLAG_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(CUSTOM_FLAG_PREFIX))
}

/// Run the CLI: load config, run the pipeline against process stdin/stdout.
pub fn run(cli: &Cli) -> StageResult<()> {
    let config = cli.load_config()?;
    tracing::debug!(working_dir = %config.working_dir().display(), "loaded configuration");

    crate::run(cli.tokens.as_slice(), &config, &cli.option_map())
}
