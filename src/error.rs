//! Error types for the breakdown pipeline.
//!
//! Uses thiserror for derive macros and serde for the machine-readable form.
//! Every stage returns `Result<T, PipelineError>`; the orchestrator tags the
//! first failure with the [`Stage`] that produced it.

use crate::exit_codes;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Every failure kind the pipeline can produce.
///
/// Serializes as `{"kind": "<Variant>", ...fields}`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum PipelineError {
    /// Wrong number of positional tokens.
    #[error("expected {expected} parameters (directive and layer), received {received}")]
    InvalidParameterCount { received: usize, expected: usize },

    /// First token is not an allowed directive.
    #[error("invalid directive '{value}': must match {allowed}")]
    InvalidDirective { value: String, allowed: String },

    /// Second token is not an allowed layer.
    #[error("invalid layer '{value}': must match {allowed}")]
    InvalidLayer { value: String, allowed: String },

    /// Standard input could not be read, or did not finish in time.
    #[error("{}", stdin_message(.timeout_ms, .message))]
    StdinReadError {
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Path contains characters that are never valid.
    #[error("invalid characters in path '{path}': {reason}")]
    InvalidCharacters { path: String, reason: String },

    /// Path could not be inspected for a reason other than permissions.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Path exists but access was refused.
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    /// A required file does not exist.
    #[error("file not found: {path}")]
    PathNotFound { path: String },

    /// No prompt template exists for the request.
    #[error("prompt template not found: {path} (tried: {})", join_paths(.attempted))]
    TemplateNotFound { path: String, attempted: Vec<String> },

    /// A custom variable collides with a variable the pipeline derives itself.
    #[error("custom variable '{key}' uses a reserved name")]
    ReservedVariableName { key: String },

    /// A custom variable key looks like the prefix but does not match it exactly.
    #[error("custom variable '{key}' must start with '{expected}'")]
    InvalidVariablePrefix { key: String, expected: String },

    /// A custom variable was given without a value.
    #[error("custom variable '{key}' has no value (use {key}=VALUE)")]
    EmptyVariableValue { key: String },

    /// The template renderer rejected the template.
    #[error("failed to render template {template}: {message}")]
    RenderError { template: String, message: String },

    /// The rendered text could not be written.
    #[error("failed to write output: {message}")]
    WriteError { message: String },

    /// Configuration is unreadable or internally inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// An option carried a value of the wrong shape.
    #[error("invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },
}

fn stdin_message(timeout_ms: &Option<u64>, message: &Option<String>) -> String {
    match (timeout_ms, message) {
        (Some(ms), _) => format!("timed out after {}ms waiting for stdin", ms),
        (None, Some(msg)) => format!("failed to read stdin: {}", msg),
        (None, None) => "failed to read stdin".to_string(),
    }
}

fn join_paths(paths: &[String]) -> String {
    paths.join(", ")
}

impl PipelineError {
    /// Stdin did not complete within `timeout_ms`.
    pub fn stdin_timeout(timeout_ms: u64) -> Self {
        PipelineError::StdinReadError {
            timeout_ms: Some(timeout_ms),
            message: None,
        }
    }

    /// Stdin read failed with an I/O error.
    pub fn stdin_failed(message: impl Into<String>) -> Self {
        PipelineError::StdinReadError {
            timeout_ms: None,
            message: Some(message.into()),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// The variant name, as used for the `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidParameterCount { .. } => "InvalidParameterCount",
            PipelineError::InvalidDirective { .. } => "InvalidDirective",
            PipelineError::InvalidLayer { .. } => "InvalidLayer",
            PipelineError::StdinReadError { .. } => "StdinReadError",
            PipelineError::InvalidCharacters { .. } => "InvalidCharacters",
            PipelineError::InvalidPath { .. } => "InvalidPath",
            PipelineError::PermissionDenied { .. } => "PermissionDenied",
            PipelineError::PathNotFound { .. } => "PathNotFound",
            PipelineError::TemplateNotFound { .. } => "TemplateNotFound",
            PipelineError::ReservedVariableName { .. } => "ReservedVariableName",
            PipelineError::InvalidVariablePrefix { .. } => "InvalidVariablePrefix",
            PipelineError::EmptyVariableValue { .. } => "EmptyVariableValue",
            PipelineError::RenderError { .. } => "RenderError",
            PipelineError::WriteError { .. } => "WriteError",
            PipelineError::InvalidConfiguration { .. } => "InvalidConfiguration",
            PipelineError::InvalidOption { .. } => "InvalidOption",
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::InvalidParameterCount { .. }
            | PipelineError::InvalidDirective { .. }
            | PipelineError::InvalidLayer { .. }
            | PipelineError::InvalidConfiguration { .. }
            | PipelineError::InvalidOption { .. } => exit_codes::USAGE_ERROR,
            PipelineError::StdinReadError { .. }
            | PipelineError::InvalidCharacters { .. }
            | PipelineError::InvalidPath { .. }
            | PipelineError::PermissionDenied { .. }
            | PipelineError::PathNotFound { .. } => exit_codes::INPUT_FAILURE,
            PipelineError::TemplateNotFound { .. }
            | PipelineError::ReservedVariableName { .. }
            | PipelineError::InvalidVariablePrefix { .. }
            | PipelineError::EmptyVariableValue { .. }
            | PipelineError::RenderError { .. } => exit_codes::TEMPLATE_FAILURE,
            PipelineError::WriteError { .. } => exit_codes::OUTPUT_FAILURE,
        }
    }
}

/// Pipeline stage that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Option map and configuration checks before the pipeline starts.
    Prepare,
    ValidateParameters,
    ReadStdin,
    ResolvePaths,
    BuildVariables,
    Render,
    WriteOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Prepare => write!(f, "prepare"),
            Stage::ValidateParameters => write!(f, "validate_parameters"),
            Stage::ReadStdin => write!(f, "read_stdin"),
            Stage::ResolvePaths => write!(f, "resolve_paths"),
            Stage::BuildVariables => write!(f, "build_variables"),
            Stage::Render => write!(f, "render"),
            Stage::WriteOutput => write!(f, "write_output"),
        }
    }
}

/// The first error a pipeline run hit, tagged with its stage.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[serde(flatten)]
    #[source]
    pub error: PipelineError,
}

impl PipelineFailure {
    pub fn new(stage: Stage, error: PipelineError) -> Self {
        Self { stage, error }
    }

    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }

    /// Single-line JSON form: `{"stage": ..., "kind": ..., ...fields}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"stage\":\"{}\",\"kind\":\"{}\"}}",
                self.stage,
                self.error.kind()
            )
        })
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
