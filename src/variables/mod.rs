//! Template variable construction.
//!
//! Custom variables come from option keys carrying the configured prefix
//! (`uv-theme`); they keep the prefix as their name. Standard variables are
//! derived by the pipeline:
//!
//! | Name | Value |
//! |---|---|
//! | `input_text` | stdin text, only when non-empty |
//! | `input_text_file` | resolved input file, or `stdin` |
//! | `destination_path` | resolved explicit destination, or `stdout` |
//! | `schema_file` | resolved schema, only when found |
//!
//! A custom key that names a reserved variable, with or without the prefix,
//! rejects the whole build.


use crate::config::VariablesSection;
use crate::error::{PipelineError, Result};
use crate::paths::{PromptTemplatePath, ResolutionSource, ResolvedPath};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// `input_text_file` when there is no input file.
pub const DEFAULT_INPUT_LABEL: &str = "stdin";

/// `destination_path` when no destination was given.
pub const DEFAULT_DESTINATION_LABEL: &str = "stdout";

pub const INPUT_TEXT: &str = "input_text";
pub const INPUT_TEXT_FILE: &str = "input_text_file";
pub const DESTINATION_PATH: &str = "destination_path";
pub const SCHEMA_FILE: &str = "schema_file";

/// Name/value table handed to the renderer.
pub type VariableTable = BTreeMap<String, String>;

/// Everything the standard variables are derived from.
#[derive(Debug, Clone, Copy)]
pub struct VariableSources<'a> {
    pub stdin_text: &'a str,
    pub input: &'a ResolvedPath,
    pub output: &'a ResolvedPath,
    pub schema: Option<&'a PromptTemplatePath>,
}

/// The three variable tables for one run. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessedVariables {
    custom: VariableTable,
    standard: VariableTable,
    all: VariableTable,
}

impl ProcessedVariables {
    pub fn custom(&self) -> &VariableTable {
        &self.custom
    }

    pub fn standard(&self) -> &VariableTable {
        &self.standard
    }

    /// Custom and standard variables together.
    pub fn all(&self) -> &VariableTable {
        &self.all
    }
}

/// Build the variable tables.
///
/// `extra` is the option map minus recognised options; keys without the
/// prefix are ignored.
///
/// # Returns
///
/// * `Ok(ProcessedVariables)` - Custom and standard keys are disjoint
/// * `Err(PipelineError::InvalidVariablePrefix)` - Prefix matches only ignoring case
/// * `Err(PipelineError::EmptyVariableValue)` - A custom key has a null value
/// * `Err(PipelineError::ReservedVariableName)` - A custom key shadows a reserved name
pub fn build_variables(
    extra: &BTreeMap<String, Value>,
    sources: &VariableSources<'_>,
    rules: &VariablesSection,
) -> Result<ProcessedVariables> {
    let custom = extract_custom(extra, rules)?;
    let standard = standard_variables(sources);

    let mut all = custom.clone();
    for (key, value) in &standard {
        if all.contains_key(key) {
            return Err(PipelineError::ReservedVariableName { key: key.clone() });
        }
        all.insert(key.clone(), value.clone());
    }

    tracing::debug!(
        custom = custom.len(),
        standard = standard.len(),
        "built template variables"
    );

    Ok(ProcessedVariables {
        custom,
        standard,
        all,
    })
}

/// Pick the prefixed keys out of `extra` and coerce their values to text.
pub fn extract_custom(
    extra: &BTreeMap<String, Value>,
    rules: &VariablesSection,
) -> Result<VariableTable> {
    let prefix = rules.prefix.as_str();
    let mut custom = VariableTable::new();

    for (key, value) in extra {
        let Some(name) = key.strip_prefix(prefix) else {
            if has_prefix_ignoring_case(key, prefix) {
                return Err(PipelineError::InvalidVariablePrefix {
                    key: key.clone(),
                    expected: prefix.to_string(),
                });
            }
            continue;
        };

        if is_reserved(key, rules) || is_reserved(name, rules) {
            return Err(PipelineError::ReservedVariableName { key: key.clone() });
        }

        let text = coerce(value)
            .ok_or_else(|| PipelineError::EmptyVariableValue { key: key.clone() })?;
        custom.insert(key.clone(), text);
    }

    Ok(custom)
}

/// Derive the pipeline's own variables.
pub fn standard_variables(sources: &VariableSources<'_>) -> VariableTable {
    let mut standard = VariableTable::new();

    if !sources.stdin_text.is_empty() {
        standard.insert(INPUT_TEXT.to_string(), sources.stdin_text.to_string());
    }

    let input_file = sources.input.file_path().unwrap_or(DEFAULT_INPUT_LABEL);
    standard.insert(INPUT_TEXT_FILE.to_string(), input_file.to_string());

    let destination = if sources.output.metadata().source == ResolutionSource::Cli {
        sources.output.value()
    } else {
        DEFAULT_DESTINATION_LABEL
    };
    standard.insert(DESTINATION_PATH.to_string(), destination.to_string());

    if let Some(schema) = sources.schema.filter(|s| s.exists()) {
        standard.insert(SCHEMA_FILE.to_string(), schema.path().to_string());
    }

    standard
}

fn is_reserved(name: &str, rules: &VariablesSection) -> bool {
    rules.reserved.iter().any(|reserved| reserved == name)
}

fn has_prefix_ignoring_case(key: &str, prefix: &str) -> bool {
    key.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Text form of an option value; `None` for null.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
