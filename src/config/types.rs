//! Configuration sections and defaults for breakdown.
//!
//! This module defines the nested section structs, constants, and default
//! value functions used by the Config struct.

use serde::{Deserialize, Serialize};

/// Default prompt template directory, relative to the working directory.
pub const DEFAULT_PROMPT_BASE_DIR: &str = "prompts";

/// Default schema directory, relative to the working directory.
pub const DEFAULT_SCHEMA_BASE_DIR: &str = "schema";

/// Default directive allow-list.
pub const DEFAULT_DIRECTIVE_PATTERN: &str = "^(to|summary|defect)$";

/// Default layer allow-list.
pub const DEFAULT_LAYER_PATTERN: &str = "^(project|issue|task)$";

/// Default time to wait for piped stdin to reach EOF.
pub const DEFAULT_STDIN_TIMEOUT_MS: u64 = 1000;

/// Default prefix marking user-supplied template variables.
pub const DEFAULT_VARIABLE_PREFIX: &str = "uv-";

/// Names of variables the pipeline derives itself.
pub fn default_reserved_variables() -> Vec<String> {
    vec![
        "input_text".to_string(),
        "input_text_file".to_string(),
        "destination_path".to_string(),
        "schema_file".to_string(),
    ]
}

/// A base directory setting (`app_prompt`, `app_schema`).
///
/// `None` means "use the documented default"; the resolvers apply it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseDirSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,
}

/// Allow-list for one positional token.
///
/// `values` wins over `pattern` when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowListConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl AllowListConfig {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            values: None,
        }
    }
}

/// Positional parameter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsSection {
    #[serde(default = "default_directive")]
    pub directive: AllowListConfig,

    #[serde(default = "default_layer")]
    pub layer: AllowListConfig,

    /// Ignore tokens after the second instead of rejecting them.
    pub allow_extra_tokens: bool,
}

impl Default for ParamsSection {
    fn default() -> Self {
        Self {
            directive: default_directive(),
            layer: default_layer(),
            allow_extra_tokens: false,
        }
    }
}

/// Standard input settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdinSection {
    #[serde(default = "default_stdin_timeout_ms")]
    pub timeout_ms: u64,

    /// Read piped stdin even when no `-` input marker was given.
    #[serde(default = "default_true")]
    pub implicit_read: bool,
}

impl Default for StdinSection {
    fn default() -> Self {
        Self {
            timeout_ms: default_stdin_timeout_ms(),
            implicit_read: true,
        }
    }
}

/// Template variable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesSection {
    #[serde(default = "default_variable_prefix")]
    pub prefix: String,

    /// Names custom variables may not shadow, with or without the prefix.
    #[serde(default = "default_reserved_variables")]
    pub reserved: Vec<String>,
}

impl Default for VariablesSection {
    fn default() -> Self {
        Self {
            prefix: default_variable_prefix(),
            reserved: default_reserved_variables(),
        }
    }
}

/// Template rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Treat undefined `{name}` placeholders as errors.
    pub strict: bool,
}

// Default value functions for serde
fn default_directive() -> AllowListConfig {
    AllowListConfig::pattern(DEFAULT_DIRECTIVE_PATTERN)
}
fn default_layer() -> AllowListConfig {
    AllowListConfig::pattern(DEFAULT_LAYER_PATTERN)
}
fn default_stdin_timeout_ms() -> u64 {
    DEFAULT_STDIN_TIMEOUT_MS
}
fn default_variable_prefix() -> String {
    DEFAULT_VARIABLE_PREFIX.to_string()
}
fn default_true() -> bool {
    true
}
