//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a breakdown run.
///
/// This struct represents the contents of `.breakdown/config.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
/// The pipeline only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory relative paths are resolved against (default: process cwd).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Prompt template tree.
    pub app_prompt: BaseDirSection,

    /// Schema tree.
    pub app_schema: BaseDirSection,

    pub params: ParamsSection,

    pub stdin: StdinSection,

    pub variables: VariablesSection,

    pub render: RenderSection,
}

impl Config {
    /// The working directory, falling back to the process current directory.
    ///
    /// A relative `working_dir` is taken relative to the process current
    /// directory. Falls back to `.` if the current directory cannot be determined.
    pub fn working_dir(&self) -> PathBuf {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match &self.working_dir {
            Some(dir) if !dir.is_empty() => cwd.join(dir),
            _ => cwd,
        }
    }

    /// Prompt base directory as configured, or the default.
    pub fn prompt_base_dir(&self) -> &str {
        non_empty(self.app_prompt.base_dir.as_deref()).unwrap_or(DEFAULT_PROMPT_BASE_DIR)
    }

    /// Schema base directory as configured, or the default.
    pub fn schema_base_dir(&self) -> &str {
        non_empty(self.app_schema.base_dir.as_deref()).unwrap_or(DEFAULT_SCHEMA_BASE_DIR)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
