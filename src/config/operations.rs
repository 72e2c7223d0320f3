//! Config loading and validation.

use super::model::Config;
use super::types::AllowListConfig;
use crate::error::{PipelineError, Result};
use std::path::Path;

/// Config file location relative to the current directory.
pub const DEFAULT_CONFIG_PATH: &str = ".breakdown/config.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(PipelineError::InvalidConfiguration)` - Read, parse, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load an explicit config file, or the default location if present.
    ///
    /// An explicit path must exist. A missing default file yields `Config::default()`.
    pub fn load_or_default(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = cwd.join(DEFAULT_CONFIG_PATH);
        if default_path.is_file() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| PipelineError::config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| PipelineError::config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `stdin.timeout_ms` must be positive
    /// - `variables.prefix` must be non-empty
    /// - each allow-list needs a pattern or a non-empty value list
    ///
    /// Regex syntax is checked when the allow-lists are compiled.
    pub fn validate(&self) -> Result<()> {
        if self.stdin.timeout_ms == 0 {
            return Err(PipelineError::config(
                "stdin.timeout_ms must be greater than 0",
            ));
        }

        if self.variables.prefix.is_empty() {
            return Err(PipelineError::config("variables.prefix must be non-empty"));
        }

        validate_allow_list("params.directive", &self.params.directive)?;
        validate_allow_list("params.layer", &self.params.layer)?;

        Ok(())
    }
}

fn validate_allow_list(name: &str, list: &AllowListConfig) -> Result<()> {
    match (&list.pattern, &list.values) {
        (_, Some(values)) if values.is_empty() => Err(PipelineError::config(format!(
            "{}.values must list at least one value",
            name
        ))),
        (_, Some(_)) => Ok(()),
        (Some(pattern), None) if !pattern.is_empty() => Ok(()),
        _ => Err(PipelineError::config(format!(
            "{} needs a pattern or a list of values",
            name
        ))),
    }
}
