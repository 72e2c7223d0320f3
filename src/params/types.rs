//! Validated directive/layer values and the allow-lists that admit them.

use crate::config::AllowListConfig;
use crate::error::{PipelineError, Result};
use regex::Regex;
use std::fmt;

/// Compiled allow-list for one positional token.
#[derive(Debug, Clone)]
pub enum AllowList {
    /// Token must match the regex.
    Pattern(Regex),
    /// Token must equal one of the values.
    Values(Vec<String>),
}

impl AllowList {
    /// Compile an allow-list from its config section.
    ///
    /// `name` is used in error messages (e.g. `params.directive`).
    pub fn from_config(name: &str, config: &AllowListConfig) -> Result<Self> {
        if let Some(values) = &config.values {
            return Ok(AllowList::Values(values.clone()));
        }

        let pattern = config.pattern.as_deref().unwrap_or_default();
        if pattern.is_empty() {
            return Err(PipelineError::config(format!(
                "{} needs a pattern or a list of values",
                name
            )));
        }

        let regex = Regex::new(pattern).map_err(|e| {
            PipelineError::config(format!(
                "invalid regex pattern in {}: '{}' - {}",
                name, pattern, e
            ))
        })?;
        Ok(AllowList::Pattern(regex))
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Self::from_config("pattern", &AllowListConfig::pattern(pattern))
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowList::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, value: &str) -> bool {
        match self {
            AllowList::Pattern(regex) => regex.is_match(value),
            AllowList::Values(values) => values.iter().any(|v| v == value),
        }
    }

    /// Human-readable form used in error payloads.
    pub fn describe(&self) -> String {
        match self {
            AllowList::Pattern(regex) => regex.as_str().to_string(),
            AllowList::Values(values) => values.join("|"),
        }
    }
}

/// First positional token: what to do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectiveType(String);

impl DirectiveType {
    pub fn new(value: &str, allowed: &AllowList) -> Result<Self> {
        if allowed.allows(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(PipelineError::InvalidDirective {
                value: value.to_string(),
                allowed: allowed.describe(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Second positional token: which abstraction level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerType(String);

impl LayerType {
    pub fn new(value: &str, allowed: &AllowList) -> Result<Self> {
        if allowed.allows(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(PipelineError::InvalidLayer {
                value: value.to_string(),
                allowed: allowed.describe(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
