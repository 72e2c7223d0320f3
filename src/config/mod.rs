//! Configuration model for breakdown.
//!
//! This module defines the Config struct that represents `.breakdown/config.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of config values. Only the
//! working directory, the two base directories, and the pipeline tuning
//! sections are read.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use operations::DEFAULT_CONFIG_PATH;
pub use types::{
    AllowListConfig, BaseDirSection, ParamsSection, RenderSection, StdinSection,
    VariablesSection,
};
