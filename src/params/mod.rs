//! Positional parameter validation.
//!
//! A command is exactly two tokens: a directive (`to`, `summary`, ...) and a
//! layer (`project`, `issue`, ...). Each is checked against its allow-list,
//! directive first.

mod types;


pub use types::{AllowList, DirectiveType, LayerType};

use crate::config::ParamsSection;
use crate::error::{PipelineError, Result};

/// Number of positional tokens a command takes.
pub const EXPECTED_PARAMS: usize = 2;

/// Compiled validation rules for the two positional tokens.
#[derive(Debug, Clone)]
pub struct ParamRules {
    pub directive: AllowList,
    pub layer: AllowList,
    /// Ignore tokens after the second instead of rejecting them.
    pub allow_extra_tokens: bool,
}

impl ParamRules {
    pub fn from_config(params: &ParamsSection) -> Result<Self> {
        Ok(Self {
            directive: AllowList::from_config("params.directive", &params.directive)?,
            layer: AllowList::from_config("params.layer", &params.layer)?,
            allow_extra_tokens: params.allow_extra_tokens,
        })
    }
}

/// A validated directive/layer pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParams {
    pub directive: DirectiveType,
    pub layer: LayerType,
}

/// Validate the positional tokens.
///
/// # Returns
///
/// * `Ok(ValidatedParams)` - Both tokens are allowed
/// * `Err(PipelineError::InvalidParameterCount)` - Not exactly two tokens
///   (fewer than two when `allow_extra_tokens` is set)
/// * `Err(PipelineError::InvalidDirective)` / `Err(PipelineError::InvalidLayer)` -
///   The first failing token
pub fn validate_params<S: AsRef<str>>(tokens: &[S], rules: &ParamRules) -> Result<ValidatedParams> {
    let count_ok = if rules.allow_extra_tokens {
        tokens.len() >= EXPECTED_PARAMS
    } else {
        tokens.len() == EXPECTED_PARAMS
    };
    if !count_ok {
        return Err(PipelineError::InvalidParameterCount {
            received: tokens.len(),
            expected: EXPECTED_PARAMS,
        });
    }

    let directive = DirectiveType::new(tokens[0].as_ref(), &rules.directive)?;
    let layer = LayerType::new(tokens[1].as_ref(), &rules.layer)?;

    Ok(ValidatedParams { directive, layer })
}
