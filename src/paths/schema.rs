//! Schema path resolution.
//!
//! Schemas mirror the template tree under the schema base directory and are
//! always `f_{from_layer}.json`: the template resolver in schema mode.

use super::template::{PromptTemplatePath, TemplateRequest, TemplateRoot, resolve_template};
use crate::error::Result;

/// Resolve the schema for a request. Adaptation is ignored.
///
/// A missing schema is `TemplateStatus::NotFound`, not an error.
pub fn resolve_schema(
    request: &TemplateRequest<'_>,
    root: &TemplateRoot<'_>,
) -> Result<PromptTemplatePath> {
    let schema_request = TemplateRequest {
        schema_mode: true,
        adaptation: None,
        ..*request
    };
    resolve_template(&schema_request, root)
}
