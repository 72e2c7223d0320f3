//! Path classification and resolution.
//!
//! - **classifier**: raw string to [`PathClassification`], no I/O
//! - **resolved**: [`ResolvedPath`] values and the three-way [`FileCheck`]
//! - **input** / **output**: document and destination paths
//! - **template** / **schema**: prompt template and schema lookup with fallback
//!
//! No resolver panics or lets an `io::Error` escape; every filesystem outcome
//! becomes a value or a [`PipelineError`](crate::error::PipelineError).

mod classifier;
mod input;
mod output;
mod resolved;
mod schema;
mod template;

pub use classifier::{PathClassification, STDIN_MARKER, classify, normalize_separators};
pub use input::resolve_input;
pub use output::{generated_filename, resolve_output};
pub use resolved::{
    FileCheck, PathMetadata, ResolutionSource, ResolvedPath, check_file, normalize_lexically,
    path_to_string,
};
pub use schema::resolve_schema;
pub use template::{
    KNOWN_LAYERS, PromptTemplatePath, TemplateRequest, TemplateRoot, TemplateStatus,
    infer_layer_from_filename, resolve_from_layer, resolve_template, template_filename,
};
