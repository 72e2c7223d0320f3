//! Input document path resolution.

use super::classifier::classify;
use super::resolved::{ResolutionSource, ResolvedPath};
use crate::error::Result;
use crate::options::PipelineOptions;
use std::path::Path;

/// Resolve the input document path from the `from` / `fromFile` option.
///
/// No option gives an `Empty` path. A missing file is reported through
/// [`ResolvedPath::exists`], not as an error; only failed filesystem checks
/// and invalid characters are errors.
pub fn resolve_input(options: &PipelineOptions, working_dir: &Path) -> Result<ResolvedPath> {
    let raw = options.from_file.as_deref();
    let classification = classify(raw)?;
    let source = if raw.is_some() {
        ResolutionSource::Cli
    } else {
        ResolutionSource::Default
    };

    ResolvedPath::resolve(classification, raw.unwrap_or_default(), source, working_dir)
}
