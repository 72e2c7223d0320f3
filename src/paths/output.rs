//! Output destination resolution.

use super::classifier::classify;
use super::resolved::{ResolutionSource, ResolvedPath, normalize_lexically, path_to_string};
use crate::error::Result;
use crate::options::PipelineOptions;
use crate::params::ValidatedParams;
use std::path::Path;

/// Filename used when no destination is given, or when it names a directory.
pub fn generated_filename(params: &ValidatedParams) -> String {
    format!("{}_{}.md", params.directive, params.layer)
}

/// Resolve the destination from `destination` / `output` / `destinationFile`.
///
/// Without one, `{directive}_{layer}.md` in the working directory is used and
/// marked as generated. A destination naming an existing directory gets the
/// generated filename appended.
pub fn resolve_output(
    options: &PipelineOptions,
    params: &ValidatedParams,
    working_dir: &Path,
) -> Result<ResolvedPath> {
    let Some(raw) = options.destination.as_deref() else {
        let generated = path_to_string(&working_dir.join(generated_filename(params)));
        let classification = classify(Some(&generated))?;
        let resolved =
            ResolvedPath::resolve(classification, "", ResolutionSource::Default, working_dir)?;
        return Ok(resolved.mark_generated());
    };

    let classification = classify(Some(raw))?;
    let resolved = ResolvedPath::resolve(classification, raw, ResolutionSource::Cli, working_dir)?;

    if resolved.file_path().is_some() && resolved.as_path().is_dir() {
        let joined = normalize_lexically(&resolved.as_path().join(generated_filename(params)));
        let joined = path_to_string(&joined);
        let classification = classify(Some(&joined))?;
        let resolved = ResolvedPath::resolve(classification, raw, ResolutionSource::Cli, working_dir)?;
        return Ok(resolved.mark_generated());
    }

    Ok(resolved)
}
