//! Prompt template path resolution.
//!
//! Templates live at `{base_dir}/{directive}/{layer}/f_{from_layer}[_{adaptation}].md`.
//! The source layer (`from_layer`) is, in priority order: the explicit
//! override, a known layer name found in the input file's basename, or the
//! target layer itself.
//!
//! When an adaptation-specific file is missing, the plain file in the same
//! directory is tried and, if present, used with [`TemplateStatus::Fallback`].
//! A template that cannot be found is a normal result
//! ([`TemplateStatus::NotFound`]); callers decide whether that is fatal.

use super::classifier::normalize_separators;
use super::resolved::{ResolutionSource, check_file, normalize_lexically, path_to_string};
use crate::error::Result;
use crate::params::ValidatedParams;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Layer names recognised in input filenames, checked in this order.
pub const KNOWN_LAYERS: &[&str] = &["project", "issue", "task"];

/// How the final template path was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    /// The first candidate exists.
    Found,
    /// The adaptation file was missing; the plain file exists.
    Fallback,
    /// No candidate exists; `path` is the first candidate.
    NotFound,
}

/// Inputs to template resolution.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRequest<'a> {
    pub params: &'a ValidatedParams,
    pub adaptation: Option<&'a str>,
    /// Explicit source layer (`--input`).
    pub from_layer: Option<&'a str>,
    /// Input file path, used to infer the source layer.
    pub source_file: Option<&'a str>,
    /// Resolve `.json` without adaptation suffix.
    pub schema_mode: bool,
}

/// Where the template root comes from.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRoot<'a> {
    pub base_dir: &'a str,
    /// `Config` when the base dir was configured, `Default` otherwise.
    pub source: ResolutionSource,
    pub working_dir: &'a Path,
}

/// A resolved template location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptTemplatePath {
    path: String,
    status: TemplateStatus,
    /// Every full path checked, in order.
    attempted: Vec<String>,
    from_layer: String,
    base_dir: String,
    source: ResolutionSource,
}

impl PromptTemplatePath {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn status(&self) -> TemplateStatus {
        self.status
    }

    pub fn exists(&self) -> bool {
        self.status != TemplateStatus::NotFound
    }

    pub fn attempted(&self) -> &[String] {
        &self.attempted
    }

    pub fn from_layer(&self) -> &str {
        &self.from_layer
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    pub fn source(&self) -> ResolutionSource {
        self.source
    }
}

/// Resolve the template path for a request.
///
/// Errors only when a filesystem check fails for a reason other than
/// "not found".
pub fn resolve_template(
    request: &TemplateRequest<'_>,
    root: &TemplateRoot<'_>,
) -> Result<PromptTemplatePath> {
    let base_dir = normalize_lexically(&root.working_dir.join(normalize_separators(root.base_dir)));
    let from_layer = resolve_from_layer(request);
    let dir: PathBuf = base_dir
        .join(request.params.directive.as_str())
        .join(request.params.layer.as_str());

    let adaptation = if request.schema_mode {
        None
    } else {
        request.adaptation.filter(|a| !a.is_empty())
    };

    let primary = dir.join(template_filename(&from_layer, adaptation, request.schema_mode));
    let mut attempted = vec![path_to_string(&primary)];

    let (path, status) = if check_file(&primary).into_result(&primary)? {
        (primary, TemplateStatus::Found)
    } else if adaptation.is_some() {
        let plain = dir.join(template_filename(&from_layer, None, request.schema_mode));
        attempted.push(path_to_string(&plain));
        if check_file(&plain).into_result(&plain)? {
            (plain, TemplateStatus::Fallback)
        } else {
            (primary, TemplateStatus::NotFound)
        }
    } else {
        (primary, TemplateStatus::NotFound)
    };

    Ok(PromptTemplatePath {
        path: path_to_string(&path),
        status,
        attempted,
        from_layer,
        base_dir: path_to_string(&base_dir),
        source: root.source,
    })
}

/// `f_{from_layer}[_{adaptation}].md`, or `f_{from_layer}.json` in schema mode.
pub fn template_filename(from_layer: &str, adaptation: Option<&str>, schema_mode: bool) -> String {
    if schema_mode {
        return format!("f_{}.json", from_layer);
    }
    match adaptation {
        Some(adaptation) => format!("f_{}_{}.md", from_layer, adaptation),
        None => format!("f_{}.md", from_layer),
    }
}

/// Pick the source layer: override, inferred from the input filename, or the target layer.
pub fn resolve_from_layer(request: &TemplateRequest<'_>) -> String {
    if let Some(layer) = request.from_layer.filter(|l| !l.is_empty()) {
        return layer.to_string();
    }

    if let Some(layer) = request.source_file.and_then(infer_layer_from_filename) {
        return layer.to_string();
    }

    request.params.layer.as_str().to_string()
}

/// The first known layer name contained in the file's basename, case-insensitively.
pub fn infer_layer_from_filename(path: &str) -> Option<&'static str> {
    let normalized = normalize_separators(path);
    let basename = normalized.rsplit('/').next()?.to_lowercase();
    KNOWN_LAYERS
        .iter()
        .copied()
        .find(|layer| basename.contains(layer))
}
