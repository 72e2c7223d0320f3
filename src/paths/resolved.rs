//! Resolved path values and filesystem existence checks.

use super::classifier::{PathClassification, STDIN_MARKER};
use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Where a resolved path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Supplied on the command line / option map.
    Cli,
    /// Taken from configuration.
    Config,
    /// Built-in default or generated.
    Default,
}

/// Diagnostic details recorded alongside a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathMetadata {
    /// The raw value before classification (empty when absent).
    pub original: String,
    pub source: ResolutionSource,
    pub working_dir: String,
    /// True when separator normalization or `.`/`..` folding changed the text.
    /// Joining onto the working directory does not count.
    pub normalized: bool,
    /// True when the path was generated rather than supplied.
    pub is_generated: bool,
}

/// A path after classification, working-directory resolution, and an
/// existence check. Immutable once built.
///
/// `value` is `""` for `Empty`, exactly `-` for `Stdin`, and absolute for
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    value: String,
    classification: PathClassification,
    exists: bool,
    metadata: PathMetadata,
}

impl ResolvedPath {
    /// Resolve a classification against `working_dir` and check existence.
    pub(crate) fn resolve(
        classification: PathClassification,
        original: &str,
        source: ResolutionSource,
        working_dir: &Path,
    ) -> Result<Self> {
        let (value, exists) = match &classification {
            PathClassification::Empty => (String::new(), false),
            PathClassification::Stdin => (STDIN_MARKER.to_string(), false),
            PathClassification::Absolute { normalized }
            | PathClassification::Relative { normalized, .. }
            | PathClassification::Filename { name: normalized } => {
                // `join` keeps host-absolute paths as they are. A drive-letter
                // path on a host without drives lands under `working_dir`.
                let path = normalize_lexically(&working_dir.join(normalized));
                let exists = check_file(&path).into_result(&path)?;
                (path_to_string(&path), exists)
            }
        };

        let folded = path_to_string(&normalize_lexically(Path::new(classification.normalized())));
        let normalized = classification.is_file_path() && folded != original;

        Ok(Self {
            value,
            classification,
            exists,
            metadata: PathMetadata {
                original: original.to_string(),
                source,
                working_dir: path_to_string(working_dir),
                normalized,
                is_generated: false,
            },
        })
    }

    pub(crate) fn mark_generated(mut self) -> Self {
        self.metadata.is_generated = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.value)
    }

    pub fn classification(&self) -> &PathClassification {
        &self.classification
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn metadata(&self) -> &PathMetadata {
        &self.metadata
    }

    pub fn is_generated(&self) -> bool {
        self.metadata.is_generated
    }

    pub fn is_stdin(&self) -> bool {
        self.classification == PathClassification::Stdin
    }

    pub fn is_empty(&self) -> bool {
        self.classification == PathClassification::Empty
    }

    /// The path when it names a file, `None` for Empty / Stdin.
    pub fn file_path(&self) -> Option<&str> {
        self.classification.is_file_path().then_some(self.value.as_str())
    }
}

/// Outcome of a filesystem existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCheck {
    Exists,
    Missing,
    Failed(io::ErrorKind),
}

impl FileCheck {
    pub fn exists(self) -> bool {
        self == FileCheck::Exists
    }

    /// `Exists`/`Missing` as a bool; `Failed` as a tagged error for `path`.
    pub fn into_result(self, path: &Path) -> Result<bool> {
        match self {
            FileCheck::Exists => Ok(true),
            FileCheck::Missing => Ok(false),
            FileCheck::Failed(io::ErrorKind::PermissionDenied) => {
                Err(PipelineError::PermissionDenied {
                    path: path_to_string(path),
                })
            }
            FileCheck::Failed(kind) => Err(PipelineError::InvalidPath {
                path: path_to_string(path),
                reason: kind.to_string(),
            }),
        }
    }
}

/// Check whether `path` exists without following the error into a panic.
///
/// "Not found" (and a non-directory parent) are ordinary `Missing` results.
pub fn check_file(path: &Path) -> FileCheck {
    match std::fs::metadata(path) {
        Ok(_) => FileCheck::Exists,
        Err(e) if e.kind() == io::ErrorKind::NotFound => FileCheck::Missing,
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => FileCheck::Missing,
        Err(e) => FileCheck::Failed(e.kind()),
    }
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Display form with `/` separators.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
