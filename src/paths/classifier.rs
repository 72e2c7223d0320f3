//! Raw path classification.
//!
//! Pure string inspection, no filesystem access. Every input maps to exactly
//! one [`PathClassification`], and classifying a classification's own
//! `normalized` value yields the same variant again.

use crate::error::{PipelineError, Result};
use serde::Serialize;

/// Reserved token meaning "read from standard input".
pub const STDIN_MARKER: &str = "-";

/// Characters Windows refuses in path components. The drive colon is checked separately.
#[cfg(windows)]
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// What kind of path a raw string denotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathClassification {
    Empty,
    Stdin,
    Absolute {
        normalized: String,
    },
    Relative {
        normalized: String,
        has_hierarchy: bool,
    },
    Filename {
        name: String,
    },
}

impl PathClassification {
    /// The path text after separator normalization (`""` / `-` for Empty / Stdin).
    pub fn normalized(&self) -> &str {
        match self {
            PathClassification::Empty => "",
            PathClassification::Stdin => STDIN_MARKER,
            PathClassification::Absolute { normalized } => normalized,
            PathClassification::Relative { normalized, .. } => normalized,
            PathClassification::Filename { name } => name,
        }
    }

    /// True for classifications that name something on disk.
    pub fn is_file_path(&self) -> bool {
        matches!(
            self,
            PathClassification::Absolute { .. }
                | PathClassification::Relative { .. }
                | PathClassification::Filename { .. }
        )
    }
}

/// Classify a raw path string.
///
/// Rules, first match wins:
/// - absent or `""` is `Empty`
/// - exactly `-` is `Stdin`
/// - NUL bytes (and Windows-reserved characters on Windows) are rejected
/// - leading `/` or a drive letter (`C:/`) is `Absolute`
/// - leading `./` or `../` is `Relative` without hierarchy
/// - any other `/` is `Relative` with hierarchy
/// - anything else is a bare `Filename`
///
/// Backslashes are treated as `/` throughout.
pub fn classify(raw: Option<&str>) -> Result<PathClassification> {
    let raw = match raw {
        None | Some("") => return Ok(PathClassification::Empty),
        Some(raw) => raw,
    };

    if raw == STDIN_MARKER {
        return Ok(PathClassification::Stdin);
    }

    check_characters(raw)?;

    let normalized = normalize_separators(raw);

    if is_absolute(&normalized) {
        return Ok(PathClassification::Absolute { normalized });
    }

    if normalized.starts_with("./") || normalized.starts_with("../") {
        return Ok(PathClassification::Relative {
            normalized,
            has_hierarchy: false,
        });
    }

    if normalized.contains('/') {
        return Ok(PathClassification::Relative {
            normalized,
            has_hierarchy: true,
        });
    }

    Ok(PathClassification::Filename { name: normalized })
}

/// Replace `\` with `/`.
pub fn normalize_separators(raw: &str) -> String {
    raw.replace('\\', "/")
}

fn is_absolute(normalized: &str) -> bool {
    normalized.starts_with('/') || (has_drive_prefix(normalized) && normalized[2..].starts_with('/'))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn check_characters(raw: &str) -> Result<()> {
    if raw.contains('\0') {
        return Err(PipelineError::InvalidCharacters {
            path: raw.replace('\0', "\\0"),
            reason: "contains a NUL byte".to_string(),
        });
    }

    #[cfg(windows)]
    {
        let body = if has_drive_prefix(raw) { &raw[2..] } else { raw };
        if let Some(c) = body.chars().find(|c| RESERVED_CHARS.contains(c)) {
            return Err(PipelineError::InvalidCharacters {
                path: raw.to_string(),
                reason: format!("contains reserved character '{}'", c),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn relative(normalized: &str, has_hierarchy: bool) -> PathClassification {
        PathClassification::Relative {
            normalized: normalized.to_string(),
            has_hierarchy,
        }
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(classify(None).unwrap(), PathClassification::Empty);
        assert_eq!(classify(Some("")).unwrap(), PathClassification::Empty);
    }

    #[test]
    fn test_stdin_marker() {
        assert_eq!(classify(Some("-")).unwrap(), PathClassification::Stdin);
        // Only the exact marker counts.
        assert_eq!(
            classify(Some("--")).unwrap(),
            PathClassification::Filename {
                name: "--".to_string()
            }
        );
    }

    #[test]
    fn test_absolute_unix() {
        assert_eq!(
            classify(Some("/home/user/notes.md")).unwrap(),
            PathClassification::Absolute {
                normalized: "/home/user/notes.md".to_string()
            }
        );
    }

    #[test]
    fn test_absolute_drive_letter_with_backslashes() {
        assert_eq!(
            classify(Some(r"C:\work\notes.md")).unwrap(),
            PathClassification::Absolute {
                normalized: "C:/work/notes.md".to_string()
            }
        );
    }

    #[test]
    fn test_dot_prefixed_relative() {
        assert_eq!(classify(Some("./notes.md")).unwrap(), relative("./notes.md", false));
        assert_eq!(
            classify(Some("../docs/notes.md")).unwrap(),
            relative("../docs/notes.md", false)
        );
    }

    #[test]
    fn test_relative_with_hierarchy() {
        assert_eq!(
            classify(Some("docs/issues/42.md")).unwrap(),
            relative("docs/issues/42.md", true)
        );
        assert_eq!(
            classify(Some(r"docs\issues\42.md")).unwrap(),
            relative("docs/issues/42.md", true)
        );
    }

    #[test]
    fn test_bare_filename() {
        assert_eq!(
            classify(Some("issue_notes.md")).unwrap(),
            PathClassification::Filename {
                name: "issue_notes.md".to_string()
            }
        );
    }

    #[test]
    fn test_nul_byte_rejected() {
        let err = classify(Some("bad\0name.md")).unwrap_err();
        assert_eq!(err.kind(), "InvalidCharacters");
    }

    #[test]
    fn test_is_file_path() {
        assert!(!PathClassification::Empty.is_file_path());
        assert!(!PathClassification::Stdin.is_file_path());
        assert!(classify(Some("a.md")).unwrap().is_file_path());
    }

    proptest! {
        #[test]
        fn property_classification_is_total(raw in "[a-zA-Z0-9_./\\\\-]{0,24}") {
            // Never panics and never errors for NUL-free input.
            prop_assert!(classify(Some(&raw)).is_ok());
        }

        #[test]
        fn property_reclassification_is_idempotent(raw in "[a-zA-Z0-9_./\\\\-]{0,24}") {
            let first = classify(Some(&raw)).unwrap();
            let second = classify(Some(first.normalized())).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn property_classification_is_deterministic(raw in ".{0,24}") {
            prop_assert_eq!(classify(Some(&raw)), classify(Some(&raw)));
        }
    }
}
