//! Recognised command options.
//!
//! Callers hand the pipeline a string-keyed option map (the CLI builds one
//! from its flags). [`PipelineOptions::from_map`] checks it once and turns it
//! into an explicit record, resolving aliases by priority:
//!
//! | Field | Keys (first wins) |
//! |---|---|
//! | `from_file` | `from`, `fromFile` |
//! | `destination` | `destination`, `output`, `destinationFile` |
//! | `adaptation` | `adaptation` |
//! | `from_layer` | `input`, `fromLayerType` |
//! | `skip_stdin` | `skipStdin` |
//! | `stdin_timeout_ms` | `stdinTimeout` |
//! | `schema_mode` | `schemaMode` |
//!
//! Every other key is kept in `extra`; custom variables are picked out of it
//! by the variable builder.

use crate::error::{PipelineError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const FROM_KEYS: &[&str] = &["from", "fromFile"];
const DESTINATION_KEYS: &[&str] = &["destination", "output", "destinationFile"];
const ADAPTATION_KEYS: &[&str] = &["adaptation"];
const FROM_LAYER_KEYS: &[&str] = &["input", "fromLayerType"];
const SKIP_STDIN_KEY: &str = "skipStdin";
const STDIN_TIMEOUT_KEY: &str = "stdinTimeout";
const SCHEMA_MODE_KEY: &str = "schemaMode";

/// Options for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    /// Input document path; `-` reads stdin.
    pub from_file: Option<String>,
    /// Destination path exposed to templates.
    pub destination: Option<String>,
    /// Template variant suffix (`f_issue_brief.md`).
    pub adaptation: Option<String>,
    /// Explicit source layer for the template filename.
    pub from_layer: Option<String>,
    /// Never read stdin.
    pub skip_stdin: bool,
    /// Overrides `stdin.timeout_ms`.
    pub stdin_timeout_ms: Option<u64>,
    /// Resolve a `.json` template without adaptation suffix.
    pub schema_mode: bool,
    /// Unrecognised keys, including custom variables.
    pub extra: BTreeMap<String, Value>,
}

impl PipelineOptions {
    /// Validate an option map into a record.
    ///
    /// Empty strings for path-like options count as absent.
    ///
    /// # Returns
    ///
    /// * `Err(PipelineError::InvalidOption)` - A known key carries the wrong JSON type
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let mut extra = BTreeMap::new();
        for (key, value) in map {
            if !is_known_key(key) {
                extra.insert(key.clone(), value.clone());
            }
        }

        Ok(Self {
            from_file: first_string(map, FROM_KEYS)?,
            destination: first_string(map, DESTINATION_KEYS)?,
            adaptation: first_string(map, ADAPTATION_KEYS)?,
            from_layer: first_string(map, FROM_LAYER_KEYS)?,
            skip_stdin: flag(map, SKIP_STDIN_KEY)?,
            stdin_timeout_ms: timeout(map, STDIN_TIMEOUT_KEY)?,
            schema_mode: flag(map, SCHEMA_MODE_KEY)?,
            extra,
        })
    }

    /// True when the input option is the stdin marker.
    pub fn reads_stdin_explicitly(&self) -> bool {
        self.from_file.as_deref() == Some(crate::paths::STDIN_MARKER)
    }
}

fn is_known_key(key: &str) -> bool {
    FROM_KEYS.contains(&key)
        || DESTINATION_KEYS.contains(&key)
        || ADAPTATION_KEYS.contains(&key)
        || FROM_LAYER_KEYS.contains(&key)
        || key == SKIP_STDIN_KEY
        || key == STDIN_TIMEOUT_KEY
        || key == SCHEMA_MODE_KEY
}

fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>> {
    for key in keys {
        match map.get(*key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(other) => {
                return Err(PipelineError::InvalidOption {
                    key: key.to_string(),
                    message: format!("expected a string, got {}", other),
                });
            }
        }
    }
    Ok(None)
}

fn flag(map: &Map<String, Value>, key: &str) -> Result<bool> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s == "true" => Ok(true),
        Some(Value::String(s)) if s == "false" => Ok(false),
        Some(other) => Err(PipelineError::InvalidOption {
            key: key.to_string(),
            message: format!("expected true or false, got {}", other),
        }),
    }
}

fn timeout(map: &Map<String, Value>, key: &str) -> Result<Option<u64>> {
    let invalid = |value: &Value| PipelineError::InvalidOption {
        key: key.to_string(),
        message: format!("expected a positive number of milliseconds, got {}", value),
    };

    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Number(n)) => match n.as_u64() {
            Some(ms) if ms > 0 => Ok(Some(ms)),
            _ => Err(invalid(value)),
        },
        Some(value @ Value::String(s)) => match s.parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Some(ms)),
            _ => Err(invalid(value)),
        },
        Some(value) => Err(invalid(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Result<PipelineOptions> {
        match value {
            Value::Object(map) => PipelineOptions::from_map(&map),
            _ => panic!("test options must be a JSON object"),
        }
    }

    #[test]
    fn test_empty_map_gives_defaults() {
        assert_eq!(options(json!({})).unwrap(), PipelineOptions::default());
    }

    #[test]
    fn test_from_beats_from_file() {
        let opts = options(json!({"fromFile": "b.md", "from": "a.md"})).unwrap();
        assert_eq!(opts.from_file.as_deref(), Some("a.md"));

        let opts = options(json!({"fromFile": "b.md"})).unwrap();
        assert_eq!(opts.from_file.as_deref(), Some("b.md"));
    }

    #[test]
    fn test_destination_alias_priority() {
        let opts = options(json!({
            "destinationFile": "c.md",
            "output": "b.md",
            "destination": "a.md"
        }))
        .unwrap();
        assert_eq!(opts.destination.as_deref(), Some("a.md"));

        let opts = options(json!({"destinationFile": "c.md", "output": "b.md"})).unwrap();
        assert_eq!(opts.destination.as_deref(), Some("b.md"));
    }

    #[test]
    fn test_empty_string_falls_through_to_next_alias() {
        let opts = options(json!({"from": "", "fromFile": "b.md"})).unwrap();
        assert_eq!(opts.from_file.as_deref(), Some("b.md"));
    }

    #[test]
    fn test_flags_and_timeout() {
        let opts = options(json!({
            "skipStdin": true,
            "schemaMode": "true",
            "stdinTimeout": 250
        }))
        .unwrap();
        assert!(opts.skip_stdin);
        assert!(opts.schema_mode);
        assert_eq!(opts.stdin_timeout_ms, Some(250));

        let opts = options(json!({"stdinTimeout": "75"})).unwrap();
        assert_eq!(opts.stdin_timeout_ms, Some(75));
    }

    #[test]
    fn test_wrong_types_are_invalid_option() {
        let err = options(json!({"from": 3})).unwrap_err();
        assert_eq!(err.kind(), "InvalidOption");
        assert!(err.to_string().contains("'from'"));

        let err = options(json!({"skipStdin": "yes"})).unwrap_err();
        assert_eq!(err.kind(), "InvalidOption");

        let err = options(json!({"stdinTimeout": 0})).unwrap_err();
        assert_eq!(err.kind(), "InvalidOption");

        let err = options(json!({"stdinTimeout": -5})).unwrap_err();
        assert_eq!(err.kind(), "InvalidOption");
    }

    #[test]
    fn test_unknown_keys_kept_in_extra() {
        let opts = options(json!({"uv-theme": "dark", "from": "a.md", "verbose": true})).unwrap();
        assert_eq!(opts.extra.len(), 2);
        assert_eq!(opts.extra["uv-theme"], json!("dark"));
        assert!(!opts.extra.contains_key("from"));
    }

    #[test]
    fn test_reads_stdin_explicitly() {
        assert!(options(json!({"from": "-"})).unwrap().reads_stdin_explicitly());
        assert!(!options(json!({"from": "a.md"})).unwrap().reads_stdin_explicitly());
    }
}
