//! Tests for config functionality.

use crate::config::types::{
    DEFAULT_DIRECTIVE_PATTERN, DEFAULT_LAYER_PATTERN, DEFAULT_STDIN_TIMEOUT_MS,
    default_reserved_variables,
};
use crate::config::{AllowListConfig, Config, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.working_dir, None);
    assert_eq!(config.prompt_base_dir(), "prompts");
    assert_eq!(config.schema_base_dir(), "schema");
    assert_eq!(
        config.params.directive,
        AllowListConfig::pattern(DEFAULT_DIRECTIVE_PATTERN)
    );
    assert_eq!(
        config.params.layer,
        AllowListConfig::pattern(DEFAULT_LAYER_PATTERN)
    );
    assert!(!config.params.allow_extra_tokens);
    assert_eq!(config.stdin.timeout_ms, DEFAULT_STDIN_TIMEOUT_MS);
    assert!(config.stdin.implicit_read);
    assert_eq!(config.variables.prefix, "uv-");
    assert_eq!(config.variables.reserved, default_reserved_variables());
    assert!(!config.render.strict);
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
working_dir: /srv/project
app_prompt:
  base_dir: lib/prompts
stdin:
  timeout_ms: 250
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.working_dir(), PathBuf::from("/srv/project"));
    assert_eq!(config.prompt_base_dir(), "lib/prompts");
    assert_eq!(config.stdin.timeout_ms, 250);

    // Unspecified values should use defaults
    assert_eq!(config.schema_base_dir(), "schema");
    assert!(config.stdin.implicit_read);
    assert_eq!(config.variables.prefix, "uv-");
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
working_dir: /work
app_prompt:
  base_dir: p
app_schema:
  base_dir: s
params:
  directive:
    values: [to, summary]
  layer:
    pattern: "^(project|issue|task|bugs)$"
  allow_extra_tokens: true
stdin:
  timeout_ms: 5000
  implicit_read: false
variables:
  prefix: "var-"
  reserved: [input_text]
render:
  strict: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.prompt_base_dir(), "p");
    assert_eq!(config.schema_base_dir(), "s");
    assert_eq!(
        config.params.directive.values,
        Some(vec!["to".to_string(), "summary".to_string()])
    );
    assert_eq!(
        config.params.layer.pattern.as_deref(),
        Some("^(project|issue|task|bugs)$")
    );
    assert!(config.params.allow_extra_tokens);
    assert_eq!(config.stdin.timeout_ms, 5000);
    assert!(!config.stdin.implicit_read);
    assert_eq!(config.variables.prefix, "var-");
    assert_eq!(config.variables.reserved, vec!["input_text".to_string()]);
    assert!(config.render.strict);
}

#[test]
fn test_parse_yaml_with_unknown_fields() {
    let yaml = r#"
app_prompt:
  base_dir: prompts2
  legacy_option: true
future_feature_x: enabled
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.prompt_base_dir(), "prompts2");
}

#[test]
fn test_empty_base_dir_falls_back_to_default() {
    let yaml = r#"
app_prompt:
  base_dir: ""
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.prompt_base_dir(), "prompts");
}

#[test]
fn test_validate_zero_timeout() {
    let yaml = r#"
stdin:
  timeout_ms: 0
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("timeout_ms"));
    assert!(err.to_string().contains("greater than 0"));
}

#[test]
fn test_validate_empty_prefix() {
    let yaml = r#"
variables:
  prefix: ""
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("variables.prefix"));
}

#[test]
fn test_validate_empty_allow_list_values() {
    let yaml = r#"
params:
  layer:
    values: []
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("params.layer"));
}

#[test]
fn test_validate_allow_list_without_pattern_or_values() {
    let yaml = r#"
params:
  directive:
    pattern: ""
"#;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("params.directive"));
}

#[test]
fn test_invalid_yaml_is_configuration_error() {
    let err = Config::from_yaml("stdin: [unterminated").unwrap_err();
    assert_eq!(err.kind(), "InvalidConfiguration");
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_yaml_roundtrip_preserves_values() {
    let yaml = r#"
working_dir: /work
stdin:
  timeout_ms: 300
"#;
    let config = Config::from_yaml(yaml).unwrap();
    let reparsed = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
    assert_eq!(config, reparsed);
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(None, dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_or_default_reads_default_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_PATH);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "app_schema:\n  base_dir: schemas\n").unwrap();

    let config = Config::load_or_default(None, dir.path()).unwrap();
    assert_eq!(config.schema_base_dir(), "schemas");
}

#[test]
fn test_load_explicit_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");
    let err = Config::load_or_default(Some(&missing), dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
