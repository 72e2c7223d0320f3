//! `{variable}` substitution.
//!
//! # Syntax
//!
//! - `{name}` - Substitutes the value of variable `name` (surrounding whitespace is trimmed)
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! In [`RenderMode::Lenient`] anything that is not a known placeholder is
//! copied through unchanged, so prompt text containing braces (JSON snippets,
//! code) survives. [`RenderMode::Strict`] reports it instead.

use std::collections::BTreeMap;
use thiserror::Error;

/// How unknown or malformed placeholders are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Keep them verbatim.
    #[default]
    Lenient,
    /// Fail on them.
    Strict,
}

impl RenderMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            RenderMode::Strict
        } else {
            RenderMode::Lenient
        }
    }
}

/// Placeholder problems found in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Substitute `{name}` placeholders in `template`.
///
/// # Returns
///
/// * `Ok(String)` - The rendered text
/// * `Err(TemplateError)` - Strict mode only: undefined variable or bad syntax
pub fn render_template(
    template: &str,
    variables: &BTreeMap<String, String>,
    mode: RenderMode,
) -> Result<String, TemplateError> {
    let strict = mode == RenderMode::Strict;
    let mut result = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' => {
                if let Some((_, '{')) = chars.peek() {
                    chars.next();
                    result.push('{');
                    continue;
                }

                let mut raw = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    raw.push(c);
                }

                if !closed {
                    if strict {
                        return Err(TemplateError::UnmatchedBrace { position: pos });
                    }
                    result.push('{');
                    result.push_str(&raw);
                    continue;
                }

                let name = raw.trim();
                if name.is_empty() {
                    if strict {
                        return Err(TemplateError::EmptyVariableName { position: pos });
                    }
                    push_verbatim(&mut result, &raw);
                    continue;
                }

                match variables.get(name) {
                    Some(value) => result.push_str(value),
                    None if strict => {
                        return Err(TemplateError::UndefinedVariable {
                            name: name.to_string(),
                            position: pos,
                        });
                    }
                    None => push_verbatim(&mut result, &raw),
                }
            }
            '}' => {
                // `}}` escape; a lone `}` is literal too
                if let Some((_, '}')) = chars.peek() {
                    chars.next();
                }
                result.push('}');
            }
            _ => result.push(ch),
        }
    }

    Ok(result)
}

fn push_verbatim(result: &mut String, raw: &str) {
    result.push('{');
    result.push_str(raw);
    result.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn strict(template: &str, variables: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        render_template(template, variables, RenderMode::Strict)
    }

    fn lenient(template: &str, variables: &BTreeMap<String, String>) -> String {
        render_template(template, variables, RenderMode::Lenient).unwrap()
    }

    #[test]
    fn test_simple_substitution() {
        let vars = vars([("name", "Alice"), ("greeting", "Hello")]);
        assert_eq!(strict("{greeting}, {name}!", &vars).unwrap(), "Hello, Alice!");
    }

    #[test]
    fn test_escape_braces() {
        let vars = BTreeMap::new();
        assert_eq!(
            strict("Use {{var}} for variables", &vars).unwrap(),
            "Use {var} for variables"
        );
        assert_eq!(strict("a }} b", &vars).unwrap(), "a } b");
        assert_eq!(strict("a } b", &vars).unwrap(), "a } b");
    }

    #[test]
    fn test_whitespace_in_variable_name() {
        let vars = vars([("name", "Alice")]);
        assert_eq!(strict("Hello { name }!", &vars).unwrap(), "Hello Alice!");
    }

    #[test]
    fn test_multiline_values_and_unicode() {
        let vars = vars([("input_text", "line1\nline2"), ("emoji", "🎉")]);
        assert_eq!(
            strict("# Input\n{input_text}\n{emoji}", &vars).unwrap(),
            "# Input\nline1\nline2\n🎉"
        );
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let vars = vars([("a", "{b}"), ("b", "B")]);
        assert_eq!(strict("{a}", &vars).unwrap(), "{b}");
    }

    #[test]
    fn test_strict_undefined_variable() {
        let err = strict("Hello {name}", &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "name".to_string(),
                position: 6
            }
        );
        assert_eq!(
            err.to_string(),
            "undefined variable 'name' at position 6 in template"
        );
    }

    #[test]
    fn test_strict_syntax_errors() {
        let vars = BTreeMap::new();
        assert_eq!(
            strict("Hello {name", &vars).unwrap_err(),
            TemplateError::UnmatchedBrace { position: 6 }
        );
        assert_eq!(
            strict("Hello {}", &vars).unwrap_err(),
            TemplateError::EmptyVariableName { position: 6 }
        );
        assert_eq!(
            TemplateError::UnmatchedBrace { position: 5 }.to_string(),
            "unmatched '{' at position 5 in template"
        );
    }

    #[test]
    fn test_lenient_keeps_unknown_placeholders() {
        let vars = vars([("x", "X")]);
        assert_eq!(lenient("{x} and {y}", &vars), "X and {y}");
        assert_eq!(lenient("{ spaced }", &vars), "{ spaced }");
        assert_eq!(lenient(r#"{"key": 1}"#, &vars), r#"{"key": 1}"#);
    }

    #[test]
    fn test_lenient_keeps_malformed_braces() {
        let vars = BTreeMap::new();
        assert_eq!(lenient("empty {} here", &vars), "empty {} here");
        assert_eq!(lenient("open {tail", &vars), "open {tail");
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(RenderMode::from_strict(true), RenderMode::Strict);
        assert_eq!(RenderMode::from_strict(false), RenderMode::Lenient);
        assert_eq!(RenderMode::default(), RenderMode::Lenient);
    }
}
