//! # Variable Resolution and Template Rendering
//!
//! Templates are plain text with Tera substitution markers
//! (`{{ VARIABLE }}`). The set of recognized variables is whatever the
//! resolved render context supplies; there is no schema beyond the
//! non-overridable key list.
//!
//! ## Precedence
//!
//! A render context is resolved from three layers, low to high:
//!
//! 1. built-in non-overridable keys (`CURRENT_YEAR`),
//! 2. global default variables from the central configuration,
//! 3. per-repository overrides from the repository's policy file.
//!
//! Repository overrides beat global defaults for every ordinary key, but
//! no layer may change a non-overridable key: defaults and overrides are
//! applied with those keys skipped, so the built-in value always wins.

use std::collections::HashMap;
use std::error::Error as _;

use chrono::{Datelike, Utc};

use crate::error::{Error, Result};

/// Variable names whose values are fixed by the system and cannot be
/// changed by any configuration layer.
pub const NON_OVERRIDABLE: &[&str] = &["CURRENT_YEAR"];

/// Resolve the render context for one repository.
///
/// Starts from the built-in keys, then applies `defaults` and `overrides`
/// in that order, skipping any key in [`NON_OVERRIDABLE`]. Never fails;
/// unknown keys are carried through to the engine and ignored if unused.
pub fn resolve_context(
    defaults: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut context = HashMap::new();
    context.insert("CURRENT_YEAR".to_string(), Utc::now().year().to_string());

    for (key, value) in defaults {
        if NON_OVERRIDABLE.contains(&key.as_str()) {
            continue;
        }
        context.insert(key.clone(), value.clone());
    }

    for (key, value) in overrides {
        if NON_OVERRIDABLE.contains(&key.as_str()) {
            continue;
        }
        context.insert(key.clone(), value.clone());
    }

    context
}

/// Render a template with an already-resolved context.
///
/// Fails with [`Error::Template`] when the template cannot be parsed or a
/// referenced variable causes a rendering error.
pub fn render(template: &str, context: &HashMap<String, String>) -> Result<String> {
    let mut tera_context = tera::Context::new();
    for (key, value) in context {
        tera_context.insert(key.as_str(), value);
    }

    tera::Tera::one_off(template, &tera_context, false).map_err(|e| Error::Template {
        // Tera nests the interesting part one level down.
        message: match e.source() {
            Some(source) => format!("{e}: {source}"),
            None => e.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn current_year() -> String {
        Utc::now().year().to_string()
    }

    const TEMPLATE: &str = "{{ CURRENT_YEAR }} {{ CGO_ENABLED }}";

    #[test]
    fn test_render_with_defaults_only() {
        let context = resolve_context(&vars(&[("CGO_ENABLED", "0")]), &HashMap::new());
        let result = render(TEMPLATE, &context).unwrap();
        assert_eq!(result, format!("{} 0", current_year()));
    }

    #[test]
    fn test_render_override_beats_default() {
        let context = resolve_context(
            &vars(&[("CGO_ENABLED", "0")]),
            &vars(&[("CGO_ENABLED", "1")]),
        );
        let result = render(TEMPLATE, &context).unwrap();
        assert_eq!(result, format!("{} 1", current_year()));
    }

    #[test]
    fn test_render_current_year_cannot_be_overridden() {
        let context = resolve_context(
            &vars(&[("CGO_ENABLED", "0")]),
            &vars(&[("CGO_ENABLED", "1"), ("CURRENT_YEAR", "1990")]),
        );
        let result = render(TEMPLATE, &context).unwrap();
        assert_eq!(result, format!("{} 1", current_year()));
    }

    #[test]
    fn test_current_year_locked_against_defaults_too() {
        let context = resolve_context(&vars(&[("CURRENT_YEAR", "1990")]), &HashMap::new());
        assert_eq!(context.get("CURRENT_YEAR").unwrap(), &current_year());
    }

    #[test]
    fn test_resolve_keeps_unrelated_default_keys() {
        let context = resolve_context(
            &vars(&[("A", "1"), ("B", "2")]),
            &vars(&[("B", "3"), ("C", "4")]),
        );
        assert_eq!(context.get("A").unwrap(), "1");
        assert_eq!(context.get("B").unwrap(), "3");
        assert_eq!(context.get("C").unwrap(), "4");
    }

    #[test]
    fn test_render_unused_context_keys_are_ignored() {
        let context = resolve_context(&vars(&[("UNUSED", "whatever")]), &HashMap::new());
        let result = render("static text", &context).unwrap();
        assert_eq!(result, "static text");
    }

    #[test]
    fn test_render_is_idempotent_for_identical_inputs() {
        let context = resolve_context(&vars(&[("CGO_ENABLED", "0")]), &HashMap::new());
        let first = render(TEMPLATE, &context).unwrap();
        let second = render(TEMPLATE, &context).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_render_parse_error() {
        let context = HashMap::new();
        let err = render("{{ unclosed", &context).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn test_render_missing_referenced_variable_is_error() {
        let context = HashMap::new();
        let err = render("{{ NOT_THERE }}", &context).unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }
}
