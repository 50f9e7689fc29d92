//! Placeholder expansion for configured strings.
//!
//! Templates use `{{key}}` placeholders (whitespace around the key is ignored).
//! Every key must be present in the supplied [`ContextBag`]; a missing key is
//! an error rather than an empty substitution, since a half-expanded URL or
//! file name is worse than a failed release step.

mod cache;

use thiserror::Error;

use crate::context::ContextBag;

pub use cache::{ResolvableField, Resolution};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TemplateError {
    #[error("unresolved placeholder '{key}' in template '{template}'")]
    UnresolvedPlaceholder { key: String, template: String },

    #[error("unclosed placeholder (missing '}}}}') in template '{template}'")]
    UnclosedPlaceholder { template: String },
}

impl TemplateError {
    /// The context key that could not be found, if that is what failed.
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            TemplateError::UnresolvedPlaceholder { key, .. } => Some(key),
            TemplateError::UnclosedPlaceholder { .. } => None,
        }
    }
}

/// Returns true while `value` still carries placeholder syntax.
pub fn contains_placeholder(value: &str) -> bool {
    value.contains(OPEN)
}

/// Expands every `{{key}}` in `template` against `context` in a single pass.
///
/// Substituted values are not scanned again, so a context value that itself
/// looks like a template is inserted as-is.
pub fn render(template: &str, context: &ContextBag) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];

        let end = after
            .find(CLOSE)
            .ok_or_else(|| TemplateError::UnclosedPlaceholder {
                template: template.to_string(),
            })?;

        let key = after[..end].trim();
        let value = context
            .get(key)
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder {
                key: key.to_string(),
                template: template.to_string(),
            })?;
        result.push_str(&value.to_string());

        rest = &after[end + CLOSE.len()..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Renders an optional template; an unset template renders as an empty string.
pub fn render_optional(
    template: Option<&str>,
    context: &ContextBag,
) -> Result<String, TemplateError> {
    match template {
        Some(template) => render(template, context),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextValue;

    fn bag(entries: &[(&str, &str)]) -> ContextBag {
        entries.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_release_url() {
        let context = bag(&[("owner", "acme"), ("name", "widget"), ("tagName", "v2.0.0")]);
        let rendered = render(
            "https://example.com/{{owner}}/{{name}}/releases/{{tagName}}",
            &context,
        )
        .unwrap();
        assert_eq!(rendered, "https://example.com/acme/widget/releases/v2.0.0");
    }

    #[test]
    fn test_missing_key() {
        let context = bag(&[("owner", "acme"), ("name", "widget")]);
        let err = render(
            "https://example.com/{{owner}}/{{name}}/releases/{{tagName}}",
            &context,
        )
        .unwrap_err();
        assert_eq!(err.missing_key(), Some("tagName"));
        assert!(matches!(
            err,
            TemplateError::UnresolvedPlaceholder { ref template, .. }
                if template.ends_with("/releases/{{tagName}}")
        ));
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let context = bag(&[("projectVersion", "1.2.0")]);
        assert_eq!(render("v{{ projectVersion }}", &context).unwrap(), "v1.2.0");
    }

    #[test]
    fn test_no_placeholders() {
        let context = ContextBag::new();
        assert_eq!(render("plain text", &context).unwrap(), "plain text");
        assert_eq!(render("", &context).unwrap(), "");
    }

    #[test]
    fn test_unclosed_placeholder() {
        let context = bag(&[("a", "b")]);
        let result = render("prefix {{a", &context);
        assert!(matches!(result, Err(TemplateError::UnclosedPlaceholder { .. })));
    }

    #[test]
    fn test_single_pass() {
        let context = bag(&[("outer", "{{inner}}"), ("inner", "nope")]);
        assert_eq!(render("[{{outer}}]", &context).unwrap(), "[{{inner}}]");
    }

    #[test]
    fn test_pass_through_and_scalars() {
        let mut context = ContextBag::new();
        context.insert("description", ContextValue::pass_through("**bold** <b>"));
        context.insert("year", 2020_i64);
        context.insert("snapshot", false);
        assert_eq!(
            render("{{description}} {{year}} {{snapshot}}", &context).unwrap(),
            "**bold** <b> 2020 false"
        );
    }

    #[test]
    fn test_render_optional() {
        let context = bag(&[("a", "1")]);
        assert_eq!(render_optional(None, &context).unwrap(), "");
        assert_eq!(render_optional(Some("{{a}}"), &context).unwrap(), "1");
    }

    #[test]
    fn test_contains_placeholder() {
        assert!(contains_placeholder("v{{projectVersion}}"));
        assert!(!contains_placeholder("v1.0.0"));
        assert!(!contains_placeholder("{single}"));
    }
}
