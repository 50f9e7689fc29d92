//! Per-field memoization of resolved values.

use std::cell::RefCell;

use tracing::trace;

use super::{contains_placeholder, render, TemplateError};
use crate::context::ContextBag;

/// Resolution state of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved(String),
}

/// A lazily resolved, memoized string field.
///
/// The first successful resolution wins and is kept for the lifetime of the
/// owning node. The only way back into rendering is a cached value that still
/// carries placeholder syntax, which happens when an environment override is
/// itself a template: such a value is re-rendered on every read until it comes
/// out clean.
///
/// The cache lives behind a `RefCell` so resolution can run while the owning
/// node is borrowed as part of the whole model. That makes nodes `!Sync`; a
/// merged model must not be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ResolvableField {
    state: RefCell<Resolution>,
}

// Caches are runtime state, not configuration.
impl PartialEq for ResolvableField {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl ResolvableField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn state(&self) -> Resolution {
        self.state.borrow().clone()
    }

    /// Returns the cached value, if any.
    pub fn cached(&self) -> Option<String> {
        match &*self.state.borrow() {
            Resolution::Resolved(value) => Some(value.clone()),
            Resolution::Unresolved => None,
        }
    }

    /// Resolves the field.
    ///
    /// * `overridden` is consulted only while the field is unresolved.
    /// * `configured` is the merged configuration value, rendered when no
    ///   override is present.
    /// * `context` is only invoked when something actually needs rendering.
    ///
    /// A failed render leaves the state untouched.
    pub fn resolve<O, C>(
        &self,
        overridden: O,
        configured: Option<&str>,
        context: C,
    ) -> Result<String, TemplateError>
    where
        O: FnOnce() -> Option<String>,
        C: FnOnce() -> Result<ContextBag, TemplateError>,
    {
        let current = self.state();

        let next = match current {
            Resolution::Resolved(value) if !contains_placeholder(&value) => return Ok(value),
            Resolution::Resolved(value) => {
                trace!(%value, "re-rendering cached value that still holds placeholders");
                render(&value, &context()?)?
            }
            Resolution::Unresolved => match overridden() {
                Some(value) if contains_placeholder(&value) => render(&value, &context()?)?,
                Some(value) => value,
                None => match configured {
                    Some(template) if contains_placeholder(template) => {
                        render(template, &context()?)?
                    }
                    Some(value) => value.to_string(),
                    None => String::new(),
                },
            },
        };

        trace!(value = %next, "field resolved");
        *self.state.borrow_mut() = Resolution::Resolved(next.clone());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn context(version: &str) -> ContextBag {
        [("projectVersion", version)].into_iter().collect()
    }

    #[test]
    fn test_renders_configured_value() {
        let field = ResolvableField::new();
        let value = field
            .resolve(|| None, Some("v{{projectVersion}}"), || Ok(context("1.0.0")))
            .unwrap();
        assert_eq!(value, "v1.0.0");
        assert_eq!(field.state(), Resolution::Resolved("v1.0.0".into()));
    }

    #[test]
    fn test_override_wins() {
        let field = ResolvableField::new();
        let value = field
            .resolve(|| Some("v2".into()), Some("v1"), || Ok(ContextBag::new()))
            .unwrap();
        assert_eq!(value, "v2");
    }

    #[test]
    fn test_templated_override_is_rendered() {
        let field = ResolvableField::new();
        let value = field
            .resolve(
                || Some("{{projectVersion}}".into()),
                Some("ignored"),
                || Ok(context("1.2.0")),
            )
            .unwrap();
        assert_eq!(value, "1.2.0");
    }

    #[test]
    fn test_second_read_does_not_render() {
        let field = ResolvableField::new();
        let builds = Cell::new(0);
        let build = || {
            builds.set(builds.get() + 1);
            Ok(context("1.0.0"))
        };

        let first = field.resolve(|| None, Some("v{{projectVersion}}"), build).unwrap();
        let second = field
            .resolve(
                || panic!("override must not be consulted once resolved"),
                Some("v{{projectVersion}}"),
                || {
                    builds.set(builds.get() + 1);
                    Ok(context("9.9.9"))
                },
            )
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(builds.get(), 1);
    }

    #[test]
    fn test_plain_value_needs_no_context() {
        let field = ResolvableField::new();
        let value = field
            .resolve(|| None, Some("v1.0.0"), || panic!("context not needed"))
            .unwrap();
        assert_eq!(value, "v1.0.0");
    }

    #[test]
    fn test_unset_resolves_empty() {
        let field = ResolvableField::new();
        let value = field.resolve(|| None, None, || Ok(ContextBag::new())).unwrap();
        assert_eq!(value, "");
        assert_eq!(field.cached().as_deref(), Some(""));
    }

    #[test]
    fn test_failure_keeps_state() {
        let field = ResolvableField::new();
        let result = field.resolve(|| None, Some("{{missing}}"), || Ok(ContextBag::new()));
        assert!(matches!(
            result,
            Err(TemplateError::UnresolvedPlaceholder { ref key, .. }) if key == "missing"
        ));
        assert_eq!(field.state(), Resolution::Unresolved);

        let value = field
            .resolve(|| None, Some("{{missing}}"), || {
                Ok([("missing", "found")].into_iter().collect())
            })
            .unwrap();
        assert_eq!(value, "found");
    }

    #[test]
    fn test_cached_template_is_rendered_again() {
        let field = ResolvableField {
            state: RefCell::new(Resolution::Resolved("{{projectVersion}}".into())),
        };
        let value = field.resolve(|| None, None, || Ok(context("3.1.0"))).unwrap();
        assert_eq!(value, "3.1.0");
        assert_eq!(field.cached().as_deref(), Some("3.1.0"));
    }

    #[test]
    fn test_clone_is_independent() {
        let field = ResolvableField::new();
        let copy = field.clone();
        field.resolve(|| Some("a".into()), None, || Ok(ContextBag::new())).unwrap();
        assert_eq!(copy.state(), Resolution::Unresolved);
    }
}
