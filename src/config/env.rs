//! Read-time environment overrides.
//!
//! Every overridable field has exactly one environment variable, derived from
//! its logical key: `JRELEASER_` followed by the key segments converted to
//! upper snake case and joined with `_`.
//!
//! | segments                                   | variable                                     |
//! |--------------------------------------------|----------------------------------------------|
//! | `tagName`                                  | `JRELEASER_TAG_NAME`                         |
//! | `github`, `token`                          | `JRELEASER_GITHUB_TOKEN`                     |
//! | `deploy`, `maven`, `github`, `app`, `password` | `JRELEASER_DEPLOY_MAVEN_GITHUB_APP_PASSWORD` |
//!
//! The environment is consulted when a field is read, never while merging.

use std::collections::BTreeMap;
use std::fmt::Debug;

pub const ENV_PREFIX: &str = "JRELEASER_";

/// Source of environment variables.
///
/// Resolution code takes this as `&dyn EnvProvider` so tests can swap the
/// process environment for an in-memory one.
pub trait EnvProvider: Debug {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// An in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvProvider for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = MapEnv::new();
        for (name, value) in iter {
            env.set(name, value);
        }
        env
    }
}

/// Derives the environment variable name for a logical key.
pub fn env_var_name(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .map(|segment| upper_snake(segment))
        .collect::<Vec<_>>()
        .join("_");

    if joined.starts_with(ENV_PREFIX) {
        joined
    } else {
        format!("{ENV_PREFIX}{joined}")
    }
}

/// Looks up the override for a logical key. Blank values count as absent.
pub fn env_override(env: &dyn EnvProvider, segments: &[&str]) -> Option<String> {
    env.var(&env_var_name(segments))
        .filter(|value| !value.trim().is_empty())
}

/// The override if present, otherwise the configured value.
pub fn env_or(env: &dyn EnvProvider, segments: &[&str], configured: Option<&str>) -> Option<String> {
    env_override(env, segments).or_else(|| configured.map(str::to_string))
}

fn upper_snake(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    let mut previous: Option<char> = None;

    for ch in segment.chars() {
        if ch.is_ascii_alphanumeric() {
            let boundary = ch.is_ascii_uppercase()
                && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            if boundary {
                out.push('_');
            }
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push('_');
        }
        previous = Some(ch);
    }

    out
}
