//! The release configuration model.
//!
//! Every node is a plain struct of `Option` scalars and nested nodes,
//! deserialized from TOML fragments and combined with [`Mergeable`].

mod active;
mod deploy;
mod environment;
pub mod export;
mod platform;
mod project;
mod release;
mod version;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub use active::Active;
pub use deploy::{Authorization, Deploy, Maven, MavenDeployer};
pub use environment::EnvironmentSection;
pub use export::{HIDE, UNSET};
pub use platform::{OsInfo, Platform};
pub use project::{
    Java, Links, Project, Snapshot, Stereotype, DEFAULT_SNAPSHOT_LABEL, DEFAULT_SNAPSHOT_PATTERN,
};
pub use release::{
    Apply, Changelog, CommitAuthor, Issues, Label, Milestone, Prerelease, Release, Releaser,
    ReleaserKind, Sort, Update, UpdateSection, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT,
};
pub use version::SemanticVersion;

pub(crate) use project::capitalize;

use crate::config::env::EnvProvider;
use crate::context::{ContextBag, ContextBuilder};
use crate::merge::Mergeable;
use crate::template::TemplateError;

/// The merged release configuration of one run.
///
/// `now` and `os` are runtime facts, not configuration: they are never read
/// from a fragment and never merged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseModel {
    pub environment: EnvironmentSection,
    pub project: Project,
    pub platform: Platform,
    pub release: Release,
    pub deploy: Deploy,
    #[serde(skip, default = "Utc::now")]
    now: DateTime<Utc>,
    #[serde(skip, default = "OsInfo::detect")]
    os: OsInfo,
}

impl Default for ReleaseModel {
    fn default() -> Self {
        Self {
            environment: EnvironmentSection::default(),
            project: Project::default(),
            platform: Platform::default(),
            release: Release::default(),
            deploy: Deploy::default(),
            now: Utc::now(),
            os: OsInfo::detect(),
        }
    }
}

impl Mergeable for ReleaseModel {
    fn merge(&mut self, source: &Self) {
        self.environment.merge(&source.environment);
        self.project.merge(&source.project);
        self.platform.merge(&source.platform);
        self.release.merge(&source.release);
        self.deploy.merge(&source.deploy);
    }
}

impl ReleaseModel {
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_os(mut self, os: OsInfo) -> Self {
        self.os = os;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn os(&self) -> &OsInfo {
        &self.os
    }

    /// The configured releaser, if any.
    pub fn releaser(&self) -> Option<&Releaser> {
        self.release.releaser()
    }

    /// The template context of the whole model, including the configured
    /// releaser's identity keys.
    pub fn props(&self, env: &dyn EnvProvider) -> Result<ContextBag, TemplateError> {
        let builder = ContextBuilder::new(self, env);
        match self.releaser() {
            Some(releaser) => builder.for_releaser(releaser).build(),
            None => builder.build(),
        }
    }

    /// Stamps releaser kinds and deployer names from their position in the
    /// document. Runs once after merging.
    pub fn normalize(&mut self) {
        self.release.assign_kinds();
        self.deploy.assign_names();
    }

    /// Merges the built-in defaults underneath the configured values.
    pub fn apply_defaults(&mut self) {
        debug!("applying built-in defaults");
        self.release.apply_defaults();
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "environment".into(),
            Value::Object(export::finish(
                Map::from_iter([(
                    "properties".to_string(),
                    export::string_map(&self.environment.properties),
                )]),
                full,
            )),
        );
        map.insert("project".into(), Value::Object(self.project.as_map(full)));
        map.insert(
            "platform".into(),
            Value::Object(Map::from_iter([(
                "replacements".to_string(),
                export::string_map(&self.platform.replacements),
            )])),
        );
        if let Some(releaser) = self.releaser() {
            map.insert(
                "release".into(),
                Value::Object(Map::from_iter([(
                    releaser.service_name().to_string(),
                    Value::Object(releaser.as_map(full)),
                )])),
            );
        }
        map.insert("deploy".into(), Value::Object(self.deploy.as_map(full)));
        export::finish(map, full)
    }
}

/// Keys extra properties for the context: a key that already starts with
/// `prefix` is kept, any other key becomes `prefix` + capitalized key.
pub(crate) fn prefixed_properties(
    prefix: &str,
    properties: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    properties
        .iter()
        .map(|(key, value)| {
            let key = if key.starts_with(prefix) {
                key.clone()
            } else {
                format!("{prefix}{}", capitalize(key))
            };
            (key, value.clone())
        })
        .collect()
}

/// Full-string regex match. An invalid pattern never matches.
pub(crate) fn matches_pattern(pattern: &str, value: &str) -> bool {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex.is_match(value),
        Err(err) => {
            warn!(%pattern, error = %err, "invalid pattern, treating as no match");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::MapEnv;
    use crate::context::ContextValue;

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern(".*-SNAPSHOT", "1.0.0-SNAPSHOT"));
        assert!(!matches_pattern("SNAPSHOT", "1.0.0-SNAPSHOT"));
        assert!(!matches_pattern("(", "("));
    }

    #[test]
    fn test_normalize_assigns_kinds() {
        let mut model: ReleaseModel = toml::from_str(
            r#"
            [release.gitlab]
            owner = "acme"
            [deploy.maven.github.app]
            url = "https://maven.pkg.github.com/acme/app"
            "#,
        )
        .unwrap();
        model.normalize();

        assert_eq!(model.releaser().unwrap().kind(), ReleaserKind::Gitlab);
        assert_eq!(model.deploy.maven.github["app"].name(), "app");
    }

    #[test]
    fn test_merge_leaves_runtime_facts() {
        let os = OsInfo::new("linux", "x86_64", "6.1");
        let mut target = ReleaseModel::default().with_os(os.clone());
        let source = ReleaseModel::default().with_os(OsInfo::new("windows", "x86_64", "10"));
        target.merge(&source);
        assert_eq!(target.os(), &os);
    }

    #[test]
    fn test_props_without_releaser() {
        let mut model = ReleaseModel::default().with_os(OsInfo::new("linux", "x86_64", "6.1"));
        model.project.name = Some("widget".into());
        let bag = model.props(&MapEnv::new()).unwrap();
        assert_eq!(bag.get("projectName"), Some(&ContextValue::Text("widget".into())));
        assert!(!bag.contains_key("repoOwner"));
    }
}
