use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::version::SemanticVersion;
use super::{export, matches_pattern, prefixed_properties, ReleaseModel};
use crate::config::env::{env_or, env_override, EnvProvider};
use crate::context::{keys, ContextBag};
use crate::merge::{merge_list, merge_map, merge_scalar, Mergeable};
use crate::template::{contains_placeholder, ResolvableField, TemplateError};

pub const DEFAULT_SNAPSHOT_PATTERN: &str = ".*-SNAPSHOT";
pub const DEFAULT_SNAPSHOT_LABEL: &str = "early-access";

const SNAPSHOT_PATTERN_KEY: &str = "snapshotPattern";
const SNAPSHOT_LABEL_KEY: &str = "snapshotLabel";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stereotype {
    #[default]
    None,
    Cli,
    Desktop,
    Web,
    Mobile,
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stereotype::None => "none",
            Stereotype::Cli => "cli",
            Stereotype::Desktop => "desktop",
            Stereotype::Web => "web",
            Stereotype::Mobile => "mobile",
        })
    }
}

/// Project identity and metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub license: Option<String>,
    pub inception_year: Option<String>,
    pub copyright: Option<String>,
    pub vendor: Option<String>,
    pub stereotype: Option<Stereotype>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub links: Links,
    pub java: Java,
    pub snapshot: Snapshot,
    pub extra_properties: BTreeMap<String, String>,
}

impl Mergeable for Project {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.name, &source.name);
        merge_scalar(&mut self.version, &source.version);
        merge_scalar(&mut self.description, &source.description);
        merge_scalar(&mut self.long_description, &source.long_description);
        merge_scalar(&mut self.license, &source.license);
        merge_scalar(&mut self.inception_year, &source.inception_year);
        merge_scalar(&mut self.copyright, &source.copyright);
        merge_scalar(&mut self.vendor, &source.vendor);
        merge_scalar(&mut self.stereotype, &source.stereotype);
        merge_list(&mut self.authors, &source.authors);
        merge_list(&mut self.tags, &source.tags);
        self.links.merge(&source.links);
        self.java.merge(&source.java);
        self.snapshot.merge(&source.snapshot);
        merge_map(&mut self.extra_properties, &source.extra_properties);
    }
}

impl Project {
    /// The version, overridable through `JRELEASER_PROJECT_VERSION`.
    pub fn resolved_version(&self, env: &dyn EnvProvider) -> Option<String> {
        env_or(env, &[keys::PROJECT_VERSION], self.version.as_deref())
    }

    pub fn capitalized_name(&self) -> Option<String> {
        self.name.as_deref().map(capitalize)
    }

    pub fn stereotype(&self) -> Stereotype {
        self.stereotype.unwrap_or_default()
    }

    pub fn is_snapshot(&self, env: &dyn EnvProvider) -> bool {
        self.resolved_version(env)
            .is_some_and(|version| self.snapshot.matches(&version, env))
    }

    /// The snapshot label for snapshots, the resolved version otherwise.
    pub fn effective_version(&self, env: &dyn EnvProvider) -> Option<String> {
        if self.is_snapshot(env) {
            return Some(
                self.snapshot
                    .effective_label(env)
                    .unwrap_or_else(|| DEFAULT_SNAPSHOT_LABEL.to_string()),
            );
        }
        self.resolved_version(env)
    }

    pub fn parse_version(&self, env: &dyn EnvProvider) -> Option<SemanticVersion> {
        self.resolved_version(env)
            .and_then(|version| SemanticVersion::parse(&version))
    }

    /// Extra properties keyed for the template context (`project<Key>`).
    pub fn resolved_extra_properties(&self) -> Vec<(String, String)> {
        prefixed_properties("project", &self.extra_properties)
    }

    /// Writes the properties computed from the version string.
    pub fn fill_version_props(&self, env: &dyn EnvProvider, bag: &mut ContextBag) {
        let Some(version) = self.resolved_version(env) else {
            return;
        };
        bag.insert(keys::PROJECT_VERSION_WITH_UNDERSCORES, version.replace('.', "_"));
        bag.insert(keys::PROJECT_VERSION_WITH_DASHES, version.replace('.', "-"));

        if let Some(parsed) = SemanticVersion::parse(&version) {
            parsed.fill_props(keys::PROJECT_VERSION_PREFIX, bag);
            bag.insert(keys::PROJECT_VERSION_NUMBER, parsed.number());
        }
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("name".into(), export::opt(self.name.as_deref()));
        map.insert("version".into(), export::opt(self.version.as_deref()));
        map.insert("snapshot".into(), Value::Object(self.snapshot.as_map(full)));
        map.insert("description".into(), export::opt(self.description.as_deref()));
        map.insert(
            "longDescription".into(),
            export::opt(self.long_description.as_deref()),
        );
        map.insert("links".into(), Value::Object(self.links.as_map(full)));
        map.insert("license".into(), export::opt(self.license.as_deref()));
        map.insert("inceptionYear".into(), export::opt(self.inception_year.as_deref()));
        map.insert("copyright".into(), export::opt(self.copyright.as_deref()));
        map.insert("vendor".into(), export::opt(self.vendor.as_deref()));
        map.insert("stereotype".into(), Value::from(self.stereotype().to_string()));
        map.insert("authors".into(), Value::from(self.authors.clone()));
        map.insert("tags".into(), Value::from(self.tags.clone()));
        if self.java.is_enabled() {
            map.insert("java".into(), Value::Object(self.java.as_map(full)));
        }
        map.insert(
            "extraProperties".into(),
            export::string_map(&self.extra_properties),
        );
        export::finish(map, full)
    }
}

/// Snapshot detection and labelling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub pattern: Option<String>,
    pub label: Option<String>,
    pub full_changelog: Option<bool>,
    #[serde(skip)]
    cached_label: ResolvableField,
}

impl Mergeable for Snapshot {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.pattern, &source.pattern);
        merge_scalar(&mut self.label, &source.label);
        merge_scalar(&mut self.full_changelog, &source.full_changelog);
    }
}

impl Snapshot {
    pub fn configured_pattern(&self, env: &dyn EnvProvider) -> String {
        env_or(env, &[SNAPSHOT_PATTERN_KEY], self.pattern.as_deref())
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PATTERN.to_string())
    }

    pub fn matches(&self, version: &str, env: &dyn EnvProvider) -> bool {
        matches_pattern(&self.configured_pattern(env), version)
    }

    pub fn is_full_changelog(&self) -> bool {
        self.full_changelog.unwrap_or(false)
    }

    /// Resolves the label against the model-wide context and caches it.
    pub fn resolved_label(
        &self,
        model: &ReleaseModel,
        env: &dyn EnvProvider,
    ) -> Result<String, TemplateError> {
        self.cached_label.resolve(
            || env_override(env, &[SNAPSHOT_LABEL_KEY]),
            Some(self.label.as_deref().unwrap_or(DEFAULT_SNAPSHOT_LABEL)),
            || model.props(env),
        )
    }

    /// The environment override, then the configured label, then the default.
    pub fn configured_label(&self, env: &dyn EnvProvider) -> String {
        env_or(env, &[SNAPSHOT_LABEL_KEY], self.label.as_deref())
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_LABEL.to_string())
    }

    /// The cached label. Before [`Self::resolved_label`] ran, a configured
    /// label without placeholders is returned as is; a templated one is `None`.
    pub fn effective_label(&self, env: &dyn EnvProvider) -> Option<String> {
        self.cached_label.cached().or_else(|| {
            Some(self.configured_label(env)).filter(|label| !contains_placeholder(label))
        })
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("pattern".into(), export::opt(self.pattern.as_deref()));
        map.insert("label".into(), export::opt(self.label.as_deref()));
        map.insert("fullChangelog".into(), Value::from(self.is_full_changelog()));
        export::finish(map, full)
    }
}

/// Project links; each non-blank link becomes `projectLink<Kind>`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Links {
    pub homepage: Option<String>,
    pub documentation: Option<String>,
    pub license: Option<String>,
    pub bug_tracker: Option<String>,
    pub vcs_browser: Option<String>,
    pub faq: Option<String>,
    pub help: Option<String>,
    pub donation: Option<String>,
    pub contribute: Option<String>,
}

impl Mergeable for Links {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.homepage, &source.homepage);
        merge_scalar(&mut self.documentation, &source.documentation);
        merge_scalar(&mut self.license, &source.license);
        merge_scalar(&mut self.bug_tracker, &source.bug_tracker);
        merge_scalar(&mut self.vcs_browser, &source.vcs_browser);
        merge_scalar(&mut self.faq, &source.faq);
        merge_scalar(&mut self.help, &source.help);
        merge_scalar(&mut self.donation, &source.donation);
        merge_scalar(&mut self.contribute, &source.contribute);
    }
}

impl Links {
    fn entries(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("Homepage", self.homepage.as_deref()),
            ("Documentation", self.documentation.as_deref()),
            ("License", self.license.as_deref()),
            ("BugTracker", self.bug_tracker.as_deref()),
            ("VcsBrowser", self.vcs_browser.as_deref()),
            ("Faq", self.faq.as_deref()),
            ("Help", self.help.as_deref()),
            ("Donation", self.donation.as_deref()),
            ("Contribute", self.contribute.as_deref()),
        ]
    }

    pub fn fill_props(&self, bag: &mut ContextBag) {
        for (kind, link) in self.entries() {
            bag.insert_non_blank(&format!("{}{kind}", keys::PROJECT_LINK_PREFIX), link);
        }
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        for (kind, link) in self.entries() {
            map.insert(uncapitalize(kind), export::opt(link));
        }
        export::finish(map, full)
    }
}

/// Java-specific project metadata, contributing context keys only when enabled.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Java {
    pub enabled: Option<bool>,
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub main_class: Option<String>,
    pub extra_properties: BTreeMap<String, String>,
}

impl Mergeable for Java {
    fn merge(&mut self, source: &Self) {
        merge_scalar(&mut self.enabled, &source.enabled);
        merge_scalar(&mut self.group_id, &source.group_id);
        merge_scalar(&mut self.artifact_id, &source.artifact_id);
        merge_scalar(&mut self.version, &source.version);
        merge_scalar(&mut self.main_class, &source.main_class);
        merge_map(&mut self.extra_properties, &source.extra_properties);
    }
}

impl Java {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn resolved_extra_properties(&self) -> Vec<(String, String)> {
        prefixed_properties("java", &self.extra_properties)
    }

    pub fn fill_props(&self, bag: &mut ContextBag) {
        bag.extend(self.resolved_extra_properties());
        bag.insert_some(keys::PROJECT_JAVA_GROUP_ID, self.group_id.as_deref());
        bag.insert_some(keys::PROJECT_JAVA_ARTIFACT_ID, self.artifact_id.as_deref());
        bag.insert_some(keys::PROJECT_JAVA_VERSION, self.version.as_deref());
        bag.insert_some(keys::PROJECT_JAVA_MAIN_CLASS, self.main_class.as_deref());
        if let Some(version) = self.version.as_deref().and_then(SemanticVersion::parse) {
            version.fill_props(keys::PROJECT_JAVA_VERSION, bag);
        }
    }

    pub fn as_map(&self, full: bool) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("enabled".into(), Value::from(self.is_enabled()));
        map.insert("groupId".into(), export::opt(self.group_id.as_deref()));
        map.insert("artifactId".into(), export::opt(self.artifact_id.as_deref()));
        map.insert("version".into(), export::opt(self.version.as_deref()));
        map.insert("mainClass".into(), export::opt(self.main_class.as_deref()));
        map.insert(
            "extraProperties".into(),
            export::string_map(&self.extra_properties),
        );
        export::finish(map, full)
    }
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn uncapitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
