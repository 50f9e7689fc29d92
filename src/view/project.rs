use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{Immutable, Snapshot};
use crate::config::env::EnvProvider;
use crate::model::{Java, Links, Project, Snapshot as SnapshotConfig, Stereotype};

#[derive(Debug, Clone, Copy)]
pub struct ProjectView<'a> {
    project: &'a Project,
}

impl Immutable for Project {
    type View<'a> = ProjectView<'a>;

    fn as_immutable(&self) -> ProjectView<'_> {
        ProjectView { project: self }
    }
}

impl<'a> ProjectView<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.project.name.as_deref()
    }

    pub fn version(&self) -> Option<&'a str> {
        self.project.version.as_deref()
    }

    pub fn resolved_version(&self, env: &dyn EnvProvider) -> Option<String> {
        self.project.resolved_version(env)
    }

    pub fn effective_version(&self, env: &dyn EnvProvider) -> Option<String> {
        self.project.effective_version(env)
    }

    pub fn is_snapshot(&self, env: &dyn EnvProvider) -> bool {
        self.project.is_snapshot(env)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.project.description.as_deref()
    }

    pub fn long_description(&self) -> Option<&'a str> {
        self.project.long_description.as_deref()
    }

    pub fn license(&self) -> Option<&'a str> {
        self.project.license.as_deref()
    }

    pub fn inception_year(&self) -> Option<&'a str> {
        self.project.inception_year.as_deref()
    }

    pub fn copyright(&self) -> Option<&'a str> {
        self.project.copyright.as_deref()
    }

    pub fn vendor(&self) -> Option<&'a str> {
        self.project.vendor.as_deref()
    }

    pub fn stereotype(&self) -> Stereotype {
        self.project.stereotype()
    }

    pub fn authors(&self) -> Snapshot<Vec<String>> {
        Snapshot::new(self.project.authors.clone())
    }

    pub fn tags(&self) -> Snapshot<Vec<String>> {
        Snapshot::new(self.project.tags.clone())
    }

    pub fn extra_properties(&self) -> Snapshot<BTreeMap<String, String>> {
        Snapshot::new(self.project.extra_properties.clone())
    }

    pub fn links(&self) -> LinksView<'a> {
        self.project.links.as_immutable()
    }

    pub fn java(&self) -> JavaView<'a> {
        self.project.java.as_immutable()
    }

    pub fn snapshot(&self) -> SnapshotView<'a> {
        self.project.snapshot.as_immutable()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.project.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SnapshotView<'a> {
    snapshot: &'a SnapshotConfig,
}

impl Immutable for SnapshotConfig {
    type View<'a> = SnapshotView<'a>;

    fn as_immutable(&self) -> SnapshotView<'_> {
        SnapshotView { snapshot: self }
    }
}

impl<'a> SnapshotView<'a> {
    pub fn pattern(&self) -> Option<&'a str> {
        self.snapshot.pattern.as_deref()
    }

    pub fn label(&self) -> Option<&'a str> {
        self.snapshot.label.as_deref()
    }

    pub fn effective_label(&self, env: &dyn EnvProvider) -> Option<String> {
        self.snapshot.effective_label(env)
    }

    pub fn is_full_changelog(&self) -> bool {
        self.snapshot.is_full_changelog()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.snapshot.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LinksView<'a> {
    links: &'a Links,
}

impl Immutable for Links {
    type View<'a> = LinksView<'a>;

    fn as_immutable(&self) -> LinksView<'_> {
        LinksView { links: self }
    }
}

impl<'a> LinksView<'a> {
    pub fn homepage(&self) -> Option<&'a str> {
        self.links.homepage.as_deref()
    }

    pub fn documentation(&self) -> Option<&'a str> {
        self.links.documentation.as_deref()
    }

    pub fn license(&self) -> Option<&'a str> {
        self.links.license.as_deref()
    }

    pub fn bug_tracker(&self) -> Option<&'a str> {
        self.links.bug_tracker.as_deref()
    }

    pub fn vcs_browser(&self) -> Option<&'a str> {
        self.links.vcs_browser.as_deref()
    }

    pub fn faq(&self) -> Option<&'a str> {
        self.links.faq.as_deref()
    }

    pub fn help(&self) -> Option<&'a str> {
        self.links.help.as_deref()
    }

    pub fn donation(&self) -> Option<&'a str> {
        self.links.donation.as_deref()
    }

    pub fn contribute(&self) -> Option<&'a str> {
        self.links.contribute.as_deref()
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.links.as_map(full))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JavaView<'a> {
    java: &'a Java,
}

impl Immutable for Java {
    type View<'a> = JavaView<'a>;

    fn as_immutable(&self) -> JavaView<'_> {
        JavaView { java: self }
    }
}

impl<'a> JavaView<'a> {
    pub fn is_enabled(&self) -> bool {
        self.java.is_enabled()
    }

    pub fn group_id(&self) -> Option<&'a str> {
        self.java.group_id.as_deref()
    }

    pub fn artifact_id(&self) -> Option<&'a str> {
        self.java.artifact_id.as_deref()
    }

    pub fn version(&self) -> Option<&'a str> {
        self.java.version.as_deref()
    }

    pub fn main_class(&self) -> Option<&'a str> {
        self.java.main_class.as_deref()
    }

    pub fn extra_properties(&self) -> Snapshot<BTreeMap<String, String>> {
        Snapshot::new(self.java.extra_properties.clone())
    }

    pub fn as_map(&self, full: bool) -> Snapshot<Map<String, Value>> {
        Snapshot::new(self.java.as_map(full))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::MapEnv;
    use crate::view::ViewError;

    #[test]
    fn test_collections_are_fresh_copies() {
        let mut project = Project {
            name: Some("widget".into()),
            authors: vec!["Ann".into()],
            ..Project::default()
        };

        let before = project.as_immutable().authors();
        project.authors.push("Bob".into());
        let after = project.as_immutable().authors();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn test_scalars_delegate() {
        let project = Project {
            name: Some("widget".into()),
            version: Some("1.0.0-SNAPSHOT".into()),
            ..Project::default()
        };
        let view = project.as_immutable();
        let env = MapEnv::new();

        assert_eq!(view.name(), Some("widget"));
        assert!(view.is_snapshot(&env));
        assert_eq!(view.snapshot().pattern(), None);
        assert!(!view.java().is_enabled());
    }

    #[test]
    fn test_extra_properties_read_only() {
        let mut project = Project::default();
        project
            .extra_properties
            .insert("key".into(), "value".into());

        let mut extra = project.as_immutable().extra_properties();
        assert_eq!(extra.get("key").map(String::as_str), Some("value"));
        assert!(matches!(
            extra.insert("other", "x"),
            Err(ViewError::UnsupportedOperation { operation: "insert" })
        ));
        assert_eq!(project.extra_properties.len(), 1);
    }
}
