use chrono::SecondsFormat;
use tracing::debug;

use super::{keys, ContextBag, ContextValue};
use crate::config::env::EnvProvider;
use crate::model::{ReleaseModel, Releaser};
use crate::template::{contains_placeholder, render, TemplateError};

/// Assembles the template context of a merged model.
///
/// Sources are written in a fixed order and a later write of an existing key
/// wins, so user extra properties shadow computed values.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ContextBuilder<'a> {
    model: &'a ReleaseModel,
    env: &'a dyn EnvProvider,
    releaser: Option<&'a Releaser>,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(model: &'a ReleaseModel, env: &'a dyn EnvProvider) -> Self {
        Self {
            model,
            env,
            releaser: None,
        }
    }

    /// Adds the repository identity keys of a releaser.
    pub fn for_releaser(mut self, releaser: &'a Releaser) -> Self {
        self.releaser = Some(releaser);
        self
    }

    pub fn build(self) -> Result<ContextBag, TemplateError> {
        let model = self.model;
        let project = &model.project;
        let env = self.env;
        let mut bag = ContextBag::new();

        bag.extend(&model.environment.properties);

        bag.extend(&model.environment.sourced_properties);
        project.fill_version_props(env, &mut bag);
        let os = model.os();
        let platform = os.platform();
        let replaced = model.platform.apply_replacements(&platform);
        bag.insert(keys::OS_NAME, &os.name);
        bag.insert(keys::OS_ARCH, &os.arch);
        bag.insert(keys::OS_VERSION, &os.version);
        bag.insert(keys::OS_PLATFORM, platform);
        bag.insert(keys::OS_PLATFORM_REPLACED, replaced);

        bag.insert_some(keys::PROJECT_NAME, project.name.as_deref());
        bag.insert_some(keys::PROJECT_NAME_CAPITALIZED, project.capitalized_name());
        bag.insert_some(keys::PROJECT_VERSION, project.resolved_version(env));
        bag.insert(keys::PROJECT_STEREOTYPE, project.stereotype().to_string());
        bag.insert_some(keys::PROJECT_EFFECTIVE_VERSION, project.effective_version(env));
        bag.insert(keys::PROJECT_SNAPSHOT, project.is_snapshot(env));

        for (key, value) in [
            (keys::PROJECT_DESCRIPTION, &project.description),
            (keys::PROJECT_LONG_DESCRIPTION, &project.long_description),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                bag.insert(key, ContextValue::pass_through(value));
            }
        }
        bag.insert_non_blank(keys::PROJECT_LICENSE, project.license.as_deref());
        bag.insert_non_blank(keys::PROJECT_INCEPTION_YEAR, project.inception_year.as_deref());
        bag.insert_non_blank(keys::PROJECT_COPYRIGHT, project.copyright.as_deref());
        bag.insert_non_blank(keys::PROJECT_VENDOR, project.vendor.as_deref());

        project.links.fill_props(&mut bag);

        if project.java.is_enabled() {
            project.java.fill_props(&mut bag);
        }

        let extra = project.resolved_extra_properties();
        bag.extend(extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        if let Some(releaser) = self.releaser {
            releaser.fill_identity_props(&mut bag, model, env);
        }

        for (key, _) in &extra {
            let Some(template) = bag
                .get(key)
                .and_then(ContextValue::as_text)
                .filter(|value| contains_placeholder(value))
                .map(str::to_string)
            else {
                continue;
            };
            let rendered = render(&template, &bag)?;
            bag.insert(key.as_str(), rendered);
        }

        bag.insert(
            keys::NOW,
            model.now().to_rfc3339_opts(SecondsFormat::Secs, true),
        );

        debug!(
            entries = bag.len(),
            releaser = self.releaser.map(Releaser::service_name),
            "built template context"
        );
        Ok(bag)
    }
}
