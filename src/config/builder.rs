use std::path::{Path, PathBuf};

use tracing::debug;

use super::file::{load_variables, FileSource};
use super::source::{FragmentSource, InlineSource};
use super::ConfigError;
use crate::merge::Mergeable;
use crate::model::ReleaseModel;

/// Builder for loading a release model from configuration fragments.
///
/// Fragments are merged in registration order, with later fragments
/// overriding earlier ones. A value set in a later fragment always wins; a
/// value it leaves unset falls through to earlier fragments and finally to the
/// built-in defaults.
///
/// ## Example
///
/// ```no_run
/// use releaser_model::ModelLoader;
///
/// let model = ModelLoader::builder()
///     .with_file("jreleaser.toml", true)
///     .with_file("jreleaser.local.toml", false)
///     .with_variables("variables.toml", false)
///     .build()?;
/// # Ok::<(), releaser_model::ConfigError>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ModelLoader {
    sources: Vec<Box<dyn FragmentSource>>,
    variables: Option<(PathBuf, bool)>,
    defaults: bool,
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            variables: None,
            defaults: true,
        }
    }
}

impl ModelLoader {
    /// Creates a new loader.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds a fragment given as TOML text.
    pub fn with_toml(self, contents: impl Into<String>) -> Self {
        self.with_source(InlineSource::new(contents))
    }

    pub fn with_source(mut self, source: impl FragmentSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Reads a flat TOML table into `environment.sourcedProperties`.
    pub fn with_variables(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.variables = Some((path.as_ref().to_path_buf(), required));
        self
    }

    /// Skips the built-in releaser defaults.
    pub fn without_defaults(mut self) -> Self {
        self.defaults = false;
        self
    }

    /// Loads, merges and normalizes all fragments.
    pub fn build(self) -> Result<ReleaseModel, ConfigError> {
        let mut fragments = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            if let Some(fragment) = source.fragment()? {
                fragments.push(fragment);
            }
        }
        debug!(
            registered = self.sources.len(),
            loaded = fragments.len(),
            "merging config fragments"
        );

        let mut model = ReleaseModel::default();
        for fragment in fragments.iter().rev() {
            model.merge(fragment);
        }
        model.normalize();

        if self.defaults {
            model.apply_defaults();
        }

        if let Some((path, required)) = &self.variables {
            let variables = load_variables(path, *required)?;
            debug!(path = %path.display(), count = variables.len(), "loaded variables");
            model.environment.sourced_properties.extend(variables);
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReleaserKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_later_fragment_wins() {
        let model = ModelLoader::builder()
            .with_toml("[project]\nname = \"base\"\nversion = \"1.0.0\"")
            .with_toml("[project]\nname = \"override\"")
            .build()
            .unwrap();

        assert_eq!(model.project.name.as_deref(), Some("override"));
        assert_eq!(model.project.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_defaults_are_lowest() {
        let model = ModelLoader::builder()
            .with_toml("[release.github]\nowner = \"acme\"\nbranch = \"develop\"")
            .build()
            .unwrap();

        let releaser = model.releaser().unwrap();
        assert_eq!(releaser.kind(), ReleaserKind::Github);
        assert_eq!(releaser.branch.as_deref(), Some("develop"));
        assert_eq!(releaser.tag_name.as_deref(), Some("v{{projectVersion}}"));
    }

    #[test]
    fn test_without_defaults() {
        let model = ModelLoader::builder()
            .with_toml("[release.github]\nowner = \"acme\"")
            .without_defaults()
            .build()
            .unwrap();

        assert_eq!(model.releaser().unwrap().tag_name, None);
    }

    #[test]
    fn test_optional_file_skipped() {
        let model = ModelLoader::builder()
            .with_file("/nonexistent/jreleaser.toml", false)
            .with_toml("[project]\nname = \"widget\"")
            .build()
            .unwrap();
        assert_eq!(model.project.name.as_deref(), Some("widget"));
    }

    #[test]
    fn test_required_file_missing() {
        let result = ModelLoader::builder()
            .with_file("/nonexistent/jreleaser.toml", true)
            .build();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_variables_become_sourced_properties() {
        let mut vars = NamedTempFile::new().unwrap();
        writeln!(vars, "channel = \"stable\"").unwrap();

        let model = ModelLoader::builder()
            .with_toml("[project]\nname = \"widget\"")
            .with_variables(vars.path(), true)
            .build()
            .unwrap();

        assert_eq!(
            model
                .environment
                .sourced_properties
                .get("channel")
                .map(String::as_str),
            Some("stable")
        );
    }

    #[test]
    fn test_model_as_source() {
        let mut base = ReleaseModel::default();
        base.project.name = Some("from-model".into());

        let model = ModelLoader::builder()
            .with_source(base)
            .with_toml("[project]\nversion = \"2.0.0\"")
            .build()
            .unwrap();
        assert_eq!(model.project.name.as_deref(), Some("from-model"));
        assert_eq!(model.project.version.as_deref(), Some("2.0.0"));
    }
}
