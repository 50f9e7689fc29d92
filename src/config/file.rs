//! File-based configuration sources.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::source::FragmentSource;
use super::ConfigError;
use crate::model::ReleaseModel;

/// A fragment loaded from a TOML file.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, the build will fail if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl FragmentSource for FileSource {
    fn fragment(&self) -> Result<Option<ReleaseModel>, ConfigError> {
        let Some(contents) = read_file(&self.path, self.required)? else {
            return Ok(None);
        };
        let model = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        debug!(path = %self.path.display(), "loaded config fragment");
        Ok(Some(model))
    }
}

/// Loads a flat TOML table of variables, rendering every scalar as a string.
pub fn load_variables(
    path: &Path,
    required: bool,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let Some(contents) = read_file(path, required)? else {
        return Ok(BTreeMap::new());
    };
    let table: toml::Table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    table
        .into_iter()
        .map(|(key, value)| match value_to_string(value) {
            Some(value) => Ok((key, value)),
            None => Err(ConfigError::NonScalarVariable {
                path: path.to_path_buf(),
                key,
            }),
        })
        .collect()
}

fn value_to_string(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(dt) => Some(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Reads a file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn read_file(path: &Path, required: bool) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
