use std::fmt::Debug;

use super::ConfigError;
use crate::model::ReleaseModel;

/// Produces one configuration fragment.
///
/// `Ok(None)` means the source had nothing to contribute, such as an optional
/// file that does not exist.
pub trait FragmentSource: Debug {
    fn fragment(&self) -> Result<Option<ReleaseModel>, ConfigError>;
}

/// A fragment held in memory as TOML text.
#[derive(Debug, Clone)]
pub struct InlineSource {
    contents: String,
}

impl InlineSource {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }
}

impl FragmentSource for InlineSource {
    fn fragment(&self) -> Result<Option<ReleaseModel>, ConfigError> {
        Ok(Some(toml::from_str(&self.contents)?))
    }
}

/// An already built model used as a fragment.
impl FragmentSource for ReleaseModel {
    fn fragment(&self) -> Result<Option<ReleaseModel>, ConfigError> {
        Ok(Some(self.clone()))
    }
}
