use crate::config::ConfigError;
use crate::template::TemplateError;
use crate::view::ViewError;
use thiserror::Error;

/// Top-level error type for the releaser-model library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("view error: {0}")]
    View(#[from] ViewError),
}
