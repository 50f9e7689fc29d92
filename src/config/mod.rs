//! Configuration loading: TOML fragments, variables and environment
//! overrides.

mod builder;
pub mod env;
mod error;
mod file;
mod source;

pub use builder::ModelLoader;
pub use error::ConfigError;
pub use file::{load_variables, FileSource};
pub use source::{FragmentSource, InlineSource};
