//! Release configuration model with layered merging and lazy template
//! resolution.
//!
//! Configuration fragments are loaded with [`ModelLoader`] and merged into a
//! single [`ReleaseModel`]. String fields such as tag names and repository
//! URLs may hold `{{key}}` placeholders; they are resolved on demand against a
//! context built from the whole model, with `JRELEASER_*` environment
//! variables taking precedence over configured values.
//!
//! ```no_run
//! use releaser_model::{ModelLoader, SystemEnv};
//!
//! let model = ModelLoader::builder()
//!     .with_file("jreleaser.toml", true)
//!     .build()?;
//!
//! if let Some(releaser) = model.releaser() {
//!     let tag = releaser.resolved_tag_name(&model, &SystemEnv)?;
//!     println!("tagging {tag}");
//! }
//! # Ok::<(), releaser_model::Error>(())
//! ```

pub mod config;
pub mod context;
mod error;
pub mod merge;
pub mod model;
pub mod template;
pub mod view;

pub use config::env::{EnvProvider, MapEnv, SystemEnv};
pub use config::{ConfigError, ModelLoader};
pub use context::{ContextBag, ContextBuilder, ContextValue};
pub use error::Error;
pub use merge::Mergeable;
pub use model::{ReleaseModel, Releaser, ReleaserKind};
pub use template::{render, TemplateError};
pub use view::{Immutable, Snapshot, ViewError};
