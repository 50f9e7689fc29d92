//! The template context: an ordered property bag and the builder that
//! populates it from a merged model.

mod bag;
mod builder;
pub mod keys;

pub use bag::{ContextBag, ContextValue};
pub use builder::ContextBuilder;
