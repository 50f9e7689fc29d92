//! Read-only views over merged model nodes.
//!
//! A view borrows its node: scalar reads delegate to it, collection reads
//! return a fresh [`Snapshot`] on every call.

mod deploy;
mod project;
mod release;

use std::ops::Deref;

use thiserror::Error;

pub use deploy::MavenDeployerView;
pub use project::{JavaView, LinksView, ProjectView, SnapshotView};
pub use release::{
    CommitAuthorView, IssuesView, LabelView, MilestoneView, PrereleaseView, ReleaserView,
    UpdateView,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViewError {
    #[error("unsupported operation on a read-only snapshot: {operation}")]
    UnsupportedOperation { operation: &'static str },
}

/// A defensive copy of a collection, readable through `Deref`.
///
/// The mutators exist so callers that try to modify an exposed collection get
/// an explicit error instead of silently editing a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<C> {
    inner: C,
}

impl<C> Snapshot<C> {
    pub(crate) fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    pub fn insert<K, V>(&mut self, _key: K, _value: V) -> Result<(), ViewError> {
        Err(unsupported("insert"))
    }

    pub fn push<T>(&mut self, _value: T) -> Result<(), ViewError> {
        Err(unsupported("push"))
    }

    pub fn remove<K>(&mut self, _key: K) -> Result<(), ViewError> {
        Err(unsupported("remove"))
    }

    pub fn clear(&mut self) -> Result<(), ViewError> {
        Err(unsupported("clear"))
    }
}

impl<C> Deref for Snapshot<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<'a, C> IntoIterator for &'a Snapshot<C>
where
    &'a C: IntoIterator,
{
    type Item = <&'a C as IntoIterator>::Item;
    type IntoIter = <&'a C as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

fn unsupported(operation: &'static str) -> ViewError {
    ViewError::UnsupportedOperation { operation }
}

/// A node that can hand out a read-only view of itself.
pub trait Immutable {
    type View<'a>
    where
        Self: 'a;

    fn as_immutable(&self) -> Self::View<'_>;
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_snapshot_reads() {
        let snapshot = Snapshot::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0], "a");
        assert_eq!((&snapshot).into_iter().count(), 2);
    }

    #[test]
    fn test_snapshot_rejects_mutation() {
        let mut snapshot = Snapshot::new(BTreeMap::<String, String>::new());
        assert_eq!(
            snapshot.insert("k", "v"),
            Err(ViewError::UnsupportedOperation { operation: "insert" })
        );
        assert_eq!(
            snapshot.clear(),
            Err(ViewError::UnsupportedOperation { operation: "clear" })
        );
        assert!(snapshot.remove("k").is_err());
        assert!(snapshot.push("k").is_err());
        assert!(snapshot.is_empty());
    }
}
