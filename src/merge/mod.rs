//! Fragment merging.
//!
//! Merging is override-if-unset: `target.merge(&source)` only fills what the
//! target leaves unset, so the fragment with the highest precedence is the
//! target and lower layers are merged into it one after another.
//!
//! - scalars (`Option<T>`): keep the target's value when set
//! - nested nodes: merged recursively, absent ones deep-cloned from the source
//! - enum sets: union
//! - plain lists: replaced wholesale by the source only when the target is empty
//! - string maps: per-key override-if-unset
//!
//! Merging never fails and `x.merge(&x.clone())` leaves `x` unchanged.

use std::collections::{BTreeMap, BTreeSet};

/// A configuration node that can absorb a lower-precedence fragment.
pub trait Mergeable {
    fn merge(&mut self, source: &Self);
}

pub fn merge_scalar<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_none() {
        target.clone_from(source);
    }
}

pub fn merge_nested<T: Mergeable + Clone>(target: &mut Option<T>, source: &Option<T>) {
    match (target.as_mut(), source) {
        (Some(existing), Some(source)) => existing.merge(source),
        (None, Some(_)) => target.clone_from(source),
        _ => {}
    }
}

pub fn merge_set<T: Ord + Clone>(target: &mut BTreeSet<T>, source: &BTreeSet<T>) {
    target.extend(source.iter().cloned());
}

pub fn merge_list<T: Clone>(target: &mut Vec<T>, source: &[T]) {
    if target.is_empty() {
        target.extend_from_slice(source);
    }
}

pub fn merge_map<V: Clone>(target: &mut BTreeMap<String, V>, source: &BTreeMap<String, V>) {
    for (key, value) in source {
        target.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

/// Merges named nodes pairwise; names missing from the target are cloned in.
pub fn merge_named<T: Mergeable + Clone>(
    target: &mut BTreeMap<String, T>,
    source: &BTreeMap<String, T>,
) {
    for (name, node) in source {
        match target.get_mut(name) {
            Some(existing) => existing.merge(node),
            None => {
                target.insert(name.clone(), node.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Node {
        name: Option<String>,
        flag: Option<bool>,
        child: Option<Box<Node>>,
    }

    impl Mergeable for Node {
        fn merge(&mut self, source: &Self) {
            merge_scalar(&mut self.name, &source.name);
            merge_scalar(&mut self.flag, &source.flag);
            if self.child.is_none() {
                self.child.clone_from(&source.child);
            } else if let (Some(child), Some(source_child)) =
                (self.child.as_mut(), source.child.as_ref())
            {
                child.merge(source_child);
            }
        }
    }

    #[test]
    fn test_scalar_unset_takes_source() {
        let mut target: Option<String> = None;
        merge_scalar(&mut target, &Some("v".to_string()));
        assert_eq!(target.as_deref(), Some("v"));
    }

    #[test]
    fn test_scalar_set_is_kept() {
        let mut target = Some("v0".to_string());
        merge_scalar(&mut target, &Some("v".to_string()));
        assert_eq!(target.as_deref(), Some("v0"));

        // set-false is a value, not a hole
        let mut flag = Some(false);
        merge_scalar(&mut flag, &Some(true));
        assert_eq!(flag, Some(false));
    }

    #[test]
    fn test_nested_clone_is_independent() {
        let source = Some(Node {
            name: Some("child".into()),
            ..Node::default()
        });
        let mut target: Option<Node> = None;
        merge_nested(&mut target, &source);

        target.as_mut().unwrap().name = Some("changed".into());
        assert_eq!(source.unwrap().name.as_deref(), Some("child"));
    }

    #[test]
    fn test_nested_recurses() {
        let mut target = Some(Node {
            name: Some("kept".into()),
            ..Node::default()
        });
        let source = Some(Node {
            name: Some("ignored".into()),
            flag: Some(true),
            child: Some(Box::new(Node::default())),
        });
        merge_nested(&mut target, &source);

        let target = target.unwrap();
        assert_eq!(target.name.as_deref(), Some("kept"));
        assert_eq!(target.flag, Some(true));
        assert!(target.child.is_some());
    }

    #[test]
    fn test_set_union() {
        let mut target = BTreeSet::from(['A', 'B']);
        merge_set(&mut target, &BTreeSet::from(['B', 'C']));
        assert_eq!(target, BTreeSet::from(['A', 'B', 'C']));
    }

    #[test]
    fn test_list_replaced_only_when_empty() {
        let mut empty: Vec<&str> = Vec::new();
        merge_list(&mut empty, &["a", "b"]);
        assert_eq!(empty, vec!["a", "b"]);

        let mut set = vec!["x"];
        merge_list(&mut set, &["a", "b"]);
        assert_eq!(set, vec!["x"]);
    }

    #[test]
    fn test_map_per_key() {
        let mut target = BTreeMap::from([("a".to_string(), 1)]);
        merge_map(&mut target, &BTreeMap::from([("a".to_string(), 9), ("b".to_string(), 2)]));
        assert_eq!(target, BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]));
    }

    #[test]
    fn test_named() {
        let mut target = BTreeMap::from([(
            "app".to_string(),
            Node {
                name: Some("a".into()),
                ..Node::default()
            },
        )]);
        let source = BTreeMap::from([
            (
                "app".to_string(),
                Node {
                    flag: Some(true),
                    ..Node::default()
                },
            ),
            ("lib".to_string(), Node::default()),
        ]);
        merge_named(&mut target, &source);

        assert_eq!(target.len(), 2);
        assert_eq!(target["app"].name.as_deref(), Some("a"));
        assert_eq!(target["app"].flag, Some(true));
    }

    #[test]
    fn test_idempotent() {
        let original = Node {
            name: Some("n".into()),
            flag: None,
            child: Some(Box::new(Node {
                flag: Some(false),
                ..Node::default()
            })),
        };
        let mut merged = original.clone();
        merged.merge(&original);
        assert_eq!(merged, original);
    }
}
