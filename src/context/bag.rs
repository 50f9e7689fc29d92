use std::collections::HashMap;
use std::fmt;

/// A value stored in a [`ContextBag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    Text(String),
    /// Rich text (descriptions and the like) inserted verbatim and never
    /// re-rendered as a template.
    PassThrough(String),
    Integer(i64),
    Bool(bool),
}

impl ContextValue {
    pub fn pass_through(value: impl Into<String>) -> Self {
        ContextValue::PassThrough(value.into())
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, ContextValue::PassThrough(_))
    }

    /// Returns the string of a plain text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContextValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Text(s) | ContextValue::PassThrough(s) => f.write_str(s),
            ContextValue::Integer(i) => write!(f, "{i}"),
            ContextValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<&String> for ContextValue {
    fn from(value: &String) -> Self {
        ContextValue::Text(value.clone())
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Integer(value)
    }
}

impl From<u64> for ContextValue {
    fn from(value: u64) -> Self {
        ContextValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

/// Ordered property bag used as the substitution source for templates.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// the position of the first insertion, so iteration order reflects when a
/// key first appeared while lookups see the last writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextBag {
    entries: Vec<(String, ContextValue)>,
    index: HashMap<String, usize>,
}

impl ContextBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ContextValue>,
    ) -> Option<ContextValue> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Inserts the value only when it is present.
    pub fn insert_some<V: Into<ContextValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Inserts a string only when it is present and not blank.
    pub fn insert_non_blank(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> Extend<(K, V)> for ContextBag
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ContextBag
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ContextBag::new();
        bag.extend(iter);
        bag
    }
}
