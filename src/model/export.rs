//! Helpers for the ordered `as_map` export.

use serde_json::{Map, Value};

/// Marker exported for a secret that is set.
pub const HIDE: &str = "************";

/// Marker exported for a secret that is absent.
pub const UNSET: &str = "**unset**";

pub(crate) fn secret(value: Option<&str>) -> Value {
    match value {
        Some(v) if !v.trim().is_empty() => Value::from(HIDE),
        _ => Value::from(UNSET),
    }
}

pub(crate) fn opt<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

pub(crate) fn display<T: ToString>(value: Option<&T>) -> Value {
    value.map(|v| Value::from(v.to_string())).unwrap_or(Value::Null)
}

pub(crate) fn string_map<'a>(entries: impl IntoIterator<Item = (&'a String, &'a String)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect(),
    )
}

/// Drops null entries unless a full export was requested.
pub(crate) fn finish(mut map: Map<String, Value>, full: bool) -> Map<String, Value> {
    if !full {
        map.retain(|_, value| !value.is_null());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_markers() {
        assert_eq!(secret(Some("abc123")), Value::from(HIDE));
        assert_eq!(secret(None), Value::from(UNSET));
        assert_eq!(secret(Some("")), Value::from(UNSET));
    }

    #[test]
    fn test_finish_drops_nulls() {
        let mut map = Map::new();
        map.insert("a".into(), Value::Null);
        map.insert("b".into(), Value::from(1));
        assert_eq!(finish(map.clone(), true).len(), 2);
        assert_eq!(finish(map, false).len(), 1);
    }
}
