//! Dotted-path lookup into untyped config trees.

use serde_json::Value;

/// Look up `path` (e.g. `"brand.data.slug"`) in `value`.
///
/// Each segment must name a key of an object; any other shape along the way
/// yields `None`. An empty path returns `value` itself.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Like [`lookup`], but only returns non-empty strings.
pub fn lookup_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str).filter(|s| !s.is_empty())
}
