//! Deep merge and `${VAR}` interpolation for JSON config documents.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Perform a deep merge of two JSON values.
///
/// Objects merge key by key, recursing into keys present on both sides. Arrays
/// and scalars in `overlay` replace whatever `base` held; arrays are never
/// concatenated. Keys keep their first-seen position, new keys are appended.
///
/// # Examples
///
/// ```rust,no_run
/// use serde_json::json;
/// use composer_devkit::config::deep_merge;
///
/// let base = json!({ "brand": { "name": "Acme", "slug": "acme" }, "tags": ["a"] });
/// let overlay = json!({ "brand": { "slug": "acme-x" }, "tags": ["b"] });
///
/// let merged = deep_merge(base, overlay);
/// assert_eq!(merged, json!({ "brand": { "name": "Acme", "slug": "acme-x" }, "tags": ["b"] }));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value.take(), overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge layers in order; the first is the base, the last has highest precedence.
pub fn merge_layers<I>(layers: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    layers
        .into_iter()
        .fold(Value::Object(serde_json::Map::new()), deep_merge)
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Replace `${VAR}` placeholders in every string leaf of `value`.
///
/// Lookup order is `vars` first, then the process environment. Placeholders
/// that resolve to nothing are left as written. Object keys are not touched.
pub fn interpolate(value: &mut Value, vars: &HashMap<String, String>) {
    match value {
        Value::String(s) => {
            if let Some(replaced) = interpolate_str(s, vars) {
                *s = replaced;
            }
        }
        Value::Array(items) => {
            for item in items {
                interpolate(item, vars);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                interpolate(item, vars);
            }
        }
        _ => {}
    }
}

/// Returns `None` when the string holds no placeholder.
fn interpolate_str(input: &str, vars: &HashMap<String, String>) -> Option<String> {
    let pattern = placeholder_pattern();
    if !pattern.is_match(input) {
        return None;
    }

    let replaced = pattern.replace_all(input, |caps: &Captures<'_>| {
        let name = &caps[1];
        vars.get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
            .unwrap_or_else(|| {
                tracing::debug!("Leaving unresolved placeholder ${{{name}}} in config");
                caps[0].to_string()
            })
    });
    Some(replaced.into_owned())
}
