//! Dotted path helpers.

use serde_json::Value;

/// Split a dotted path into segments and a wildcard flag.
///
/// `"a.b.*"` becomes `(["a", "b"], true)`, `"*"` becomes `([], true)` and
/// `""` is the root.
pub fn split_path(path: &str) -> (Vec<String>, bool) {
    if path.is_empty() {
        return (Vec::new(), false);
    }
    if path == "*" {
        return (Vec::new(), true);
    }
    let (body, wildcard) = match path.strip_suffix(".*") {
        Some(body) => (body, true),
        None => (path, false),
    };
    (body.split('.').map(str::to_string).collect(), wildcard)
}

/// Join path segments with dots.
pub fn join_path(segments: &[String]) -> String {
    segments.join(".")
}

/// Read the value at `segments` below `value`.
pub fn value_at<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
