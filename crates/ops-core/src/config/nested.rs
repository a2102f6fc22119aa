//! Dotted-path access into a configuration tree.
//!
//! `"monitor.refreshInterval"` addresses the `refreshInterval` key of the
//! `monitor` tree. A missing key is a normal answer (`None`), not an error.

use crate::config::types::ConfigTree;
use serde_json::Value;
use tracing::warn;

/// Split a dotted path into segments.
///
/// Returns `None` for an empty path or one with an empty segment (`"a..b"`,
/// `".a"`), since neither names a key that can be assigned.
pub fn split_path(path: &str) -> Option<Vec<&str>> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Resolve `path` against `tree`.
///
/// Returns `None` if any segment is missing or an intermediate value is not
/// a tree.
pub fn get_path<'a>(tree: &'a ConfigTree, path: &str) -> Option<&'a Value> {
    let segments = split_path(path)?;
    let (first, rest) = segments.split_first()?;

    let mut current = tree.get(*first)?;
    for segment in rest {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Assign `value` at `path`, creating intermediate trees as needed.
///
/// The terminal key is overwritten unconditionally, including a change of
/// type. An intermediate that exists but is not a tree is replaced by an
/// empty tree. Returns `false` (tree untouched) when the path is invalid.
pub fn set_path(tree: &mut ConfigTree, path: &str, value: Value) -> bool {
    let Some(segments) = split_path(path) else {
        warn!(
            event = "core.config.set_path_rejected",
            path = path,
            "Configuration path has no terminal key - nothing assigned"
        );
        return false;
    };
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = tree;
    for segment in parents {
        let entry = current
            .entry(*segment)
            .or_insert_with(|| Value::Object(ConfigTree::new()));
        if !entry.is_object() {
            *entry = Value::Object(ConfigTree::new());
        }
        let Value::Object(next) = entry else {
            return false;
        };
        current = next;
    }

    current.insert((*last).to_string(), value);
    true
}
