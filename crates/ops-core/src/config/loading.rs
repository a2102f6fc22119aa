//! Reading, writing and merging the persisted configuration file.
//!
//! # Merge Rule
//!
//! The loaded tree is laid over the defaults. Where a top-level key holds a
//! tree on both sides, the two trees are merged one level deep (loaded keys
//! win, defaults fill the gaps). Nothing below that level is merged: a
//! nested tree in the loaded file replaces the default one wholesale.

use crate::config::errors::ConfigError;
use crate::config::types::ConfigTree;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Load a configuration tree from `path`.
///
/// The file must hold a JSON object at the top level.
pub fn load_config_file(path: &Path) -> Result<ConfigTree, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
        path: path.to_path_buf(),
        message: format!("Failed to read file: {}", e),
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
        path: path.to_path_buf(),
        message: format!("Invalid JSON: {}", e),
    })?;

    match value {
        Value::Object(tree) => Ok(tree),
        other => Err(ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: format!(
                "Expected a JSON object at the top level, found {}",
                json_type_name(&other)
            ),
        }),
    }
}

/// Rewrite the whole configuration file with `tree`.
pub fn write_config_file(path: &Path, tree: &ConfigTree) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(tree).map_err(|e| ConfigError::PersistFailed {
        path: path.to_path_buf(),
        message: format!("Failed to serialize configuration: {}", e),
    })?;

    write_atomic(path, json.as_bytes()).map_err(|e| ConfigError::PersistFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(
        event = "core.config.file_written",
        path = %path.display(),
        bytes = json.len()
    );

    Ok(())
}

/// Write `contents` to `path` through a temp file in the same directory.
///
/// The temp file is flushed and synced before it is renamed over `path`, so
/// readers never observe a partial write. On any error the temp file is
/// removed when its handle drops.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Merge a loaded tree over the defaults, one level deep.
///
/// Every top-level key of `defaults` is present in the result.
pub fn merge_configs(defaults: &ConfigTree, loaded: &ConfigTree) -> ConfigTree {
    let mut merged = defaults.clone();

    for (key, loaded_value) in loaded {
        let combined = match (merged.get(key), loaded_value) {
            (Some(Value::Object(default_section)), Value::Object(loaded_section)) => {
                let mut section = default_section.clone();
                for (inner_key, inner_value) in loaded_section {
                    section.insert(inner_key.clone(), inner_value.clone());
                }
                Value::Object(section)
            }
            _ => loaded_value.clone(),
        };
        merged.insert(key.clone(), combined);
    }

    merged
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_tree;
    use serde_json::json;
    use tempfile::TempDir;

    fn tree(value: Value) -> ConfigTree {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_merge_keeps_every_default_key() {
        let defaults = default_tree();
        let loaded = tree(json!({ "monitor": { "refreshInterval": 1 }, "custom": 7 }));

        let merged = merge_configs(&defaults, &loaded);

        for key in defaults.keys() {
            assert!(merged.contains_key(key), "missing default key '{}'", key);
        }
        assert_eq!(merged["custom"], json!(7));
    }

    #[test]
    fn test_merge_empty_loaded_equals_defaults() {
        let defaults = default_tree();
        assert_eq!(merge_configs(&defaults, &ConfigTree::new()), defaults);
    }

    #[test]
    fn test_merge_fills_section_gaps() {
        let defaults = default_tree();
        let loaded = tree(json!({ "monitor": { "refreshInterval": 10 } }));

        let merged = merge_configs(&defaults, &loaded);

        assert_eq!(merged["monitor"]["refreshInterval"], json!(10));
        assert_eq!(merged["monitor"]["showProcesses"], json!(true));
        assert_eq!(merged["monitor"]["maxProcesses"], json!(20));
    }

    #[test]
    fn test_merge_is_shallow_below_first_level() {
        // Documents the one-level merge: q is lost because loaded a.x replaces default a.x
        let defaults = tree(json!({ "a": { "x": { "p": 1, "q": 2 } } }));
        let loaded = tree(json!({ "a": { "x": { "p": 9 } } }));

        let merged = merge_configs(&defaults, &loaded);

        assert_eq!(merged["a"]["x"], json!({ "p": 9 }));
    }

    #[test]
    fn test_merge_non_tree_replaces_section() {
        let defaults = default_tree();
        let loaded = tree(json!({ "ui": "minimal", "logs": ["a"] }));

        let merged = merge_configs(&defaults, &loaded);

        assert_eq!(merged["ui"], json!("minimal"));
        assert_eq!(merged["logs"], json!(["a"]));
    }

    #[test]
    fn test_merge_preserves_default_key_order() {
        let defaults = default_tree();
        let loaded = tree(json!({ "extra": 1, "ui": { "theme": "dark" }, "monitor": {} }));

        let merged = merge_configs(&defaults, &loaded);
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec!["monitor", "logs", "deploy", "system", "ui", "extra"]
        );
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        let mut original = default_tree();
        original.insert("list".to_string(), json!([1, "two", 3.5, null]));

        write_config_file(&path, &original).unwrap();
        let loaded = load_config_file(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
        assert!(result.unwrap_err().to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_load_non_object_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(err.to_string().contains("found an array"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_config_file(&temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn test_write_atomic_replaces_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.json");
        fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        // No temp files left behind
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
