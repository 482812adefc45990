// ─── Version Resolver ───
// Inheritance merging for version descriptors. Mod loaders publish child
// descriptors with `inheritsFrom`; the merged result must be free of that
// key and carry parent libraries first.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;

use crate::error::{LauncherError, LauncherResult};

use super::descriptor::VersionDescriptor;

/// Path of a version's saved descriptor: `versions/<id>/<id>.json`.
pub fn descriptor_path(install_dir: &Path, version_id: &str) -> PathBuf {
    install_dir
        .join("versions")
        .join(version_id)
        .join(format!("{version_id}.json"))
}

/// Load a version JSON already present on disk, if any.
pub async fn load_local(install_dir: &Path, version_id: &str) -> LauncherResult<Option<Value>> {
    let path = descriptor_path(install_dir, version_id);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)
        .await
        .map_err(|e| LauncherError::Io {
            path: path.clone(),
            source: e,
        })?;
    let value = serde_json::from_str(&raw)?;
    Ok(Some(value))
}

/// Merge a child descriptor onto its resolved parent.
///
/// The child's `libraries` are appended after the parent's (mod loaders add
/// their own libraries on top of vanilla); every other child key overrides
/// the parent's same-named key by shallow replacement. `inheritsFrom` never
/// survives into the result. The merge is pure, so resolving the same
/// version twice yields an identical descriptor.
pub fn merge_with_parent(parent: &Value, child: &Value) -> Value {
    let mut merged = parent.clone();

    if let (Some(merged_obj), Some(child_obj)) = (merged.as_object_mut(), child.as_object()) {
        for (key, value) in child_obj {
            match key.as_str() {
                "inheritsFrom" => continue,
                "libraries" => {
                    let mut libraries = merged_obj
                        .get("libraries")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default();
                    if let Some(child_libraries) = value.as_array() {
                        libraries.extend(child_libraries.iter().cloned());
                    }
                    merged_obj.insert("libraries".to_string(), Value::Array(libraries));
                }
                _ => {
                    merged_obj.insert(key.clone(), value.clone());
                }
            }
        }
    }

    if let Some(obj) = merged.as_object_mut() {
        obj.remove("inheritsFrom");
    }

    merged
}

/// Parse a (merged) descriptor JSON into the typed model.
pub fn parse_descriptor(value: &Value) -> LauncherResult<VersionDescriptor> {
    Ok(serde_json::from_value(value.clone())?)
}
