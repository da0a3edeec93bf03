//! Field-by-field merging of configuration tiers.
//!
//! Higher tiers override lower ones key by key. Lists are replaced whole, so
//! a user tier's `plugin_dirs` replaces the system list rather than extending it.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans, nulls are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use resource_env::config::deep_merge;
///
/// let base = json!({
///     "engine": { "environment_dir": "/etc/env.d", "plugin_dirs": ["/usr/lib/heat"] }
/// });
/// let overlay = json!({
///     "engine": { "environment_dir": "/srv/env.d" }
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["engine"]["environment_dir"], json!("/srv/env.d"));
/// assert_eq!(result["engine"]["plugin_dirs"], json!(["/usr/lib/heat"]));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both are objects: merge recursively
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        // Overlay is null: preserve base (null means "not specified")
        (base, Value::Null) => base,
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
///
/// Equivalent to folding `deep_merge` over the list.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_key_wins() {
        let base = json!({"engine": {"environment_dir": "/etc/env.d"}});
        let overlay = json!({"engine": {"environment_dir": "/srv/env.d"}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"engine": {"environment_dir": "/srv/env.d"}})
        );
    }

    #[test]
    fn test_sibling_keys_kept() {
        let base = json!({"engine": {"environment_dir": "/etc/env.d", "plugin_dirs": ["/a"]}});
        let overlay = json!({"engine": {"plugin_dirs": ["/b"]}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"engine": {"environment_dir": "/etc/env.d", "plugin_dirs": ["/b"]}})
        );
    }

    #[test]
    fn test_lists_replaced() {
        let base = json!({"plugin_dirs": ["/usr/lib64/heat", "/usr/lib/heat"]});
        let overlay = json!({"plugin_dirs": ["/opt/heat"]});
        assert_eq!(deep_merge(base, overlay), json!({"plugin_dirs": ["/opt/heat"]}));
    }

    #[test]
    fn test_null_overlay_keeps_base() {
        let base = json!({"engine": {"environment_dir": "/etc/env.d"}});
        let overlay = json!({"engine": {"environment_dir": null}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({"engine": {"environment_dir": "/etc/env.d"}})
        );
    }

    #[test]
    fn test_merge_all_in_tier_order() {
        let tiers = vec![
            json!({"engine": {"environment_dir": "/default", "plugin_dirs": []}}),
            json!({"engine": {"environment_dir": "/system"}}),
            json!({"engine": {"plugin_dirs": ["/user"]}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"engine": {"environment_dir": "/system", "plugin_dirs": ["/user"]}})
        );
    }

    #[test]
    fn test_scalar_replaced_by_mapping() {
        let base = json!({"engine": "legacy"});
        let overlay = json!({"engine": {"environment_dir": "/srv"}});
        assert_eq!(deep_merge(base, overlay), json!({"engine": {"environment_dir": "/srv"}}));
    }
}
