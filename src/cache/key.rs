//! Cache key derivation.
//!
//! A query is identified by its collection id and the parameters that shape
//! the upstream request. Both are folded into one canonical JSON text, hashed
//! with SHA-256, and namespaced as `gallery:{collection_id}:{digest}`.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Prefix shared by every gallery cache key.
pub const KEY_PREFIX: &str = "gallery";

/// Derive the cache key for a query against `collection_id`.
///
/// `params` is normally a JSON object. Object keys are serialized in sorted
/// order, and top-level `null` fields are dropped so that a missing field and
/// an explicit `null` produce the same key. Nested values are kept as given.
pub fn derive_cache_key(collection_id: &str, params: &Value) -> String {
    let canonical = canonical_form(collection_id, params);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hex::encode(hasher.finalize());

    format!("{KEY_PREFIX}:{collection_id}:{digest}")
}

/// Build the text that gets hashed.
fn canonical_form(collection_id: &str, params: &Value) -> String {
    let params = match params {
        Value::Object(map) => sorted_object(map.iter().filter(|(_, v)| !v.is_null())),
        other => sorted(other),
    };

    let mut root = Map::new();
    root.insert("collection".to_string(), Value::String(collection_id.to_string()));
    root.insert("params".to_string(), params);
    Value::Object(root).to_string()
}

/// Rebuild `value` with every object's keys inserted in sorted order.
///
/// Rendering then follows key order whether or not serde_json's
/// `preserve_order` feature is enabled somewhere in the build.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => sorted_object(map.iter()),
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn sorted_object<'a>(fields: impl Iterator<Item = (&'a String, &'a Value)>) -> Value {
    let mut fields: Vec<_> = fields.collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.clone(), sorted(v)))
            .collect::<Map<String, Value>>(),
    )
}
