use serde_json::Value;
use sha2::{Digest, Sha256};

/// Compute a SHA-256 fingerprint of a response body.
///
/// The body is serialised to a canonical JSON string with object keys sorted,
/// so two bodies that differ only in member order fingerprint identically.
/// The compare pipeline uses this as a fast pre-check: equal fingerprints
/// mean the structural engine can be skipped entirely for the pair.
pub fn fingerprint(body: &Value) -> String {
    let canonical = canonicalize(body);
    let content = serde_json::to_string(&canonical).unwrap_or_default();
    let hash = Sha256::digest(content.as_bytes());
    format!("{:x}", hash)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(k, _)| *k);
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonicalize(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(canonicalize).collect()),
        _ => value.clone(),
    }
}
