//! Hashing System - SHA-256 for Image Manifests
//!
//! Same seed and same resolved configuration must give the same digest on
//! every machine; manifests record enough to regenerate an image.

use serde::{Deserialize, Serialize};
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

use crate::config::ResolvedConfig;
use crate::ENGINE_VERSION;

/// Compute SHA-256 hash of bytes, return hex string
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Convert to canonical JSON (sorted keys, no whitespace)
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut sorted: Vec<_> = map.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sort_value(v)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Record of one generated image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageManifest {
    pub seed: i64,
    pub engine_version: String,
    pub config: ResolvedConfig,
    pub svg_sha256: String,
}

impl ImageManifest {
    pub fn new(seed: i64, config: ResolvedConfig, svg: &str) -> Self {
        Self {
            seed,
            engine_version: ENGINE_VERSION.to_string(),
            config,
            svg_sha256: sha256_hex(svg.as_bytes()),
        }
    }
}

/// Hash of the canonical manifest JSON
pub fn compute_manifest_hash(manifest: &ImageManifest) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(manifest)?;
    Ok(sha256_hex(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_config, PixelflyOptions};
    use serde_json::json;

    #[test]
    fn test_canonical_json_sorted() {
        let obj = json!({"z": 1, "a": 2, "m": {"y": 1, "b": 2}});
        let canonical = canonical_json(&obj).unwrap();
        assert_eq!(canonical, r#"{"a":2,"m":{"b":2,"y":1},"z":1}"#);
    }

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_manifest_hash_tracks_content() {
        let config = resolve_config(&PixelflyOptions::default());
        let a = ImageManifest::new(1, config.clone(), "<svg></svg>");
        let b = ImageManifest::new(1, config.clone(), "<svg></svg>");
        let c = ImageManifest::new(2, config, "<svg></svg>");
        assert_eq!(compute_manifest_hash(&a).unwrap(), compute_manifest_hash(&b).unwrap());
        assert_ne!(compute_manifest_hash(&a).unwrap(), compute_manifest_hash(&c).unwrap());
    }
}
