//! Object normalization and merging.
//!
//! [`Normalizer`] turns dirty input into a [`CanonicalObject`], and merges a
//! freshly-normalized object with a previously-normalized one:
//!
//! 1. Normalize both inputs
//! 2. Fill each undefined fresh property from the existing object
//! 3. Overlay the existing network entries onto the fresh network map
//! 4. Default `contractName`
//! 5. Stamp `schemaVersion` and `updatedAt`
//! 6. Carry extensions from both sides, fresh first

use serde_json::Value;

use crate::canonical::CanonicalObject;
use crate::config::{MergeOptions, NormalizerConfig};
use crate::property::keys;
use crate::resolver::{prefixed_entries, resolve_all};
use crate::transform::format_timestamp;

/// Fallback contract name when no input provides one.
pub const DEFAULT_CONTRACT_NAME: &str = "Contract";

/// Normalizes and merges contract objects.
///
/// Holds only immutable configuration, so one instance can be shared
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a dirty object.
    ///
    /// Every declared canonical key gets a slot. `x-` keys are copied over.
    pub fn normalize(&self, dirty: &Value) -> CanonicalObject {
        let mut normalized = CanonicalObject::new();
        for (key, value) in resolve_all(dirty, &self.config.properties) {
            normalized.set(key, value);
        }
        copy_extensions(dirty, &mut normalized);
        normalized
    }

    /// Normalize `dirty` and merge it over `existing`.
    ///
    /// A missing `existing` behaves like an empty object.
    pub fn merge(
        &self,
        dirty: &Value,
        existing: Option<&Value>,
        options: &MergeOptions,
    ) -> CanonicalObject {
        let empty = Value::Object(Default::default());
        let mut merged = self.normalize(dirty);
        let base = self.normalize(existing.unwrap_or(&empty));

        let mut adopted = 0usize;
        for (key, value) in base.properties() {
            if !merged.is_defined(key) {
                if value.is_some() {
                    adopted += 1;
                }
                merged.set(key, value.cloned());
            }
        }

        let overridden = overlay_networks(&mut merged, &base);

        if !merged.is_defined(keys::CONTRACT_NAME) {
            merged.set(keys::CONTRACT_NAME, Some(Value::from(DEFAULT_CONTRACT_NAME)));
        }

        merged.set(
            keys::SCHEMA_VERSION,
            Some(Value::from(self.config.schema_version.as_str())),
        );
        self.stamp_updated_at(&mut merged, options);

        for (key, value) in base.extensions() {
            if !merged.extensions().contains_key(key) {
                merged.insert_extension(key.clone(), value.clone());
            }
        }

        tracing::debug!(
            contract = merged.contract_name().unwrap_or(DEFAULT_CONTRACT_NAME),
            adopted,
            networks_overridden = overridden,
            extensions = merged.extensions().len(),
            "Merged contract object"
        );

        merged
    }

    fn stamp_updated_at(&self, merged: &mut CanonicalObject, options: &MergeOptions) {
        if options.preserves_timestamp() && merged.is_defined(keys::UPDATED_AT) {
            return;
        }
        let now = format_timestamp((self.config.clock)());
        merged.set(keys::UPDATED_AT, Some(Value::String(now)));
    }
}

/// Overwrite fresh network entries with the existing ones, id by id.
///
/// Ids only present in `merged` survive. Returns how many ids came from
/// `base`. Nothing happens unless both network values are objects.
fn overlay_networks(merged: &mut CanonicalObject, base: &CanonicalObject) -> usize {
    let Some(base_networks) = base.networks() else {
        return 0;
    };
    let Some(networks) = merged.networks_mut() else {
        return 0;
    };
    for (id, entry) in base_networks {
        networks.insert(id.clone(), entry.clone());
    }
    base_networks.len()
}

/// Copy defined `x-` keys from a dirty object onto a canonical one.
///
/// `null` values are skipped, as are non-object inputs.
pub fn copy_extensions(from: &Value, to: &mut CanonicalObject) {
    for (key, value) in prefixed_entries(from, keys::EXTENSION_PREFIX) {
        if !value.is_null() {
            to.insert_extension(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(
            NormalizerConfig::default()
                .with_clock(fixed_clock)
                .with_schema_version("1.2.3"),
        )
    }

    #[test]
    fn test_normalize_declares_every_key() {
        let normalized = normalizer().normalize(&json!({}));
        for key in normalizer().config().properties.keys() {
            assert!(normalized.declares(key), "{} missing", key);
        }
        assert_eq!(normalized.get("networks"), Some(&json!({})));
    }

    #[test]
    fn test_merge_stamps_with_clock() {
        let merged = normalizer().merge(&json!({}), None, &MergeOptions::default());
        assert_eq!(merged.updated_at(), Some("2024-01-02T03:04:05.000Z"));
        assert_eq!(merged.schema_version(), Some("1.2.3"));
        assert_eq!(merged.contract_name(), Some(DEFAULT_CONTRACT_NAME));
    }

    #[test]
    fn test_merge_clean_keeps_base_timestamp() {
        let existing = json!({"updatedAt": "2017-01-01T00:00:00.000Z"});
        let merged = normalizer().merge(&json!({}), Some(&existing), &MergeOptions::clean());
        assert_eq!(merged.updated_at(), Some("2017-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_merge_clean_prefers_fresh_timestamp() {
        let dirty = json!({"updatedAt": "2018-01-01T00:00:00.000Z"});
        let existing = json!({"updatedAt": "2017-01-01T00:00:00.000Z"});
        let merged = normalizer().merge(&dirty, Some(&existing), &MergeOptions::clean());
        assert_eq!(merged.updated_at(), Some("2018-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_merge_overlays_scalar_networks_untouched() {
        let merged = normalizer().merge(
            &json!({"networks": 5}),
            Some(&json!({"networks": {"1": {}}})),
            &MergeOptions::default(),
        );
        assert_eq!(merged.get("networks"), Some(&json!(5)));
    }

    #[test]
    fn test_copy_extensions_skips_null() {
        let mut object = CanonicalObject::new();
        copy_extensions(&json!({"x-a": null, "x-b": 0, "y": 1}), &mut object);
        assert_eq!(object.extensions().len(), 1);
        assert_eq!(object.get("x-b"), Some(&json!(0)));
    }
}
