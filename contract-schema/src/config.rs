//! Merge options and normalizer configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::property::PropertyTable;

/// Version stamped into `schemaVersion` by default.
pub const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for [`merge`](crate::merge).
///
/// # Example
///
/// ```rust,ignore
/// // Keep an existing `updatedAt` instead of stamping a new one
/// let options: MergeOptions = serde_json::from_str(r#"{"dirty": false}"#)?;
/// let merged = merge(&fresh, Some(&existing), &options);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Whether the object changed. Only an explicit `false` preserves a
    /// prior `updatedAt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,
}

impl MergeOptions {
    /// Options that mark the object unchanged.
    pub fn clean() -> Self {
        Self { dirty: Some(false) }
    }

    /// Options that mark the object changed.
    pub fn dirty() -> Self {
        Self { dirty: Some(true) }
    }

    /// Whether a prior `updatedAt` should survive the merge
    pub fn preserves_timestamp(&self) -> bool {
        self.dirty == Some(false)
    }
}

/// Clock used for `updatedAt` stamping.
pub type Clock = fn() -> DateTime<Utc>;

/// Explicit configuration for a [`Normalizer`](crate::Normalizer).
///
/// Replaces ambient state: the property table, the stamped schema version
/// and the clock are all fixed at construction.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Canonical properties to resolve
    pub properties: PropertyTable,
    /// Value stamped into `schemaVersion` on merge
    pub schema_version: String,
    /// Source of the current time for `updatedAt`
    pub clock: Clock,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            properties: PropertyTable::contract(),
            schema_version: SCHEMA_VERSION.to_string(),
            clock: Utc::now,
        }
    }
}

impl NormalizerConfig {
    /// Builder: replace the property table.
    pub fn with_properties(mut self, properties: PropertyTable) -> Self {
        self.properties = properties;
        self
    }

    /// Builder: set the stamped schema version.
    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    /// Builder: set the clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_options_preserves_timestamp() {
        assert!(!MergeOptions::default().preserves_timestamp());
        assert!(!MergeOptions::dirty().preserves_timestamp());
        assert!(MergeOptions::clean().preserves_timestamp());
    }

    #[test]
    fn test_merge_options_deserialize() {
        let options: MergeOptions = serde_json::from_str(r#"{"dirty": false}"#).unwrap();
        assert_eq!(options, MergeOptions::clean());

        let options: MergeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.dirty, None);
    }

    #[test]
    fn test_config_defaults() {
        let config = NormalizerConfig::default();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.properties.len(), 12);
    }
}
