//! Contract metadata normalization for the Elohim Protocol
//!
//! Contract objects arrive from many compilers, tools and legacy schema
//! revisions, each naming the same data differently (`binary` vs `bytecode`,
//! `interface` vs `abi`, `evm.bytecode.object`, ...). This crate resolves
//! them into one canonical shape, merges them with previously-stored objects,
//! and validates the result against the contract JSON Schema.
//!
//! # Key Components
//!
//! - [`PropertyTable`]: declarative list of canonical properties, their
//!   source locators and value transforms
//! - [`resolve_property`]: generic resolution of one property from a dirty object
//! - [`Normalizer`]: `normalize` and `merge` over an explicit [`NormalizerConfig`]
//! - [`SchemaValidator`]: compiled contract schema, reporting [`SchemaError`]s
//!
//! # Example
//!
//! ```ignore
//! use contract_schema::{merge, validate, MergeOptions};
//! use serde_json::json;
//!
//! let compiled = json!({"contract_name": "MetaCoin", "binary": "6060", "interface": "[]"});
//! let stored = json!({"networks": {"1": {"events": {}, "links": {}}}});
//!
//! let merged = merge(&compiled, Some(&stored), &MergeOptions::default());
//! assert_eq!(merged.bytecode(), Some("0x6060"));
//!
//! if let Err(errors) = validate(&merged.to_value()) {
//!     for error in errors {
//!         eprintln!("{}", error);
//!     }
//! }
//! ```

pub mod canonical;
pub mod config;
pub mod locator;
pub mod merger;
pub mod property;
pub mod resolver;
pub mod transform;
pub mod validation;

use std::sync::OnceLock;

use serde_json::Value;

// Re-export main types
pub use canonical::CanonicalObject;
pub use config::{MergeOptions, NormalizerConfig, SCHEMA_VERSION};
pub use locator::Locator;
pub use merger::{copy_extensions, Normalizer, DEFAULT_CONTRACT_NAME};
pub use property::{keys, PropertyDefinition, PropertyTable};
pub use resolver::resolve_property;
pub use validation::{validate, SchemaError, SchemaLoadError, SchemaValidator};

fn default_normalizer() -> &'static Normalizer {
    static NORMALIZER: OnceLock<Normalizer> = OnceLock::new();
    NORMALIZER.get_or_init(Normalizer::default)
}

/// Normalize a dirty object with the contract property table.
pub fn normalize(dirty: &Value) -> CanonicalObject {
    default_normalizer().normalize(dirty)
}

/// Alias of [`normalize`].
pub fn normalize_input(dirty: &Value) -> CanonicalObject {
    normalize(dirty)
}

/// Normalize `dirty` and merge it over `existing` with the contract
/// property table.
pub fn merge(dirty: &Value, existing: Option<&Value>, options: &MergeOptions) -> CanonicalObject {
    default_normalizer().merge(dirty, existing, options)
}
