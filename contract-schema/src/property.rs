//! Declarative property table.
//!
//! Each canonical output key is described by a [`PropertyDefinition`]: where
//! its value may be found in a dirty object, and how that value is coerced
//! once found. The resolver is a single generic algorithm over this table;
//! no property gets special-cased control flow.

use std::fmt;

use serde_json::Value;

use crate::locator::Locator;
use crate::transform;

/// Transform applied to a property after source resolution.
pub type TransformFn = fn(Option<Value>) -> Option<Value>;

/// Canonical keys of a contract object.
pub mod keys {
    pub const CONTRACT_NAME: &str = "contractName";
    pub const ABI: &str = "abi";
    pub const BYTECODE: &str = "bytecode";
    pub const DEPLOYED_BYTECODE: &str = "deployedBytecode";
    pub const SOURCE_MAP: &str = "sourceMap";
    pub const DEPLOYED_SOURCE_MAP: &str = "deployedSourceMap";
    pub const SOURCE: &str = "source";
    pub const SOURCE_PATH: &str = "sourcePath";
    pub const AST: &str = "ast";
    pub const NETWORKS: &str = "networks";
    pub const SCHEMA_VERSION: &str = "schemaVersion";
    pub const UPDATED_AT: &str = "updatedAt";

    /// Prefix reserved for passthrough extension keys.
    pub const EXTENSION_PREFIX: &str = "x-";
}

/// How one canonical property is sourced and coerced.
#[derive(Clone)]
pub struct PropertyDefinition {
    canonical_key: String,
    /// Effective locator list, canonical key first
    locators: Vec<Locator>,
    transform: Option<TransformFn>,
}

impl PropertyDefinition {
    /// A property found only under its own name.
    pub fn new(canonical_key: impl Into<String>) -> Self {
        let canonical_key = canonical_key.into();
        let locators = vec![Locator::path(&canonical_key)];
        Self {
            canonical_key,
            locators,
            transform: None,
        }
    }

    /// Builder: declare the ordered source list.
    ///
    /// The canonical key is always tried first. It is not duplicated when the
    /// declared list already starts with it.
    pub fn with_sources<I, L>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Locator>,
    {
        let sources: Vec<Locator> = sources.into_iter().map(Into::into).collect();
        let starts_with_key = sources
            .first()
            .is_some_and(|first| first.is_key(&self.canonical_key));

        self.locators = if starts_with_key {
            sources
        } else {
            std::iter::once(Locator::path(&self.canonical_key))
                .chain(sources)
                .collect()
        };
        self
    }

    /// Builder: set the value transform.
    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The output key.
    pub fn canonical_key(&self) -> &str {
        &self.canonical_key
    }

    /// Locators in evaluation order.
    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    pub fn transform(&self) -> Option<TransformFn> {
        self.transform
    }
}

impl fmt::Debug for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDefinition")
            .field("canonical_key", &self.canonical_key)
            .field("locators", &self.locators)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

/// Ordered, immutable set of property definitions.
#[derive(Debug, Clone)]
pub struct PropertyTable {
    definitions: Vec<PropertyDefinition>,
}

impl PropertyTable {
    /// Create a table from definitions, in output order.
    pub fn new(definitions: Vec<PropertyDefinition>) -> Self {
        Self { definitions }
    }

    /// The contract object table, including every deprecated key mapping.
    pub fn contract() -> Self {
        use self::keys::*;

        Self::new(vec![
            PropertyDefinition::new(CONTRACT_NAME).with_sources(["contractName", "contract_name"]),
            PropertyDefinition::new(ABI)
                .with_sources(["abi", "interface"])
                .with_transform(transform::parse_abi),
            PropertyDefinition::new(BYTECODE)
                .with_sources(["bytecode", "binary", "unlinked_binary", "evm.bytecode.object"])
                .with_transform(transform::ensure_hex_prefix),
            PropertyDefinition::new(DEPLOYED_BYTECODE)
                .with_sources([
                    "deployedBytecode",
                    "runtimeBytecode",
                    "evm.deployedBytecode.object",
                ])
                .with_transform(transform::ensure_hex_prefix),
            PropertyDefinition::new(SOURCE_MAP)
                .with_sources(["sourceMap", "srcmap", "evm.bytecode.sourceMap"]),
            PropertyDefinition::new(DEPLOYED_SOURCE_MAP).with_sources([
                "deployedSourceMap",
                "srcmapRuntime",
                "evm.deployedBytecode.sourceMap",
            ]),
            PropertyDefinition::new(SOURCE),
            PropertyDefinition::new(SOURCE_PATH),
            PropertyDefinition::new(AST),
            PropertyDefinition::new(NETWORKS)
                .with_sources([
                    Locator::path("networks"),
                    Locator::derive("network_id", transform::networks_from_id),
                ])
                .with_transform(transform::default_networks),
            PropertyDefinition::new(SCHEMA_VERSION)
                .with_sources(["schemaVersion", "schema_version"]),
            PropertyDefinition::new(UPDATED_AT).with_sources([
                Locator::path("updatedAt"),
                Locator::derive("updated_at", transform::updated_at_from_millis),
            ]),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.definitions.iter()
    }

    /// Look up the definition for a canonical key.
    pub fn get(&self, canonical_key: &str) -> Option<&PropertyDefinition> {
        self.definitions
            .iter()
            .find(|d| d.canonical_key == canonical_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.canonical_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::contract()
    }
}
