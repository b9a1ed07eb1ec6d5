//! The canonical contract object.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::property::keys;
use crate::validation::{self, SchemaError};

/// Output of normalization.
///
/// Holds one slot per declared canonical key (`None` = undefined) plus the
/// `x-` extension keys copied from the input. Serialization omits undefined
/// slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalObject {
    properties: BTreeMap<String, Option<Value>>,
    extensions: BTreeMap<String, Value>,
}

impl CanonicalObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a defined value by key, canonical or extension.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.properties.get(key) {
            Some(slot) => slot.as_ref(),
            None => self.extensions.get(key),
        }
    }

    /// Whether `key` is a declared canonical key of this object.
    pub fn declares(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Whether `key` holds a defined value.
    pub fn is_defined(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a canonical slot. `None` marks it undefined.
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.properties.insert(key.into(), value);
    }

    /// Canonical slots in key order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.properties
            .iter()
            .map(|(key, slot)| (key.as_str(), slot.as_ref()))
    }

    pub fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }

    pub fn insert_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }

    pub fn contract_name(&self) -> Option<&str> {
        self.get(keys::CONTRACT_NAME).and_then(Value::as_str)
    }

    pub fn abi(&self) -> Option<&Value> {
        self.get(keys::ABI)
    }

    pub fn bytecode(&self) -> Option<&str> {
        self.get(keys::BYTECODE).and_then(Value::as_str)
    }

    pub fn deployed_bytecode(&self) -> Option<&str> {
        self.get(keys::DEPLOYED_BYTECODE).and_then(Value::as_str)
    }

    pub fn schema_version(&self) -> Option<&str> {
        self.get(keys::SCHEMA_VERSION).and_then(Value::as_str)
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.get(keys::UPDATED_AT).and_then(Value::as_str)
    }

    /// The network map, when it is an object.
    pub fn networks(&self) -> Option<&Map<String, Value>> {
        self.get(keys::NETWORKS).and_then(Value::as_object)
    }

    pub(crate) fn networks_mut(&mut self) -> Option<&mut Map<String, Value>> {
        self.properties
            .get_mut(keys::NETWORKS)
            .and_then(Option::as_mut)
            .and_then(Value::as_object_mut)
    }

    /// Serialize to a JSON object, dropping undefined slots.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.properties {
            if let Some(value) = value {
                map.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &self.extensions {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Validate against the contract schema.
    pub fn validate(&self) -> Result<(), Vec<SchemaError>> {
        validation::validate(&self.to_value()).map(|_| ())
    }
}

impl Serialize for CanonicalObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let defined = self.properties.values().filter(|v| v.is_some()).count();
        let mut map = serializer.serialize_map(Some(defined + self.extensions.len()))?;
        for (key, value) in &self.properties {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        for (key, value) in &self.extensions {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl From<CanonicalObject> for Value {
    fn from(object: CanonicalObject) -> Self {
        object.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CanonicalObject {
        let mut object = CanonicalObject::new();
        object.set("contractName", Some(json!("MetaCoin")));
        object.set("abi", None);
        object.set("networks", Some(json!({"1": {"events": {}, "links": {}}})));
        object.insert_extension("x-from-dependency", json!("adder/Adder.sol"));
        object
    }

    #[test]
    fn test_undefined_slots_are_declared_but_not_defined() {
        let object = sample();
        assert!(object.declares("abi"));
        assert!(!object.is_defined("abi"));
        assert!(!object.declares("bytecode"));
    }

    #[test]
    fn test_to_value_omits_undefined() {
        let value = sample().to_value();
        assert_eq!(
            value,
            json!({
                "contractName": "MetaCoin",
                "networks": {"1": {"events": {}, "links": {}}},
                "x-from-dependency": "adder/Adder.sol"
            })
        );
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let object = sample();
        let serialized = serde_json::to_value(&object).unwrap();
        assert_eq!(serialized, object.to_value());
    }

    #[test]
    fn test_accessors() {
        let object = sample();
        assert_eq!(object.contract_name(), Some("MetaCoin"));
        assert_eq!(object.networks().map(Map::len), Some(1));
        assert_eq!(object.get("x-from-dependency"), Some(&json!("adder/Adder.sol")));
        assert_eq!(object.updated_at(), None);
    }
}
