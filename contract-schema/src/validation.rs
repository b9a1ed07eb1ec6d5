//! JSON Schema validation for canonical contract objects.
//!
//! The contract schema document is embedded at build time and compiled once
//! per process. Validation reports every violation as data: callers get the
//! full list of [`SchemaError`]s and can display or batch them.
//!
//! Error paths use the same dotted convention as path locators
//! (`networks.1.address`). The root object has the empty path.

use std::sync::OnceLock;

use serde_json::Value;

/// The embedded contract schema document.
pub const CONTRACT_SCHEMA: &str = include_str!("../spec/contract.schema.json");

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema violation at '{path}': {message}")]
pub struct SchemaError {
    /// Dotted path to the offending value
    pub path: String,
    /// Human-readable description
    pub message: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error concerns `path` or something beneath it.
    pub fn is_under(&self, path: &str) -> bool {
        self.path == path
            || (self.path.starts_with(path) && self.path[path.len()..].starts_with('.'))
    }
}

/// Error types for loading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    /// The document is not JSON
    #[error("Schema document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document is JSON but not a usable schema
    #[error("Schema document failed to compile: {0}")]
    Compile(String),
}

/// Compiled schema validator.
#[derive(Debug)]
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile a schema document.
    pub fn from_document(document: &Value) -> Result<Self, SchemaLoadError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(document)
            .map_err(|e| SchemaLoadError::Compile(e.to_string()))?;

        Ok(Self { validator })
    }

    /// Parse and compile a schema document.
    pub fn from_json(raw: &str) -> Result<Self, SchemaLoadError> {
        let document: Value = serde_json::from_str(raw)?;
        Self::from_document(&document)
    }

    /// The process-wide validator for the embedded contract schema.
    pub fn contract() -> Result<&'static SchemaValidator, &'static SchemaLoadError> {
        static CONTRACT: OnceLock<Result<SchemaValidator, SchemaLoadError>> = OnceLock::new();

        CONTRACT
            .get_or_init(|| {
                let compiled = Self::from_json(CONTRACT_SCHEMA);
                if let Err(e) = &compiled {
                    tracing::warn!(error = %e, "Embedded contract schema failed to compile");
                }
                compiled
            })
            .as_ref()
    }

    /// Validate an instance, returning it unchanged on success.
    pub fn validate<'a>(&self, instance: &'a Value) -> Result<&'a Value, Vec<SchemaError>> {
        let errors: Vec<SchemaError> = self
            .validator
            .iter_errors(instance)
            .map(|error| {
                SchemaError::new(
                    pointer_to_path(&error.instance_path.to_string()),
                    error.to_string(),
                )
            })
            .collect();

        if errors.is_empty() {
            Ok(instance)
        } else {
            Err(errors)
        }
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Validate an object against the embedded contract schema.
///
/// A schema that fails to compile is reported as a single root error.
pub fn validate(instance: &Value) -> Result<&Value, Vec<SchemaError>> {
    match SchemaValidator::contract() {
        Ok(validator) => validator.validate(instance),
        Err(e) => Err(vec![SchemaError::new("", e.to_string())]),
    }
}

/// Convert a JSON pointer (`/networks/1/address`) to a dotted path.
fn pointer_to_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}
