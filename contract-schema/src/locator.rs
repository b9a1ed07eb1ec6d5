//! Source locators for canonical properties.
//!
//! A locator describes one place a canonical value may live inside a dirty
//! input object. Two kinds exist:
//!
//! - **Path**: a dot-separated key path (`evm.bytecode.object`), walked one
//!   key at a time
//! - **Derive**: a function over the whole dirty object, used when a value has
//!   to be synthesized from a differently-shaped field (`network_id`)
//!
//! Every lookup returns `Option<Value>`. `None` means "not here", and the
//! resolver moves on to the next locator. A JSON `null` is a found value.

use serde_json::Value;
use std::fmt;

/// Function that derives a value from the whole dirty object.
pub type DeriveFn = fn(&Value) -> Option<Value>;

/// One place to look for a canonical property.
#[derive(Clone)]
pub enum Locator {
    /// Nested key lookups, outermost first
    Path(Vec<String>),
    /// Custom derivation over the dirty object
    Derive {
        /// Name used in logs
        name: &'static str,
        derive: DeriveFn,
    },
}

impl Locator {
    /// Build a path locator from a dot-separated string.
    pub fn path(path: &str) -> Self {
        Self::Path(path.split('.').map(str::to_string).collect())
    }

    /// Build a derived locator.
    pub fn derive(name: &'static str, derive: DeriveFn) -> Self {
        Self::Derive { name, derive }
    }

    /// Evaluate this locator against a dirty object.
    pub fn evaluate(&self, dirty: &Value) -> Option<Value> {
        match self {
            Self::Path(steps) => lookup_path(dirty, steps).cloned(),
            Self::Derive { derive, .. } => derive(dirty),
        }
    }

    /// Whether this is the single-step path `key`.
    pub fn is_key(&self, key: &str) -> bool {
        matches!(self, Self::Path(steps) if steps.len() == 1 && steps[0] == key)
    }

    /// Human-readable form for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(steps) => steps.join("."),
            Self::Derive { name, .. } => format!("{}()", name),
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(steps) => f.debug_tuple("Path").field(&steps.join(".")).finish(),
            Self::Derive { name, .. } => f.debug_tuple("Derive").field(name).finish(),
        }
    }
}

impl From<&str> for Locator {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

/// Walk `steps` through nested objects.
///
/// A missing key or a scalar intermediate ends the walk with `None`.
/// Arrays are indexed by numeric steps.
pub fn lookup_path<'a, S: AsRef<str>>(value: &'a Value, steps: &[S]) -> Option<&'a Value> {
    steps
        .iter()
        .try_fold(value, |current, step| lookup_key(current, step.as_ref()))
}

fn lookup_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
