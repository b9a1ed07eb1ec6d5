//! Property resolution over a dirty object.

use serde_json::{Map, Value};

use crate::property::{PropertyDefinition, PropertyTable};

/// Resolve one canonical property from a dirty object.
///
/// Locators are tried in order and the first defined value wins, even when
/// that value is falsy (`""`, `0`, `false`, `{}` or `null`). The definition's
/// transform then runs on the result, including when nothing was found.
pub fn resolve_property(dirty: &Value, definition: &PropertyDefinition) -> Option<Value> {
    let found = definition
        .locators()
        .iter()
        .enumerate()
        .find_map(|(position, locator)| locator.evaluate(dirty).map(|v| (position, v)));

    if let Some((position, _)) = &found {
        if *position > 0 {
            tracing::trace!(
                key = %definition.canonical_key(),
                source = %definition.locators()[*position].describe(),
                "Resolved property from alternate source"
            );
        }
    }

    let value = found.map(|(_, value)| value);
    match definition.transform() {
        Some(transform) => transform(value),
        None => value,
    }
}

/// Resolve every property in `table`, in table order.
pub fn resolve_all(dirty: &Value, table: &PropertyTable) -> Vec<(String, Option<Value>)> {
    table
        .iter()
        .map(|definition| {
            (
                definition.canonical_key().to_string(),
                resolve_property(dirty, definition),
            )
        })
        .collect()
}

/// Iterate the top-level keys of `dirty` that carry a given prefix.
///
/// Non-object inputs have no keys.
pub fn prefixed_entries<'a>(
    dirty: &'a Value,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
    dirty
        .as_object()
        .into_iter()
        .flat_map(Map::iter)
        .filter(move |(key, _)| key.starts_with(prefix))
}
