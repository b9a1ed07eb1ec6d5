//! Value transforms and derived sources for the contract property table.
//!
//! Transforms run once per property, after source resolution, and receive
//! `None` when no source produced a value. They never fail: a value that
//! cannot be coerced degrades to `None`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Parse a string ABI into structured JSON.
///
/// Non-string values pass through untouched. A malformed string becomes `None`.
pub fn parse_abi(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(raw)) => match serde_json::from_str(&raw) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed ABI string");
                None
            }
        },
        other => other,
    }
}

/// Ensure non-empty bytecode strings carry a `0x` prefix.
pub fn ensure_hex_prefix(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(code)) if !code.is_empty() && !code.starts_with("0x") => {
            Some(Value::String(format!("0x{}", code)))
        }
        other => other,
    }
}

/// Substitute an empty network map when none was found.
pub fn default_networks(value: Option<Value>) -> Option<Value> {
    Some(value.unwrap_or_else(|| Value::Object(Map::new())))
}

/// Synthesize a one-entry network map from a legacy `network_id` field.
pub fn networks_from_id(dirty: &Value) -> Option<Value> {
    let id = match dirty.get("network_id")? {
        Value::String(id) => id.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    };

    let mut networks = Map::new();
    networks.insert(id, json!({"events": {}, "links": {}}));
    Some(Value::Object(networks))
}

/// Convert a legacy `updated_at` epoch-millisecond field to ISO-8601.
pub fn updated_at_from_millis(dirty: &Value) -> Option<Value> {
    let millis = dirty.get("updated_at")?.as_f64()?;
    millis_to_iso(millis).map(Value::String)
}

/// Largest representable distance from the epoch, 100 million days.
const MAX_TIMESTAMP_MILLIS: f64 = 8.64e15;

/// Format epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Fractional milliseconds are truncated toward zero. Non-finite or
/// out-of-range inputs yield `None`.
pub fn millis_to_iso(millis: f64) -> Option<String> {
    if !millis.is_finite() {
        return None;
    }
    let millis = millis.trunc();
    if millis.abs() > MAX_TIMESTAMP_MILLIS {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64).map(format_timestamp)
}

/// Format a timestamp the way `updatedAt` is stored.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_abi_string() {
        let parsed = parse_abi(Some(json!(r#"[{"type":"function","name":"f"}]"#)));
        assert_eq!(parsed, Some(json!([{"type": "function", "name": "f"}])));
    }

    #[test]
    fn test_parse_abi_malformed() {
        assert_eq!(parse_abi(Some(json!("{not json"))), None);
    }

    #[test]
    fn test_parse_abi_passthrough() {
        assert_eq!(parse_abi(Some(json!([]))), Some(json!([])));
        assert_eq!(parse_abi(Some(json!(-1))), Some(json!(-1)));
        assert_eq!(parse_abi(None), None);
    }

    #[test]
    fn test_hex_prefix() {
        assert_eq!(ensure_hex_prefix(Some(json!("6060"))), Some(json!("0x6060")));
        assert_eq!(ensure_hex_prefix(Some(json!("0x6060"))), Some(json!("0x6060")));
        assert_eq!(ensure_hex_prefix(Some(json!(""))), Some(json!("")));
        assert_eq!(ensure_hex_prefix(Some(json!(12))), Some(json!(12)));
        assert_eq!(ensure_hex_prefix(None), None);
    }

    #[test]
    fn test_default_networks() {
        assert_eq!(default_networks(None), Some(json!({})));
        assert_eq!(
            default_networks(Some(json!({"1": {}}))),
            Some(json!({"1": {}}))
        );
    }

    #[test]
    fn test_networks_from_id() {
        assert_eq!(
            networks_from_id(&json!({"network_id": 3})),
            Some(json!({"3": {"events": {}, "links": {}}}))
        );
        assert_eq!(
            networks_from_id(&json!({"network_id": "default"})),
            Some(json!({"default": {"events": {}, "links": {}}}))
        );
        assert_eq!(networks_from_id(&json!({})), None);
    }

    #[test]
    fn test_millis_to_iso() {
        assert_eq!(
            millis_to_iso(1_500_000_000_000.0).as_deref(),
            Some("2017-07-14T02:40:00.000Z")
        );
        assert_eq!(millis_to_iso(0.0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
        assert_eq!(millis_to_iso(f64::NAN), None);
        assert_eq!(millis_to_iso(1e300), None);
    }

    #[test]
    fn test_updated_at_requires_number() {
        assert_eq!(updated_at_from_millis(&json!({"updated_at": "1500000000000"})), None);
        assert_eq!(updated_at_from_millis(&json!({})), None);
        assert_eq!(
            updated_at_from_millis(&json!({"updated_at": 1_500_000_000_123_u64})),
            Some(json!("2017-07-14T02:40:00.123Z"))
        );
    }
}
