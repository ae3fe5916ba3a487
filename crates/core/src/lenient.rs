//! Field deserializers that never fail the enclosing record.
//!
//! The backend is loose with types (BigDecimal as string or number, ids as
//! either, dates in several encodings). A malformed optional field becomes
//! `None` instead of rejecting the whole response.
//!
//! Use with `#[serde(default, deserialize_with = "lenient::number")]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::time::Timestamp;

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Timestamp::from_value))
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_number))
}

pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_string))
}

/// Numbers and numeric strings; anything else is `None`.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Strings as-is, numbers and booleans stringified.
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "number")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<Timestamp>,
    }

    #[test]
    fn accepts_loose_types() {
        let r: Record =
            serde_json::from_str(r#"{"amount":"1250.50","id":42,"at":"2024-01-02"}"#).unwrap();
        assert_eq!(r.amount, Some(1250.5));
        assert_eq!(r.id.as_deref(), Some("42"));
        assert!(r.at.is_some());
    }

    #[test]
    fn malformed_fields_become_none() {
        let r: Record =
            serde_json::from_str(r#"{"amount":"n/a","id":{},"at":"yesterday"}"#).unwrap();
        assert!(r.amount.is_none());
        assert!(r.id.is_none());
        assert!(r.at.is_none());
    }

    #[test]
    fn missing_and_null_fields() {
        let r: Record = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert!(r.amount.is_none());
        assert!(r.id.is_none());
        assert!(r.at.is_none());
    }
}
