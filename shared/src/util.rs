//! Small helpers shared by the wire types

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a loosely typed JSON value as a finite number.
///
/// Numbers pass through, numeric strings are parsed, everything else
/// (null, booleans, garbage strings, NaN) yields `None`.
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Interpret a loosely typed JSON value as display text.
pub fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `deserialize_with` adapters for backend payloads whose field types drift.
pub mod lenient {
    use super::*;

    /// Number or numeric string, anything else becomes `None`
    pub fn option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(lenient_number))
    }

    /// Number or numeric string, anything else becomes `0.0`
    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        option_f64(deserializer).map(|v| v.unwrap_or(0.0))
    }

    /// Integer quantity; fractional values are truncated
    pub fn i32_or_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        option_f64(deserializer).map(|v| v.map(|n| n as i32).unwrap_or(0))
    }

    /// String or number rendered as text; null becomes empty
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(lenient_text).unwrap_or_default())
    }

    /// Like [`string`], but blank values become `None`
    pub fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(lenient_text)
            .filter(|s| !s.trim().is_empty()))
    }

    /// Treat an explicit `null` like a missing field
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(&json!(12.5)), Some(12.5));
        assert_eq!(lenient_number(&json!("7.25")), Some(7.25));
        assert_eq!(lenient_number(&json!(" 3 ")), Some(3.0));
        assert_eq!(lenient_number(&json!("abc")), None);
        assert_eq!(lenient_number(&json!("NaN")), None);
        assert_eq!(lenient_number(&json!(null)), None);
        assert_eq!(lenient_number(&json!(true)), None);
    }

    #[test]
    fn test_lenient_text() {
        assert_eq!(lenient_text(&json!("a")), Some("a".to_string()));
        assert_eq!(lenient_text(&json!(42)), Some("42".to_string()));
        assert_eq!(lenient_text(&json!(null)), None);
        assert_eq!(lenient_text(&json!([1])), None);
    }
}
