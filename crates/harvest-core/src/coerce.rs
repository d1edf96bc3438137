//! # Numeric Coercion
//!
//! Turns user text and loosely-typed JSON into numbers without ever failing.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                         │  Result                               │
//! │  ──────────────────────────────┼─────────────────────────────────────  │
//! │  "" / "   " / null / missing   │  0                                    │
//! │  "50000", " 12.5 ", 1e3        │  the finite value                     │
//! │  "abc", "NaN", "inf", {}       │  0   (NaN never leaks out)            │
//! │  true / false                  │  1 / 0                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Money and quantities live in the integer domain: coerced values are
//! rounded half away from zero.
//!
//! The `lenient_*` functions are serde `deserialize_with` hooks used at the
//! data-model boundary so that downstream code never needs fallbacks.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::money::Rupiah;

/// Parses text as a finite number, or `None` for blank/garbage input.
///
/// This is the strict form used by validation and filter bounds.
///
/// ```rust
/// use harvest_core::coerce::parse_finite;
///
/// assert_eq!(parse_finite(" 12.5 "), Some(12.5));
/// assert_eq!(parse_finite(""), None);
/// assert_eq!(parse_finite("NaN"), None);
/// ```
pub fn parse_finite(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerces text to a number: blank is `0`, garbage is `0`.
pub fn number(raw: &str) -> f64 {
    parse_finite(raw).unwrap_or(0.0)
}

/// Coerces text to a whole number.
pub fn integer(raw: &str) -> i64 {
    round_to_i64(number(raw))
}

/// Coerces text to a rupiah amount.
pub fn amount(raw: &str) -> Rupiah {
    Rupiah::from_amount(integer(raw))
}

/// Coerces an arbitrary JSON value to a number.
pub fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => number(s),
        Value::Bool(true) => 1.0,
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    }
}

/// Rounds half away from zero; the cast saturates at the i64 bounds.
fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

/// Renders a JSON scalar as text (numbers keep their JSON spelling).
fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

// =============================================================================
// Serde Hooks
// =============================================================================

/// Deserializes any JSON value into a rupiah amount.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Rupiah, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .map(|v| Rupiah::from_amount(round_to_i64(value_to_number(&v))))
        .unwrap_or_default())
}

/// Deserializes any JSON value into a whole number.
pub fn lenient_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .map(|v| round_to_i64(value_to_number(&v)))
        .unwrap_or_default())
}

/// Deserializes any JSON scalar into text; `null` and containers become `""`.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(value_to_text).unwrap_or_default())
}

/// Deserializes an opaque store id; anything but a string or number is absent.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Deserializes `null` as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a list, dropping `null` and entries that do not fit `T`.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
