//! Lenient coercion of CheapShark's loosely typed JSON fields.
//!
//! Prices, ratings and timestamps arrive as strings (`"19.99"`), numbers, or
//! `null` depending on the endpoint. A value counts as present only when it
//! coerces to a finite number; everything else is treated as absent. A
//! literal `0` is a usable value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a JSON value into a finite `f64`.
///
/// Numbers pass through, strings are trimmed and parsed. Empty strings,
/// `null`, booleans, arrays, objects and non-finite results yield `None`.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

/// Coerces an identifier that may be sent as a string or a number.
///
/// Blank strings are absent.
#[must_use]
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Savings percentage of `sale` relative to `retail`, rounded to the nearest
/// integer.
///
/// Absent when either price is absent or `retail` is not positive. A sale
/// price above retail yields a negative percentage.
#[must_use]
pub fn compute_savings(sale: Option<f64>, retail: Option<f64>) -> Option<i32> {
    let sale = sale?;
    let retail = retail.filter(|r| *r > 0.0)?;
    round_percent((1.0 - sale / retail) * 100.0)
}

/// Rounds a percentage to the nearest integer; non-finite input is absent.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_percent(value: f64) -> Option<i32> {
    let rounded = value.round();
    (rounded.is_finite() && rounded.abs() <= f64::from(i32::MAX)).then(|| rounded as i32)
}

/// Converts unix seconds into a timestamp; zero, negative and out-of-range
/// values are absent.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn unix_seconds(value: f64) -> Option<DateTime<Utc>> {
    if value <= 0.0 {
        return None;
    }
    DateTime::from_timestamp(value.trunc() as i64, 0)
}

pub(crate) fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

pub(crate) fn loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_id))
}

pub(crate) fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

pub(crate) fn loose_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number).and_then(unix_seconds))
}
