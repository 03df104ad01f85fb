//! # Lenient Field Decoding
//!
//! Serde helpers used by every record field. Persisted documents may have
//! been written by older builds, edited by hand, or imported from a
//! backup, so a wrong-typed field must never make the whole document
//! unreadable.
//!
//! | Target | Accepts | Becomes `None` |
//! |---|---|---|
//! | text | string, number, bool | null, array, object |
//! | number | finite number, numeric string | everything else |
//! | list | array (non-object entries dropped) | null / non-array (empty list) |
//! | object | object | null / non-object (type default) |
//!
//! Numbers are serialized back as JSON integers when they are integral,
//! so `1500` stays `1500` rather than becoming `1500.0`.
//!
//! [`list_losses`] reports what `list` would drop, so a loader can keep a
//! copy of the raw document before the dropped entries are overwritten.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Convert a JSON value to text if it has a scalar representation.
pub fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Convert a JSON value to a finite number if it holds one.
pub fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Deserialize an optional text field.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

/// Deserialize an optional numeric field.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_number))
}

/// Deserialize a list of records, dropping entries that are not objects
/// or cannot be read as `T`. A missing or non-array value is empty.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Record under `path` every part of a raw list value that [`list`] would
/// drop: the whole value when it is not an array, otherwise each entry
/// that is not an object readable as `T`.
pub fn list_losses<T>(value: Option<&Value>, path: &str, out: &mut Vec<String>)
where
    T: DeserializeOwned,
{
    match value {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                let readable =
                    item.is_object() && serde_json::from_value::<T>(item.clone()).is_ok();
                if !readable {
                    out.push(format!("{path}[{index}]"));
                }
            }
        }
        Some(_) => out.push(path.to_string()),
    }
}

/// Serialize an optional number, writing integral values as integers.
pub fn serialize_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) => serialize_f64(n, serializer),
        None => serializer.serialize_none(),
    }
}

/// Serialize a number, writing integral values as integers.
pub fn serialize_f64<S>(n: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // 2^53: beyond this f64 no longer represents every integer.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}

/// Deserialize a nested object, falling back to its default when the
/// value is missing, not an object, or unreadable as `T`.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).unwrap_or_default(),
        _ => T::default(),
    })
}
