//! Best-effort reading of second counts from JSON

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a count from a JSON number or numeric string.
///
/// Fractions are floored; negative, non-finite and non-numeric values
/// count as 0.
pub fn lenient_seconds(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| floor_seconds(n.as_f64())),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .unwrap_or_else(|_| floor_seconds(s.parse::<f64>().ok()))
        }
        _ => 0,
    }
}

fn floor_seconds(value: Option<f64>) -> u64 {
    value
        .filter(|f| f.is_finite() && *f > 0.0)
        .map(|f| f.floor() as u64)
        .unwrap_or(0)
}

/// `deserialize_with` helper applying [`lenient_seconds`] to a field
pub fn deserialize_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_seconds(&value))
}

/// `deserialize_with` helper reading a string, anything else becomes empty
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_strings() {
        assert_eq!(lenient_seconds(&json!(90)), 90);
        assert_eq!(lenient_seconds(&json!(" 45 ")), 45);
    }

    #[test]
    fn fractions_floor_the_same_for_numbers_and_strings() {
        assert_eq!(lenient_seconds(&json!(12.9)), 12);
        assert_eq!(lenient_seconds(&json!("12.5")), 12);
        assert_eq!(lenient_seconds(&json!("1e2")), 100);
    }

    #[test]
    fn degrades_to_zero() {
        for value in [
            json!(-5),
            json!("-5"),
            json!("abc"),
            json!("NaN"),
            json!("inf"),
            json!(null),
            json!(true),
            json!([1]),
            json!(-0.5),
        ] {
            assert_eq!(lenient_seconds(&value), 0, "value {value}");
        }
    }
}
