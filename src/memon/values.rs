//! Scalar decoders for memon JSON values.

use serde_json::Value;

/// Reads a decimal written either as a JSON number or as a numeric string.
pub fn decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads a beat-time: a raw number of ticks, or `[integral, numerator, denominator]`.
pub fn beat_time(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Array(parts) if parts.len() == 3 => {
            let integral = parts[0].as_f64()?;
            let numerator = parts[1].as_f64()?;
            let denominator = parts[2].as_f64()?;
            if denominator == 0.0 {
                return None;
            }
            Some(integral + numerator / denominator)
        }
        _ => None,
    }
}

/// Reads a non-negative integer that fits in `u32`.
pub fn unsigned(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// Reads a string field from an object, if present.
pub fn string_field(object: &Value, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_owned)
}
