//! Mapping between native values (`serde_json::Value`) and [`FieldValue`].
//!
//! `encode` never fails: kinds the store cannot hold as-is (JSON `null`,
//! nested objects, integers beyond `i64`) are stored lossily as their textual
//! form or as a double. `decode` is total as well, and uses an empty string as
//! the sentinel for a field that is absent from a document.
//!
//! Integral floats such as `3.0` are stored as integers, so they come back as
//! `3`. The round trip holds up to numeric equality for them, not up to
//! `serde_json::Value` equality.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::store::value::FieldValue;

/// Encodes a native value.
pub fn encode(value: &JsonValue) -> FieldValue {
    match value {
        JsonValue::String(text) => FieldValue::String(text.clone()),
        JsonValue::Bool(flag) => FieldValue::Boolean(*flag),
        JsonValue::Number(number) => encode_number(number),
        JsonValue::Array(items) => FieldValue::Array(items.iter().map(encode).collect()),
        other => FieldValue::String(other.to_string()),
    }
}

/// Encodes a timestamp as RFC 3339 text in UTC.
pub fn encode_timestamp(value: DateTime<Utc>) -> FieldValue {
    FieldValue::Timestamp(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Encodes every entry of a native object.
pub fn encode_map(data: &JsonMap<String, JsonValue>) -> BTreeMap<String, FieldValue> {
    data.iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}

/// Decodes a possibly absent field.
///
/// `None` yields `""`; an explicit `Boolean(false)` yields `false`.
pub fn decode(value: Option<&FieldValue>) -> JsonValue {
    match value {
        Some(value) => decode_value(value),
        None => JsonValue::String(String::new()),
    }
}

/// Decodes every field of a document into a plain object.
pub fn decode_map(fields: &BTreeMap<String, FieldValue>) -> JsonMap<String, JsonValue> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

fn decode_value(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::String(text) | FieldValue::Timestamp(text) => JsonValue::String(text.clone()),
        FieldValue::Boolean(flag) => JsonValue::Bool(*flag),
        FieldValue::Integer(integer) => JsonValue::Number(Number::from(*integer)),
        // JSON has no spelling for NaN or the infinities.
        FieldValue::Double(double) => Number::from_f64(*double)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        FieldValue::Array(values) => JsonValue::Array(values.iter().map(decode_value).collect()),
    }
}

fn encode_number(number: &Number) -> FieldValue {
    if let Some(integer) = number.as_i64() {
        return FieldValue::Integer(integer);
    }
    match number.as_f64() {
        Some(double) if is_integral(double) => FieldValue::Integer(double as i64),
        Some(double) => FieldValue::Double(double),
        None => FieldValue::String(number.to_string()),
    }
}

// 2^63 itself is not representable as i64, hence the exclusive upper bound.
fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn integer_and_double_boundary() {
        assert_eq!(encode(&json!(3)), FieldValue::Integer(3));
        assert_eq!(encode(&json!(3.5)), FieldValue::Double(3.5));
        assert_eq!(encode(&json!(3.0)), FieldValue::Integer(3));
        assert_eq!(encode(&json!(-0.0)), FieldValue::Integer(0));
    }

    #[test]
    fn integers_beyond_i64_become_doubles() {
        let value = encode(&json!(u64::MAX));
        assert!(matches!(value, FieldValue::Double(_)));
    }

    #[test]
    fn round_trips_representable_values() {
        let samples = [
            json!("Demo"),
            json!(""),
            json!(true),
            json!(false),
            json!(42),
            json!(-7),
            json!(i64::MAX),
            json!(2.25),
            json!(["a", 1, 1.5, false]),
            json!([["nested"], []]),
        ];
        for sample in samples {
            assert_eq!(decode(Some(&encode(&sample))), sample, "sample {sample}");
        }
    }

    #[test]
    fn integral_float_decodes_as_integer() {
        let decoded = decode(Some(&encode(&json!(3.0))));
        assert_eq!(decoded, json!(3));
        assert_ne!(decoded, json!(3.0));
        assert_eq!(decoded.as_f64(), Some(3.0));
    }

    #[test]
    fn false_is_not_absent() {
        assert_eq!(decode(Some(&FieldValue::Boolean(false))), json!(false));
        assert_eq!(decode(None), json!(""));
    }

    #[test]
    fn unsupported_kinds_are_stringified() {
        assert_eq!(encode(&JsonValue::Null), FieldValue::from_string("null"));
        assert_eq!(
            encode(&json!({"a": 1})),
            FieldValue::from_string(r#"{"a":1}"#)
        );
    }

    #[test]
    fn timestamps_stay_textual() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        let value = encode_timestamp(at);
        assert_eq!(value, FieldValue::from_timestamp("2024-05-01T10:30:00Z"));
        assert_eq!(decode(Some(&value)), json!("2024-05-01T10:30:00Z"));
    }

    #[test]
    fn non_finite_doubles_decode_to_null() {
        assert_eq!(decode(Some(&FieldValue::Double(f64::NAN))), JsonValue::Null);
    }

    #[test]
    fn maps_encode_and_decode_every_entry() {
        let data = json!({"title": "Demo", "views": 10, "isPublic": false});
        let encoded = encode_map(data.as_object().unwrap());
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded.get("views"), Some(&FieldValue::Integer(10)));
        let decoded = decode_map(&encoded);
        assert_eq!(JsonValue::Object(decoded), data);
    }
}
