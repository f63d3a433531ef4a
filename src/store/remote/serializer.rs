use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::{json, Value as JsonValue};

use crate::store::error::{protocol_error, StoreResult};
use crate::store::model::Document;
use crate::store::value::FieldValue;

pub fn encode_value(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::String(string) => json!({ "stringValue": string }),
        FieldValue::Boolean(boolean) => json!({ "booleanValue": boolean }),
        FieldValue::Integer(integer) => json!({ "integerValue": integer.to_string() }),
        FieldValue::Double(double) => encode_double(*double),
        FieldValue::Timestamp(timestamp) => json!({ "timestampValue": timestamp }),
        FieldValue::Array(values) => {
            let values = values.iter().map(encode_value).collect::<Vec<_>>();
            json!({ "arrayValue": { "values": values } })
        }
    }
}

pub fn encode_fields(fields: &BTreeMap<String, FieldValue>) -> JsonValue {
    let mut encoded = serde_json::Map::new();
    for (key, value) in fields {
        encoded.insert(key.clone(), encode_value(value));
    }
    JsonValue::Object(encoded)
}

/// Request body for create and patch.
pub fn encode_document_body(fields: &BTreeMap<String, FieldValue>) -> JsonValue {
    json!({ "fields": encode_fields(fields) })
}

// The REST surface spells non-finite doubles as strings.
fn encode_double(double: f64) -> JsonValue {
    if double.is_nan() {
        json!({ "doubleValue": "NaN" })
    } else if double.is_infinite() {
        let text = if double > 0.0 { "Infinity" } else { "-Infinity" };
        json!({ "doubleValue": text })
    } else {
        json!({ "doubleValue": double })
    }
}

pub fn decode_value(value: &JsonValue) -> StoreResult<FieldValue> {
    let object = value
        .as_object()
        .ok_or_else(|| protocol_error("Expected tagged value object"))?;
    if object.len() != 1 {
        let tags = object.keys().cloned().collect::<Vec<_>>().join(", ");
        return Err(protocol_error(format!(
            "Expected exactly one value tag, found [{tags}]"
        )));
    }
    let (tag, payload) = object
        .iter()
        .next()
        .ok_or_else(|| protocol_error("Expected exactly one value tag"))?;

    match tag.as_str() {
        "stringValue" => payload
            .as_str()
            .map(FieldValue::from_string)
            .ok_or_else(|| protocol_error("stringValue must be string")),
        "booleanValue" => payload
            .as_bool()
            .map(FieldValue::from_bool)
            .ok_or_else(|| protocol_error("booleanValue must be bool")),
        "integerValue" => {
            let parsed = match payload {
                JsonValue::String(value) => i64::from_str(value)
                    .map_err(|err| protocol_error(format!("Invalid integerValue: {err}")))?,
                JsonValue::Number(number) => number
                    .as_i64()
                    .ok_or_else(|| protocol_error("integerValue out of range"))?,
                _ => return Err(protocol_error("integerValue must be a string or number")),
            };
            Ok(FieldValue::from_integer(parsed))
        }
        "doubleValue" => {
            let parsed = match payload {
                JsonValue::Number(number) => number
                    .as_f64()
                    .ok_or_else(|| protocol_error("Invalid doubleValue"))?,
                JsonValue::String(value) => parse_double(value)?,
                _ => return Err(protocol_error("doubleValue must be a number or string")),
            };
            Ok(FieldValue::from_double(parsed))
        }
        "timestampValue" => payload
            .as_str()
            .map(FieldValue::from_timestamp)
            .ok_or_else(|| protocol_error("timestampValue must be string")),
        "arrayValue" => {
            let decoded = match payload.get("values") {
                Some(values) => values
                    .as_array()
                    .ok_or_else(|| protocol_error("arrayValue.values must be an array"))?
                    .iter()
                    .map(decode_value)
                    .collect::<StoreResult<Vec<_>>>()?,
                None => Vec::new(),
            };
            Ok(FieldValue::from_array(decoded))
        }
        other => Err(protocol_error(format!("Unsupported value type '{other}'"))),
    }
}

fn parse_double(value: &str) -> StoreResult<f64> {
    match value {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => other
            .parse::<f64>()
            .map_err(|err| protocol_error(format!("Invalid doubleValue: {err}"))),
    }
}

pub fn decode_fields(value: &JsonValue) -> StoreResult<BTreeMap<String, FieldValue>> {
    let fields_object = match value.get("fields") {
        Some(fields) => fields
            .as_object()
            .ok_or_else(|| protocol_error("Expected 'fields' to be an object"))?,
        // Document exists but has no user fields.
        None => return Ok(BTreeMap::new()),
    };

    let mut fields = BTreeMap::new();
    for (key, value) in fields_object {
        let decoded = decode_value(value)
            .map_err(|err| protocol_error(format!("Field '{key}': {}", err.message())))?;
        fields.insert(key.clone(), decoded);
    }
    Ok(fields)
}

pub fn decode_document(value: &JsonValue) -> StoreResult<Document> {
    let name = value
        .get("name")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| protocol_error("Document missing 'name' field"))?;
    let fields = decode_fields(value)?;
    let timestamp = |key: &str| value.get(key).and_then(JsonValue::as_str).map(str::to_owned);
    Ok(Document::new(name, fields).with_times(timestamp("createTime"), timestamp("updateTime")))
}
