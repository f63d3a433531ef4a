use serde_json::{json, Value as JsonValue};

use crate::store::api::query::{FieldFilter, QuerySpec};
use crate::store::error::{protocol_error, StoreResult};
use crate::store::logger::LOGGER;
use crate::store::model::Document;
use crate::store::remote::serializer::{decode_document, encode_value};

/// Builds the `runQuery` request body for `collection`.
pub(crate) fn encode_run_query_body(collection: &str, spec: &QuerySpec) -> JsonValue {
    json!({ "structuredQuery": encode_structured_query(collection, spec) })
}

pub(crate) fn encode_structured_query(collection: &str, spec: &QuerySpec) -> JsonValue {
    let mut structured = serde_json::Map::new();

    structured.insert(
        "from".to_string(),
        json!([{ "collectionId": collection }]),
    );

    if let Some(filter) = encode_filters(spec.filters()) {
        structured.insert("where".to_string(), filter);
    }

    if !spec.orders().is_empty() {
        let orders: Vec<_> = spec
            .orders()
            .iter()
            .map(|order| {
                json!({
                    "field": { "fieldPath": order.field() },
                    "direction": order.direction().as_str(),
                })
            })
            .collect();
        structured.insert("orderBy".to_string(), JsonValue::Array(orders));
    }

    if let Some(limit) = spec.limit_value() {
        structured.insert("limit".to_string(), json!(limit));
    }

    JsonValue::Object(structured)
}

fn encode_filters(filters: &[FieldFilter]) -> Option<JsonValue> {
    match filters {
        [] => None,
        [single] => Some(encode_field_filter(single)),
        many => {
            let nested: Vec<_> = many.iter().map(encode_field_filter).collect();
            Some(json!({
                "compositeFilter": {
                    "op": "AND",
                    "filters": nested
                }
            }))
        }
    }
}

fn encode_field_filter(filter: &FieldFilter) -> JsonValue {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": filter.field() },
            "op": filter.op(),
            "value": encode_value(filter.value())
        }
    })
}

/// Flattens a `runQuery` response into documents.
///
/// Wrappers without a `document` key or with a `null` one (the store's way
/// of saying "no match", or progress-only entries) are skipped; order is
/// preserved.
pub(crate) fn decode_run_query_response(response: &JsonValue) -> StoreResult<Vec<Document>> {
    let results = response
        .as_array()
        .ok_or_else(|| protocol_error("runQuery response must be an array"))?;

    let mut documents = Vec::with_capacity(results.len());
    let mut skipped = 0usize;
    for entry in results {
        match entry.get("document") {
            Some(document) if !document.is_null() => documents.push(decode_document(document)?),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        LOGGER.debug(format!("runQuery: dropped {skipped} wrapper(s) without a document"));
    }
    Ok(documents)
}
