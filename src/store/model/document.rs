use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::store::error::{protocol_error, StoreResult};
use crate::store::value::{decode, decode_map, FieldValue};

/// A named record returned by the store.
///
/// `name` is the fully qualified resource path
/// (`projects/p/databases/d/documents/<collection>/<id>`); only its last
/// segment is interpreted.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    name: String,
    fields: BTreeMap<String, FieldValue>,
    create_time: Option<String>,
    update_time: Option<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            name: name.into(),
            fields,
            create_time: None,
            update_time: None,
        }
    }

    pub(crate) fn with_times(mut self, create_time: Option<String>, update_time: Option<String>) -> Self {
        self.create_time = create_time;
        self.update_time = update_time;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The document identifier (last path segment of [`name`](Self::name)).
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, FieldValue> {
        self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Decoded value of one field; `""` when the field is absent.
    pub fn get(&self, key: &str) -> JsonValue {
        decode(self.fields.get(key))
    }

    pub fn create_time(&self) -> Option<&str> {
        self.create_time.as_deref()
    }

    pub fn update_time(&self) -> Option<&str> {
        self.update_time.as_deref()
    }

    /// All fields decoded into a plain object.
    pub fn to_native(&self) -> JsonMap<String, JsonValue> {
        decode_map(&self.fields)
    }

    /// Deserializes the decoded fields into a caller type.
    pub fn decode_into<T>(&self) -> StoreResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(JsonValue::Object(self.to_native())).map_err(|err| {
            protocol_error(format!("Document '{}' does not match target type: {err}", self.id()))
        })
    }
}
