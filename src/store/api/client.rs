use std::collections::BTreeMap;

use reqwest::Method;
use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::store::api::query::{ListOptions, QuerySpec};
use crate::store::config::StoreConfig;
use crate::store::error::{invalid_argument, protocol_error, StoreResult};
use crate::store::logger::LOGGER;
use crate::store::model::{canonical_field_name, Document};
use crate::store::remote::connection::{encode_segment, Connection, StoreRequest};
use crate::store::remote::serializer::{decode_document, encode_document_body, encode_value};
use crate::store::remote::structured_query::{decode_run_query_response, encode_run_query_body};
use crate::store::value::{encode, encode_map, FieldValue};

/// CRUD and query access to one database.
///
/// Every call is a single request/response exchange. `token`, when given, is
/// sent as a bearer credential; the client never stores or refreshes it.
///
/// Nothing here is atomic across calls. A read followed by a `patch` races with
/// other writers to the same document and the last write wins; use
/// [`increment`](Self::increment) for counters.
#[derive(Clone, Debug)]
pub struct DocumentClient {
    connection: Connection,
}

impl DocumentClient {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        Connection::builder(config).build().map(Self::from_connection)
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Fetches one document. A missing document is reported as `NotFound`.
    pub async fn get(&self, collection: &str, id: &str, token: Option<&str>) -> StoreResult<Document> {
        let request = StoreRequest::new(Method::GET, document_path(collection, id)?);
        let response = self.connection.invoke_json(request, token).await?;
        decode_document(&response)
    }

    /// Lists a collection.
    ///
    /// Without `page_size` every page is fetched; with it only the first page
    /// is returned. A response without `documents` means an empty collection.
    pub async fn list(
        &self,
        collection: &str,
        options: &ListOptions,
        token: Option<&str>,
    ) -> StoreResult<Vec<Document>> {
        let path = collection_path(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut previous_token: Option<String> = None;

        loop {
            let mut request = StoreRequest::new(Method::GET, path.clone());
            if let Some(order_by) = options.order_by.as_deref() {
                request = request.with_query("orderBy", order_by);
            }
            if let Some(page_size) = options.page_size {
                request = request.with_query("pageSize", page_size.to_string());
            }
            if let Some(page_token) = page_token.take() {
                request = request.with_query("pageToken", page_token.clone());
                previous_token = Some(page_token);
            }

            let response = self.connection.invoke_json(request, token).await?;
            if let Some(entries) = response.get("documents") {
                let entries = entries
                    .as_array()
                    .ok_or_else(|| protocol_error("'documents' must be an array"))?;
                for entry in entries {
                    documents.push(decode_document(entry)?);
                }
            }

            if options.page_size.is_some() {
                break;
            }
            match response.get("nextPageToken").and_then(JsonValue::as_str) {
                Some(next) if previous_token.as_deref() == Some(next) => {
                    LOGGER.warn(format!(
                        "list {collection}: store repeated page token, stopping pagination"
                    ));
                    break;
                }
                Some(next) if !next.is_empty() => page_token = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(documents)
    }

    /// Creates a document with a store-generated id, available as
    /// [`Document::id`] on the result.
    pub async fn create(
        &self,
        collection: &str,
        data: &JsonMap<String, JsonValue>,
        token: Option<&str>,
    ) -> StoreResult<Document> {
        self.create_fields(collection, &encode_map(data), token).await
    }

    /// Same as [`create`](Self::create) for already encoded fields, e.g. ones
    /// built with [`encode_timestamp`](crate::store::value::encode_timestamp).
    pub async fn create_fields(
        &self,
        collection: &str,
        fields: &BTreeMap<String, FieldValue>,
        token: Option<&str>,
    ) -> StoreResult<Document> {
        let body = encode_document_body(fields);
        let request = StoreRequest::new(Method::POST, collection_path(collection)).with_body(body);
        let response = self.connection.invoke_json(request, token).await?;
        decode_document(&response)
    }

    /// Updates exactly the top-level keys of `data`; other fields are left
    /// alone. Fails with `NotFound` instead of creating the document.
    pub async fn patch(
        &self,
        collection: &str,
        id: &str,
        data: &JsonMap<String, JsonValue>,
        token: Option<&str>,
    ) -> StoreResult<Document> {
        self.patch_fields(collection, id, &encode_map(data), token).await
    }

    /// Same as [`patch`](Self::patch) for already encoded fields.
    pub async fn patch_fields(
        &self,
        collection: &str,
        id: &str,
        fields: &BTreeMap<String, FieldValue>,
        token: Option<&str>,
    ) -> StoreResult<Document> {
        // An empty mask would make the store replace the whole document.
        if fields.is_empty() {
            return Err(invalid_argument("patch requires at least one field"));
        }

        let mut request = StoreRequest::new(Method::PATCH, document_path(collection, id)?)
            .with_body(encode_document_body(fields));
        for key in fields.keys() {
            request = request.with_query("updateMask.fieldPaths", canonical_field_name(key));
        }
        request = request.with_query("currentDocument.exists", "true");

        let response = self.connection.invoke_json(request, token).await?;
        decode_document(&response)
    }

    /// Deletes a document. A `NotFound` from the store is returned as is;
    /// callers that treat deletion as idempotent can match on
    /// [`StoreError::is_not_found`](crate::store::StoreError::is_not_found).
    pub async fn delete(&self, collection: &str, id: &str, token: Option<&str>) -> StoreResult<()> {
        let request = StoreRequest::new(Method::DELETE, document_path(collection, id)?);
        self.connection.invoke_json(request, token).await.map(|_| ())
    }

    /// Runs a structured query and returns the matching documents in the
    /// order the store produced them.
    pub async fn query(
        &self,
        collection: &str,
        spec: &QuerySpec,
        token: Option<&str>,
    ) -> StoreResult<Vec<Document>> {
        let request = StoreRequest::new(Method::POST, "documents:runQuery")
            .with_body(encode_run_query_body(collection, spec));
        let response = self.connection.invoke_json(request, token).await?;
        decode_run_query_response(&response)
    }

    /// Atomically adds `by` to a numeric field on the server.
    ///
    /// A missing document or field starts from zero.
    pub async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: impl Into<JsonValue>,
        token: Option<&str>,
    ) -> StoreResult<()> {
        let operand = encode(&by.into());
        if operand.as_f64().is_none() {
            return Err(invalid_argument("increment operand must be a number"));
        }

        if id.is_empty() {
            return Err(invalid_argument("Document id must not be empty"));
        }
        // Resource names in request bodies are not percent-encoded.
        let document = format!(
            "{}/documents/{collection}/{id}",
            self.connection.database_name()
        );
        let body = json!({
            "writes": [{
                "transform": {
                    "document": document,
                    "fieldTransforms": [{
                        "fieldPath": canonical_field_name(field),
                        "increment": encode_value(&operand)
                    }]
                }
            }]
        });
        let request = StoreRequest::new(Method::POST, "documents:commit").with_body(body);
        self.connection.invoke_json(request, token).await.map(|_| ())
    }
}

fn collection_path(collection: &str) -> String {
    format!("documents/{}", encode_segment(collection))
}

fn document_path(collection: &str, id: &str) -> StoreResult<String> {
    if id.is_empty() {
        return Err(invalid_argument("Document id must not be empty"));
    }
    Ok(format!(
        "documents/{}/{}",
        encode_segment(collection),
        encode_segment(id)
    ))
}
