#![cfg(not(target_arch = "wasm32"))]

use std::panic;

use folio_store::store::api::query::{operators, Direction};
use folio_store::store::{DocumentClient, FieldValue, QuerySpec, StoreConfig, StoreErrorCode};
use httpmock::prelude::*;
use serde_json::{json, Map, Value};

const DOCS: &str = "/v1/projects/portfolio-demo/databases/(default)/documents";

fn start_server(test: &str) -> Option<MockServer> {
    match panic::catch_unwind(|| MockServer::start()) {
        Ok(server) => Some(server),
        Err(_) => {
            eprintln!("Skipping {test}: unable to bind mock server in this environment.");
            None
        }
    }
}

fn client_for(server: &MockServer) -> DocumentClient {
    let config = StoreConfig::new("portfolio-demo", "portfolio-key")
        .with_emulator_host(server.address().to_string());
    DocumentClient::new(config).expect("client")
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object literal")
}

#[tokio::test]
async fn created_project_reads_back_as_native_data() {
    let Some(server) = start_server("created_project_reads_back_as_native_data") else {
        return;
    };
    let fields = json!({
        "title": { "stringValue": "Demo" },
        "isPublic": { "booleanValue": true },
        "tags": { "arrayValue": { "values": [
            { "stringValue": "a" },
            { "stringValue": "b" }
        ] } }
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{DOCS}/projects"))
            .query_param("key", "portfolio-key")
            .json_body(json!({ "fields": fields.clone() }));
        then.status(200).json_body(json!({
            "name": "projects/portfolio-demo/databases/(default)/documents/projects/p1",
            "fields": fields.clone(),
            "createTime": "2024-05-01T10:00:00Z",
            "updateTime": "2024-05-01T10:00:00Z"
        }));
    });

    let data = object(json!({ "title": "Demo", "isPublic": true, "tags": ["a", "b"] }));
    let document = client_for(&server)
        .create("projects", &data, None)
        .await
        .expect("create project");

    create.assert();
    assert_eq!(document.id(), "p1");
    assert_eq!(document.field("title"), Some(&FieldValue::String("Demo".into())));
    assert_eq!(document.field("isPublic"), Some(&FieldValue::Boolean(true)));
    assert_eq!(document.to_native(), data);
    assert_eq!(document.create_time(), Some("2024-05-01T10:00:00Z"));
}

#[tokio::test]
async fn public_projects_query_skips_empty_result_entries() {
    let Some(server) = start_server("public_projects_query_skips_empty_result_entries") else {
        return;
    };
    let run_query = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{DOCS}:runQuery"))
            .header("authorization", "Bearer editor-token")
            .json_body(json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "projects" }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": "isPublic" },
                            "op": "EQUAL",
                            "value": { "booleanValue": true }
                        }
                    },
                    "orderBy": [{
                        "field": { "fieldPath": "title" },
                        "direction": "ASCENDING"
                    }]
                }
            }));
        then.status(200).json_body(json!([
            { "readTime": "2024-05-01T10:00:00Z" },
            { "document": {
                "name": "projects/portfolio-demo/databases/(default)/documents/projects/p1",
                "fields": { "title": { "stringValue": "Demo" } }
            } },
            { "readTime": "2024-05-01T10:00:01Z", "skippedResults": 1 }
        ]));
    });

    let spec = QuerySpec::new()
        .where_field("isPublic", operators::EQUAL, true)
        .order_by("title", Direction::Ascending);
    let documents = client_for(&server)
        .query("projects", &spec, Some("editor-token"))
        .await
        .expect("run query");

    run_query.assert();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].get("title"), json!("Demo"));
    assert_eq!(documents[0].get("missing"), json!(""));
}

#[tokio::test]
async fn visit_counter_uses_server_side_increment() {
    let Some(server) = start_server("visit_counter_uses_server_side_increment") else {
        return;
    };
    let commit = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{DOCS}:commit"))
            .json_body(json!({
                "writes": [{
                    "transform": {
                        "document": "projects/portfolio-demo/databases/(default)/documents/stats/visits",
                        "fieldTransforms": [{
                            "fieldPath": "count",
                            "increment": { "integerValue": "1" }
                        }]
                    }
                }]
            }));
        then.status(200)
            .json_body(json!({ "commitTime": "2024-05-01T10:00:00Z" }));
    });

    client_for(&server)
        .increment("stats", "visits", "count", 1, None)
        .await
        .expect("increment");
    commit.assert();
}

#[tokio::test]
async fn deleting_a_missing_article_reports_not_found() {
    let Some(server) = start_server("deleting_a_missing_article_reports_not_found") else {
        return;
    };
    server.mock(|when, then| {
        when.method(DELETE).path(format!("{DOCS}/articles/gone"));
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "No document to update", "status": "NOT_FOUND" }
        }));
    });

    let err = client_for(&server)
        .delete("articles", "gone", None)
        .await
        .expect_err("missing document");
    assert_eq!(err.code, StoreErrorCode::NotFound);
    assert!(err.is_not_found());
}
