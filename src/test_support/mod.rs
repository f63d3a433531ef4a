//! Test utilities shared across crate-level unit tests.

pub mod http;

pub use http::{mock_store_config, start_mock_server, TEST_API_KEY, TEST_PROJECT_ID};
