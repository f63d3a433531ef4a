use httpmock::MockServer;

use crate::store::StoreConfig;

pub const TEST_PROJECT_ID: &str = "demo-project";
pub const TEST_API_KEY: &str = "demo-key";

/// Starts a fresh `httpmock::MockServer`. Panics when no local port can be bound.
pub fn start_mock_server() -> MockServer {
    MockServer::start()
}

/// A config whose requests are routed to `server` over plain HTTP.
pub fn mock_store_config(server: &MockServer) -> StoreConfig {
    StoreConfig::new(TEST_PROJECT_ID, TEST_API_KEY).with_emulator_host(server.address().to_string())
}
