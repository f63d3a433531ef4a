use std::time::Duration;

use crate::store::constants::{
    API_KEY_ENV, DATABASE_ENV, DEFAULT_DATABASE_ID, DEFAULT_REQUEST_TIMEOUT, EMULATOR_HOST_ENV,
    PROJECT_ID_ENV,
};
use crate::store::error::{invalid_argument, StoreResult};

/// Connection settings for one project/database pair.
///
/// Every [`DocumentClient`](crate::store::DocumentClient) owns its own copy, so
/// several configurations can live side by side in one process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    project_id: String,
    api_key: String,
    database: String,
    emulator_host: Option<String>,
    request_timeout: Duration,
}

impl StoreConfig {
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
            database: DEFAULT_DATABASE_ID.to_string(),
            emulator_host: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Reads the configuration from `FOLIO_STORE_PROJECT_ID`, `FOLIO_STORE_API_KEY`,
    /// the optional `FOLIO_STORE_DATABASE` and `FIRESTORE_EMULATOR_HOST`.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let project_id = non_empty(PROJECT_ID_ENV)
            .ok_or_else(|| invalid_argument(format!("{PROJECT_ID_ENV} is not set")))?;
        let api_key = non_empty(API_KEY_ENV)
            .ok_or_else(|| invalid_argument(format!("{API_KEY_ENV} is not set")))?;

        let mut config = Self::new(project_id, api_key);
        if let Some(database) = non_empty(DATABASE_ENV) {
            config = config.with_database(database);
        }
        if let Some(host) = non_empty(EMULATOR_HOST_ENV) {
            config = config.with_emulator_host(host);
        }
        Ok(config)
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_emulator_host(mut self, host: impl Into<String>) -> Self {
        self.emulator_host = Some(host.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn emulator_host(&self) -> Option<&str> {
        self.emulator_host.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub(crate) fn validate(&self) -> StoreResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(invalid_argument("StoreConfig requires a project id"));
        }
        if self.api_key.trim().is_empty() {
            return Err(invalid_argument("StoreConfig requires an api key"));
        }
        Ok(())
    }
}
