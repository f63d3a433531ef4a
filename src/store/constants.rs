use std::time::Duration;

pub const DEFAULT_DATABASE_ID: &str = "(default)";
pub const STORE_API_HOST: &str = "https://firestore.googleapis.com";
pub const STORE_API_VERSION: &str = "v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const PROJECT_ID_ENV: &str = "FOLIO_STORE_PROJECT_ID";
pub const API_KEY_ENV: &str = "FOLIO_STORE_API_KEY";
pub const DATABASE_ENV: &str = "FOLIO_STORE_DATABASE";
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

pub(crate) const LOGGER_NAME: &str = "@folio/store";
