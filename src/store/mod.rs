pub mod api;
pub mod config;
mod constants;
pub mod error;
mod logger;
pub mod model;
pub mod remote;
pub mod value;

pub use api::{DocumentClient, ListOptions, QuerySpec};
pub use config::StoreConfig;
pub use constants::{API_KEY_ENV, DATABASE_ENV, EMULATOR_HOST_ENV, PROJECT_ID_ENV};
pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use model::Document;
pub use value::{decode, encode, FieldValue};
