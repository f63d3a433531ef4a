use reqwest::StatusCode;
use serde::Deserialize;

use crate::store::error::{
    invalid_argument, not_found, permission_denied, transport_error, StoreError,
};

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: Option<GoogleError>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Maps a non-2xx response onto the error taxonomy.
///
/// The `status` string of a Google error payload wins over the HTTP code when
/// both are present.
pub fn map_http_error(status: StatusCode, body: &str) -> StoreError {
    let payload = extract_error_payload(body);
    let message = payload
        .as_ref()
        .and_then(|payload| payload.message.clone())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            )
        });

    if let Some(status_string) = payload.as_ref().and_then(|payload| payload.status.as_deref()) {
        if let Some(error) = map_status_code(status_string, &message) {
            return error;
        }
    }

    match status {
        StatusCode::NOT_FOUND => not_found(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => permission_denied(message),
        StatusCode::BAD_REQUEST | StatusCode::PRECONDITION_FAILED => invalid_argument(message),
        _ => transport_error(message),
    }
}

fn map_status_code(status: &str, message: &str) -> Option<StoreError> {
    let error = match status {
        "NOT_FOUND" => not_found(message),
        "PERMISSION_DENIED" | "UNAUTHENTICATED" => permission_denied(message),
        "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => invalid_argument(message),
        "UNAVAILABLE" | "DEADLINE_EXCEEDED" | "RESOURCE_EXHAUSTED" | "INTERNAL" | "UNKNOWN"
        | "ABORTED" | "CANCELLED" | "DATA_LOSS" | "ALREADY_EXISTS" => transport_error(message),
        _ => return None,
    };
    Some(error)
}

fn extract_error_payload(body: &str) -> Option<GoogleError> {
    serde_json::from_str::<GoogleErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
}
