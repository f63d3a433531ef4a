use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreErrorCode {
    NotFound,
    PermissionDenied,
    Transport,
    Protocol,
    InvalidArgument,
}

impl StoreErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorCode::NotFound => "store/not-found",
            StoreErrorCode::PermissionDenied => "store/permission-denied",
            StoreErrorCode::Transport => "store/transport",
            StoreErrorCode::Protocol => "store/protocol",
            StoreErrorCode::InvalidArgument => "store/invalid-argument",
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreError {
    pub code: StoreErrorCode,
    message: String,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn not_found(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorCode::NotFound, message)
}

pub fn permission_denied(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorCode::PermissionDenied, message)
}

pub fn transport_error(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorCode::Transport, message)
}

pub fn protocol_error(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorCode::Protocol, message)
}

pub fn invalid_argument(message: impl Into<String>) -> StoreError {
    StoreError::new(StoreErrorCode::InvalidArgument, message)
}
