use thiserror::Error;

use crate::error::{ErrorCode, ErrorCodeMixin};
use crate::provider::http_client::{self, StatusCode};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Http(#[from] http_client::Error),
    #[error("Backend responded with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Query encoding error: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

impl TransportError {
    /// The `message` the backend put in its error body, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl ErrorCodeMixin for TransportError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Status { status, .. } if status.is_not_found() => ErrorCode::BR_0009,
            Self::Status { .. } => ErrorCode::BR_0004,
            Self::Http(_) => ErrorCode::BR_0005,
            Self::InvalidBody(_) | Self::Url(_) | Self::Query(_) => ErrorCode::BR_0006,
        }
    }
}
