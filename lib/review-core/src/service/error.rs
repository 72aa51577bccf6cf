use shared_types::VerificationRequestId;
use thiserror::Error;

use crate::error::{ErrorCode, ErrorCodeMixin};
use crate::normalization::MalformedRecordError;
use crate::policy::ValidationError;
use crate::provider::verification_request_client::error::TransportError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    MalformedRecord(#[from] MalformedRecordError),
    #[error("List load superseded by a newer query")]
    LoadSuperseded,
    #[error("Verification request `{0}` is not in the current list")]
    RecordNotFound(VerificationRequestId),
    #[error("Review of `{0}` was discarded before the response arrived")]
    SessionDiscarded(VerificationRequestId),
    #[error("Review session is `{actual}`, expected `{expected}`")]
    InvalidSessionState {
        expected: &'static str,
        actual: &'static str,
    },
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Transport(error) => ServiceError::Transport(error),
            StoreError::Superseded => ServiceError::LoadSuperseded,
        }
    }
}

impl ErrorCodeMixin for ServiceError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ServiceError::Validation(error) => error.error_code(),
            ServiceError::Transport(error) => error.error_code(),
            ServiceError::MalformedRecord(error) => error.error_code(),
            ServiceError::LoadSuperseded => ErrorCode::BR_0010,
            ServiceError::RecordNotFound(_) => ErrorCode::BR_0009,
            ServiceError::SessionDiscarded(_) => ErrorCode::BR_0007,
            ServiceError::InvalidSessionState { .. } => ErrorCode::BR_0008,
        }
    }
}

impl ServiceError {
    /// Text to show the reviewer.
    ///
    /// Backend rejections are shown verbatim when they carry a `message`; transport and
    /// payload failures without one fall back to `generic`.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            ServiceError::Transport(error) => error
                .backend_message()
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| generic.to_owned()),
            ServiceError::MalformedRecord(_) => generic.to_owned(),
            ServiceError::Validation(_)
            | ServiceError::LoadSuperseded
            | ServiceError::RecordNotFound(_)
            | ServiceError::SessionDiscarded(_)
            | ServiceError::InvalidSessionState { .. } => self.to_string(),
        }
    }
}
