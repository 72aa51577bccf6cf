use thiserror::Error;

use crate::error::{ErrorCode, ErrorCodeMixin};
use crate::model::verification_request::RequestStatus;


#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid status `{0}`")]
    InvalidStatus(String),
    #[error("A reason is required to set status `{0}`")]
    ReasonRequired(RequestStatus),
}

impl ErrorCodeMixin for ValidationError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidStatus(_) => ErrorCode::BR_0002,
            Self::ReasonRequired(_) => ErrorCode::BR_0003,
        }
    }
}

/// Checks a requested status change before anything is sent to the backend.
///
/// Any status may move to any other status; the backend decides business legality.
/// Only the reason requirement of `rejected` and `needs_more_info` is enforced here.
pub fn validate_transition(
    current: RequestStatus,
    next: &str,
    reason: Option<&str>,
) -> Result<RequestStatus, ValidationError> {
    let next = next
        .trim()
        .parse::<RequestStatus>()
        .map_err(|_| ValidationError::InvalidStatus(next.to_owned()))?;

    let has_reason = reason.is_some_and(|reason| !reason.trim().is_empty());
    if next.requires_reason() && !has_reason {
        return Err(ValidationError::ReasonRequired(next));
    }

    tracing::trace!(%current, %next, "Status transition accepted");
    Ok(next)
}
