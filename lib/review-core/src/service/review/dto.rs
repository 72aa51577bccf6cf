use shared_types::{PatchId, SessionId, VerificationRequestId};
use strum::IntoStaticStr;

use crate::model::verification_request::VerificationRequest;

/// Handle of a detail review, returned by `begin_review`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ReviewSession {
    pub session_id: SessionId,
    pub record_id: VerificationRequestId,
}

#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading,
    Ready {
        record: VerificationRequest,
        /// Message of the last failed submission or validation.
        error: Option<String>,
    },
    Submitting {
        record: VerificationRequest,
        patch_id: Option<PatchId>,
    },
    Closed,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
