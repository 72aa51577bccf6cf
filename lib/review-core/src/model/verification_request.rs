use serde::{Deserialize, Serialize};
use shared_types::{CompanyId, ReviewerId, VerificationRequestId};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use time::OffsetDateTime;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    UnderReview,
    NeedsMoreInfo,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::UnderReview,
        RequestStatus::NeedsMoreInfo,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ];

    /// Statuses a reviewer can pick in the detail view.
    pub const ACTIONABLE: [RequestStatus; 4] = [
        RequestStatus::UnderReview,
        RequestStatus::NeedsMoreInfo,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ];

    pub fn requires_reason(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::NeedsMoreInfo)
    }
}

/// Normalized view of a supplier verification request.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationRequest {
    pub id: VerificationRequestId,
    pub status: RequestStatus,
    pub reason: Option<String>,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
    pub company: CompanySummary,
    /// Set by the backend once a reviewer has changed the status.
    pub verified_by: Option<Reviewer>,
    pub documents: Vec<RequestDocument>,
}

/// Company data is owned by the companies screens and read-only here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanySummary {
    pub id: Option<CompanyId>,
    pub name: String,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub founded_year: Option<i32>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reviewer {
    pub id: Option<ReviewerId>,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RequestDocument {
    pub id: i64,
    pub file_name: String,
    pub size_label: String,
    pub url: Option<String>,
}

/// Status and reason are always submitted together in one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: RequestStatus,
    pub reason: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: RequestStatus, reason: Option<&str>) -> Self {
        Self {
            status,
            reason: reason
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
                .map(ToOwned::to_owned),
        }
    }
}

impl VerificationRequest {
    pub fn with_update(&self, update: &StatusUpdate) -> Self {
        Self {
            status: update.status,
            reason: update.reason.clone(),
            ..self.clone()
        }
    }
}
