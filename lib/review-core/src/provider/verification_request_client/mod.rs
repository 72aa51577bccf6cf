//! Backend collaborator for verification requests.
//!
//! Payloads are returned untyped; [`crate::normalization`] converts them.

use serde_json::Value;
use shared_types::VerificationRequestId;

use crate::model::list_query::{ListQuery, PageMeta};
use crate::model::verification_request::StatusUpdate;

pub mod error;
pub mod http;

use error::TransportError;

#[derive(Clone, Debug, PartialEq)]
pub struct RawPage {
    pub data: Vec<Value>,
    pub meta: PageMeta,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait VerificationRequestClient: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<RawPage, TransportError>;

    async fn get(&self, id: VerificationRequestId) -> Result<Value, TransportError>;

    async fn update(
        &self,
        id: VerificationRequestId,
        update: &StatusUpdate,
    ) -> Result<Value, TransportError>;
}
