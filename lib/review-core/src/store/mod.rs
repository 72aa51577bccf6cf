//! List reconciliation store.
//!
//! Holds the currently displayed page of verification requests and keeps it in sync
//! with optimistic status changes. Patches are identified by [`PatchId`] and resolved
//! exactly once, either confirmed with the server record or rolled back.

use std::sync::Arc;

use shared_types::{PatchId, VerificationRequestId};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::error::{ErrorCode, ErrorCodeMixin};
use crate::model::list_query::{ListQuery, PageMeta};
use crate::model::verification_request::{RequestStatus, StatusUpdate, VerificationRequest};
use crate::normalization::{MalformedRow, normalize_page};
use crate::provider::verification_request_client::VerificationRequestClient;
use crate::provider::verification_request_client::error::TransportError;

mod state;

pub use state::OptimisticPatch;
use state::ListState;

#[cfg(test)]
mod test;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Loading verification requests failed: {0}")]
    Transport(#[from] TransportError),
    #[error("List load superseded by a newer query")]
    Superseded,
}

impl ErrorCodeMixin for StoreError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Transport(error) => error.error_code(),
            Self::Superseded => ErrorCode::BR_0010,
        }
    }
}

pub struct ListStore {
    client: Arc<dyn VerificationRequestClient>,
    default_query: ListQuery,
    state: Mutex<ListState>,
}

impl ListStore {
    /// `per_page` sizes the query used by [`Self::reload`] before anything was loaded.
    pub fn new(client: Arc<dyn VerificationRequestClient>, per_page: u32) -> Self {
        Self {
            client,
            default_query: ListQuery::with_default_per_page(per_page),
            state: Mutex::new(ListState::default()),
        }
    }

    /// Fetches one page and replaces the held records.
    ///
    /// Optimistic patches still in flight stay shown on rows that are on the new page.
    /// On failure the previous records stay in place. When another load was started
    /// before this one finished, its result is discarded with [`StoreError::Superseded`].
    pub async fn load(&self, query: ListQuery) -> Result<PageMeta, StoreError> {
        let query = query.validated();
        let generation = self.state.lock().await.begin_load();

        tracing::debug!(status = %query.status, page = query.page, "Loading verification requests");
        let page = self.client.list(&query).await.inspect_err(|error| {
            tracing::error!(%error, "Failed to load verification requests");
        })?;

        let normalized = normalize_page(&page.data);
        let loaded = normalized.records.len();
        let skipped = normalized.malformed.len();

        let mut state = self.state.lock().await;
        if !state.finish_load(generation, normalized, page.meta, query) {
            tracing::debug!("Discarding superseded verification request page");
            return Err(StoreError::Superseded);
        }

        tracing::info!(loaded, skipped, total = page.meta.total, "Verification requests loaded");
        Ok(page.meta)
    }

    /// Re-runs the last query, or the default one if nothing was loaded yet.
    pub async fn reload(&self) -> Result<PageMeta, StoreError> {
        let query = self.state.lock().await.query().cloned();
        self.load(query.unwrap_or_else(|| self.default_query.clone()))
            .await
    }

    /// Shows `update` on the row right away. Returns `None` when the row is not in the list.
    pub async fn apply_optimistic_patch(
        &self,
        id: VerificationRequestId,
        update: &StatusUpdate,
    ) -> Option<PatchId> {
        let patch_id = self.state.lock().await.apply_patch(id, update);
        match patch_id {
            Some(patch_id) => {
                tracing::debug!(%id, %patch_id, status = %update.status, "Applied optimistic patch")
            }
            None => tracing::debug!(%id, "Row not in list, optimistic patch skipped"),
        }
        patch_id
    }

    /// Replaces the row with the server record. Resolving an unknown patch is a no-op.
    pub async fn confirm_patch(&self, patch_id: PatchId, authoritative: VerificationRequest) -> bool {
        let confirmed = self.state.lock().await.confirm_patch(patch_id, authoritative);
        tracing::debug!(%patch_id, confirmed, "Confirm optimistic patch");
        confirmed
    }

    /// Restores the row as it was before the patch. Resolving an unknown patch is a no-op.
    pub async fn rollback_patch(&self, patch_id: PatchId) -> bool {
        let rolled_back = self.state.lock().await.rollback_patch(patch_id);
        tracing::debug!(%patch_id, rolled_back, "Rollback optimistic patch");
        rolled_back
    }

    pub async fn records(&self) -> Vec<VerificationRequest> {
        self.state.lock().await.records().to_vec()
    }

    pub async fn get(&self, id: VerificationRequestId) -> Option<VerificationRequest> {
        self.state.lock().await.get(id).cloned()
    }

    pub async fn meta(&self) -> PageMeta {
        self.state.lock().await.meta()
    }

    pub async fn query(&self) -> Option<ListQuery> {
        self.state.lock().await.query().cloned()
    }

    pub async fn malformed(&self) -> Vec<MalformedRow> {
        self.state.lock().await.malformed().to_vec()
    }

    pub async fn patch(&self, patch_id: PatchId) -> Option<OptimisticPatch> {
        self.state.lock().await.patch(patch_id).cloned()
    }

    pub async fn outstanding_patches(&self) -> usize {
        self.state.lock().await.outstanding_patches()
    }

    /// Client-side filter over the held page: company, reason, reviewer or exact id.
    pub async fn search(&self, term: &str) -> Vec<VerificationRequest> {
        self.state.lock().await.search(term)
    }

    /// Number of held rows per status, in [`RequestStatus::ALL`] order.
    pub async fn status_counts(&self) -> Vec<(RequestStatus, usize)> {
        self.state.lock().await.status_counts()
    }
}
