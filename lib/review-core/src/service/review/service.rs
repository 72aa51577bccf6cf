use serde_json::Value;
use shared_types::{PatchId, VerificationRequestId};

use super::ReviewService;
use super::dto::{ReviewSession, SessionState};
use super::session::Ticket;
use crate::model::list_query::{ListQuery, PageMeta};
use crate::model::verification_request::{StatusUpdate, VerificationRequest};
use crate::normalization::{normalize, normalize_update};
use crate::policy::validate_transition;
use crate::provider::verification_request_client::error::TransportError;
use crate::service::error::ServiceError;

impl ReviewService {
    /// Loads a list page into the store, using the configured page size when unset.
    pub async fn load(&self, query: ListQuery) -> Result<PageMeta, ServiceError> {
        let query = if query.per_page == 0 {
            ListQuery {
                per_page: self.config.per_page,
                ..query
            }
        } else {
            query
        };

        Ok(self.store.load(query).await?)
    }

    pub async fn reload(&self) -> Result<PageMeta, ServiceError> {
        Ok(self.store.reload().await?)
    }

    /// One-click status change of a row in the current list.
    ///
    /// Validation failures return before the store or the backend is touched.
    /// The optimistic change is confirmed with the server record, or rolled back on failure.
    pub async fn quick_update(
        &self,
        id: VerificationRequestId,
        status: &str,
        reason: Option<&str>,
    ) -> Result<VerificationRequest, ServiceError> {
        let current = self
            .store
            .get(id)
            .await
            .ok_or(ServiceError::RecordNotFound(id))?;

        let next = validate_transition(current.status, status, reason).inspect_err(|error| {
            tracing::debug!(%id, %error, "Quick update rejected by validation");
        })?;
        let update = StatusUpdate::new(next, reason);

        let ticket = self.sessions.lock().await.issue(id);
        let patch_id = self.store.apply_optimistic_patch(id, &update).await;

        let response = self.client.update(id, &update).await;

        let is_current = {
            let mut sessions = self.sessions.lock().await;
            let is_current = sessions.is_current(id, ticket);
            sessions.release(id, ticket);
            is_current
        };
        if !is_current {
            return Err(self.discard(id, patch_id).await);
        }

        self.reconcile(&current, patch_id, response).await
    }

    /// Starts a detail review of a record. Nothing is fetched until [`Self::open_detail`].
    pub async fn begin_review(&self, id: VerificationRequestId) -> ReviewSession {
        let session = self.sessions.lock().await.open(id);
        tracing::debug!(%id, session_id = %session.session_id, "Review session started");
        session
    }

    /// Current state of a session; `Closed` once it has been closed.
    pub async fn session_state(&self, session: &ReviewSession) -> SessionState {
        self.sessions
            .lock()
            .await
            .state(session.session_id)
            .cloned()
            .unwrap_or(SessionState::Closed)
    }

    /// Fetches the full record, documents included, and makes the session ready for a decision.
    pub async fn open_detail(
        &self,
        session: &ReviewSession,
    ) -> Result<VerificationRequest, ServiceError> {
        let id = session.record_id;
        let ticket = {
            let mut sessions = self.sessions.lock().await;
            match sessions.state(session.session_id) {
                Some(SessionState::Idle | SessionState::Ready { .. }) => {}
                other => return Err(invalid_state("idle", other)),
            }
            sessions
                .issue_for_session(session.session_id, SessionState::Loading)
                .ok_or(ServiceError::SessionDiscarded(id))?
        };

        tracing::debug!(%id, "Loading verification request detail");
        let result = match self.client.get(id).await {
            Ok(raw) => authoritative_record(id, &raw),
            Err(error) => Err(error.into()),
        };

        let mut sessions = self.sessions.lock().await;
        if !sessions.is_session_current(session.session_id, ticket) {
            tracing::warn!(%id, "Discarding detail of a closed review session");
            return Err(ServiceError::SessionDiscarded(id));
        }

        match result {
            Ok(record) => {
                sessions.finish(
                    session.session_id,
                    ticket,
                    SessionState::Ready {
                        record: record.clone(),
                        error: None,
                    },
                );
                Ok(record)
            }
            Err(error) => {
                tracing::error!(%id, %error, "Failed to load verification request detail");
                sessions.finish(session.session_id, ticket, SessionState::Idle);
                Err(error)
            }
        }
    }

    /// Submits the decision of a ready session.
    ///
    /// On success the session returns to `Idle`; on failure it stays `Ready` with the error.
    pub async fn submit_update(
        &self,
        session: &ReviewSession,
        status: &str,
        reason: Option<&str>,
    ) -> Result<VerificationRequest, ServiceError> {
        let id = session.record_id;
        let (record, update, ticket) = {
            let mut sessions = self.sessions.lock().await;
            let record = match sessions.state(session.session_id) {
                Some(SessionState::Ready { record, .. }) => record.clone(),
                other => return Err(invalid_state("ready", other)),
            };

            let next = match validate_transition(record.status, status, reason) {
                Ok(next) => next,
                Err(error) => {
                    tracing::debug!(%id, %error, "Submission rejected by validation");
                    let error = ServiceError::from(error);
                    sessions.set_state(
                        session.session_id,
                        SessionState::Ready {
                            record,
                            error: Some(self.user_message(&error)),
                        },
                    );
                    return Err(error);
                }
            };

            let ticket = sessions.issue(id);
            sessions.begin(
                session.session_id,
                ticket,
                SessionState::Submitting {
                    record: record.clone(),
                    patch_id: None,
                },
            );
            (record, StatusUpdate::new(next, reason), ticket)
        };

        let patch_id = self.store.apply_optimistic_patch(id, &update).await;
        {
            let mut sessions = self.sessions.lock().await;
            if sessions.is_session_current(session.session_id, ticket) {
                sessions.set_state(
                    session.session_id,
                    SessionState::Submitting {
                        record: record.clone(),
                        patch_id,
                    },
                );
            } else {
                sessions.release(id, ticket);
                drop(sessions);
                return Err(self.discard(id, patch_id).await);
            }
        }

        let response = self.client.update(id, &update).await;

        let is_current = {
            let mut sessions = self.sessions.lock().await;
            let is_current = sessions.is_current(id, ticket)
                && sessions.is_session_current(session.session_id, ticket);
            sessions.release(id, ticket);
            is_current
        };
        if !is_current {
            let error = self.discard(id, patch_id).await;
            let message = self.user_message(&error);
            self.sessions.lock().await.finish(
                session.session_id,
                ticket,
                SessionState::Ready {
                    record,
                    error: Some(message),
                },
            );
            return Err(error);
        }

        let result = self.reconcile(&record, patch_id, response).await;

        let next_state = match &result {
            Ok(_) => SessionState::Idle,
            Err(error) => SessionState::Ready {
                record,
                error: Some(self.user_message(error)),
            },
        };
        self.sessions
            .lock()
            .await
            .finish(session.session_id, ticket, next_state);

        result
    }

    /// Ends a session. A pending optimistic change of the session is rolled back right away
    /// and its response is ignored when it arrives.
    pub async fn close(&self, session: &ReviewSession) {
        let previous = self.sessions.lock().await.close(session.session_id);

        if let Some(SessionState::Submitting {
            patch_id: Some(patch_id),
            ..
        }) = previous
        {
            tracing::warn!(id = %session.record_id, %patch_id, "Review closed while submitting");
            self.store.rollback_patch(patch_id).await;
        }
        tracing::debug!(id = %session.record_id, session_id = %session.session_id, "Review session closed");
    }

    /// Message for the reviewer, with the configured fallback for errors without one.
    pub fn user_message(&self, error: &ServiceError) -> String {
        error.user_message(&self.config.generic_error_message)
    }

    /// Settles a submission. `previous` is the record the update was made from.
    async fn reconcile(
        &self,
        previous: &VerificationRequest,
        patch_id: Option<PatchId>,
        response: Result<Value, TransportError>,
    ) -> Result<VerificationRequest, ServiceError> {
        let id = previous.id;
        let result = response
            .map_err(ServiceError::from)
            .and_then(|raw| normalize_update(&raw, previous).map_err(ServiceError::from))
            .and_then(|record| expect_id(id, record));

        match result {
            Ok(record) => {
                if let Some(patch_id) = patch_id {
                    self.store.confirm_patch(patch_id, record.clone()).await;
                }
                tracing::info!(%id, status = %record.status, "Verification request status changed");
                Ok(record)
            }
            Err(error) => {
                if let Some(patch_id) = patch_id {
                    self.store.rollback_patch(patch_id).await;
                }
                tracing::warn!(%id, %error, "Status update failed, optimistic change rolled back");
                Err(error)
            }
        }
    }

    async fn discard(&self, id: VerificationRequestId, patch_id: Option<PatchId>) -> ServiceError {
        if let Some(patch_id) = patch_id {
            self.store.rollback_patch(patch_id).await;
        }
        tracing::warn!(%id, "Discarding stale status update response");
        ServiceError::SessionDiscarded(id)
    }
}

fn authoritative_record(
    id: VerificationRequestId,
    raw: &Value,
) -> Result<VerificationRequest, ServiceError> {
    expect_id(id, normalize(raw)?)
}

fn expect_id(
    id: VerificationRequestId,
    record: VerificationRequest,
) -> Result<VerificationRequest, ServiceError> {
    if record.id != id {
        return Err(TransportError::InvalidBody(format!(
            "expected verification request `{id}`, got `{}`",
            record.id
        ))
        .into());
    }
    Ok(record)
}

fn invalid_state(expected: &'static str, actual: Option<&SessionState>) -> ServiceError {
    ServiceError::InvalidSessionState {
        expected,
        actual: actual.unwrap_or(&SessionState::Closed).name(),
    }
}
