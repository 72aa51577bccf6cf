use std::sync::Arc;

use serde_json::json;
use shared_types::VerificationRequestId;

use super::state::ListState;
use super::{ListStore, StoreError};
use crate::model::list_query::{DEFAULT_PER_PAGE, ListQuery, PageMeta, StatusFilter};
use crate::model::verification_request::{RequestStatus, Reviewer, StatusUpdate};
use crate::normalization::{normalize, normalize_page};
use crate::provider::http_client;
use crate::provider::verification_request_client::error::TransportError;
use crate::provider::verification_request_client::{MockVerificationRequestClient, RawPage};

fn meta(total: u64) -> PageMeta {
    PageMeta {
        current_page: 1,
        last_page: 1,
        per_page: 20,
        total,
    }
}

fn raw_page() -> RawPage {
    RawPage {
        data: vec![
            json!({ "id": 1, "status": "pending", "company": { "name": "Acme Supplies" } }),
            json!({ "id": 2, "status": "under_review", "company": { "name": "Blue Logistics" }, "reason": "registry check" }),
            json!({ "name": "no id here" }),
            json!({ "id": 3, "status": "approved", "company": { "name": "Cedar Foods" }, "verifiedBy": { "id": 9, "name": "Omar" } }),
        ],
        meta: meta(3),
    }
}

async fn loaded_store() -> ListStore {
    let mut client = MockVerificationRequestClient::new();
    client.expect_list().returning(|_| Ok(raw_page()));

    let store = ListStore::new(Arc::new(client), DEFAULT_PER_PAGE);
    store.load(ListQuery::default()).await.unwrap();
    store
}

fn loaded_state() -> ListState {
    let mut state = ListState::default();
    let generation = state.begin_load();
    assert!(state.finish_load(
        generation,
        normalize_page(&raw_page().data),
        meta(3),
        ListQuery::default()
    ));
    state
}

fn id(value: i64) -> VerificationRequestId {
    VerificationRequestId::from(value)
}

#[tokio::test]
async fn test_load_keeps_order_and_reports_malformed_rows() {
    let store = loaded_store().await;

    let ids: Vec<i64> = store.records().await.iter().map(|r| r.id.into()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let malformed = store.malformed().await;
    assert_eq!(malformed.len(), 1);
    assert_eq!(malformed[0].index, 2);
    assert_eq!(store.meta().await.total, 3);
    assert_eq!(store.query().await, Some(ListQuery::default()));
}

#[tokio::test]
async fn test_failed_load_keeps_previous_records() {
    let mut client = MockVerificationRequestClient::new();
    let mut sequence = mockall::Sequence::new();
    client
        .expect_list()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(raw_page()));
    client
        .expect_list()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| {
            Err(TransportError::Http(http_client::Error::Transport(
                "connection refused".to_owned(),
            )))
        });

    let store = ListStore::new(Arc::new(client), DEFAULT_PER_PAGE);
    store.load(ListQuery::default()).await.unwrap();

    let query = ListQuery {
        status: StatusFilter::Only(RequestStatus::Rejected),
        ..Default::default()
    };
    let result = store.load(query).await;

    assert!(matches!(result, Err(StoreError::Transport(_))));
    assert_eq!(store.records().await.len(), 3);
    assert_eq!(store.query().await, Some(ListQuery::default()));
}

#[tokio::test]
async fn test_reload_repeats_last_query() {
    let filtered = ListQuery {
        status: StatusFilter::Only(RequestStatus::Pending),
        page: 2,
        ..Default::default()
    };

    let mut client = MockVerificationRequestClient::new();
    let expected = filtered.clone();
    client
        .expect_list()
        .times(2)
        .withf(move |query| *query == expected)
        .returning(|_| Ok(raw_page()));

    let store = ListStore::new(Arc::new(client), DEFAULT_PER_PAGE);
    store.load(filtered).await.unwrap();
    store.reload().await.unwrap();
}

#[test]
fn test_superseded_load_is_discarded() {
    let mut state = loaded_state();

    let first = state.begin_load();
    let second = state.begin_load();

    let stale = normalize_page(&[json!({ "id": 99 })]);
    assert!(!state.finish_load(first, stale, meta(1), ListQuery::default()));
    assert_eq!(state.records().len(), 3);

    let fresh = normalize_page(&[json!({ "id": 42 })]);
    assert!(state.finish_load(second, fresh, meta(1), ListQuery::default()));
    assert_eq!(state.records().len(), 1);
    assert_eq!(i64::from(state.records()[0].id), 42);
}

#[test]
fn test_apply_then_rollback_restores_exact_record() {
    let mut state = loaded_state();
    let before = state.get(id(2)).cloned().unwrap();

    let patch_id = state
        .apply_patch(id(2), &StatusUpdate::new(RequestStatus::Rejected, Some("expired license")))
        .unwrap();

    let patched = state.get(id(2)).unwrap();
    assert_eq!(patched.status, RequestStatus::Rejected);
    assert_eq!(patched.reason.as_deref(), Some("expired license"));
    assert_eq!(state.patch(patch_id).unwrap().previous, before);

    assert!(state.rollback_patch(patch_id));
    assert_eq!(state.get(id(2)), Some(&before));
    assert_eq!(state.outstanding_patches(), 0);
}

#[test]
fn test_patch_of_unknown_row_is_skipped() {
    let mut state = loaded_state();

    let patch_id = state.apply_patch(id(404), &StatusUpdate::new(RequestStatus::Approved, None));

    assert!(patch_id.is_none());
    assert_eq!(state.outstanding_patches(), 0);
}

#[test]
fn test_confirm_replaces_row_and_is_idempotent() {
    let mut state = loaded_state();
    let update = StatusUpdate::new(RequestStatus::Approved, None);
    let patch_id = state.apply_patch(id(1), &update).unwrap();

    let mut authoritative = state.get(id(1)).unwrap().clone();
    authoritative.verified_by = Some(Reviewer {
        id: None,
        name: "Lina".to_owned(),
        picture: None,
    });

    assert!(state.confirm_patch(patch_id, authoritative.clone()));
    assert!(!state.confirm_patch(patch_id, authoritative.clone()));
    assert!(!state.rollback_patch(patch_id));

    assert_eq!(state.get(id(1)), Some(&authoritative));
    let ids: Vec<i64> = state.records().iter().map(|r| r.id.into()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_rollback_of_older_patch_keeps_newer_one_displayed() {
    let mut state = loaded_state();
    let first = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::UnderReview, None))
        .unwrap();
    let second = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::Approved, None))
        .unwrap();

    assert!(state.rollback_patch(first));
    assert_eq!(state.get(id(1)).unwrap().status, RequestStatus::Approved);

    assert!(state.rollback_patch(second));
    assert_eq!(state.get(id(1)).unwrap().status, RequestStatus::Pending);
}

#[test]
fn test_confirm_of_newer_patch_retires_older_one() {
    let mut state = loaded_state();
    let first = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::UnderReview, None))
        .unwrap();
    let second = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::Approved, None))
        .unwrap();

    let authoritative = normalize(&json!({ "id": 1, "status": "approved", "company": { "name": "Acme Supplies" } })).unwrap();
    assert!(state.confirm_patch(second, authoritative.clone()));

    assert!(!state.rollback_patch(first));
    assert_eq!(state.get(id(1)), Some(&authoritative));
    assert_eq!(state.outstanding_patches(), 0);
}

#[test]
fn test_confirm_of_older_patch_keeps_newer_overlay() {
    let mut state = loaded_state();
    let first = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::UnderReview, None))
        .unwrap();
    state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::Rejected, Some("fake address")))
        .unwrap();

    let mut authoritative = normalize(&json!({ "id": 1, "status": "under_review", "company": { "name": "Acme Supplies" } })).unwrap();
    authoritative.verified_by = Some(Reviewer {
        id: None,
        name: "Lina".to_owned(),
        picture: None,
    });
    assert!(state.confirm_patch(first, authoritative));

    let displayed = state.get(id(1)).unwrap();
    assert_eq!(displayed.status, RequestStatus::Rejected);
    assert_eq!(displayed.reason.as_deref(), Some("fake address"));
    assert_eq!(displayed.verified_by.as_ref().unwrap().name, "Lina");
}

#[test]
fn test_load_keeps_patches_of_rows_still_listed() {
    let mut state = loaded_state();
    let kept = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::Approved, None))
        .unwrap();
    let dropped = state
        .apply_patch(id(2), &StatusUpdate::new(RequestStatus::Approved, None))
        .unwrap();

    let generation = state.begin_load();
    let page = normalize_page(&[
        json!({ "id": 1, "status": "pending", "company": { "name": "Acme Supplies Ltd" } }),
        json!({ "id": 3, "status": "approved", "company": { "name": "Cedar Foods" } }),
    ]);
    assert!(state.finish_load(generation, page, meta(2), ListQuery::default()));

    assert_eq!(state.outstanding_patches(), 1);
    assert!(state.patch(dropped).is_none());
    let displayed = state.get(id(1)).unwrap();
    assert_eq!(displayed.status, RequestStatus::Approved);
    assert_eq!(displayed.company.name, "Acme Supplies Ltd");

    assert!(state.rollback_patch(kept));
    let restored = state.get(id(1)).unwrap();
    assert_eq!(restored.status, RequestStatus::Pending);
    assert_eq!(restored.company.name, "Acme Supplies Ltd");
    assert_eq!(state.outstanding_patches(), 0);
}

#[test]
fn test_confirm_after_load_applies_server_record() {
    let mut state = loaded_state();
    let patch_id = state
        .apply_patch(id(1), &StatusUpdate::new(RequestStatus::Approved, None))
        .unwrap();

    let generation = state.begin_load();
    assert!(state.finish_load(
        generation,
        normalize_page(&raw_page().data),
        meta(3),
        ListQuery::default()
    ));
    assert_eq!(state.get(id(1)).unwrap().status, RequestStatus::Approved);

    let authoritative = normalize(&json!({
        "id": 1,
        "status": "approved",
        "company": { "name": "Acme Supplies" },
        "verifiedBy": { "name": "Sara" }
    }))
    .unwrap();
    assert!(state.confirm_patch(patch_id, authoritative.clone()));
    assert_eq!(state.get(id(1)), Some(&authoritative));
    assert_eq!(state.outstanding_patches(), 0);
}

#[tokio::test]
async fn test_reload_before_first_load_uses_configured_page_size() {
    let mut client = MockVerificationRequestClient::new();
    client
        .expect_list()
        .once()
        .withf(|query| query.per_page == 50 && query.page == 1)
        .returning(|_| Ok(raw_page()));

    let store = ListStore::new(Arc::new(client), 50);
    store.reload().await.unwrap();

    assert_eq!(store.query().await.unwrap().per_page, 50);
}

#[tokio::test]
async fn test_store_patch_lifecycle() {
    let store = loaded_store().await;

    let patch_id = store
        .apply_optimistic_patch(id(3), &StatusUpdate::new(RequestStatus::NeedsMoreInfo, Some("send tax card")))
        .await
        .unwrap();
    assert_eq!(store.outstanding_patches().await, 1);
    assert_eq!(store.get(id(3)).await.unwrap().status, RequestStatus::NeedsMoreInfo);

    assert!(store.rollback_patch(patch_id).await);
    assert!(!store.rollback_patch(patch_id).await);
    assert_eq!(store.get(id(3)).await.unwrap().status, RequestStatus::Approved);
}

#[tokio::test]
async fn test_search_matches_company_reason_reviewer_and_id() {
    let store = loaded_store().await;

    let found = |records: Vec<crate::model::verification_request::VerificationRequest>| {
        records.iter().map(|r| i64::from(r.id)).collect::<Vec<_>>()
    };

    assert_eq!(found(store.search("acme").await), vec![1]);
    assert_eq!(found(store.search("REGISTRY").await), vec![2]);
    assert_eq!(found(store.search("omar").await), vec![3]);
    assert_eq!(found(store.search("2").await), vec![2]);
    assert_eq!(found(store.search("  ").await), vec![1, 2, 3]);
    assert!(store.search("nothing").await.is_empty());
}

#[tokio::test]
async fn test_status_counts() {
    let store = loaded_store().await;

    let counts = store.status_counts().await;

    assert_eq!(
        counts,
        vec![
            (RequestStatus::Pending, 1),
            (RequestStatus::UnderReview, 1),
            (RequestStatus::NeedsMoreInfo, 0),
            (RequestStatus::Approved, 1),
            (RequestStatus::Rejected, 0),
        ]
    );
}
