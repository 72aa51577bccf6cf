use std::collections::HashMap;

use indexmap::IndexMap;
use shared_types::{PatchId, VerificationRequestId};
use time::OffsetDateTime;

use crate::model::list_query::{ListQuery, PageMeta};
use crate::model::verification_request::{RequestStatus, StatusUpdate, VerificationRequest};
use crate::normalization::{MalformedRow, NormalizedPage};

/// Undo information of one optimistic status change.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimisticPatch {
    pub patch_id: PatchId,
    pub record_id: VerificationRequestId,
    /// Row as displayed right before the patch was applied.
    pub previous: VerificationRequest,
    pub update: StatusUpdate,
    pub applied_at: OffsetDateTime,
}

/// Synchronous core of the list store.
///
/// A row with outstanding patches is displayed as its last confirmed record overlaid
/// with the most recently applied outstanding patch. Rows never change position.
#[derive(Debug)]
pub(crate) struct ListState {
    records: Vec<VerificationRequest>,
    meta: PageMeta,
    query: Option<ListQuery>,
    malformed: Vec<MalformedRow>,
    patches: IndexMap<PatchId, OptimisticPatch>,
    confirmed: HashMap<VerificationRequestId, VerificationRequest>,
    last_patch_id: PatchId,
    load_generation: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            records: vec![],
            meta: PageMeta::default(),
            query: None,
            malformed: vec![],
            patches: IndexMap::new(),
            confirmed: HashMap::new(),
            last_patch_id: PatchId::from(0),
            load_generation: 0,
        }
    }
}

impl ListState {
    pub fn records(&self) -> &[VerificationRequest] {
        &self.records
    }

    pub fn meta(&self) -> PageMeta {
        self.meta
    }

    pub fn query(&self) -> Option<&ListQuery> {
        self.query.as_ref()
    }

    pub fn malformed(&self) -> &[MalformedRow] {
        &self.malformed
    }

    pub fn get(&self, id: VerificationRequestId) -> Option<&VerificationRequest> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn patch(&self, patch_id: PatchId) -> Option<&OptimisticPatch> {
        self.patches.get(&patch_id)
    }

    pub fn outstanding_patches(&self) -> usize {
        self.patches.len()
    }

    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.load_generation
    }

    /// Replaces the held page, unless a newer load was started meanwhile.
    ///
    /// Outstanding patches of rows on the new page are kept and overlaid on the fetched
    /// record, which becomes their confirmed baseline. Patches of rows that left the page
    /// are dropped.
    pub fn finish_load(
        &mut self,
        generation: u64,
        page: NormalizedPage,
        meta: PageMeta,
        query: ListQuery,
    ) -> bool {
        if generation != self.load_generation {
            return false;
        }

        self.records = page.records;
        self.malformed = page.malformed;
        self.meta = meta;
        self.query = Some(query);

        let records = &self.records;
        self.patches
            .retain(|_, patch| records.iter().any(|record| record.id == patch.record_id));
        self.confirmed = self
            .patches
            .values()
            .filter_map(|patch| self.get(patch.record_id))
            .map(|record| (record.id, record.clone()))
            .collect();

        let patched: Vec<_> = self.confirmed.keys().copied().collect();
        for id in patched {
            self.refresh_row(id);
        }
        true
    }

    pub fn apply_patch(
        &mut self,
        id: VerificationRequestId,
        update: &StatusUpdate,
    ) -> Option<PatchId> {
        let row = self.records.iter_mut().find(|record| record.id == id)?;
        let previous = row.clone();

        self.confirmed
            .entry(id)
            .or_insert_with(|| previous.clone());
        *row = previous.with_update(update);

        self.last_patch_id = self.last_patch_id.next();
        let patch_id = self.last_patch_id;
        self.patches.insert(
            patch_id,
            OptimisticPatch {
                patch_id,
                record_id: id,
                previous,
                update: update.clone(),
                applied_at: OffsetDateTime::now_utc(),
            },
        );

        Some(patch_id)
    }

    /// Accepts the server record for a patch. Older patches of the same row are superseded.
    pub fn confirm_patch(&mut self, patch_id: PatchId, authoritative: VerificationRequest) -> bool {
        let Some(patch) = self.patches.shift_remove(&patch_id) else {
            return false;
        };

        let record_id = patch.record_id;
        self.patches
            .retain(|id, other| other.record_id != record_id || *id > patch_id);
        self.confirmed.insert(record_id, authoritative);
        self.refresh_row(record_id);
        true
    }

    pub fn rollback_patch(&mut self, patch_id: PatchId) -> bool {
        let Some(patch) = self.patches.shift_remove(&patch_id) else {
            return false;
        };

        self.refresh_row(patch.record_id);
        true
    }

    pub fn search(&self, term: &str) -> Vec<VerificationRequest> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.records.clone();
        }

        let contains = |value: Option<&str>| value.is_some_and(|value| value.to_lowercase().contains(&term));

        self.records
            .iter()
            .filter(|record| {
                record.id.to_string() == term
                    || contains(Some(record.company.name.as_str()))
                    || contains(record.reason.as_deref())
                    || contains(record.verified_by.as_ref().map(|reviewer| reviewer.name.as_str()))
            })
            .cloned()
            .collect()
    }

    pub fn status_counts(&self) -> Vec<(RequestStatus, usize)> {
        RequestStatus::ALL
            .into_iter()
            .map(|status| {
                let count = self
                    .records
                    .iter()
                    .filter(|record| record.status == status)
                    .count();
                (status, count)
            })
            .collect()
    }

    fn refresh_row(&mut self, id: VerificationRequestId) {
        let newest = self
            .patches
            .values()
            .rev()
            .find(|patch| patch.record_id == id)
            .map(|patch| patch.update.clone());

        let display = match newest {
            Some(update) => self.confirmed.get(&id).map(|base| base.with_update(&update)),
            None => self.confirmed.remove(&id),
        };

        if let (Some(display), Some(row)) = (
            display,
            self.records.iter_mut().find(|record| record.id == id),
        ) {
            *row = display;
        }
    }
}
