use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as, skip_serializing_none};

use crate::model::list_query::{ListQuery, PageMeta};
use crate::model::verification_request::{RequestStatus, StatusUpdate};

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
pub(super) struct ListRequestsQueryRestDTO {
    pub status: Option<&'static str>,
    pub company_id: Option<i64>,
    pub verified_by: Option<i64>,
    pub per_page: u32,
    pub page: u32,
}

impl From<&ListQuery> for ListRequestsQueryRestDTO {
    fn from(value: &ListQuery) -> Self {
        Self {
            status: value.status.as_query_value(),
            company_id: value.company_id.map(Into::into),
            verified_by: value.verified_by.map(Into::into),
            per_page: value.per_page,
            page: value.page,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ListRequestsResponseRestDTO {
    Paginated(PaginatedRestDTO),
    Bare(Vec<Value>),
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct PaginatedRestDTO {
    #[serde(default)]
    pub data: Vec<Value>,
    pub meta: Option<PageMetaRestDTO>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
pub(super) struct PageMetaRestDTO {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub current_page: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub last_page: u32,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub total: Option<u64>,
}

impl PageMetaRestDTO {
    pub fn into_meta(self, query: &ListQuery, items: usize) -> PageMeta {
        PageMeta {
            current_page: self.current_page.max(1),
            last_page: self.last_page.max(1),
            per_page: self.per_page.unwrap_or(query.per_page),
            total: self.total.unwrap_or(items as u64),
        }
    }
}

/// Meta block derived from the request when the backend omits it.
pub(super) fn fallback_meta(query: &ListQuery, items: usize) -> PageMeta {
    PageMeta {
        current_page: query.page,
        last_page: query.page,
        per_page: query.per_page,
        total: items as u64,
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
pub(super) struct UpdateStatusRequestRestDTO<'a> {
    pub status: RequestStatus,
    pub reason: Option<&'a str>,
}

impl<'a> From<&'a StatusUpdate> for UpdateStatusRequestRestDTO<'a> {
    fn from(value: &'a StatusUpdate) -> Self {
        Self {
            status: value.status,
            reason: value.reason.as_deref(),
        }
    }
}
