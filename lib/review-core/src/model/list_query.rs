use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{CompanyId, ReviewerId};

use super::verification_request::RequestStatus;

pub const DEFAULT_PER_PAGE: u32 = 20;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RequestStatus),
}

impl StatusFilter {
    pub fn as_query_value(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some((*status).into()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

/// Filters of the verification request list, mirrored in the navigable URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListQuery {
    pub status: StatusFilter,
    pub company_id: Option<CompanyId>,
    pub verified_by: Option<ReviewerId>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            company_id: None,
            verified_by: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListQuery {
    pub fn with_default_per_page(per_page: u32) -> Self {
        Self {
            per_page,
            ..Default::default()
        }
        .validated()
    }

    /// Clamps zero page values back to the defaults.
    pub fn validated(mut self) -> Self {
        if self.page == 0 {
            self.page = 1;
        }
        if self.per_page == 0 {
            self.per_page = DEFAULT_PER_PAGE;
        }
        self
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
        .validated()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl PageMeta {
    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
        }
    }
}
