use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use review_core::model::list_query::{ListQuery, StatusFilter};
use shared_types::{CompanyId, ReviewerId, VerificationRequestId};

#[cfg(test)]
mod test;

#[derive(Parser, Debug)]
#[command(author, version, about = "Back-office review of supplier verification requests", long_about = None)]
pub struct Cli {
    /// Config files merged over `config/config.yml`, in order
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Vec<PathBuf>>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List one page of verification requests
    List(ListArgs),
    /// Show a request with its company, reviewer and documents
    Show { id: VerificationRequestId },
    /// Approve a request listed on the given page
    Approve {
        id: VerificationRequestId,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Reject a request listed on the given page
    Reject {
        id: VerificationRequestId,
        #[arg(long)]
        reason: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Open the detail of a request and submit a decision
    Review {
        id: VerificationRequestId,
        #[arg(long)]
        status: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
    #[arg(long)]
    pub company_id: Option<CompanyId>,
    #[arg(long)]
    pub verified_by: Option<ReviewerId>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub per_page: Option<u32>,
    /// Filter the fetched page by company, reason, reviewer or id
    #[arg(long)]
    pub search: Option<String>,
}

impl ListArgs {
    pub fn query(&self, default_per_page: u32) -> ListQuery {
        ListQuery {
            status: self.status,
            company_id: self.company_id,
            verified_by: self.verified_by,
            page: self.page,
            per_page: self.per_page.unwrap_or(default_per_page),
        }
        .validated()
    }
}

/// The list page a quick action is taken from.
#[derive(Args, Debug)]
pub struct PageArgs {
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
}

impl PageArgs {
    pub fn query(&self, default_per_page: u32) -> ListQuery {
        ListQuery {
            status: self.status,
            page: self.page,
            ..ListQuery::with_default_per_page(default_per_page)
        }
        .validated()
    }
}
