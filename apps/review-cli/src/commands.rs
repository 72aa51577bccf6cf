use anyhow::bail;
use review_core::ReviewCore;
use review_core::error::ErrorCodeMixin;
use review_core::model::list_query::ListQuery;
use review_core::model::verification_request::RequestStatus;
use review_core::service::error::ServiceError;
use shared_types::VerificationRequestId;

use crate::cli::Command;
use crate::render;

pub async fn run(core: &ReviewCore, command: Command) -> anyhow::Result<()> {
    let per_page = core.config.review.per_page;

    match command {
        Command::List(args) => {
            core.review_service
                .load(args.query(per_page))
                .await
                .map_err(|error| report(core, error))?;
            print_list(core, args.search.as_deref()).await;
        }
        Command::Show { id } => {
            let session = core.review_service.begin_review(id).await;
            let result = core.review_service.open_detail(&session).await;
            core.review_service.close(&session).await;

            let record = result.map_err(|error| report(core, error))?;
            println!("{}", render::detail(&record));
        }
        Command::Approve { id, page } => {
            quick_update(core, page.query(per_page), id, RequestStatus::Approved, None).await?;
        }
        Command::Reject { id, reason, page } => {
            quick_update(
                core,
                page.query(per_page),
                id,
                RequestStatus::Rejected,
                Some(&reason),
            )
            .await?;
        }
        Command::Review { id, status, reason } => {
            let session = core.review_service.begin_review(id).await;
            let result = async {
                let record = core.review_service.open_detail(&session).await?;
                println!("{}\n", render::detail(&record));
                core.review_service
                    .submit_update(&session, &status, reason.as_deref())
                    .await
            }
            .await;
            core.review_service.close(&session).await;

            let record = result.map_err(|error| report(core, error))?;
            println!("Request {} is now {}", record.id, record.status);
        }
    }

    Ok(())
}

async fn quick_update(
    core: &ReviewCore,
    query: ListQuery,
    id: VerificationRequestId,
    status: RequestStatus,
    reason: Option<&str>,
) -> anyhow::Result<()> {
    core.review_service
        .load(query)
        .await
        .map_err(|error| report(core, error))?;

    match core
        .review_service
        .quick_update(id, status.as_ref(), reason)
        .await
    {
        Ok(record) => {
            println!("Request {} is now {}", record.id, record.status);
            print_list(core, None).await;
            Ok(())
        }
        Err(ServiceError::RecordNotFound(id)) => {
            bail!("Request {id} is not on this page, use --page/--status or `review {id}`")
        }
        Err(error) => Err(report(core, error)),
    }
}

async fn print_list(core: &ReviewCore, search: Option<&str>) {
    let store = &core.list_store;
    let records = match search {
        Some(term) => store.search(term).await,
        None => store.records().await,
    };

    println!("{}", render::table(&records));
    println!();
    println!("{}", render::page(&store.meta().await));
    println!("{}", render::status_counts(&store.status_counts().await));
    if let Some(malformed) = render::malformed(&store.malformed().await) {
        println!();
        println!("{malformed}");
    }
}

fn report(core: &ReviewCore, error: ServiceError) -> anyhow::Error {
    tracing::debug!(%error, "Command failed");
    anyhow::anyhow!(
        "{} [{}]",
        core.review_service.user_message(&error),
        error.error_code()
    )
}
