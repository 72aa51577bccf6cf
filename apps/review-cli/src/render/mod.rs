//! Plain-text rendering of verification requests for the terminal.

use itertools::Itertools;
use review_core::model::list_query::PageMeta;
use review_core::model::verification_request::{RequestStatus, VerificationRequest};
use review_core::normalization::MalformedRow;
use time::OffsetDateTime;
use time::macros::format_description;


const EMPTY: &str = "-";

pub fn table(records: &[VerificationRequest]) -> String {
    if records.is_empty() {
        return "No verification requests".to_owned();
    }

    let rows = records
        .iter()
        .map(|record| {
            [
                record.id.to_string(),
                record.status.to_string(),
                or_empty(Some(record.company.name.as_str())),
                or_empty(record.verified_by.as_ref().map(|reviewer| reviewer.name.as_str())),
                timestamp(record.updated_at.or(record.created_at)),
                or_empty(record.reason.as_deref()),
            ]
        })
        .collect::<Vec<_>>();

    let header = ["ID", "STATUS", "COMPANY", "REVIEWER", "UPDATED", "REASON"].map(str::to_owned);
    let widths: Vec<usize> = (0..header.len())
        .map(|column| {
            std::iter::once(&header)
                .chain(&rows)
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or_default()
        })
        .collect();

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .join("\n")
}

pub fn page(meta: &PageMeta) -> String {
    let mut line = format!(
        "Page {} of {} ({} total)",
        meta.current_page, meta.last_page, meta.total
    );
    if meta.has_previous() {
        line.push_str(&format!(", previous: --page {}", meta.current_page - 1));
    }
    if meta.has_next() {
        line.push_str(&format!(", next: --page {}", meta.current_page + 1));
    }
    line
}

pub fn status_counts(counts: &[(RequestStatus, usize)]) -> String {
    counts
        .iter()
        .map(|(status, count)| format!("{status}: {count}"))
        .join("  ")
}

pub fn malformed(rows: &[MalformedRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    Some(
        rows.iter()
            .map(|row| format!("Skipped entry #{}: {}", row.index, row.error))
            .join("\n"),
    )
}

pub fn detail(record: &VerificationRequest) -> String {
    let company = &record.company;
    let mut lines = vec![
        format!("Request {}: {}", record.id, record.status),
        format!("Reason: {}", or_empty(record.reason.as_deref())),
        format!("Created: {}", timestamp(record.created_at)),
        format!("Updated: {}", timestamp(record.updated_at)),
        String::new(),
        format!("Company: {}", or_empty(Some(company.name.as_str()))),
        format!("Location: {}", or_empty(company.location.as_deref())),
        format!(
            "Founded: {}",
            company
                .founded_year
                .map(|year| year.to_string())
                .unwrap_or_else(|| EMPTY.to_owned())
        ),
        format!("About: {}", or_empty(company.description.as_deref())),
        format!(
            "Reviewer: {}",
            or_empty(record.verified_by.as_ref().map(|reviewer| reviewer.name.as_str()))
        ),
        String::new(),
    ];

    if record.documents.is_empty() {
        lines.push("No documents".to_owned());
    } else {
        lines.push("Documents:".to_owned());
        lines.extend(record.documents.iter().map(|document| {
            format!(
                "  {} ({}) {}",
                document.file_name,
                document.size_label,
                or_empty(document.url.as_deref())
            )
        }));
    }

    lines.join("\n")
}

fn or_empty(value: Option<&str>) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or(EMPTY)
        .to_owned()
}

fn timestamp(value: Option<OffsetDateTime>) -> String {
    value
        .and_then(|value| {
            value
                .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .ok()
        })
        .unwrap_or_else(|| EMPTY.to_owned())
}
