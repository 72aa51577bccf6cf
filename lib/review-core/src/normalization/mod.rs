//! Conversion of raw backend payloads into [`VerificationRequest`] view models.
//!
//! Payloads are handled as untyped JSON up to this point and converted exactly once.
//! Only an unusable `id` rejects a record, every other gap is filled with a default.

use serde_json::{Map, Value};
use shared_types::{CompanyId, ReviewerId, VerificationRequestId};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{ErrorCode, ErrorCodeMixin};
use crate::model::verification_request::{
    CompanySummary, RequestDocument, RequestStatus, Reviewer, VerificationRequest,
};


#[derive(Clone, Debug, Error, PartialEq)]
pub enum MalformedRecordError {
    #[error("Record is not a JSON object")]
    NotAnObject,
    #[error("Record is missing an id")]
    MissingId,
    #[error("Record id `{0}` is not a finite integer")]
    InvalidId(String),
}

impl ErrorCodeMixin for MalformedRecordError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::BR_0001
    }
}

/// A list entry that could not be normalized; the rest of the page still renders.
#[derive(Clone, Debug, PartialEq)]
pub struct MalformedRow {
    pub index: usize,
    pub error: MalformedRecordError,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedPage {
    pub records: Vec<VerificationRequest>,
    pub malformed: Vec<MalformedRow>,
}

pub fn normalize(raw: &Value) -> Result<VerificationRequest, MalformedRecordError> {
    let object = raw.as_object().ok_or(MalformedRecordError::NotAnObject)?;

    let id = match object.get("id") {
        None | Some(Value::Null) => return Err(MalformedRecordError::MissingId),
        Some(value) => coerce_integer(value)
            .ok_or_else(|| MalformedRecordError::InvalidId(value.to_string()))?,
    };
    let id = VerificationRequestId::from(id);

    Ok(VerificationRequest {
        id,
        status: status(object, id),
        reason: text(object, "reason"),
        created_at: timestamp(object, "created_at"),
        updated_at: timestamp(object, "updated_at"),
        company: company(object),
        verified_by: reviewer(object),
        documents: documents(object, id),
    })
}

/// Normalizes the response of a status update on top of the record it updated.
///
/// Update responses may be sparse. Status, reason and reviewer always come from the
/// response. Company, timestamps and documents keep the values of `previous` unless
/// the response carries them.
pub fn normalize_update(
    raw: &Value,
    previous: &VerificationRequest,
) -> Result<VerificationRequest, MalformedRecordError> {
    let VerificationRequest {
        id,
        status,
        reason,
        created_at,
        updated_at,
        company,
        verified_by,
        documents,
    } = normalize(raw)?;
    let carries = |key: &str| raw.get(key).is_some_and(|value| !value.is_null());

    Ok(VerificationRequest {
        id,
        status,
        reason,
        created_at: created_at.or(previous.created_at),
        updated_at: updated_at.or(previous.updated_at),
        company: if carries("company") {
            company
        } else {
            previous.company.clone()
        },
        verified_by,
        documents: if carries("documents") {
            documents
        } else {
            previous.documents.clone()
        },
    })
}

pub fn normalize_page(raws: &[Value]) -> NormalizedPage {
    let mut page = NormalizedPage::default();

    for (index, raw) in raws.iter().enumerate() {
        match normalize(raw) {
            Ok(record) => page.records.push(record),
            Err(error) => {
                tracing::warn!(index, %error, "Skipping malformed verification request");
                page.malformed.push(MalformedRow { index, error });
            }
        }
    }

    page
}

pub(crate) fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_float)),
        Value::String(string) => {
            let string = string.trim();
            string
                .parse::<i64>()
                .ok()
                .or_else(|| string.parse::<f64>().ok().and_then(integral_float))
        }
        _ => None,
    }
}

fn integral_float(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53

    (value.is_finite() && value.fract() == 0.0 && value.abs() <= LIMIT).then_some(value as i64)
}

fn status(object: &Map<String, Value>, id: VerificationRequestId) -> RequestStatus {
    let raw = object.get("status").and_then(Value::as_str);
    match raw.map(|status| status.trim().parse::<RequestStatus>()) {
        Some(Ok(status)) => status,
        Some(Err(_)) | None => {
            tracing::warn!(%id, status = ?raw, "Unrecognized status, showing request as pending");
            RequestStatus::Pending
        }
    }
}

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn timestamp(object: &Map<String, Value>, key: &str) -> Option<OffsetDateTime> {
    let value = object.get(key)?.as_str()?.trim();

    OffsetDateTime::parse(value, &Rfc3339).ok().or_else(|| {
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .ok()
        .map(PrimitiveDateTime::assume_utc)
    })
}

fn company(object: &Map<String, Value>) -> CompanySummary {
    let Some(company) = object.get("company").and_then(Value::as_object) else {
        return CompanySummary {
            id: object
                .get("company_id")
                .and_then(coerce_integer)
                .map(CompanyId::from),
            ..Default::default()
        };
    };

    CompanySummary {
        id: company
            .get("id")
            .or_else(|| object.get("company_id"))
            .and_then(coerce_integer)
            .map(CompanyId::from),
        name: text(company, "name").unwrap_or_default(),
        logo: text(company, "logo"),
        location: text(company, "location"),
        founded_year: company
            .get("founded_year")
            .and_then(coerce_integer)
            .and_then(|year| i32::try_from(year).ok()),
        description: text(company, "description"),
    }
}

fn reviewer(object: &Map<String, Value>) -> Option<Reviewer> {
    let reviewer = object
        .get("verifiedBy")
        .or_else(|| object.get("verified_by"))
        .and_then(Value::as_object)?;

    Some(Reviewer {
        id: reviewer
            .get("id")
            .and_then(coerce_integer)
            .map(ReviewerId::from),
        name: text(reviewer, "name").unwrap_or_default(),
        picture: text(reviewer, "picture"),
    })
}

fn documents(object: &Map<String, Value>, id: VerificationRequestId) -> Vec<RequestDocument> {
    let Some(documents) = object.get("documents").and_then(Value::as_array) else {
        return vec![];
    };

    documents
        .iter()
        .filter_map(|document| {
            let document = document.as_object()?;
            let Some(document_id) = document.get("id").and_then(coerce_integer) else {
                tracing::warn!(%id, "Skipping document without id");
                return None;
            };

            Some(RequestDocument {
                id: document_id,
                file_name: text(document, "file_name").unwrap_or_default(),
                size_label: size_label(document),
                url: text(document, "url"),
            })
        })
        .collect()
}

fn size_label(document: &Map<String, Value>) -> String {
    if let Some(label) = text(document, "human_readable_size") {
        return label;
    }

    document
        .get("size")
        .and_then(coerce_integer)
        .and_then(|size| u64::try_from(size).ok())
        .map(format_size)
        .unwrap_or_else(|| "n/a".to_string())
}

pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }

    format!("{size:.1} {unit}")
}
