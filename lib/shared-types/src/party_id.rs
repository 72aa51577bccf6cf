use serde::{Deserialize, Serialize};

use crate::macros::impls_for_int_newtype;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct CompanyId(i64);

impls_for_int_newtype!(CompanyId; i64);

/// Back-office user who acted on a verification request.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ReviewerId(i64);

impls_for_int_newtype!(ReviewerId; i64);
