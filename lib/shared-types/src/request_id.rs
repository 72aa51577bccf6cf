use serde::{Deserialize, Serialize};

use crate::macros::impls_for_int_newtype;

/// Backend identifier of a supplier verification request. Never changes after creation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VerificationRequestId(i64);

impls_for_int_newtype!(VerificationRequestId; i64);
