use serde::{Deserialize, Serialize};

use crate::macros::impls_for_int_newtype;

/// Handle of one detail review session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SessionId(u64);

impls_for_int_newtype!(SessionId; u64);
