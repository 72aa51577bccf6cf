use serde::{Deserialize, Serialize};

use crate::macros::impls_for_int_newtype;

/// Handle of an optimistic patch held by the list store. Issued in increasing order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct PatchId(u64);

impls_for_int_newtype!(PatchId; u64);

impl PatchId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}
