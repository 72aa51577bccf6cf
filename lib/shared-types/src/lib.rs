mod macros;
mod party_id;
mod patch_id;
mod request_id;
mod session_id;

pub use party_id::{CompanyId, ReviewerId};
pub use patch_id::PatchId;
pub use request_id::VerificationRequestId;
pub use session_id::SessionId;
