pub mod list_query;
pub mod verification_request;
