pub mod http_client;
pub mod verification_request_client;
