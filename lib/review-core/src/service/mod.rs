pub mod error;
pub mod review;
