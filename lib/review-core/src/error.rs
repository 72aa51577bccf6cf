use strum::Display;

pub trait ErrorCodeMixin {
    fn error_code(&self) -> ErrorCode;
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorCode {
    BR_0000,
    BR_0001,
    BR_0002,
    BR_0003,
    BR_0004,
    BR_0005,
    BR_0006,
    BR_0007,
    BR_0008,
    BR_0009,
    BR_0010,
}

impl ErrorCode {
    pub const fn msg(&self) -> &'static str {
        match self {
            ErrorCode::BR_0000 => "Unmapped error code",
            ErrorCode::BR_0001 => "Malformed verification request record",
            ErrorCode::BR_0002 => "Invalid verification request status",
            ErrorCode::BR_0003 => "Reason is required for this status",
            ErrorCode::BR_0004 => "Backend rejected the request",
            ErrorCode::BR_0005 => "Backend unreachable",
            ErrorCode::BR_0006 => "Invalid backend response",
            ErrorCode::BR_0007 => "Review session discarded",
            ErrorCode::BR_0008 => "Invalid review session state",
            ErrorCode::BR_0009 => "Verification request not found",
            ErrorCode::BR_0010 => "List load superseded by a newer query",
        }
    }
}
