use crate::error_code::ErrorCode;
use serde::Serialize;

/// Error detail carried in `data` of a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub name: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn of(error_code: &ErrorCode) -> Self {
        Self {
            code: error_code.code(),
            name: error_code.name().to_string(),
            message: error_code.message().to_string(),
        }
    }
}
