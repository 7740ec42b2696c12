//! Response DTOs shared by every caller of the notebook service.
//!
//! # Invariants
//! - Every outcome, success or failure, serializes as
//!   `{statusCode, message, data}`.
//! - An envelope carries either a payload or error detail, never both.

pub mod base_response;
pub mod error_response;

pub use base_response::{BaseResponse, Envelope, FAIL_MESSAGE, SUCCESS_MESSAGE, SUCCESS_STATUS};
pub use error_response::ErrorResponse;
