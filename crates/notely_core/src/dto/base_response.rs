use crate::dto::error_response::ErrorResponse;
use crate::error_code::ErrorCode;
use crate::repo::{RepoError, RepoResult};
use log::warn;
use serde::Serialize;

pub const SUCCESS_STATUS: i32 = 200;
pub const SUCCESS_MESSAGE: &str = "success";
pub const FAIL_MESSAGE: &str = "fail";

/// Uniform `{statusCode, message, data}` wrapper.
///
/// Only the three constructors below produce values, so a success never
/// carries error detail and a failure never carries a payload. The type is
/// serialize-only for the same reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    status_code: i32,
    message: String,
    data: Option<T>,
}

impl<T> BaseResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status_code: SUCCESS_STATUS,
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl BaseResponse<()> {
    pub fn void_success() -> Self {
        Self {
            status_code: SUCCESS_STATUS,
            message: SUCCESS_MESSAGE.to_string(),
            data: None,
        }
    }
}

impl BaseResponse<ErrorResponse> {
    pub fn fail(error_code: &ErrorCode) -> Self {
        Self {
            status_code: error_code.code(),
            message: FAIL_MESSAGE.to_string(),
            data: Some(ErrorResponse::of(error_code)),
        }
    }
}

/// Outcome of one use-case call: a typed success or a failed envelope.
///
/// Serializes exactly like the `BaseResponse` it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Success(BaseResponse<T>),
    Failure(BaseResponse<ErrorResponse>),
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self::Success(BaseResponse::success(data))
    }

    pub fn fail(error_code: &ErrorCode) -> Self {
        Self::Failure(BaseResponse::fail(error_code))
    }

    /// Wraps `Ok` as success and maps `Err` through the error code registry.
    pub fn from_result(result: RepoResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn from_error(err: &RepoError) -> Self {
        let error_code = ErrorCode::for_repo_error(err);
        warn!(
            "event=envelope_fail module=dto status=error code={} name={} error={err}",
            error_code.code(),
            error_code.name()
        );
        Self::fail(error_code)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn status_code(&self) -> i32 {
        match self {
            Self::Success(response) => response.status_code(),
            Self::Failure(response) => response.status_code(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(response) => response.message(),
            Self::Failure(response) => response.message(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(response) => response.data(),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Success(_) => None,
            Self::Failure(response) => response.data(),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(response) => response.into_data(),
            Self::Failure(_) => None,
        }
    }
}

impl Envelope<()> {
    pub fn void_success() -> Self {
        Self::Success(BaseResponse::void_success())
    }
}
