//! API request/response types

mod error;
mod json;
mod relay;

pub use error::{codes, ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::{Json, JsonRejection};
