//! API request, response and error types

pub mod error;
pub mod generate;
pub mod json;

pub use error::{ApiError, ApiErrorResponse};
pub use generate::{GenerateRequest, GenerateResponse};
pub use json::Json;
