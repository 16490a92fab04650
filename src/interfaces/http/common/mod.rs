//! Shared HTTP building blocks: response bodies, error mapping, extractors.

mod api_error;
mod validated_json;

pub use api_error::{ApiError, MessageResponse};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
