//! HTTP error taxonomy and response mapping.
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `NotFound` | 404 | `{"error": "<Entity> not found"}` |
//! | `Validation` | 400 | `{"errors": [..]}` |
//! | `Malformed` | 400 | `{"errors": [..]}` |
//! | `PayloadTooLarge` | 413 | `{"errors": [..]}` |
//! | `Internal` | 500 | `{"error": "internal server error"}` |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use heroes_core::{SerializeError, ServiceError, ValidationError};
use log::error;
use serde_json::json;
use std::fmt::{Display, Formatter};

/// Error returned by route handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Requested entity does not exist. Holds the display name (`Hero`).
    NotFound(&'static str),
    /// A constrained field rejected its value.
    Validation(Vec<String>),
    /// Body is missing a field, has an unknown field, or cannot be decoded.
    Malformed(Vec<String>),
    PayloadTooLarge(String),
    /// Failure already logged; details are not exposed to clients.
    Internal,
}

impl ApiError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(vec![message.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Validation(errors) | Self::Malformed(errors) => write!(f, "{}", errors.join("; ")),
            Self::PayloadTooLarge(message) => write!(f, "{message}"),
            Self::Internal => write!(f, "internal server error"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            Self::NotFound(_) | Self::Internal => json!({ "error": message }),
            Self::Validation(errors) | Self::Malformed(errors) => json!({ "errors": errors }),
            Self::PayloadTooLarge(message) => json!({ "errors": [message] }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(vec![value.to_string()])
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => err.into(),
            ServiceError::HeroNotFound(_) => Self::NotFound("Hero"),
            ServiceError::PowerNotFound(_) => Self::NotFound("Power"),
            ServiceError::InvalidReference { .. } => Self::malformed("Invalid hero or power"),
            other @ (ServiceError::Repo(_) | ServiceError::InconsistentState(_)) => {
                error!("event=request_failed module=api status=error error={other}");
                Self::Internal
            }
        }
    }
}

impl From<SerializeError> for ApiError {
    fn from(value: SerializeError) -> Self {
        error!("event=serialize_failed module=api status=error error={value}");
        Self::Internal
    }
}
