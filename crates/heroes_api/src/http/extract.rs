//! Request body extraction.
//!
//! Write endpoints accept either a JSON object or URL-encoded form data.
//! Both are normalized into [`Fields`], which hands out typed values one
//! key at a time and rejects whatever the handler did not ask for.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde_json::{Map, Value};

use super::error::ApiError;

/// Decoded request body awaiting allow-listed field reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Removes a required string field.
    pub fn require_str(&mut self, key: &str) -> Result<String, ApiError> {
        self.optional_str(key)?
            .ok_or_else(|| ApiError::malformed(format!("missing required field `{key}`")))
    }

    /// Removes an optional string field. `null` counts as absent.
    pub fn optional_str(&mut self, key: &str) -> Result<Option<String>, ApiError> {
        match self.0.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(ApiError::malformed(format!("field `{key}` must be a string"))),
        }
    }

    /// Removes a required integer id. Form bodies carry ids as digit strings.
    pub fn require_id(&mut self, key: &str) -> Result<i64, ApiError> {
        let invalid = || ApiError::malformed(format!("field `{key}` must be an integer id"));
        match self.0.remove(key) {
            None | Some(Value::Null) => Err(ApiError::malformed(format!(
                "missing required field `{key}`"
            ))),
            Some(Value::Number(number)) => number.as_i64().ok_or_else(invalid),
            Some(Value::String(text)) => text.trim().parse().map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    /// Fails when the body still holds fields no handler asked for.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(ApiError::Malformed(
            self.0
                .keys()
                .map(|key| format!("unknown field `{key}`"))
                .collect(),
        ))
    }
}

#[async_trait]
impl<S> FromRequest<S> for Fields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            return match Json::<Map<String, Value>>::from_request(req, state).await {
                Ok(Json(fields)) => Ok(Self(fields)),
                Err(rejection) => Err(json_rejection(rejection)),
            };
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            return match Form::<HashMap<String, String>>::from_request(req, state).await {
                Ok(Form(fields)) => Ok(Self(
                    fields
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                )),
                Err(rejection) => {
                    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        Err(ApiError::PayloadTooLarge(rejection.body_text()))
                    } else {
                        Err(ApiError::malformed(rejection.body_text()))
                    }
                }
            };
        }

        Err(ApiError::malformed(
            "request body must be JSON or form data",
        ))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(rejection.body_text())
    } else {
        ApiError::malformed(rejection.body_text())
    }
}
