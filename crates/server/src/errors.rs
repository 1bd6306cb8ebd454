use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::{FieldErrors, ModelError};
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// JSON error response: `{statusCode, message, detail?}` or, for field
/// validation, `{statusCode, errors}`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
    errors: Option<FieldErrors>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail, errors: None }
    }

    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "validation error".into(),
            detail: None,
            errors: Some(errors),
        }
    }

    pub fn invalid_person_id() -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid person id", None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = match &self.errors {
            Some(errors) => ErrorBody {
                status_code: self.status.as_u16(),
                message: None,
                detail: None,
                errors: Some(errors),
            },
            None => ErrorBody {
                status_code: self.status.as_u16(),
                message: Some(&self.message),
                detail: self.detail.as_deref(),
                errors: None,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "not found", Some(e.to_string())),
            ServiceError::DuplicateKey(id) => {
                warn!(%id, "duplicate person id rejected");
                Self::new(StatusCode::CONFLICT, "conflict", Some(e.to_string()))
            }
        }
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(errors) => Self::validation(errors),
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid input", Some(rejection.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(_: PathRejection) -> Self {
        Self::invalid_person_id()
    }
}

/// Response for a handler that panicked.
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "handler panicked");
    JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error", None).into_response()
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
