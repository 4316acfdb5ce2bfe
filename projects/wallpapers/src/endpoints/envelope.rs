//! Uniform `{"status": ..., "data"|"error": ...}` wrapper for every response.
//!
//! Handlers tag each failure with a [`FailureKind`] stored in the response
//! extensions. [`apply_error_status`] runs as a response-mapping middleware and
//! picks the final HTTP status from that tag and the configured
//! [`ErrorStatusPolicy`].

use std::any::Any;
use std::str::FromStr;

use axum::{
    body::Body,
    extract::State,
    http::{Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    NotFound,
    MethodNotAllowed,
    Internal,
}

/// How failure kinds map onto HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusPolicy {
    /// Every failure is a 500, as the service has always answered.
    #[default]
    Uniform,
    /// 400 for validation, 404 for not-found, 405 for a wrong method, 500 otherwise.
    Typed,
}

impl ErrorStatusPolicy {
    pub fn status_for(self, kind: FailureKind) -> StatusCode {
        match (self, kind) {
            (Self::Uniform, _) => StatusCode::INTERNAL_SERVER_ERROR,
            (Self::Typed, FailureKind::Validation) => StatusCode::BAD_REQUEST,
            (Self::Typed, FailureKind::NotFound) => StatusCode::NOT_FOUND,
            (Self::Typed, FailureKind::MethodNotAllowed) => StatusCode::METHOD_NOT_ALLOWED,
            (Self::Typed, FailureKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl FromStr for ErrorStatusPolicy {
    type Err = ParseErrorStatusPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "typed" => Ok(Self::Typed),
            _ => Err(ParseErrorStatusPolicyError::UnknownPolicy {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErrorStatusPolicyError {
    #[error("UnknownPolicy: {value} (expected `uniform` or `typed`)")]
    UnknownPolicy { value: String },
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

#[derive(Serialize)]
struct SuccessBody<T> {
    status: Status,
    data: T,
}

/// Body of every failed response.
#[derive(Serialize, ToSchema)]
pub struct FailureBody {
    status: Status,
    error: String,
}

/// 200 response carrying `data`.
pub struct Success<T>(pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            Json(SuccessBody {
                status: Status::Success,
                data: self.0,
            }),
        )
            .into_response()
    }
}

/// Failure envelope tagged with its kind. The status set here is the typed
/// one; [`apply_error_status`] may replace it.
pub fn failure(kind: FailureKind, message: impl Into<String>) -> Response {
    let mut response = (
        ErrorStatusPolicy::Typed.status_for(kind),
        Json(FailureBody {
            status: Status::Failed,
            error: message.into(),
        }),
    )
        .into_response();
    response.extensions_mut().insert(kind);
    response
}

/// Response-mapping middleware: rewrites the status of tagged failures.
pub async fn apply_error_status(
    State(policy): State<ErrorStatusPolicy>,
    mut response: Response,
) -> Response {
    if let Some(kind) = response.extensions().get::<FailureKind>().copied() {
        *response.status_mut() = policy.status_for(kind);
    }
    response
}

/// Converts a handler panic into an internal failure envelope.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %detail, "handler panicked");
    failure(FailureKind::Internal, "internal server error")
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> Response {
    failure(FailureKind::NotFound, "route not found")
}

/// Fallback for known paths hit with a method they do not serve.
pub async fn method_not_allowed() -> Response {
    failure(FailureKind::MethodNotAllowed, "method not allowed")
}
