//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use casework_core::{DomainError, EntityKind, Error, ErrorClass, validate::ValidationErrors};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("not found: {0}")]
  NotFound(String),

  /// Blocked delete or stale concurrency token.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
    Self::NotFound(format!("{kind} {id} not found"))
  }

  /// Classify a backend error by the domain error it carries, if any.
  pub fn from_store<E>(err: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    let mapped = match err.domain() {
      Some(Error::Validation(errors)) => Some(Self::Validation(errors.clone())),
      Some(e) => match e.class() {
        ErrorClass::NotFound => Some(Self::NotFound(e.to_string())),
        ErrorClass::Conflict => Some(Self::Conflict(e.to_string())),
        ErrorClass::Validation | ErrorClass::Internal => None,
      },
      None => None,
    };
    mapped.unwrap_or_else(|| Self::Store(Box::new(err)))
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "validation failed", "fields": errors })),
      )
        .into_response(),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, Json(json!({ "error": m }))).into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal error" })),
        )
          .into_response()
      }
    }
  }
}
