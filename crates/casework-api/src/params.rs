//! Request-side parsing shared by the handlers.

use casework_core::{
  EntityKind,
  status::StatusValue,
  validate::{ValidationErrors, Validator},
};
use uuid::Uuid;

use crate::error::ApiError;

/// Parse an optional status string against the closed domain `S`. The
/// spelling must match exactly, surrounding whitespace included.
pub fn status<S: StatusValue>(
  field: &'static str,
  raw: Option<&str>,
) -> Result<Option<S>, ValidationErrors> {
  raw.map(|s| S::parse_field(field, s)).transpose()
}

/// Parse a comma-separated status list. Spaces after a separator are part of
/// the list syntax and skipped, as are blank items.
pub fn statuses<S: StatusValue>(
  field: &'static str,
  raw: Option<&str>,
) -> Result<Vec<S>, ValidationErrors> {
  raw
    .into_iter()
    .flat_map(|s| s.split(','))
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(|s| S::parse_field(field, s))
    .collect()
}

/// Unwrap a required body field, recording it as missing otherwise.
pub fn required<T>(v: &mut Validator, field: &'static str, value: Option<T>) -> Option<T> {
  if value.is_none() {
    v.push(field, "is required");
  }
  value
}

pub use casework_core::patch::double_option;

/// `Json` for a fetched row, or 404.
pub fn found<T>(kind: EntityKind, id: Uuid, row: Option<T>) -> Result<axum::Json<T>, ApiError> {
  row.map(axum::Json).ok_or_else(|| ApiError::not_found(kind, id))
}

/// 204 when something was deleted, 404 otherwise.
pub fn deleted(kind: EntityKind, id: Uuid, existed: bool) -> Result<axum::http::StatusCode, ApiError> {
  if existed {
    Ok(axum::http::StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::not_found(kind, id))
  }
}
