//! Error types for `casework-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::validate::ValidationErrors;

/// Every persisted entity, used to label not-found and conflict errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  Migrant,
  Officer,
  Application,
  Course,
  Student,
  Instructor,
  Aircraft,
  Lesson,
  Certificate,
  StudentCertificate,
  Exam,
}

impl EntityKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Migrant => "migrant",
      Self::Officer => "officer",
      Self::Application => "application",
      Self::Course => "course",
      Self::Student => "student",
      Self::Instructor => "instructor",
      Self::Aircraft => "aircraft",
      Self::Lesson => "lesson",
      Self::Certificate => "certificate",
      Self::StudentCertificate => "student certificate",
      Self::Exam => "exam",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: Uuid },

  /// The entity still has dependents that block its removal.
  #[error("{kind} {id} is in use by {}", .dependents.join(", "))]
  InUse {
    kind:       EntityKind,
    id:         Uuid,
    dependents: Vec<&'static str>,
  },

  /// The caller's concurrency token no longer matches the stored row.
  #[error("{kind} {id} was modified concurrently (expected version {expected}, found {actual})")]
  VersionConflict {
    kind:     EntityKind,
    id:       Uuid,
    expected: u32,
    actual:   u32,
  },

  #[error("unknown status value: {0:?}")]
  UnknownStatus(String),
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

/// Coarse classification of an [`Error`], used by transport layers to pick a
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  Validation,
  NotFound,
  Conflict,
  Internal,
}

impl Error {
  pub fn class(&self) -> ErrorClass {
    match self {
      Self::Validation(_) => ErrorClass::Validation,
      Self::NotFound { .. } => ErrorClass::NotFound,
      Self::InUse { .. } | Self::VersionConflict { .. } => ErrorClass::Conflict,
      Self::UnknownStatus(_) => ErrorClass::Internal,
    }
  }
}

/// Implemented by backend error types so callers can recover the domain error
/// (if any) without knowing the backend.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
