//! Error type for `casework-store-sqlite`.

use casework_core::{DomainError, validate::ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] casework_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column that no longer decodes into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self {
    Self::Core(casework_core::Error::Validation(errors))
  }
}

impl DomainError for Error {
  fn domain(&self) -> Option<&casework_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
