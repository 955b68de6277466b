//! Domain model for Casework: the migration desk and the flight school.
//!
//! Status enums, the transition policy and history derivation live here,
//! along with the [`store::CaseStore`] trait that backends implement. No I/O.

pub mod application;
pub mod directory;
pub mod error;
pub mod exam;
pub mod history;
pub mod lesson;
pub mod patch;
pub mod policy;
pub mod school;
pub mod status;
pub mod store;
pub mod validate;

pub use error::{DomainError, EntityKind, Error, ErrorClass, Result};
