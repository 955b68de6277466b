//! Closed status domains for tracked entities.
//!
//! Status values travel as their exact variant names (`"InProgress"`, not
//! `"in_progress"`); parsing is case-sensitive. Unrecognised strings are
//! rejected at the validation boundary rather than stored.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result, validate::ValidationErrors};

/// What a status does to an entity's decision timestamp when it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionEffect {
  /// Set the decision date to the transition instant.
  Stamp,
  /// Clear the decision date.
  Clear,
  /// Leave the decision date as it is.
  Keep,
}

/// Behaviour shared by every status enum.
pub trait StatusValue:
  Copy + Eq + fmt::Display + FromStr + IntoEnumIterator + Send + Sync + 'static
{
  fn as_str(&self) -> &'static str;

  fn decision_effect(&self) -> DecisionEffect { DecisionEffect::Keep }

  /// Decode a stored value.
  fn decode(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }

  /// Parse caller input, reporting failure against `field`.
  fn parse_field(field: &'static str, s: &str) -> Result<Self, ValidationErrors> {
    s.parse().map_err(|_| {
      let allowed: Vec<&'static str> = Self::iter().map(|v| v.as_str()).collect();
      ValidationErrors::single(field, format!("must be one of {}", allowed.join(", ")))
    })
  }
}

// ─── Applications ────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
pub enum ApplicationStatus {
  #[default]
  Pending,
  InProgress,
  Approved,
  Rejected,
}

impl StatusValue for ApplicationStatus {
  fn as_str(&self) -> &'static str { self.into() }

  fn decision_effect(&self) -> DecisionEffect {
    match self {
      Self::Approved | Self::Rejected => DecisionEffect::Stamp,
      Self::Pending | Self::InProgress => DecisionEffect::Clear,
    }
  }
}

// ─── Lessons ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
pub enum LessonStatus {
  #[default]
  Planned,
  InProgress,
  Completed,
  Cancelled,
}

impl StatusValue for LessonStatus {
  fn as_str(&self) -> &'static str { self.into() }
}

// ─── Issued certificates ─────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
pub enum CertificateStatus {
  #[default]
  Active,
  Suspended,
  Revoked,
  Expired,
}

impl StatusValue for CertificateStatus {
  fn as_str(&self) -> &'static str { self.into() }
}
