//! Applications, the tracked case record of the migration desk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  policy::{Tracked, apply_transition},
  status::ApplicationStatus,
  validate::{ValidationErrors, Validator},
};

/// An application filed for a migrant and handled by an officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
  pub application_id: Uuid,
  pub migrant_id:     Uuid,
  pub officer_id:     Uuid,
  /// Free-text application type, e.g. "work permit".
  pub kind:           String,
  pub status:         ApplicationStatus,
  /// Server-assigned at creation; never changes.
  pub submitted_at:   DateTime<Utc>,
  /// Set on entering a decided status, cleared on reopening.
  pub decision_date:  Option<DateTime<Utc>>,
  /// Optimistic concurrency token, incremented on every successful update.
  pub version:        u32,
}

impl Tracked for Application {
  type Status = ApplicationStatus;

  fn status(&self) -> ApplicationStatus { self.status }

  fn set_status(&mut self, status: ApplicationStatus) { self.status = status; }

  fn decision_slot(&mut self) -> Option<&mut Option<DateTime<Utc>>> {
    Some(&mut self.decision_date)
  }
}

impl Application {
  /// Apply `patch` as of `now`. Fields absent from the patch are untouched;
  /// a status change goes through the transition policy.
  pub fn patched(mut self, patch: &ApplicationPatch, now: DateTime<Utc>) -> Self {
    if let Some(id) = patch.migrant_id {
      self.migrant_id = id;
    }
    if let Some(id) = patch.officer_id {
      self.officer_id = id;
    }
    if let Some(kind) = &patch.kind {
      self.kind = kind.trim().to_owned();
    }
    match patch.status {
      Some(status) => apply_transition(self, status, now),
      None => self,
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_application`].
#[derive(Debug, Clone)]
pub struct NewApplication {
  pub migrant_id: Uuid,
  pub officer_id: Uuid,
  pub kind:       String,
  pub status:     ApplicationStatus,
  /// Comment for the initial history record.
  pub comment:    Option<String>,
}

impl NewApplication {
  /// A pending application with no comment.
  pub fn new(migrant_id: Uuid, officer_id: Uuid, kind: impl Into<String>) -> Self {
    Self {
      migrant_id,
      officer_id,
      kind: kind.into(),
      status: ApplicationStatus::default(),
      comment: None,
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    v.require_text("kind", &self.kind);
    v.finish()
  }
}

/// Partial update for an application. `None` means "leave as is".
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
  pub migrant_id:       Option<Uuid>,
  pub officer_id:       Option<Uuid>,
  pub kind:             Option<String>,
  pub status:           Option<ApplicationStatus>,
  /// If set, the update fails unless the stored version matches.
  pub expected_version: Option<u32>,
}

impl ApplicationPatch {
  /// A patch that only moves the status.
  pub fn status(status: ApplicationStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut v = Validator::new();
    if let Some(kind) = &self.kind {
      v.require_text("kind", kind);
    }
    v.finish()
  }
}
