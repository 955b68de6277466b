//! Status-dependent side effects applied before a write.

use chrono::{DateTime, Utc};

use crate::status::{DecisionEffect, StatusValue};

/// An entity with a tracked status field.
pub trait Tracked {
  type Status: StatusValue;

  fn status(&self) -> Self::Status;

  fn set_status(&mut self, status: Self::Status);

  /// The entity's decision timestamp, if it carries one.
  fn decision_slot(&mut self) -> Option<&mut Option<DateTime<Utc>>> { None }
}

/// Move `entity` to `new_status`, applying the decision-date side effect of
/// the target status when the status actually changes.
///
/// `now` is the instant of the transition; the caller uses the same instant
/// for the history record it appends.
pub fn apply_transition<E: Tracked>(
  mut entity: E,
  new_status: E::Status,
  now: DateTime<Utc>,
) -> E {
  if entity.status() != new_status
    && let Some(slot) = entity.decision_slot()
  {
    match new_status.decision_effect() {
      DecisionEffect::Stamp => *slot = Some(now),
      DecisionEffect::Clear => *slot = None,
      DecisionEffect::Keep => {}
    }
  }
  entity.set_status(new_status);
  entity
}
