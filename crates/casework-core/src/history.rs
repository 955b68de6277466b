//! Immutable records of every status transition.
//!
//! A tracked entity owns an append-only list of [`StatusChange`] records. The
//! first is written together with the entity; each later one is derived from
//! an update whose status differs from the stored value. Records are never
//! updated and disappear only when their owning entity is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{status::StatusValue, validate::non_blank};

/// One status transition of a tracked entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange<S> {
  pub change_id:  Uuid,
  pub entity_id:  Uuid,
  /// `None` only for the record written at creation.
  pub previous:   Option<S>,
  pub status:     S,
  pub changed_at: DateTime<Utc>,
  pub comment:    Option<String>,
}

/// The comment attached to a transition when the caller gives none.
pub fn default_comment<S: StatusValue>(old: S, new: S) -> String {
  format!("Status changed from {old} to {new}")
}

/// The record written when an entity is created. Always produced.
pub fn record_initial<S: StatusValue>(
  entity_id: Uuid,
  status: S,
  comment: Option<String>,
  at: DateTime<Utc>,
) -> StatusChange<S> {
  StatusChange {
    change_id: Uuid::new_v4(),
    entity_id,
    previous: None,
    status,
    changed_at: at,
    comment: non_blank(comment),
  }
}

/// The record for an update from `old` to `new`, or `None` when the status did
/// not change.
pub fn record_if_changed<S: StatusValue>(
  entity_id: Uuid,
  old: S,
  new: S,
  comment: Option<String>,
  at: DateTime<Utc>,
) -> Option<StatusChange<S>> {
  if old == new {
    return None;
  }
  Some(StatusChange {
    change_id: Uuid::new_v4(),
    entity_id,
    previous: Some(old),
    status: new,
    changed_at: at,
    comment: Some(non_blank(comment).unwrap_or_else(|| default_comment(old, new))),
  })
}

/// Timestamp for the next record of an entity whose latest record is at
/// `last`; never earlier than `last`.
pub fn next_timestamp(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
  match last {
    Some(last) if last > now => last,
    _ => now,
  }
}
