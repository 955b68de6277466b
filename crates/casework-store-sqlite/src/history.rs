//! Append-only status history tables.
//!
//! Both tracked entities share one table shape; the table name is chosen by
//! the caller from the constants below. Rows are ordered by `seq`, which is
//! assigned on insert.

use casework_core::{history::StatusChange, status::StatusValue};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawStatusChange, STATUS_CHANGE_COLUMNS, decode_dt, encode_dt, encode_uuid},
};

pub const APPLICATION_CHANGES: &str = "application_status_changes";
pub const LESSON_CHANGES: &str = "lesson_status_changes";

pub fn append<S: StatusValue>(
  conn: &Connection,
  table: &'static str,
  change: &StatusChange<S>,
) -> Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO {table} (change_id, entity_id, previous_status, status, changed_at, comment)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
    ),
    rusqlite::params![
      encode_uuid(change.change_id),
      encode_uuid(change.entity_id),
      change.previous.map(|s| s.as_str()),
      change.status.as_str(),
      encode_dt(change.changed_at),
      change.comment,
    ],
  )?;
  Ok(())
}

/// Timestamp of the latest record for `entity_id`, if any.
pub fn last_changed_at(
  conn: &Connection,
  table: &'static str,
  entity_id: Uuid,
) -> Result<Option<DateTime<Utc>>> {
  let raw: Option<String> = conn
    .query_row(
      &format!("SELECT changed_at FROM {table} WHERE entity_id = ?1 ORDER BY seq DESC LIMIT 1"),
      rusqlite::params![encode_uuid(entity_id)],
      |r| r.get(0),
    )
    .optional()?;
  raw.as_deref().map(decode_dt).transpose()
}

/// Every record for `entity_id`, oldest first.
pub fn list<S: StatusValue>(
  conn: &Connection,
  table: &'static str,
  entity_id: Uuid,
) -> Result<Vec<StatusChange<S>>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {STATUS_CHANGE_COLUMNS} FROM {table} WHERE entity_id = ?1 ORDER BY seq"
  ))?;
  let raws = stmt
    .query_map(rusqlite::params![encode_uuid(entity_id)], RawStatusChange::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawStatusChange::into_change).collect()
}
