//! Referential checks shared by every entity module: foreign-key existence,
//! uniqueness, and the dependents that block a delete.

use casework_core::{EntityKind, validate::Validator};
use rusqlite::Connection;
use uuid::Uuid;

use crate::{Result, encode::encode_uuid};

pub fn exists(conn: &Connection, table: &'static str, key: &'static str, id: Uuid) -> Result<bool> {
  Ok(conn.query_row(
    &format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE {key} = ?1)"),
    rusqlite::params![encode_uuid(id)],
    |r| r.get(0),
  )?)
}

/// Push a validation error on `field` when `id` is given but names no row.
pub fn check_ref(
  conn: &Connection,
  v: &mut Validator,
  field: &'static str,
  table: &'static str,
  id: Option<Uuid>,
) -> Result<()> {
  if let Some(id) = id
    && !exists(conn, table, field, id)?
  {
    v.push(field, "does not exist");
  }
  Ok(())
}

/// A table whose rows reference the entity being deleted.
pub struct Dependent {
  /// Plural noun reported in the conflict, e.g. `"lessons"`.
  pub label:  &'static str,
  pub table:  &'static str,
  pub column: &'static str,
}

pub const fn dependent(label: &'static str, table: &'static str, column: &'static str) -> Dependent {
  Dependent { label, table, column }
}

/// The row `table.key = id` as a delete target, together with what blocks it.
pub struct Target {
  pub kind:       EntityKind,
  pub table:      &'static str,
  pub key:        &'static str,
  pub dependents: &'static [Dependent],
}

impl Target {
  pub fn not_found(&self, id: Uuid) -> crate::Error {
    casework_core::Error::NotFound { kind: self.kind, id }.into()
  }

  /// Push a validation error on `column` when a row other than `except`
  /// already holds `value`.
  pub fn check_unique(
    &self,
    conn: &Connection,
    v: &mut Validator,
    column: &'static str,
    value: Option<&str>,
    except: Option<Uuid>,
  ) -> Result<()> {
    let Some(value) = value else { return Ok(()) };
    let taken: bool = conn.query_row(
      &format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE {column} = ?1 AND {} IS NOT ?2)",
        self.table, self.key
      ),
      rusqlite::params![value, except.map(encode_uuid)],
      |r| r.get(0),
    )?;
    if taken {
      v.push(column, "is already taken");
    }
    Ok(())
  }

  /// Delete the row unless a dependent references it. `Ok(false)` when the
  /// row does not exist. Cascading children go with the row.
  pub fn delete(&self, conn: &mut Connection, id: Uuid) -> Result<bool> {
    let tx = conn.transaction()?;
    if !exists(&tx, self.table, self.key, id)? {
      return Ok(false);
    }

    let mut blocking = Vec::new();
    for dep in self.dependents {
      let used: bool = tx.query_row(
        &format!("SELECT EXISTS (SELECT 1 FROM {} WHERE {} = ?1)", dep.table, dep.column),
        rusqlite::params![encode_uuid(id)],
        |r| r.get(0),
      )?;
      if used {
        blocking.push(dep.label);
      }
    }
    if !blocking.is_empty() {
      tracing::info!(kind = %self.kind, %id, dependents = ?blocking, "delete blocked");
      return Err(
        casework_core::Error::InUse { kind: self.kind, id, dependents: blocking }.into(),
      );
    }

    tx.execute(
      &format!("DELETE FROM {} WHERE {} = ?1", self.table, self.key),
      rusqlite::params![encode_uuid(id)],
    )?;
    tx.commit()?;
    Ok(true)
  }
}
