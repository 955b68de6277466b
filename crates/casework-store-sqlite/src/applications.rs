//! Applications and their status history.

use casework_core::{
  EntityKind,
  application::{Application, ApplicationPatch, NewApplication},
  history::{StatusChange, next_timestamp, record_if_changed, record_initial},
  status::{ApplicationStatus, DecisionEffect, StatusValue},
  store::{ApplicationQuery, ApplicationSortKey, Sort, text_matches},
  validate::Validator,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{APPLICATION_COLUMNS, RawApplication, encode_dt, encode_uuid},
  history::{self, APPLICATION_CHANGES},
  query::{Filter, direction, lifecycle_rank, page},
  refs::{Target, check_ref},
};

/// Status changes go with the application through the cascade.
pub const APPLICATION: Target = Target {
  kind:       EntityKind::Application,
  table:      "applications",
  key:        "application_id",
  dependents: &[],
};

fn check_parties(
  conn: &Connection,
  migrant_id: Option<Uuid>,
  officer_id: Option<Uuid>,
) -> Result<()> {
  let mut v = Validator::new();
  check_ref(conn, &mut v, "migrant_id", "migrants", migrant_id)?;
  check_ref(conn, &mut v, "officer_id", "officers", officer_id)?;
  Ok(v.finish()?)
}

pub fn create(conn: &mut Connection, input: NewApplication, now: DateTime<Utc>) -> Result<Application> {
  input.validate()?;

  let tx = conn.transaction()?;
  check_parties(&tx, Some(input.migrant_id), Some(input.officer_id))?;

  let decision_date = match input.status.decision_effect() {
    DecisionEffect::Stamp => Some(now),
    DecisionEffect::Clear | DecisionEffect::Keep => None,
  };
  let app = Application {
    application_id: Uuid::new_v4(),
    migrant_id: input.migrant_id,
    officer_id: input.officer_id,
    kind: input.kind.trim().to_owned(),
    status: input.status,
    submitted_at: now,
    decision_date,
    version: 1,
  };

  tx.execute(
    "INSERT INTO applications
       (application_id, migrant_id, officer_id, kind, status, submitted_at, decision_date, version)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    rusqlite::params![
      encode_uuid(app.application_id),
      encode_uuid(app.migrant_id),
      encode_uuid(app.officer_id),
      app.kind,
      app.status.as_str(),
      encode_dt(app.submitted_at),
      app.decision_date.map(encode_dt),
      app.version,
    ],
  )?;

  let initial = record_initial(app.application_id, app.status, input.comment, now);
  history::append(&tx, APPLICATION_CHANGES, &initial)?;
  tx.commit()?;
  Ok(app)
}

pub fn get(conn: &Connection, id: Uuid) -> Result<Option<Application>> {
  conn
    .query_row(
      &format!("SELECT {APPLICATION_COLUMNS} FROM applications a WHERE a.application_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawApplication::from_row,
    )
    .optional()?
    .map(RawApplication::into_application)
    .transpose()
}

fn order_by(sort: Option<Sort<ApplicationSortKey>>) -> String {
  let sort = sort.unwrap_or(Sort::asc(ApplicationSortKey::SubmittedAt));
  let dir = direction(sort.direction);
  let key = match sort.key {
    ApplicationSortKey::SubmittedAt => format!("a.submitted_at {dir}"),
    // NULL sorts lowest in SQLite, so undecided rows lead when ascending.
    ApplicationSortKey::DecisionDate => format!("a.decision_date {dir}"),
    ApplicationSortKey::Status => {
      format!("{} {dir}", lifecycle_rank::<ApplicationStatus>("a.status"))
    }
  };
  format!("ORDER BY {key}, a.application_id ASC")
}

pub fn list(conn: &Connection, query: &ApplicationQuery) -> Result<Vec<Application>> {
  let mut filter = Filter::new();
  filter
    .eq("a.migrant_id", query.migrant_id.map(encode_uuid))
    .eq("a.officer_id", query.officer_id.map(encode_uuid))
    .any_of("a.status", &query.statuses)
    .at_least("a.submitted_at", query.submitted_from.map(encode_dt))
    .at_most("a.submitted_at", query.submitted_to.map(encode_dt));

  let sql = format!(
    "SELECT {APPLICATION_COLUMNS}, m.full_name
     FROM applications a
     JOIN migrants m ON m.migrant_id = a.migrant_id
     {}
     {}",
    filter.where_clause(),
    order_by(query.sort),
  );

  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(filter.values()), |row| {
      let raw = RawApplication::from_row(row)?;
      let migrant_name: String = row.get(8)?;
      Ok((raw, migrant_name))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut hits = Vec::new();
  for (raw, migrant_name) in rows {
    let app = raw.into_application()?;
    let hit = query.text.as_deref().is_none_or(|t| {
      text_matches(t, &[Some(app.kind.as_str()), Some(migrant_name.as_str())])
    });
    if hit {
      hits.push(app);
    }
  }
  Ok(page(hits, query.offset, query.limit))
}

pub fn update(
  conn: &mut Connection,
  id: Uuid,
  patch: ApplicationPatch,
  comment: Option<String>,
  now: DateTime<Utc>,
) -> Result<Application> {
  patch.validate()?;

  let tx = conn.transaction()?;
  let Some(current) = get(&tx, id)? else {
    return Err(casework_core::Error::NotFound { kind: EntityKind::Application, id }.into());
  };
  if let Some(expected) = patch.expected_version
    && expected != current.version
  {
    return Err(
      casework_core::Error::VersionConflict {
        kind: EntityKind::Application,
        id,
        expected,
        actual: current.version,
      }
      .into(),
    );
  }
  check_parties(&tx, patch.migrant_id, patch.officer_id)?;

  let at = next_timestamp(history::last_changed_at(&tx, APPLICATION_CHANGES, id)?, now);
  let previous = current.status;
  let base_version = current.version;
  let mut updated = current.patched(&patch, at);
  updated.version = base_version + 1;

  let written = tx.execute(
    "UPDATE applications
     SET migrant_id = ?2, officer_id = ?3, kind = ?4, status = ?5, decision_date = ?6,
         version = ?7
     WHERE application_id = ?1 AND version = ?8",
    rusqlite::params![
      encode_uuid(id),
      encode_uuid(updated.migrant_id),
      encode_uuid(updated.officer_id),
      updated.kind,
      updated.status.as_str(),
      updated.decision_date.map(encode_dt),
      updated.version,
      base_version,
    ],
  )?;
  if written == 0 {
    let actual = get(&tx, id)?.map_or(0, |a| a.version);
    return Err(
      casework_core::Error::VersionConflict {
        kind: EntityKind::Application,
        id,
        expected: base_version,
        actual,
      }
      .into(),
    );
  }

  if let Some(change) = record_if_changed(id, previous, updated.status, comment, at) {
    history::append(&tx, APPLICATION_CHANGES, &change)?;
    tracing::debug!(application = %id, from = %previous, to = %updated.status, "status changed");
  }
  tx.commit()?;
  Ok(updated)
}

pub fn list_history(conn: &Connection, id: Uuid) -> Result<Vec<StatusChange<ApplicationStatus>>> {
  history::list(conn, APPLICATION_CHANGES, id)
}
