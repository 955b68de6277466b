//! Migrants and officers.

use casework_core::{
  EntityKind,
  directory::{Migrant, MigrantPatch, NewMigrant, NewOfficer, Officer, OfficerPatch},
  store::text_matches,
  validate::{Validator, non_blank},
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{MIGRANT_COLUMNS, OFFICER_COLUMNS, RawMigrant, RawOfficer, encode_date, encode_uuid},
  refs::{Target, dependent},
};

pub const MIGRANT: Target = Target {
  kind:       EntityKind::Migrant,
  table:      "migrants",
  key:        "migrant_id",
  dependents: &[dependent("applications", "applications", "migrant_id")],
};

pub const OFFICER: Target = Target {
  kind:       EntityKind::Officer,
  table:      "officers",
  key:        "officer_id",
  dependents: &[dependent("applications", "applications", "officer_id")],
};

// ─── Migrants ────────────────────────────────────────────────────────────────

pub fn add_migrant(conn: &mut Connection, input: NewMigrant) -> Result<Migrant> {
  input.validate()?;
  let migrant = Migrant {
    migrant_id:      Uuid::new_v4(),
    full_name:       input.full_name.trim().to_owned(),
    passport_number: input.passport_number.trim().to_owned(),
    birth_date:      input.birth_date,
    address:         non_blank(input.address),
    gender:          input.gender.trim().to_owned(),
    phone_number:    input.phone_number.trim().to_owned(),
  };

  write_migrant(
    conn,
    "INSERT INTO migrants
       (migrant_id, full_name, passport_number, birth_date, address, gender, phone_number)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    &migrant,
  )?;
  Ok(migrant)
}

fn write_migrant(conn: &Connection, sql: &str, migrant: &Migrant) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(migrant.migrant_id),
      migrant.full_name,
      migrant.passport_number,
      migrant.birth_date.map(encode_date),
      migrant.address,
      migrant.gender,
      migrant.phone_number,
    ],
  )?)
}

pub fn update_migrant(conn: &mut Connection, id: Uuid, patch: MigrantPatch) -> Result<Migrant> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_migrant(&tx, id)? else {
    return Err(MIGRANT.not_found(id));
  };
  let migrant = current.patched(&patch);
  write_migrant(
    &tx,
    "UPDATE migrants
     SET full_name = ?2, passport_number = ?3, birth_date = ?4, address = ?5, gender = ?6,
         phone_number = ?7
     WHERE migrant_id = ?1",
    &migrant,
  )?;
  tx.commit()?;
  Ok(migrant)
}

pub fn get_migrant(conn: &Connection, id: Uuid) -> Result<Option<Migrant>> {
  conn
    .query_row(
      &format!("SELECT {MIGRANT_COLUMNS} FROM migrants WHERE migrant_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawMigrant::from_row,
    )
    .optional()?
    .map(RawMigrant::into_migrant)
    .transpose()
}

/// Sorted by name; `text` matches name, passport number or phone.
pub fn list_migrants(conn: &Connection, text: Option<&str>) -> Result<Vec<Migrant>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {MIGRANT_COLUMNS} FROM migrants ORDER BY full_name, migrant_id"
  ))?;
  let raws = stmt
    .query_map([], RawMigrant::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for raw in raws {
    let migrant = raw.into_migrant()?;
    let hit = text.is_none_or(|t| {
      text_matches(t, &[
        Some(migrant.full_name.as_str()),
        Some(migrant.passport_number.as_str()),
        Some(migrant.phone_number.as_str()),
      ])
    });
    if hit {
      out.push(migrant);
    }
  }
  Ok(out)
}

// ─── Officers ────────────────────────────────────────────────────────────────

pub fn add_officer(conn: &mut Connection, input: NewOfficer) -> Result<Officer> {
  input.validate()?;
  let officer = Officer {
    officer_id: Uuid::new_v4(),
    full_name:  input.full_name.trim().to_owned(),
    position:   non_blank(input.position),
    email:      non_blank(input.email),
    login:      input.login.trim().to_owned(),
  };

  let tx = conn.transaction()?;
  let mut v = Validator::new();
  OFFICER.check_unique(&tx, &mut v, "login", Some(&officer.login), None)?;
  v.finish()?;

  write_officer(
    &tx,
    "INSERT INTO officers (officer_id, full_name, position, email, login)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    &officer,
  )?;
  tx.commit()?;
  Ok(officer)
}

fn write_officer(conn: &Connection, sql: &str, officer: &Officer) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(officer.officer_id),
      officer.full_name,
      officer.position,
      officer.email,
      officer.login,
    ],
  )?)
}

pub fn update_officer(conn: &mut Connection, id: Uuid, patch: OfficerPatch) -> Result<Officer> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_officer(&tx, id)? else {
    return Err(OFFICER.not_found(id));
  };
  let officer = current.patched(&patch);

  let mut v = Validator::new();
  OFFICER.check_unique(&tx, &mut v, "login", Some(&officer.login), Some(id))?;
  v.finish()?;

  write_officer(
    &tx,
    "UPDATE officers SET full_name = ?2, position = ?3, email = ?4, login = ?5
     WHERE officer_id = ?1",
    &officer,
  )?;
  tx.commit()?;
  Ok(officer)
}

pub fn get_officer(conn: &Connection, id: Uuid) -> Result<Option<Officer>> {
  conn
    .query_row(
      &format!("SELECT {OFFICER_COLUMNS} FROM officers WHERE officer_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawOfficer::from_row,
    )
    .optional()?
    .map(RawOfficer::into_officer)
    .transpose()
}

pub fn list_officers(conn: &Connection) -> Result<Vec<Officer>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {OFFICER_COLUMNS} FROM officers ORDER BY full_name, officer_id"
  ))?;
  let raws = stmt
    .query_map([], RawOfficer::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawOfficer::into_officer).collect()
}
