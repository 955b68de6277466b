//! One query box over both desks.

use casework_core::{
  application::Application,
  lesson::Lesson,
  status::StatusValue,
  store::{SEARCH_LIMIT, SearchResults, text_matches},
};
use rusqlite::Connection;

use crate::{
  Result, directory,
  encode::{APPLICATION_COLUMNS, LESSON_COLUMNS, RawApplication, RawLesson},
  query::page,
  school,
};

fn capped<T>(rows: Vec<T>) -> Vec<T> { page(rows, None, Some(SEARCH_LIMIT)) }

pub fn search(conn: &Connection, text: &str) -> Result<SearchResults> {
  if text.trim().is_empty() {
    return Ok(SearchResults::default());
  }
  let needle = Some(text);
  Ok(SearchResults {
    migrants:     capped(directory::list_migrants(conn, needle)?),
    applications: applications(conn, text)?,
    students:     capped(school::list_students(conn, needle, None)?),
    instructors:  capped(school::list_instructors(conn, needle)?),
    lessons:      lessons(conn, text)?,
    aircraft:     capped(school::list_aircraft(conn, needle)?),
  })
}

/// Newest submissions first, matched on migrant name, kind or status.
fn applications(conn: &Connection, text: &str) -> Result<Vec<Application>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {APPLICATION_COLUMNS}, m.full_name
     FROM applications a
     JOIN migrants m ON m.migrant_id = a.migrant_id
     ORDER BY a.submitted_at DESC, a.application_id"
  ))?;
  let rows = stmt
    .query_map([], |row| Ok((RawApplication::from_row(row)?, row.get::<_, String>(8)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut hits = Vec::new();
  for (raw, migrant_name) in rows {
    let app = raw.into_application()?;
    if text_matches(text, &[
      Some(migrant_name.as_str()),
      Some(app.kind.as_str()),
      Some(app.status.as_str()),
    ]) {
      hits.push(app);
      if hits.len() == SEARCH_LIMIT {
        break;
      }
    }
  }
  Ok(hits)
}

/// Latest lessons first, matched on topic or student name.
fn lessons(conn: &Connection, text: &str) -> Result<Vec<Lesson>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {LESSON_COLUMNS},
            (SELECT s.full_name FROM students s WHERE s.student_id = lessons.student_id)
     FROM lessons
     ORDER BY date DESC, lesson_id"
  ))?;
  let rows = stmt
    .query_map([], |row| Ok((RawLesson::from_row(row)?, row.get::<_, String>(11)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut hits = Vec::new();
  for (raw, student_name) in rows {
    let lesson = raw.into_lesson()?;
    if text_matches(text, &[lesson.topic.as_deref(), Some(student_name.as_str())]) {
      hits.push(lesson);
      if hits.len() == SEARCH_LIMIT {
        break;
      }
    }
  }
  Ok(hits)
}
