//! Lessons and their status history.

use casework_core::{
  EntityKind,
  history::{StatusChange, next_timestamp, record_if_changed, record_initial},
  lesson::{Lesson, LessonPatch, NewLesson},
  status::{LessonStatus, StatusValue},
  store::{LessonQuery, LessonSortKey, Sort, text_matches},
  validate::{Validator, non_blank},
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{LESSON_COLUMNS, RawLesson, encode_date, encode_uuid},
  history::{self, LESSON_CHANGES},
  query::{Filter, direction, page},
  refs::{Target, check_ref},
};

pub const LESSON: Target = Target {
  kind:       EntityKind::Lesson,
  table:      "lessons",
  key:        "lesson_id",
  dependents: &[],
};

/// References a lesson may carry; `None` skips the check.
struct Refs {
  student_id:    Option<Uuid>,
  instructor_id: Option<Uuid>,
  course_id:     Option<Uuid>,
  aircraft_id:   Option<Uuid>,
}

fn check_refs(conn: &Connection, refs: Refs) -> Result<()> {
  let mut v = Validator::new();
  check_ref(conn, &mut v, "student_id", "students", refs.student_id)?;
  check_ref(conn, &mut v, "instructor_id", "instructors", refs.instructor_id)?;
  check_ref(conn, &mut v, "course_id", "courses", refs.course_id)?;
  check_ref(conn, &mut v, "aircraft_id", "aircraft", refs.aircraft_id)?;
  Ok(v.finish()?)
}

fn write(conn: &Connection, sql: &str, lesson: &Lesson) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(lesson.lesson_id),
      encode_uuid(lesson.student_id),
      encode_uuid(lesson.instructor_id),
      lesson.course_id.map(encode_uuid),
      lesson.aircraft_id.map(encode_uuid),
      encode_date(lesson.date),
      lesson.duration.get(),
      lesson.topic,
      lesson.remarks,
      lesson.status.as_str(),
      lesson.version,
    ],
  )?)
}

pub fn create(conn: &mut Connection, input: NewLesson, now: DateTime<Utc>) -> Result<Lesson> {
  let tx = conn.transaction()?;
  check_refs(&tx, Refs {
    student_id:    Some(input.student_id),
    instructor_id: Some(input.instructor_id),
    course_id:     input.course_id,
    aircraft_id:   input.aircraft_id,
  })?;

  let lesson = Lesson {
    lesson_id:     Uuid::new_v4(),
    student_id:    input.student_id,
    instructor_id: input.instructor_id,
    course_id:     input.course_id,
    aircraft_id:   input.aircraft_id,
    date:          input.date,
    duration:      input.duration,
    topic:         non_blank(input.topic),
    remarks:       non_blank(input.remarks),
    status:        input.status,
    version:       1,
  };
  write(
    &tx,
    "INSERT INTO lessons
       (lesson_id, student_id, instructor_id, course_id, aircraft_id, date,
        duration_hours, topic, remarks, status, version)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    &lesson,
  )?;

  let initial = record_initial(lesson.lesson_id, lesson.status, input.comment, now);
  history::append(&tx, LESSON_CHANGES, &initial)?;
  tx.commit()?;
  Ok(lesson)
}

pub fn get(conn: &Connection, id: Uuid) -> Result<Option<Lesson>> {
  conn
    .query_row(
      &format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE lesson_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawLesson::from_row,
    )
    .optional()?
    .map(RawLesson::into_lesson)
    .transpose()
}

fn order_by(sort: Option<Sort<LessonSortKey>>) -> String {
  let sort = sort.unwrap_or(Sort::asc(LessonSortKey::Date));
  let column = match sort.key {
    LessonSortKey::Date => "date",
    LessonSortKey::Duration => "duration_hours",
  };
  format!("ORDER BY {column} {}, lesson_id ASC", direction(sort.direction))
}

pub fn list(conn: &Connection, query: &LessonQuery) -> Result<Vec<Lesson>> {
  let mut filter = Filter::new();
  filter
    .eq("student_id", query.student_id.map(encode_uuid))
    .eq("instructor_id", query.instructor_id.map(encode_uuid))
    .eq("course_id", query.course_id.map(encode_uuid))
    .eq("aircraft_id", query.aircraft_id.map(encode_uuid))
    .any_of("status", &query.statuses)
    .at_least("date", query.date_from.map(encode_date))
    .at_most("date", query.date_to.map(encode_date));

  let sql = format!(
    "SELECT {LESSON_COLUMNS} FROM lessons {} {}",
    filter.where_clause(),
    order_by(query.sort),
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(rusqlite::params_from_iter(filter.values()), RawLesson::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut hits = Vec::new();
  for raw in raws {
    let lesson = raw.into_lesson()?;
    let hit = query
      .text
      .as_deref()
      .is_none_or(|t| text_matches(t, &[lesson.topic.as_deref(), lesson.remarks.as_deref()]));
    if hit {
      hits.push(lesson);
    }
  }
  Ok(page(hits, query.offset, query.limit))
}

pub fn update(
  conn: &mut Connection,
  id: Uuid,
  patch: LessonPatch,
  comment: Option<String>,
  now: DateTime<Utc>,
) -> Result<Lesson> {
  let tx = conn.transaction()?;
  let Some(current) = get(&tx, id)? else {
    return Err(casework_core::Error::NotFound { kind: EntityKind::Lesson, id }.into());
  };
  if let Some(expected) = patch.expected_version
    && expected != current.version
  {
    return Err(
      casework_core::Error::VersionConflict {
        kind: EntityKind::Lesson,
        id,
        expected,
        actual: current.version,
      }
      .into(),
    );
  }
  check_refs(&tx, Refs {
    student_id:    patch.student_id,
    instructor_id: patch.instructor_id,
    course_id:     patch.course_id.flatten(),
    aircraft_id:   patch.aircraft_id.flatten(),
  })?;

  let at = next_timestamp(history::last_changed_at(&tx, LESSON_CHANGES, id)?, now);
  let previous = current.status;
  let mut updated = current.patched(&patch, at);
  updated.version += 1;

  let written = write(
    &tx,
    "UPDATE lessons
     SET student_id = ?2, instructor_id = ?3, course_id = ?4, aircraft_id = ?5, date = ?6,
         duration_hours = ?7, topic = ?8, remarks = ?9, status = ?10, version = ?11
     WHERE lesson_id = ?1 AND version = ?11 - 1",
    &updated,
  )?;
  if written == 0 {
    let actual = get(&tx, id)?.map_or(0, |l| l.version);
    return Err(
      casework_core::Error::VersionConflict {
        kind: EntityKind::Lesson,
        id,
        expected: updated.version - 1,
        actual,
      }
      .into(),
    );
  }

  if let Some(change) = record_if_changed(id, previous, updated.status, comment, at) {
    history::append(&tx, LESSON_CHANGES, &change)?;
    tracing::debug!(lesson = %id, from = %previous, to = %updated.status, "status changed");
  }
  tx.commit()?;
  Ok(updated)
}

pub fn list_history(conn: &Connection, id: Uuid) -> Result<Vec<StatusChange<LessonStatus>>> {
  history::list(conn, LESSON_CHANGES, id)
}
