//! Exams.

use casework_core::{
  EntityKind,
  exam::{Exam, ExamPatch, NewExam},
  store::{ExamQuery, text_matches},
  validate::{Validator, non_blank},
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{EXAM_COLUMNS, RawExam, encode_date, encode_uuid},
  refs::{Target, check_ref},
};

pub const EXAM: Target = Target {
  kind:       EntityKind::Exam,
  table:      "exams",
  key:        "exam_id",
  dependents: &[],
};

fn check_refs(conn: &Connection, exam: &Exam) -> Result<()> {
  let mut v = Validator::new();
  check_ref(conn, &mut v, "student_id", "students", Some(exam.student_id))?;
  check_ref(conn, &mut v, "course_id", "courses", Some(exam.course_id))?;
  check_ref(conn, &mut v, "instructor_id", "instructors", exam.instructor_id)?;
  Ok(v.finish()?)
}

fn write(conn: &Connection, sql: &str, exam: &Exam) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(exam.exam_id),
      encode_uuid(exam.student_id),
      encode_uuid(exam.course_id),
      exam.instructor_id.map(encode_uuid),
      encode_date(exam.date),
      exam.score,
      exam.result,
    ],
  )?)
}

pub fn add(conn: &mut Connection, input: NewExam) -> Result<Exam> {
  input.validate()?;
  let exam = Exam {
    exam_id:       Uuid::new_v4(),
    student_id:    input.student_id,
    course_id:     input.course_id,
    instructor_id: input.instructor_id,
    date:          input.date,
    score:         input.score,
    result:        non_blank(input.result),
  };

  let tx = conn.transaction()?;
  check_refs(&tx, &exam)?;
  write(
    &tx,
    "INSERT INTO exams (exam_id, student_id, course_id, instructor_id, date, score, result)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    &exam,
  )?;
  tx.commit()?;
  Ok(exam)
}

pub fn get(conn: &Connection, id: Uuid) -> Result<Option<Exam>> {
  conn
    .query_row(
      &format!("SELECT {EXAM_COLUMNS} FROM exams e WHERE e.exam_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawExam::from_row,
    )
    .optional()?
    .map(RawExam::into_exam)
    .transpose()
}

/// Most recent first. Names are joined in for the text filter.
pub fn list(conn: &Connection, query: &ExamQuery) -> Result<Vec<Exam>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {EXAM_COLUMNS}, s.full_name, c.name, i.full_name
     FROM exams e
     JOIN students s         ON s.student_id = e.student_id
     JOIN courses c          ON c.course_id = e.course_id
     LEFT JOIN instructors i ON i.instructor_id = e.instructor_id
     WHERE (?1 IS NULL OR e.student_id = ?1)
       AND (?2 IS NULL OR e.course_id = ?2)
       AND (?3 IS NULL OR e.result = ?3)
     ORDER BY e.date DESC, e.exam_id"
  ))?;
  let rows = stmt
    .query_map(
      rusqlite::params![
        query.student_id.map(encode_uuid),
        query.course_id.map(encode_uuid),
        query.result,
      ],
      |row| {
        let raw = RawExam::from_row(row)?;
        let student: String = row.get(7)?;
        let course: String = row.get(8)?;
        let examiner: Option<String> = row.get(9)?;
        Ok((raw, student, course, examiner))
      },
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for (raw, student, course, examiner) in rows {
    let exam = raw.into_exam()?;
    let hit = query.text.as_deref().is_none_or(|t| {
      text_matches(t, &[
        exam.result.as_deref(),
        Some(student.as_str()),
        Some(course.as_str()),
        examiner.as_deref(),
      ])
    });
    if hit {
      out.push(exam);
    }
  }
  Ok(out)
}

pub fn update(conn: &mut Connection, id: Uuid, patch: ExamPatch) -> Result<Exam> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get(&tx, id)? else {
    return Err(EXAM.not_found(id));
  };
  let exam = current.patched(&patch);
  check_refs(&tx, &exam)?;
  write(
    &tx,
    "UPDATE exams
     SET student_id = ?2, course_id = ?3, instructor_id = ?4, date = ?5, score = ?6,
         result = ?7
     WHERE exam_id = ?1",
    &exam,
  )?;
  tx.commit()?;
  Ok(exam)
}
