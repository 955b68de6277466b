//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with exactly six fractional
//! digits, so lexicographic order in SQL matches chronological order. Dates
//! are ISO 8601 (`YYYY-MM-DD`). UUIDs are hyphenated lowercase strings.
//! Statuses are stored by their wire spelling.

use casework_core::{
  application::Application,
  directory::{Migrant, Officer},
  exam::Exam,
  history::StatusChange,
  lesson::Lesson,
  school::{Aircraft, Certificate, Course, Instructor, Student, StudentCertificate},
  status::StatusValue,
  validate::Hours,
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

pub fn decode_status<S: StatusValue>(s: &str) -> Result<S> { Ok(S::decode(s)?) }

fn decode_hours(v: f64) -> Result<Hours> {
  Hours::new(v).ok_or_else(|| Error::Decode(format!("duration out of range: {v}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` struct mirrors the column list next to it; `from_row` reads the
// columns positionally and `into_*` decodes them.

pub const MIGRANT_COLUMNS: &str =
  "migrant_id, full_name, passport_number, birth_date, address, gender, phone_number";

pub struct RawMigrant {
  pub migrant_id:      String,
  pub full_name:       String,
  pub passport_number: String,
  pub birth_date:      Option<String>,
  pub address:         Option<String>,
  pub gender:          String,
  pub phone_number:    String,
}

impl RawMigrant {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      migrant_id:      row.get(0)?,
      full_name:       row.get(1)?,
      passport_number: row.get(2)?,
      birth_date:      row.get(3)?,
      address:         row.get(4)?,
      gender:          row.get(5)?,
      phone_number:    row.get(6)?,
    })
  }

  pub fn into_migrant(self) -> Result<Migrant> {
    Ok(Migrant {
      migrant_id:      decode_uuid(&self.migrant_id)?,
      full_name:       self.full_name,
      passport_number: self.passport_number,
      birth_date:      decode_opt_date(self.birth_date)?,
      address:         self.address,
      gender:          self.gender,
      phone_number:    self.phone_number,
    })
  }
}

pub const OFFICER_COLUMNS: &str = "officer_id, full_name, position, email, login";

pub struct RawOfficer {
  pub officer_id: String,
  pub full_name:  String,
  pub position:   Option<String>,
  pub email:      Option<String>,
  pub login:      String,
}

impl RawOfficer {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      officer_id: row.get(0)?,
      full_name:  row.get(1)?,
      position:   row.get(2)?,
      email:      row.get(3)?,
      login:      row.get(4)?,
    })
  }

  pub fn into_officer(self) -> Result<Officer> {
    Ok(Officer {
      officer_id: decode_uuid(&self.officer_id)?,
      full_name:  self.full_name,
      position:   self.position,
      email:      self.email,
      login:      self.login,
    })
  }
}

/// Application columns qualified with the `a` alias used by list queries.
pub const APPLICATION_COLUMNS: &str = "a.application_id, a.migrant_id, a.officer_id, a.kind, \
   a.status, a.submitted_at, a.decision_date, a.version";

pub struct RawApplication {
  pub application_id: String,
  pub migrant_id:     String,
  pub officer_id:     String,
  pub kind:           String,
  pub status:         String,
  pub submitted_at:   String,
  pub decision_date:  Option<String>,
  pub version:        u32,
}

impl RawApplication {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id: row.get(0)?,
      migrant_id:     row.get(1)?,
      officer_id:     row.get(2)?,
      kind:           row.get(3)?,
      status:         row.get(4)?,
      submitted_at:   row.get(5)?,
      decision_date:  row.get(6)?,
      version:        row.get(7)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      application_id: decode_uuid(&self.application_id)?,
      migrant_id:     decode_uuid(&self.migrant_id)?,
      officer_id:     decode_uuid(&self.officer_id)?,
      kind:           self.kind,
      status:         decode_status(&self.status)?,
      submitted_at:   decode_dt(&self.submitted_at)?,
      decision_date:  self.decision_date.as_deref().map(decode_dt).transpose()?,
      version:        self.version,
    })
  }
}

pub const STATUS_CHANGE_COLUMNS: &str =
  "change_id, entity_id, previous_status, status, changed_at, comment";

pub struct RawStatusChange {
  pub change_id:       String,
  pub entity_id:       String,
  pub previous_status: Option<String>,
  pub status:          String,
  pub changed_at:      String,
  pub comment:         Option<String>,
}

impl RawStatusChange {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      change_id:       row.get(0)?,
      entity_id:       row.get(1)?,
      previous_status: row.get(2)?,
      status:          row.get(3)?,
      changed_at:      row.get(4)?,
      comment:         row.get(5)?,
    })
  }

  pub fn into_change<S: StatusValue>(self) -> Result<StatusChange<S>> {
    Ok(StatusChange {
      change_id:  decode_uuid(&self.change_id)?,
      entity_id:  decode_uuid(&self.entity_id)?,
      previous:   self.previous_status.as_deref().map(decode_status).transpose()?,
      status:     decode_status(&self.status)?,
      changed_at: decode_dt(&self.changed_at)?,
      comment:    self.comment,
    })
  }
}

pub const COURSE_COLUMNS: &str =
  "course_id, name, category, description, required_hours, is_active";

pub struct RawCourse {
  pub course_id:      String,
  pub name:           String,
  pub category:       Option<String>,
  pub description:    Option<String>,
  pub required_hours: Option<f64>,
  pub is_active:      bool,
}

impl RawCourse {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      course_id:      row.get(0)?,
      name:           row.get(1)?,
      category:       row.get(2)?,
      description:    row.get(3)?,
      required_hours: row.get(4)?,
      is_active:      row.get(5)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      course_id:      decode_uuid(&self.course_id)?,
      name:           self.name,
      category:       self.category,
      description:    self.description,
      required_hours: self.required_hours,
      is_active:      self.is_active,
    })
  }
}

pub const STUDENT_COLUMNS: &str =
  "s.student_id, s.full_name, s.email, s.phone, s.birth_date, s.enrolled_on, s.course_id";

pub struct RawStudent {
  pub student_id:  String,
  pub full_name:   String,
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub birth_date:  Option<String>,
  pub enrolled_on: Option<String>,
  pub course_id:   Option<String>,
}

impl RawStudent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:  row.get(0)?,
      full_name:   row.get(1)?,
      email:       row.get(2)?,
      phone:       row.get(3)?,
      birth_date:  row.get(4)?,
      enrolled_on: row.get(5)?,
      course_id:   row.get(6)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      student_id:  decode_uuid(&self.student_id)?,
      full_name:   self.full_name,
      email:       self.email,
      phone:       self.phone,
      birth_date:  decode_opt_date(self.birth_date)?,
      enrolled_on: decode_opt_date(self.enrolled_on)?,
      course_id:   decode_opt_uuid(self.course_id)?,
    })
  }
}

pub const INSTRUCTOR_COLUMNS: &str =
  "instructor_id, full_name, email, phone, rank, hired_on, is_active";

pub struct RawInstructor {
  pub instructor_id: String,
  pub full_name:     String,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub rank:          Option<String>,
  pub hired_on:      Option<String>,
  pub is_active:     bool,
}

impl RawInstructor {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      instructor_id: row.get(0)?,
      full_name:     row.get(1)?,
      email:         row.get(2)?,
      phone:         row.get(3)?,
      rank:          row.get(4)?,
      hired_on:      row.get(5)?,
      is_active:     row.get(6)?,
    })
  }

  pub fn into_instructor(self) -> Result<Instructor> {
    Ok(Instructor {
      instructor_id: decode_uuid(&self.instructor_id)?,
      full_name:     self.full_name,
      email:         self.email,
      phone:         self.phone,
      rank:          self.rank,
      hired_on:      decode_opt_date(self.hired_on)?,
      is_active:     self.is_active,
    })
  }
}

pub const AIRCRAFT_COLUMNS: &str =
  "aircraft_id, tail_number, model, kind, year, total_hours, status";

pub struct RawAircraft {
  pub aircraft_id: String,
  pub tail_number: String,
  pub model:       Option<String>,
  pub kind:        Option<String>,
  pub year:        Option<i32>,
  pub total_hours: Option<f64>,
  pub status:      Option<String>,
}

impl RawAircraft {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      aircraft_id: row.get(0)?,
      tail_number: row.get(1)?,
      model:       row.get(2)?,
      kind:        row.get(3)?,
      year:        row.get(4)?,
      total_hours: row.get(5)?,
      status:      row.get(6)?,
    })
  }

  pub fn into_aircraft(self) -> Result<Aircraft> {
    Ok(Aircraft {
      aircraft_id: decode_uuid(&self.aircraft_id)?,
      tail_number: self.tail_number,
      model:       self.model,
      kind:        self.kind,
      year:        self.year,
      total_hours: self.total_hours,
      status:      self.status,
    })
  }
}

pub const LESSON_COLUMNS: &str = "lesson_id, student_id, instructor_id, course_id, aircraft_id, \
   date, duration_hours, topic, remarks, status, version";

pub struct RawLesson {
  pub lesson_id:      String,
  pub student_id:     String,
  pub instructor_id:  String,
  pub course_id:      Option<String>,
  pub aircraft_id:    Option<String>,
  pub date:           String,
  pub duration_hours: f64,
  pub topic:          Option<String>,
  pub remarks:        Option<String>,
  pub status:         String,
  pub version:        u32,
}

impl RawLesson {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      lesson_id:      row.get(0)?,
      student_id:     row.get(1)?,
      instructor_id:  row.get(2)?,
      course_id:      row.get(3)?,
      aircraft_id:    row.get(4)?,
      date:           row.get(5)?,
      duration_hours: row.get(6)?,
      topic:          row.get(7)?,
      remarks:        row.get(8)?,
      status:         row.get(9)?,
      version:        row.get(10)?,
    })
  }

  pub fn into_lesson(self) -> Result<Lesson> {
    Ok(Lesson {
      lesson_id:     decode_uuid(&self.lesson_id)?,
      student_id:    decode_uuid(&self.student_id)?,
      instructor_id: decode_uuid(&self.instructor_id)?,
      course_id:     decode_opt_uuid(self.course_id)?,
      aircraft_id:   decode_opt_uuid(self.aircraft_id)?,
      date:          decode_date(&self.date)?,
      duration:      decode_hours(self.duration_hours)?,
      topic:         self.topic,
      remarks:       self.remarks,
      status:        decode_status(&self.status)?,
      version:       self.version,
    })
  }
}

pub const CERTIFICATE_COLUMNS: &str =
  "certificate_id, title, description, course_id, default_validity_days";

pub struct RawCertificate {
  pub certificate_id:        String,
  pub title:                 String,
  pub description:           Option<String>,
  pub course_id:             Option<String>,
  pub default_validity_days: Option<u32>,
}

impl RawCertificate {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      certificate_id:        row.get(0)?,
      title:                 row.get(1)?,
      description:           row.get(2)?,
      course_id:             row.get(3)?,
      default_validity_days: row.get(4)?,
    })
  }

  pub fn into_certificate(self) -> Result<Certificate> {
    Ok(Certificate {
      certificate_id:        decode_uuid(&self.certificate_id)?,
      title:                 self.title,
      description:           self.description,
      course_id:             decode_opt_uuid(self.course_id)?,
      default_validity_days: self.default_validity_days,
    })
  }
}

/// Issued-certificate columns qualified with the `sc` alias.
pub const STUDENT_CERTIFICATE_COLUMNS: &str = "sc.student_certificate_id, sc.student_id, \
   sc.certificate_id, sc.issued_on, sc.number, sc.valid_until, sc.status, sc.notes";

pub struct RawStudentCertificate {
  pub student_certificate_id: String,
  pub student_id:             String,
  pub certificate_id:         String,
  pub issued_on:              String,
  pub number:                 Option<String>,
  pub valid_until:            Option<String>,
  pub status:                 String,
  pub notes:                  Option<String>,
}

impl RawStudentCertificate {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_certificate_id: row.get(0)?,
      student_id:             row.get(1)?,
      certificate_id:         row.get(2)?,
      issued_on:              row.get(3)?,
      number:                 row.get(4)?,
      valid_until:            row.get(5)?,
      status:                 row.get(6)?,
      notes:                  row.get(7)?,
    })
  }

  pub fn into_student_certificate(self) -> Result<StudentCertificate> {
    Ok(StudentCertificate {
      student_certificate_id: decode_uuid(&self.student_certificate_id)?,
      student_id:             decode_uuid(&self.student_id)?,
      certificate_id:         decode_uuid(&self.certificate_id)?,
      issued_on:              decode_date(&self.issued_on)?,
      number:                 self.number,
      valid_until:            decode_opt_date(self.valid_until)?,
      status:                 decode_status(&self.status)?,
      notes:                  self.notes,
    })
  }
}

/// Exam columns qualified with the `e` alias.
pub const EXAM_COLUMNS: &str =
  "e.exam_id, e.student_id, e.course_id, e.instructor_id, e.date, e.score, e.result";

pub struct RawExam {
  pub exam_id:       String,
  pub student_id:    String,
  pub course_id:     String,
  pub instructor_id: Option<String>,
  pub date:          String,
  pub score:         Option<f64>,
  pub result:        Option<String>,
}

impl RawExam {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      exam_id:       row.get(0)?,
      student_id:    row.get(1)?,
      course_id:     row.get(2)?,
      instructor_id: row.get(3)?,
      date:          row.get(4)?,
      score:         row.get(5)?,
      result:        row.get(6)?,
    })
  }

  pub fn into_exam(self) -> Result<Exam> {
    Ok(Exam {
      exam_id:       decode_uuid(&self.exam_id)?,
      student_id:    decode_uuid(&self.student_id)?,
      course_id:     decode_uuid(&self.course_id)?,
      instructor_id: decode_opt_uuid(self.instructor_id)?,
      date:          decode_date(&self.date)?,
      score:         self.score,
      result:        self.result,
    })
  }
}
