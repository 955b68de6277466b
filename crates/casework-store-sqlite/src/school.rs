//! Flight-school reference records and certificate issuance.

use casework_core::{
  EntityKind,
  school::{
    Aircraft, AircraftPatch, Certificate, CertificatePatch, Course, CoursePatch, Instructor,
    InstructorPatch, NewAircraft, NewCertificate, NewCourse, NewInstructor, NewStudent,
    NewStudentCertificate, Student, StudentCertificate, StudentCertificatePatch, StudentPatch,
  },
  status::{CertificateStatus, StatusValue},
  store::{CourseQuery, StudentCertificateQuery, text_matches},
  validate::{Validator, non_blank},
};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    AIRCRAFT_COLUMNS, CERTIFICATE_COLUMNS, COURSE_COLUMNS, INSTRUCTOR_COLUMNS, RawAircraft,
    RawCertificate, RawCourse, RawInstructor, RawStudent, RawStudentCertificate,
    STUDENT_CERTIFICATE_COLUMNS, STUDENT_COLUMNS, encode_date, encode_uuid,
  },
  refs::{Target, check_ref, dependent},
};

pub const COURSE: Target = Target {
  kind:       EntityKind::Course,
  table:      "courses",
  key:        "course_id",
  dependents: &[
    dependent("students", "students", "course_id"),
    dependent("lessons", "lessons", "course_id"),
    dependent("exams", "exams", "course_id"),
    dependent("certificates", "certificates", "course_id"),
  ],
};

pub const STUDENT: Target = Target {
  kind:       EntityKind::Student,
  table:      "students",
  key:        "student_id",
  dependents: &[
    dependent("lessons", "lessons", "student_id"),
    dependent("exams", "exams", "student_id"),
    dependent("student certificates", "student_certificates", "student_id"),
  ],
};

pub const INSTRUCTOR: Target = Target {
  kind:       EntityKind::Instructor,
  table:      "instructors",
  key:        "instructor_id",
  dependents: &[
    dependent("lessons", "lessons", "instructor_id"),
    dependent("exams", "exams", "instructor_id"),
  ],
};

pub const AIRCRAFT: Target = Target {
  kind:       EntityKind::Aircraft,
  table:      "aircraft",
  key:        "aircraft_id",
  dependents: &[dependent("lessons", "lessons", "aircraft_id")],
};

pub const CERTIFICATE: Target = Target {
  kind:       EntityKind::Certificate,
  table:      "certificates",
  key:        "certificate_id",
  dependents: &[dependent("student certificates", "student_certificates", "certificate_id")],
};

pub const STUDENT_CERTIFICATE: Target = Target {
  kind:       EntityKind::StudentCertificate,
  table:      "student_certificates",
  key:        "student_certificate_id",
  dependents: &[],
};

// ─── Courses ─────────────────────────────────────────────────────────────────

pub fn add_course(conn: &mut Connection, input: NewCourse) -> Result<Course> {
  input.validate()?;
  let course = Course {
    course_id:      Uuid::new_v4(),
    name:           input.name.trim().to_owned(),
    category:       non_blank(input.category),
    description:    non_blank(input.description),
    required_hours: input.required_hours,
    is_active:      input.is_active,
  };
  write_course(
    conn,
    "INSERT INTO courses (course_id, name, category, description, required_hours, is_active)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    &course,
  )?;
  Ok(course)
}

fn write_course(conn: &Connection, sql: &str, course: &Course) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(course.course_id),
      course.name,
      course.category,
      course.description,
      course.required_hours,
      course.is_active,
    ],
  )?)
}

pub fn update_course(conn: &mut Connection, id: Uuid, patch: CoursePatch) -> Result<Course> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_course(&tx, id)? else {
    return Err(COURSE.not_found(id));
  };
  let course = current.patched(&patch);
  write_course(
    &tx,
    "UPDATE courses
     SET name = ?2, category = ?3, description = ?4, required_hours = ?5, is_active = ?6
     WHERE course_id = ?1",
    &course,
  )?;
  tx.commit()?;
  Ok(course)
}

pub fn get_course(conn: &Connection, id: Uuid) -> Result<Option<Course>> {
  conn
    .query_row(
      &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE course_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawCourse::from_row,
    )
    .optional()?
    .map(RawCourse::into_course)
    .transpose()
}

pub fn list_courses(conn: &Connection, query: &CourseQuery) -> Result<Vec<Course>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {COURSE_COLUMNS} FROM courses
     WHERE (?1 = 0 OR is_active = 1)
     ORDER BY name, course_id"
  ))?;
  let raws = stmt
    .query_map(rusqlite::params![query.only_active], RawCourse::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for raw in raws {
    let course = raw.into_course()?;
    let hit = query
      .text
      .as_deref()
      .is_none_or(|t| text_matches(t, &[Some(course.name.as_str()), course.category.as_deref()]));
    if hit {
      out.push(course);
    }
  }
  Ok(out)
}

// ─── Students ────────────────────────────────────────────────────────────────

pub fn add_student(conn: &mut Connection, input: NewStudent) -> Result<Student> {
  input.validate()?;
  let student = Student {
    student_id:  Uuid::new_v4(),
    full_name:   input.full_name.trim().to_owned(),
    email:       non_blank(input.email),
    phone:       non_blank(input.phone),
    birth_date:  input.birth_date,
    enrolled_on: input.enrolled_on,
    course_id:   input.course_id,
  };

  let tx = conn.transaction()?;
  check_student(&tx, &student, None)?;
  write_student(
    &tx,
    "INSERT INTO students
       (student_id, full_name, email, phone, birth_date, enrolled_on, course_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    &student,
  )?;
  tx.commit()?;
  Ok(student)
}

/// Email uniqueness (ignoring `except`) and the course reference.
fn check_student(conn: &Connection, student: &Student, except: Option<Uuid>) -> Result<()> {
  let mut v = Validator::new();
  STUDENT.check_unique(conn, &mut v, "email", student.email.as_deref(), except)?;
  check_ref(conn, &mut v, "course_id", "courses", student.course_id)?;
  Ok(v.finish()?)
}

fn write_student(conn: &Connection, sql: &str, student: &Student) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(student.student_id),
      student.full_name,
      student.email,
      student.phone,
      student.birth_date.map(encode_date),
      student.enrolled_on.map(encode_date),
      student.course_id.map(encode_uuid),
    ],
  )?)
}

pub fn update_student(conn: &mut Connection, id: Uuid, patch: StudentPatch) -> Result<Student> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_student(&tx, id)? else {
    return Err(STUDENT.not_found(id));
  };
  let student = current.patched(&patch);
  check_student(&tx, &student, Some(id))?;
  write_student(
    &tx,
    "UPDATE students
     SET full_name = ?2, email = ?3, phone = ?4, birth_date = ?5, enrolled_on = ?6,
         course_id = ?7
     WHERE student_id = ?1",
    &student,
  )?;
  tx.commit()?;
  Ok(student)
}

pub fn get_student(conn: &Connection, id: Uuid) -> Result<Option<Student>> {
  conn
    .query_row(
      &format!("SELECT {STUDENT_COLUMNS} FROM students s WHERE s.student_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawStudent::from_row,
    )
    .optional()?
    .map(RawStudent::into_student)
    .transpose()
}

pub fn list_students(
  conn: &Connection,
  text: Option<&str>,
  course_id: Option<Uuid>,
) -> Result<Vec<Student>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {STUDENT_COLUMNS} FROM students s
     WHERE (?1 IS NULL OR s.course_id = ?1)
     ORDER BY s.full_name, s.student_id"
  ))?;
  let raws = stmt
    .query_map(rusqlite::params![course_id.map(encode_uuid)], RawStudent::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for raw in raws {
    let student = raw.into_student()?;
    let hit = text
      .is_none_or(|t| text_matches(t, &[Some(student.full_name.as_str()), student.email.as_deref()]));
    if hit {
      out.push(student);
    }
  }
  Ok(out)
}

// ─── Instructors ─────────────────────────────────────────────────────────────

pub fn add_instructor(conn: &mut Connection, input: NewInstructor) -> Result<Instructor> {
  input.validate()?;
  let instructor = Instructor {
    instructor_id: Uuid::new_v4(),
    full_name:     input.full_name.trim().to_owned(),
    email:         non_blank(input.email),
    phone:         non_blank(input.phone),
    rank:          non_blank(input.rank),
    hired_on:      input.hired_on,
    is_active:     input.is_active,
  };
  write_instructor(
    conn,
    "INSERT INTO instructors
       (instructor_id, full_name, email, phone, rank, hired_on, is_active)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    &instructor,
  )?;
  Ok(instructor)
}

fn write_instructor(conn: &Connection, sql: &str, instructor: &Instructor) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(instructor.instructor_id),
      instructor.full_name,
      instructor.email,
      instructor.phone,
      instructor.rank,
      instructor.hired_on.map(encode_date),
      instructor.is_active,
    ],
  )?)
}

pub fn update_instructor(
  conn: &mut Connection,
  id: Uuid,
  patch: InstructorPatch,
) -> Result<Instructor> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_instructor(&tx, id)? else {
    return Err(INSTRUCTOR.not_found(id));
  };
  let instructor = current.patched(&patch);
  write_instructor(
    &tx,
    "UPDATE instructors
     SET full_name = ?2, email = ?3, phone = ?4, rank = ?5, hired_on = ?6, is_active = ?7
     WHERE instructor_id = ?1",
    &instructor,
  )?;
  tx.commit()?;
  Ok(instructor)
}

pub fn get_instructor(conn: &Connection, id: Uuid) -> Result<Option<Instructor>> {
  conn
    .query_row(
      &format!("SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE instructor_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawInstructor::from_row,
    )
    .optional()?
    .map(RawInstructor::into_instructor)
    .transpose()
}

/// Sorted by name; `text` matches name or email.
pub fn list_instructors(conn: &Connection, text: Option<&str>) -> Result<Vec<Instructor>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {INSTRUCTOR_COLUMNS} FROM instructors ORDER BY full_name, instructor_id"
  ))?;
  let raws = stmt
    .query_map([], RawInstructor::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for raw in raws {
    let instructor = raw.into_instructor()?;
    let hit = text.is_none_or(|t| {
      text_matches(t, &[Some(instructor.full_name.as_str()), instructor.email.as_deref()])
    });
    if hit {
      out.push(instructor);
    }
  }
  Ok(out)
}

// ─── Aircraft ────────────────────────────────────────────────────────────────

pub fn add_aircraft(conn: &mut Connection, input: NewAircraft) -> Result<Aircraft> {
  input.validate()?;
  let aircraft = Aircraft {
    aircraft_id: Uuid::new_v4(),
    tail_number: input.tail_number.trim().to_owned(),
    model:       non_blank(input.model),
    kind:        non_blank(input.kind),
    year:        input.year,
    total_hours: input.total_hours,
    status:      non_blank(input.status),
  };

  let tx = conn.transaction()?;
  let mut v = Validator::new();
  AIRCRAFT.check_unique(&tx, &mut v, "tail_number", Some(&aircraft.tail_number), None)?;
  v.finish()?;

  write_aircraft(
    &tx,
    "INSERT INTO aircraft (aircraft_id, tail_number, model, kind, year, total_hours, status)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    &aircraft,
  )?;
  tx.commit()?;
  Ok(aircraft)
}

fn write_aircraft(conn: &Connection, sql: &str, aircraft: &Aircraft) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(aircraft.aircraft_id),
      aircraft.tail_number,
      aircraft.model,
      aircraft.kind,
      aircraft.year,
      aircraft.total_hours,
      aircraft.status,
    ],
  )?)
}

pub fn update_aircraft(conn: &mut Connection, id: Uuid, patch: AircraftPatch) -> Result<Aircraft> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_aircraft(&tx, id)? else {
    return Err(AIRCRAFT.not_found(id));
  };
  let aircraft = current.patched(&patch);

  let mut v = Validator::new();
  AIRCRAFT.check_unique(&tx, &mut v, "tail_number", Some(&aircraft.tail_number), Some(id))?;
  v.finish()?;

  write_aircraft(
    &tx,
    "UPDATE aircraft
     SET tail_number = ?2, model = ?3, kind = ?4, year = ?5, total_hours = ?6, status = ?7
     WHERE aircraft_id = ?1",
    &aircraft,
  )?;
  tx.commit()?;
  Ok(aircraft)
}

pub fn get_aircraft(conn: &Connection, id: Uuid) -> Result<Option<Aircraft>> {
  conn
    .query_row(
      &format!("SELECT {AIRCRAFT_COLUMNS} FROM aircraft WHERE aircraft_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawAircraft::from_row,
    )
    .optional()?
    .map(RawAircraft::into_aircraft)
    .transpose()
}

/// Sorted by tail number; `text` matches tail number or model.
pub fn list_aircraft(conn: &Connection, text: Option<&str>) -> Result<Vec<Aircraft>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {AIRCRAFT_COLUMNS} FROM aircraft ORDER BY tail_number"
  ))?;
  let raws = stmt
    .query_map([], RawAircraft::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for raw in raws {
    let aircraft = raw.into_aircraft()?;
    let hit = text.is_none_or(|t| {
      text_matches(t, &[Some(aircraft.tail_number.as_str()), aircraft.model.as_deref()])
    });
    if hit {
      out.push(aircraft);
    }
  }
  Ok(out)
}

// ─── Certificate templates ───────────────────────────────────────────────────

pub fn add_certificate(conn: &mut Connection, input: NewCertificate) -> Result<Certificate> {
  input.validate()?;
  let certificate = Certificate {
    certificate_id:        Uuid::new_v4(),
    title:                 input.title.trim().to_owned(),
    description:           non_blank(input.description),
    course_id:             input.course_id,
    default_validity_days: input.default_validity_days,
  };

  let tx = conn.transaction()?;
  let mut v = Validator::new();
  check_ref(&tx, &mut v, "course_id", "courses", certificate.course_id)?;
  v.finish()?;

  write_certificate(
    &tx,
    "INSERT INTO certificates
       (certificate_id, title, description, course_id, default_validity_days)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    &certificate,
  )?;
  tx.commit()?;
  Ok(certificate)
}

fn write_certificate(conn: &Connection, sql: &str, certificate: &Certificate) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(certificate.certificate_id),
      certificate.title,
      certificate.description,
      certificate.course_id.map(encode_uuid),
      certificate.default_validity_days,
    ],
  )?)
}

pub fn update_certificate(
  conn: &mut Connection,
  id: Uuid,
  patch: CertificatePatch,
) -> Result<Certificate> {
  patch.validate()?;
  let tx = conn.transaction()?;
  let Some(current) = get_certificate(&tx, id)? else {
    return Err(CERTIFICATE.not_found(id));
  };
  let certificate = current.patched(&patch);

  let mut v = Validator::new();
  check_ref(&tx, &mut v, "course_id", "courses", certificate.course_id)?;
  v.finish()?;

  write_certificate(
    &tx,
    "UPDATE certificates
     SET title = ?2, description = ?3, course_id = ?4, default_validity_days = ?5
     WHERE certificate_id = ?1",
    &certificate,
  )?;
  tx.commit()?;
  Ok(certificate)
}

pub fn get_certificate(conn: &Connection, id: Uuid) -> Result<Option<Certificate>> {
  conn
    .query_row(
      &format!("SELECT {CERTIFICATE_COLUMNS} FROM certificates WHERE certificate_id = ?1"),
      rusqlite::params![encode_uuid(id)],
      RawCertificate::from_row,
    )
    .optional()?
    .map(RawCertificate::into_certificate)
    .transpose()
}

pub fn list_certificates(conn: &Connection, course_id: Option<Uuid>) -> Result<Vec<Certificate>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {CERTIFICATE_COLUMNS} FROM certificates
     WHERE (?1 IS NULL OR course_id = ?1)
     ORDER BY title, certificate_id"
  ))?;
  let raws = stmt
    .query_map(rusqlite::params![course_id.map(encode_uuid)], RawCertificate::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawCertificate::into_certificate).collect()
}

// ─── Issued certificates ─────────────────────────────────────────────────────

/// Issue a certificate as of `today`. The expiry defaults to the template's
/// validity window.
pub fn issue_certificate(
  conn: &mut Connection,
  input: NewStudentCertificate,
  today: NaiveDate,
) -> Result<StudentCertificate> {
  let issued_on = input.issued_on.unwrap_or(today);
  input.validate(issued_on)?;

  let tx = conn.transaction()?;
  let mut v = Validator::new();
  check_ref(&tx, &mut v, "student_id", "students", Some(input.student_id))?;
  let template = get_certificate(&tx, input.certificate_id)?;
  if template.is_none() {
    v.push("certificate_id", "does not exist");
  }
  v.finish()?;

  let valid_until = input
    .valid_until
    .or_else(|| template.and_then(|t| t.expiry_for(issued_on)));
  let issued = StudentCertificate {
    student_certificate_id: Uuid::new_v4(),
    student_id: input.student_id,
    certificate_id: input.certificate_id,
    issued_on,
    number: non_blank(input.number),
    valid_until,
    status: input.status,
    notes: non_blank(input.notes),
  };

  write_student_certificate(
    &tx,
    "INSERT INTO student_certificates
       (student_certificate_id, student_id, certificate_id, issued_on, number,
        valid_until, status, notes)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    &issued,
  )?;
  tx.commit()?;
  Ok(issued)
}

fn write_student_certificate(
  conn: &Connection,
  sql: &str,
  issued: &StudentCertificate,
) -> Result<usize> {
  Ok(conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(issued.student_certificate_id),
      encode_uuid(issued.student_id),
      encode_uuid(issued.certificate_id),
      encode_date(issued.issued_on),
      issued.number,
      issued.valid_until.map(encode_date),
      issued.status.as_str(),
      issued.notes,
    ],
  )?)
}

pub fn get_student_certificate(conn: &Connection, id: Uuid) -> Result<Option<StudentCertificate>> {
  conn
    .query_row(
      &format!(
        "SELECT {STUDENT_CERTIFICATE_COLUMNS} FROM student_certificates sc
         WHERE sc.student_certificate_id = ?1"
      ),
      rusqlite::params![encode_uuid(id)],
      RawStudentCertificate::from_row,
    )
    .optional()?
    .map(RawStudentCertificate::into_student_certificate)
    .transpose()
}

/// Newest issuance first. The text filter also sees the student's name and
/// the template title, so both are joined in.
pub fn list_student_certificates(
  conn: &Connection,
  query: &StudentCertificateQuery,
) -> Result<Vec<StudentCertificate>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {STUDENT_CERTIFICATE_COLUMNS}, s.full_name, c.title
     FROM student_certificates sc
     JOIN students s     ON s.student_id = sc.student_id
     JOIN certificates c ON c.certificate_id = sc.certificate_id
     WHERE (?1 IS NULL OR sc.student_id = ?1)
       AND (?2 IS NULL OR c.course_id = ?2)
       AND (?3 IS NULL OR sc.certificate_id = ?3)
       AND (?4 IS NULL OR sc.status = ?4)
     ORDER BY sc.issued_on DESC, sc.student_certificate_id"
  ))?;
  let rows = stmt
    .query_map(
      rusqlite::params![
        query.student_id.map(encode_uuid),
        query.course_id.map(encode_uuid),
        query.certificate_id.map(encode_uuid),
        query.status.map(|s| s.as_str()),
      ],
      |row| {
        let raw = RawStudentCertificate::from_row(row)?;
        let student_name: String = row.get(8)?;
        let title: String = row.get(9)?;
        Ok((raw, student_name, title))
      },
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut out = Vec::new();
  for (raw, student_name, title) in rows {
    let issued = raw.into_student_certificate()?;
    let hit = query.text.as_deref().is_none_or(|t| {
      text_matches(t, &[issued.number.as_deref(), Some(student_name.as_str()), Some(title.as_str())])
    });
    if hit {
      out.push(issued);
    }
  }
  Ok(out)
}

pub fn set_student_certificate_status(
  conn: &mut Connection,
  id: Uuid,
  status: CertificateStatus,
) -> Result<StudentCertificate> {
  let tx = conn.transaction()?;
  let Some(mut issued) = get_student_certificate(&tx, id)? else {
    return Err(STUDENT_CERTIFICATE.not_found(id));
  };
  tx.execute(
    "UPDATE student_certificates SET status = ?2 WHERE student_certificate_id = ?1",
    rusqlite::params![encode_uuid(id), status.as_str()],
  )?;
  tx.commit()?;
  issued.status = status;
  Ok(issued)
}

pub fn update_student_certificate(
  conn: &mut Connection,
  id: Uuid,
  patch: StudentCertificatePatch,
) -> Result<StudentCertificate> {
  let tx = conn.transaction()?;
  let Some(current) = get_student_certificate(&tx, id)? else {
    return Err(STUDENT_CERTIFICATE.not_found(id));
  };
  let issued = current.patched(&patch);
  issued.validate()?;

  let mut v = Validator::new();
  check_ref(&tx, &mut v, "student_id", "students", Some(issued.student_id))?;
  check_ref(&tx, &mut v, "certificate_id", "certificates", Some(issued.certificate_id))?;
  v.finish()?;

  write_student_certificate(
    &tx,
    "UPDATE student_certificates
     SET student_id = ?2, certificate_id = ?3, issued_on = ?4, number = ?5,
         valid_until = ?6, status = ?7, notes = ?8
     WHERE student_certificate_id = ?1",
    &issued,
  )?;
  tx.commit()?;
  Ok(issued)
}
