//! [`SqliteStore`], the SQLite implementation of [`CaseStore`].

use std::path::Path;

use casework_core::{
  application::{Application, ApplicationPatch, NewApplication},
  directory::{Migrant, MigrantPatch, NewMigrant, NewOfficer, Officer, OfficerPatch},
  exam::{Exam, ExamPatch, NewExam},
  history::StatusChange,
  lesson::{Lesson, LessonPatch, NewLesson},
  school::{
    Aircraft, AircraftPatch, Certificate, CertificatePatch, Course, CoursePatch, Instructor,
    InstructorPatch, NewAircraft, NewCertificate, NewCourse, NewInstructor, NewStudent,
    NewStudentCertificate, Student, StudentCertificate, StudentCertificatePatch, StudentPatch,
  },
  status::{ApplicationStatus, CertificateStatus, LessonStatus},
  store::{
    ApplicationQuery, CaseStore, CourseQuery, ExamQuery, LessonQuery, SearchResults,
    StudentCertificateQuery,
  },
};
use chrono::{DateTime, SubsecRound as _, Utc};
use uuid::Uuid;

use crate::{
  Error, Result, applications,
  applications::APPLICATION,
  directory::{self, MIGRANT, OFFICER},
  exams::{self, EXAM},
  lessons,
  lessons::LESSON,
  schema::SCHEMA,
  school::{self, AIRCRAFT, CERTIFICATE, COURSE, INSTRUCTOR, STUDENT, STUDENT_CERTIFICATE},
  search,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Casework store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// A private in-memory database.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `op` on the connection thread.
  async fn run<T, F>(&self, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(op(conn))).await?
  }
}

/// The current instant at the precision timestamps are stored with, so a
/// returned entity compares equal to the same entity read back.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = Error;

  // ── Migrants & officers ───────────────────────────────────────────────

  async fn add_migrant(&self, input: NewMigrant) -> Result<Migrant> {
    self.run(move |conn| directory::add_migrant(conn, input)).await
  }

  async fn get_migrant(&self, id: Uuid) -> Result<Option<Migrant>> {
    self.run(move |conn| directory::get_migrant(conn, id)).await
  }

  async fn list_migrants(&self, text: Option<String>) -> Result<Vec<Migrant>> {
    self.run(move |conn| directory::list_migrants(conn, text.as_deref())).await
  }

  async fn update_migrant(&self, id: Uuid, patch: MigrantPatch) -> Result<Migrant> {
    self.run(move |conn| directory::update_migrant(conn, id, patch)).await
  }

  async fn delete_migrant(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| MIGRANT.delete(conn, id)).await
  }

  async fn add_officer(&self, input: NewOfficer) -> Result<Officer> {
    self.run(move |conn| directory::add_officer(conn, input)).await
  }

  async fn get_officer(&self, id: Uuid) -> Result<Option<Officer>> {
    self.run(move |conn| directory::get_officer(conn, id)).await
  }

  async fn list_officers(&self) -> Result<Vec<Officer>> {
    self.run(|conn| directory::list_officers(conn)).await
  }

  async fn update_officer(&self, id: Uuid, patch: OfficerPatch) -> Result<Officer> {
    self.run(move |conn| directory::update_officer(conn, id, patch)).await
  }

  async fn delete_officer(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| OFFICER.delete(conn, id)).await
  }

  // ── Applications ──────────────────────────────────────────────────────

  async fn create_application(&self, input: NewApplication) -> Result<Application> {
    let at = now();
    self.run(move |conn| applications::create(conn, input, at)).await
  }

  async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
    self.run(move |conn| applications::get(conn, id)).await
  }

  async fn list_applications(&self, query: &ApplicationQuery) -> Result<Vec<Application>> {
    let query = query.clone();
    self.run(move |conn| applications::list(conn, &query)).await
  }

  async fn update_application(
    &self,
    id: Uuid,
    patch: ApplicationPatch,
    comment: Option<String>,
  ) -> Result<Application> {
    let at = now();
    self
      .run(move |conn| applications::update(conn, id, patch, comment, at))
      .await
  }

  async fn delete_application(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| APPLICATION.delete(conn, id)).await
  }

  async fn application_history(&self, id: Uuid) -> Result<Vec<StatusChange<ApplicationStatus>>> {
    self.run(move |conn| applications::list_history(conn, id)).await
  }

  // ── Courses, students, instructors, aircraft ──────────────────────────

  async fn add_course(&self, input: NewCourse) -> Result<Course> {
    self.run(move |conn| school::add_course(conn, input)).await
  }

  async fn get_course(&self, id: Uuid) -> Result<Option<Course>> {
    self.run(move |conn| school::get_course(conn, id)).await
  }

  async fn list_courses(&self, query: &CourseQuery) -> Result<Vec<Course>> {
    let query = query.clone();
    self.run(move |conn| school::list_courses(conn, &query)).await
  }

  async fn update_course(&self, id: Uuid, patch: CoursePatch) -> Result<Course> {
    self.run(move |conn| school::update_course(conn, id, patch)).await
  }

  async fn delete_course(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| COURSE.delete(conn, id)).await
  }

  async fn add_student(&self, input: NewStudent) -> Result<Student> {
    self.run(move |conn| school::add_student(conn, input)).await
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    self.run(move |conn| school::get_student(conn, id)).await
  }

  async fn list_students(&self, text: Option<String>, course_id: Option<Uuid>) -> Result<Vec<Student>> {
    self
      .run(move |conn| school::list_students(conn, text.as_deref(), course_id))
      .await
  }

  async fn update_student(&self, id: Uuid, patch: StudentPatch) -> Result<Student> {
    self.run(move |conn| school::update_student(conn, id, patch)).await
  }

  async fn delete_student(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| STUDENT.delete(conn, id)).await
  }

  async fn add_instructor(&self, input: NewInstructor) -> Result<Instructor> {
    self.run(move |conn| school::add_instructor(conn, input)).await
  }

  async fn get_instructor(&self, id: Uuid) -> Result<Option<Instructor>> {
    self.run(move |conn| school::get_instructor(conn, id)).await
  }

  async fn list_instructors(&self, text: Option<String>) -> Result<Vec<Instructor>> {
    self.run(move |conn| school::list_instructors(conn, text.as_deref())).await
  }

  async fn update_instructor(&self, id: Uuid, patch: InstructorPatch) -> Result<Instructor> {
    self.run(move |conn| school::update_instructor(conn, id, patch)).await
  }

  async fn delete_instructor(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| INSTRUCTOR.delete(conn, id)).await
  }

  async fn add_aircraft(&self, input: NewAircraft) -> Result<Aircraft> {
    self.run(move |conn| school::add_aircraft(conn, input)).await
  }

  async fn get_aircraft(&self, id: Uuid) -> Result<Option<Aircraft>> {
    self.run(move |conn| school::get_aircraft(conn, id)).await
  }

  async fn list_aircraft(&self, text: Option<String>) -> Result<Vec<Aircraft>> {
    self.run(move |conn| school::list_aircraft(conn, text.as_deref())).await
  }

  async fn update_aircraft(&self, id: Uuid, patch: AircraftPatch) -> Result<Aircraft> {
    self.run(move |conn| school::update_aircraft(conn, id, patch)).await
  }

  async fn delete_aircraft(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| AIRCRAFT.delete(conn, id)).await
  }

  // ── Lessons ───────────────────────────────────────────────────────────

  async fn create_lesson(&self, input: NewLesson) -> Result<Lesson> {
    let at = now();
    self.run(move |conn| lessons::create(conn, input, at)).await
  }

  async fn get_lesson(&self, id: Uuid) -> Result<Option<Lesson>> {
    self.run(move |conn| lessons::get(conn, id)).await
  }

  async fn list_lessons(&self, query: &LessonQuery) -> Result<Vec<Lesson>> {
    let query = query.clone();
    self.run(move |conn| lessons::list(conn, &query)).await
  }

  async fn update_lesson(
    &self,
    id: Uuid,
    patch: LessonPatch,
    comment: Option<String>,
  ) -> Result<Lesson> {
    let at = now();
    self.run(move |conn| lessons::update(conn, id, patch, comment, at)).await
  }

  async fn delete_lesson(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| LESSON.delete(conn, id)).await
  }

  async fn lesson_history(&self, id: Uuid) -> Result<Vec<StatusChange<LessonStatus>>> {
    self.run(move |conn| lessons::list_history(conn, id)).await
  }

  // ── Certificates ──────────────────────────────────────────────────────

  async fn add_certificate(&self, input: NewCertificate) -> Result<Certificate> {
    self.run(move |conn| school::add_certificate(conn, input)).await
  }

  async fn get_certificate(&self, id: Uuid) -> Result<Option<Certificate>> {
    self.run(move |conn| school::get_certificate(conn, id)).await
  }

  async fn list_certificates(&self, course_id: Option<Uuid>) -> Result<Vec<Certificate>> {
    self.run(move |conn| school::list_certificates(conn, course_id)).await
  }

  async fn update_certificate(&self, id: Uuid, patch: CertificatePatch) -> Result<Certificate> {
    self.run(move |conn| school::update_certificate(conn, id, patch)).await
  }

  async fn delete_certificate(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| CERTIFICATE.delete(conn, id)).await
  }

  async fn issue_certificate(&self, input: NewStudentCertificate) -> Result<StudentCertificate> {
    let today = now().date_naive();
    self.run(move |conn| school::issue_certificate(conn, input, today)).await
  }

  async fn get_student_certificate(&self, id: Uuid) -> Result<Option<StudentCertificate>> {
    self.run(move |conn| school::get_student_certificate(conn, id)).await
  }

  async fn list_student_certificates(
    &self,
    query: &StudentCertificateQuery,
  ) -> Result<Vec<StudentCertificate>> {
    let query = query.clone();
    self
      .run(move |conn| school::list_student_certificates(conn, &query))
      .await
  }

  async fn set_student_certificate_status(
    &self,
    id: Uuid,
    status: CertificateStatus,
  ) -> Result<StudentCertificate> {
    self
      .run(move |conn| school::set_student_certificate_status(conn, id, status))
      .await
  }

  async fn update_student_certificate(
    &self,
    id: Uuid,
    patch: StudentCertificatePatch,
  ) -> Result<StudentCertificate> {
    self
      .run(move |conn| school::update_student_certificate(conn, id, patch))
      .await
  }

  async fn delete_student_certificate(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| STUDENT_CERTIFICATE.delete(conn, id)).await
  }

  // ── Exams ─────────────────────────────────────────────────────────────

  async fn add_exam(&self, input: NewExam) -> Result<Exam> {
    self.run(move |conn| exams::add(conn, input)).await
  }

  async fn get_exam(&self, id: Uuid) -> Result<Option<Exam>> {
    self.run(move |conn| exams::get(conn, id)).await
  }

  async fn list_exams(&self, query: &ExamQuery) -> Result<Vec<Exam>> {
    let query = query.clone();
    self.run(move |conn| exams::list(conn, &query)).await
  }

  async fn update_exam(&self, id: Uuid, patch: ExamPatch) -> Result<Exam> {
    self.run(move |conn| exams::update(conn, id, patch)).await
  }

  async fn delete_exam(&self, id: Uuid) -> Result<bool> {
    self.run(move |conn| EXAM.delete(conn, id)).await
  }

  // ── Search ────────────────────────────────────────────────────────────

  async fn search(&self, text: String) -> Result<SearchResults> {
    self.run(move |conn| search::search(conn, &text)).await
  }
}
