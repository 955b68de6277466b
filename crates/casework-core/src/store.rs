//! The `CaseStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `casework-store-sqlite`).
//! Higher layers (`casework-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  DomainError,
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
};

// ─── Sorting ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

/// Sort key for [`ApplicationQuery`]. Ties are always broken by id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSortKey {
  SubmittedAt,
  /// Applications without a decision sort before decided ones when ascending.
  DecisionDate,
  /// Lifecycle order: Pending, InProgress, Approved, Rejected.
  Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K> {
  pub key:       K,
  pub direction: SortDirection,
}

impl<K> Sort<K> {
  pub fn asc(key: K) -> Self { Self { key, direction: SortDirection::Asc } }

  pub fn desc(key: K) -> Self { Self { key, direction: SortDirection::Desc } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonSortKey {
  Date,
  Duration,
}

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`CaseStore::list_applications`]. All predicates are
/// optional and combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ApplicationQuery {
  /// Case-insensitive substring over the application kind and the migrant's
  /// full name.
  pub text:           Option<String>,
  pub migrant_id:     Option<Uuid>,
  pub officer_id:     Option<Uuid>,
  /// Match any of these statuses; empty means no restriction.
  pub statuses:       Vec<ApplicationStatus>,
  /// Inclusive lower bound on `submitted_at`.
  pub submitted_from: Option<DateTime<Utc>>,
  /// Inclusive upper bound on `submitted_at`.
  pub submitted_to:   Option<DateTime<Utc>>,
  /// Defaults to submission time ascending.
  pub sort:           Option<Sort<ApplicationSortKey>>,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
}

/// Parameters for [`CaseStore::list_lessons`].
#[derive(Debug, Clone, Default)]
pub struct LessonQuery {
  /// Case-insensitive substring over topic and remarks.
  pub text:          Option<String>,
  pub student_id:    Option<Uuid>,
  pub instructor_id: Option<Uuid>,
  pub course_id:     Option<Uuid>,
  pub aircraft_id:   Option<Uuid>,
  pub statuses:      Vec<LessonStatus>,
  pub date_from:     Option<NaiveDate>,
  pub date_to:       Option<NaiveDate>,
  /// Defaults to lesson date ascending.
  pub sort:          Option<Sort<LessonSortKey>>,
  pub limit:         Option<usize>,
  pub offset:        Option<usize>,
}

/// Parameters for [`CaseStore::list_courses`].
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
  /// Case-insensitive substring over name and category.
  pub text:        Option<String>,
  pub only_active: bool,
}

/// Parameters for [`CaseStore::list_student_certificates`]. Results are
/// newest issuance first.
#[derive(Debug, Clone, Default)]
pub struct StudentCertificateQuery {
  /// Case-insensitive substring over certificate number, student name and
  /// template title.
  pub text:           Option<String>,
  pub student_id:     Option<Uuid>,
  /// Matches through the template's course.
  pub course_id:      Option<Uuid>,
  pub certificate_id: Option<Uuid>,
  pub status:         Option<CertificateStatus>,
}

/// Parameters for [`CaseStore::list_exams`]. Results are most recent first.
#[derive(Debug, Clone, Default)]
pub struct ExamQuery {
  /// Case-insensitive substring over the result, the student's and the
  /// examiner's names, and the course name.
  pub text:       Option<String>,
  pub student_id: Option<Uuid>,
  pub course_id:  Option<Uuid>,
  /// Exact match on the result text.
  pub result:     Option<String>,
}

/// Hits per collection returned by [`CaseStore::search`].
pub const SEARCH_LIMIT: usize = 5;

/// Cross-collection search results, at most [`SEARCH_LIMIT`] per group, each
/// group in its listing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
  /// By name, passport number or phone.
  pub migrants:     Vec<Migrant>,
  /// By migrant name, kind or status.
  pub applications: Vec<Application>,
  /// By name or email.
  pub students:     Vec<Student>,
  /// By name or email.
  pub instructors:  Vec<Instructor>,
  /// By topic or student name.
  pub lessons:      Vec<Lesson>,
  /// By tail number or model.
  pub aircraft:     Vec<Aircraft>,
}

/// Case-insensitive (Unicode-aware) substring match of `needle` against any of
/// `fields`. An empty needle matches everything.
pub fn text_matches(needle: &str, fields: &[Option<&str>]) -> bool {
  let needle = needle.trim().to_lowercase();
  if needle.is_empty() {
    return true;
  }
  fields
    .iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Casework store backend.
///
/// Applications and lessons are tracked entities: every write that changes
/// their status appends a [`StatusChange`] in the same transaction, and their
/// history is removed only together with them.
///
/// Delete methods return `Ok(false)` when there was nothing to delete and
/// fail with [`crate::Error::InUse`] when blocking dependents exist.
///
/// Every returned future is `Send`.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  // ── Migrants & officers ───────────────────────────────────────────────

  fn add_migrant(
    &self,
    input: NewMigrant,
  ) -> impl Future<Output = Result<Migrant, Self::Error>> + Send + '_;

  fn get_migrant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Migrant>, Self::Error>> + Send + '_;

  /// List migrants, optionally filtered by name, passport or phone.
  fn list_migrants(
    &self,
    text: Option<String>,
  ) -> impl Future<Output = Result<Vec<Migrant>, Self::Error>> + Send + '_;

  /// Fails with [`crate::Error::NotFound`] for an unknown id.
  fn update_migrant(
    &self,
    id: Uuid,
    patch: MigrantPatch,
  ) -> impl Future<Output = Result<Migrant, Self::Error>> + Send + '_;

  /// Blocked while the migrant has applications.
  fn delete_migrant(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Fails with a validation error on `login` if the login is taken.
  fn add_officer(
    &self,
    input: NewOfficer,
  ) -> impl Future<Output = Result<Officer, Self::Error>> + Send + '_;

  fn get_officer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Officer>, Self::Error>> + Send + '_;

  fn list_officers(&self) -> impl Future<Output = Result<Vec<Officer>, Self::Error>> + Send + '_;

  /// A new login is checked against every other officer.
  fn update_officer(
    &self,
    id: Uuid,
    patch: OfficerPatch,
  ) -> impl Future<Output = Result<Officer, Self::Error>> + Send + '_;

  /// Blocked while the officer has applications.
  fn delete_officer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Create an application and its initial history record atomically.
  /// `submitted_at` is set by the store.
  fn create_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  fn get_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  fn list_applications<'a>(
    &'a self,
    query: &'a ApplicationQuery,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + 'a;

  /// Apply `patch`, run the transition policy, and append a history record if
  /// the status changed, atomically. `comment` annotates that record.
  fn update_application(
    &self,
    id: Uuid,
    patch: ApplicationPatch,
    comment: Option<String>,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Delete an application together with its history.
  fn delete_application(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Status history, oldest first. Empty for unknown ids.
  fn application_history(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<StatusChange<ApplicationStatus>>, Self::Error>> + Send + '_;

  // ── Courses, students, instructors, aircraft ──────────────────────────

  fn add_course(
    &self,
    input: NewCourse,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  fn get_course(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Course>, Self::Error>> + Send + '_;

  fn list_courses<'a>(
    &'a self,
    query: &'a CourseQuery,
  ) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + 'a;

  fn update_course(
    &self,
    id: Uuid,
    patch: CoursePatch,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + '_;

  /// Blocked while students, lessons, exams or certificate templates
  /// reference the course.
  fn delete_course(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Fails with a validation error on `email` if the address is taken, or on
  /// `course_id` if the course does not exist.
  fn add_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// List students, optionally by name/email substring and course.
  fn list_students(
    &self,
    text: Option<String>,
    course_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Re-checks the email against other students and the course reference.
  fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Blocked while the student has lessons, exams or issued certificates.
  fn delete_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn add_instructor(
    &self,
    input: NewInstructor,
  ) -> impl Future<Output = Result<Instructor, Self::Error>> + Send + '_;

  fn get_instructor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Instructor>, Self::Error>> + Send + '_;

  /// List instructors, optionally by name/email substring.
  fn list_instructors(
    &self,
    text: Option<String>,
  ) -> impl Future<Output = Result<Vec<Instructor>, Self::Error>> + Send + '_;

  fn update_instructor(
    &self,
    id: Uuid,
    patch: InstructorPatch,
  ) -> impl Future<Output = Result<Instructor, Self::Error>> + Send + '_;

  /// Blocked while the instructor has lessons or exams.
  fn delete_instructor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Fails with a validation error on `tail_number` if it is taken.
  fn add_aircraft(
    &self,
    input: NewAircraft,
  ) -> impl Future<Output = Result<Aircraft, Self::Error>> + Send + '_;

  fn get_aircraft(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Aircraft>, Self::Error>> + Send + '_;

  /// List the fleet, optionally by tail number or model substring.
  fn list_aircraft(
    &self,
    text: Option<String>,
  ) -> impl Future<Output = Result<Vec<Aircraft>, Self::Error>> + Send + '_;

  /// A new tail number is checked against the rest of the fleet.
  fn update_aircraft(
    &self,
    id: Uuid,
    patch: AircraftPatch,
  ) -> impl Future<Output = Result<Aircraft, Self::Error>> + Send + '_;

  /// Blocked while lessons use the aircraft.
  fn delete_aircraft(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Lessons ───────────────────────────────────────────────────────────

  /// Create a lesson and its initial history record atomically.
  fn create_lesson(
    &self,
    input: NewLesson,
  ) -> impl Future<Output = Result<Lesson, Self::Error>> + Send + '_;

  fn get_lesson(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lesson>, Self::Error>> + Send + '_;

  fn list_lessons<'a>(
    &'a self,
    query: &'a LessonQuery,
  ) -> impl Future<Output = Result<Vec<Lesson>, Self::Error>> + Send + 'a;

  fn update_lesson(
    &self,
    id: Uuid,
    patch: LessonPatch,
    comment: Option<String>,
  ) -> impl Future<Output = Result<Lesson, Self::Error>> + Send + '_;

  /// Delete a lesson together with its history.
  fn delete_lesson(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn lesson_history(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<StatusChange<LessonStatus>>, Self::Error>> + Send + '_;

  // ── Certificates ──────────────────────────────────────────────────────

  fn add_certificate(
    &self,
    input: NewCertificate,
  ) -> impl Future<Output = Result<Certificate, Self::Error>> + Send + '_;

  fn get_certificate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Certificate>, Self::Error>> + Send + '_;

  fn list_certificates(
    &self,
    course_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Certificate>, Self::Error>> + Send + '_;

  fn update_certificate(
    &self,
    id: Uuid,
    patch: CertificatePatch,
  ) -> impl Future<Output = Result<Certificate, Self::Error>> + Send + '_;

  /// Blocked while certificates have been issued from the template.
  fn delete_certificate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Issue a certificate to a student. A missing expiry is derived from the
  /// template's default validity.
  fn issue_certificate(
    &self,
    input: NewStudentCertificate,
  ) -> impl Future<Output = Result<StudentCertificate, Self::Error>> + Send + '_;

  fn get_student_certificate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StudentCertificate>, Self::Error>> + Send + '_;

  fn list_student_certificates<'a>(
    &'a self,
    query: &'a StudentCertificateQuery,
  ) -> impl Future<Output = Result<Vec<StudentCertificate>, Self::Error>> + Send + 'a;

  fn set_student_certificate_status(
    &self,
    id: Uuid,
    status: CertificateStatus,
  ) -> impl Future<Output = Result<StudentCertificate, Self::Error>> + Send + '_;

  /// Edit an issued certificate. The expiry may not end up before the issue
  /// date.
  fn update_student_certificate(
    &self,
    id: Uuid,
    patch: StudentCertificatePatch,
  ) -> impl Future<Output = Result<StudentCertificate, Self::Error>> + Send + '_;

  fn delete_student_certificate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Exams ─────────────────────────────────────────────────────────────

  /// Fails with a validation error on each reference that does not exist.
  fn add_exam(&self, input: NewExam) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  fn get_exam(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Exam>, Self::Error>> + Send + '_;

  fn list_exams<'a>(
    &'a self,
    query: &'a ExamQuery,
  ) -> impl Future<Output = Result<Vec<Exam>, Self::Error>> + Send + 'a;

  fn update_exam(
    &self,
    id: Uuid,
    patch: ExamPatch,
  ) -> impl Future<Output = Result<Exam, Self::Error>> + Send + '_;

  fn delete_exam(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Search ────────────────────────────────────────────────────────────

  /// Search both desks at once. Blank text finds nothing.
  fn search(
    &self,
    text: String,
  ) -> impl Future<Output = Result<SearchResults, Self::Error>> + Send + '_;
}
