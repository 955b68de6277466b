//! Handlers for the flight-school reference collections: `/courses`,
//! `/students`, `/instructors`, `/aircraft` and `/certificates` (templates).
//!
//! Each supports list, create (201), get, patch and delete (204). A `null`
//! in a patch body clears an optional field.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use casework_core::{
  EntityKind,
  school::{
    Aircraft, AircraftPatch, Certificate, CertificatePatch, Course, CoursePatch, Instructor,
    InstructorPatch, NewAircraft, NewCertificate, NewCourse, NewInstructor, NewStudent, Student,
    StudentPatch,
  },
  store::{CaseStore, CourseQuery},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  directory::SearchParams,
  error::ApiError,
  params::{deleted, found},
};

// ─── Courses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CourseParams {
  pub q:      Option<String>,
  #[serde(default)]
  pub active: bool,
}

/// `GET /courses[?q=...][&active=true]`
pub async fn list_courses<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<CourseParams>,
) -> Result<Json<Vec<Course>>, ApiError> {
  let query = CourseQuery { text: params.q, only_active: params.active };
  let courses = store.list_courses(&query).await.map_err(ApiError::from_store)?;
  Ok(Json(courses))
}

/// `POST /courses`
pub async fn create_course<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCourse>,
) -> Result<impl IntoResponse, ApiError> {
  let course = store.add_course(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(course)))
}

/// `GET /courses/{id}`
pub async fn get_course<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Course>, ApiError> {
  let course = store.get_course(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Course, id, course)
}

/// `PATCH /courses/{id}`
pub async fn update_course<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CoursePatch>,
) -> Result<Json<Course>, ApiError> {
  let course = store.update_course(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(course))
}

/// `DELETE /courses/{id}`
pub async fn delete_course<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_course(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Course, id, existed)
}

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StudentParams {
  pub q:         Option<String>,
  pub course_id: Option<Uuid>,
}

/// `GET /students[?q=...][&course_id=...]`
pub async fn list_students<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<StudentParams>,
) -> Result<Json<Vec<Student>>, ApiError> {
  let students = store
    .list_students(params.q, params.course_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(students))
}

/// `POST /students`
pub async fn create_student<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewStudent>,
) -> Result<impl IntoResponse, ApiError> {
  let student = store.add_student(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(student)))
}

/// `GET /students/{id}`
pub async fn get_student<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError> {
  let student = store.get_student(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Student, id, student)
}

/// `PATCH /students/{id}`
pub async fn update_student<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StudentPatch>,
) -> Result<Json<Student>, ApiError> {
  let student = store.update_student(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(student))
}

/// `DELETE /students/{id}`
pub async fn delete_student<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_student(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Student, id, existed)
}

// ─── Instructors ─────────────────────────────────────────────────────────────

/// `GET /instructors[?q=...]` matches name or email.
pub async fn list_instructors<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Instructor>>, ApiError> {
  let instructors = store.list_instructors(params.q).await.map_err(ApiError::from_store)?;
  Ok(Json(instructors))
}

pub async fn create_instructor<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewInstructor>,
) -> Result<impl IntoResponse, ApiError> {
  let instructor = store.add_instructor(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(instructor)))
}

pub async fn get_instructor<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Instructor>, ApiError> {
  let instructor = store.get_instructor(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Instructor, id, instructor)
}

pub async fn update_instructor<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<InstructorPatch>,
) -> Result<Json<Instructor>, ApiError> {
  let instructor = store.update_instructor(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(instructor))
}

pub async fn delete_instructor<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_instructor(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Instructor, id, existed)
}

// ─── Aircraft ────────────────────────────────────────────────────────────────

/// `GET /aircraft[?q=...]` matches tail number or model.
pub async fn list_aircraft<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Aircraft>>, ApiError> {
  let fleet = store.list_aircraft(params.q).await.map_err(ApiError::from_store)?;
  Ok(Json(fleet))
}

pub async fn create_aircraft<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAircraft>,
) -> Result<impl IntoResponse, ApiError> {
  let aircraft = store.add_aircraft(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(aircraft)))
}

pub async fn get_aircraft<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Aircraft>, ApiError> {
  let aircraft = store.get_aircraft(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Aircraft, id, aircraft)
}

/// `PATCH /aircraft/{id}`; 422 when the tail number is taken.
pub async fn update_aircraft<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AircraftPatch>,
) -> Result<Json<Aircraft>, ApiError> {
  let aircraft = store.update_aircraft(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(aircraft))
}

pub async fn delete_aircraft<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_aircraft(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Aircraft, id, existed)
}

// ─── Certificate templates ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CertificateParams {
  pub course_id: Option<Uuid>,
}

/// `GET /certificates[?course_id=...]`
pub async fn list_certificates<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<CertificateParams>,
) -> Result<Json<Vec<Certificate>>, ApiError> {
  let templates = store
    .list_certificates(params.course_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(templates))
}

/// `POST /certificates`
pub async fn create_certificate<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewCertificate>,
) -> Result<impl IntoResponse, ApiError> {
  let template = store.add_certificate(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(template)))
}

/// `GET /certificates/{id}`
pub async fn get_certificate<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Certificate>, ApiError> {
  let template = store.get_certificate(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Certificate, id, template)
}

/// `PATCH /certificates/{id}`
pub async fn update_certificate<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CertificatePatch>,
) -> Result<Json<Certificate>, ApiError> {
  let template = store.update_certificate(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(template))
}

/// `DELETE /certificates/{id}`; 409 once certificates were issued from it.
pub async fn delete_certificate<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_certificate(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Certificate, id, existed)
}
