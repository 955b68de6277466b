//! Handlers for `/exams`.
//!
//! `GET /exams` takes `q`, `student_id`, `course_id` and `result` (exact) and
//! answers newest first. Scores may be sent as `87.5` or `"87,5"`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use casework_core::{
  EntityKind,
  exam::{Exam, ExamPatch, NewExam},
  store::{CaseStore, ExamQuery},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  params::{deleted, found},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:          Option<String>,
  pub student_id: Option<Uuid>,
  pub course_id:  Option<Uuid>,
  pub result:     Option<String>,
}

pub async fn list<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Exam>>, ApiError> {
  let query = ExamQuery {
    text:       params.q,
    student_id: params.student_id,
    course_id:  params.course_id,
    result:     params.result,
  };
  let exams = store.list_exams(&query).await.map_err(ApiError::from_store)?;
  Ok(Json(exams))
}

pub async fn create<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewExam>,
) -> Result<impl IntoResponse, ApiError> {
  let exam = store.add_exam(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(exam)))
}

pub async fn get_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Exam>, ApiError> {
  let exam = store.get_exam(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Exam, id, exam)
}

pub async fn update<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ExamPatch>,
) -> Result<Json<Exam>, ApiError> {
  let exam = store.update_exam(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(exam))
}

pub async fn delete_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_exam(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Exam, id, existed)
}
