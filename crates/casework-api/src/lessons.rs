//! Handlers for `/lessons` endpoints.
//!
//! Same shape as `/applications`: list, create (201), get, patch, delete
//! (204) and `/lessons/{id}/history`. Durations accept a number or a string
//! with either `.` or `,` as the decimal separator.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use casework_core::{
  EntityKind,
  history::StatusChange,
  lesson::{Lesson, LessonPatch, NewLesson},
  status::LessonStatus,
  store::{CaseStore, LessonQuery, LessonSortKey, Sort, SortDirection},
  validate::{Hours, ValidationErrors, Validator},
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  params::{deleted, double_option, found, required, status, statuses},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:             Option<String>,
  pub student_id:    Option<Uuid>,
  pub instructor_id: Option<Uuid>,
  pub course_id:     Option<Uuid>,
  pub aircraft_id:   Option<Uuid>,
  pub status:        Option<String>,
  pub date_from:     Option<NaiveDate>,
  pub date_to:       Option<NaiveDate>,
  pub sort:          Option<LessonSortKey>,
  #[serde(default)]
  pub order:         SortDirection,
  pub limit:         Option<usize>,
  pub offset:        Option<usize>,
}

/// `GET /lessons`
pub async fn list<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Lesson>>, ApiError> {
  let query = LessonQuery {
    statuses:      statuses("status", params.status.as_deref())?,
    text:          params.q,
    student_id:    params.student_id,
    instructor_id: params.instructor_id,
    course_id:     params.course_id,
    aircraft_id:   params.aircraft_id,
    date_from:     params.date_from,
    date_to:       params.date_to,
    sort:          params.sort.map(|key| Sort { key, direction: params.order }),
    limit:         params.limit,
    offset:        params.offset,
  };
  let lessons = store.list_lessons(&query).await.map_err(ApiError::from_store)?;
  Ok(Json(lessons))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub student_id:    Option<Uuid>,
  pub instructor_id: Option<Uuid>,
  pub course_id:     Option<Uuid>,
  pub aircraft_id:   Option<Uuid>,
  pub date:          Option<NaiveDate>,
  pub duration:      Option<Hours>,
  pub topic:         Option<String>,
  pub remarks:       Option<String>,
  /// Defaults to `Planned`.
  pub status:        Option<String>,
  pub comment:       Option<String>,
}

impl CreateBody {
  fn into_new(self) -> Result<NewLesson, ApiError> {
    let mut v = Validator::new();
    let student_id = required(&mut v, "student_id", self.student_id);
    let instructor_id = required(&mut v, "instructor_id", self.instructor_id);
    let date = required(&mut v, "date", self.date);
    let duration = required(&mut v, "duration", self.duration);
    let status = match status::<LessonStatus>("status", self.status.as_deref()) {
      Ok(s) => s.unwrap_or_default(),
      Err(errors) => {
        for e in errors.fields() {
          v.push(e.field, e.message.clone());
        }
        LessonStatus::default()
      }
    };
    v.finish()?;

    let (Some(student_id), Some(instructor_id), Some(date), Some(duration)) =
      (student_id, instructor_id, date, duration)
    else {
      return Err(ValidationErrors::single("student_id", "is required").into());
    };
    Ok(NewLesson {
      student_id,
      instructor_id,
      course_id: self.course_id,
      aircraft_id: self.aircraft_id,
      date,
      duration,
      topic: self.topic,
      remarks: self.remarks,
      status,
      comment: self.comment,
    })
  }
}

/// `POST /lessons`
pub async fn create<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let lesson = store
    .create_lesson(body.into_new()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(lesson)))
}

/// `GET /lessons/{id}`
pub async fn get_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Lesson>, ApiError> {
  let lesson = store.get_lesson(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Lesson, id, lesson)
}

/// `null` clears an optional field; an absent key leaves it alone.
#[derive(Debug, Default, Deserialize)]
pub struct PatchBody {
  pub student_id:       Option<Uuid>,
  pub instructor_id:    Option<Uuid>,
  #[serde(default, deserialize_with = "double_option")]
  pub course_id:        Option<Option<Uuid>>,
  #[serde(default, deserialize_with = "double_option")]
  pub aircraft_id:      Option<Option<Uuid>>,
  pub date:             Option<NaiveDate>,
  pub duration:         Option<Hours>,
  #[serde(default, deserialize_with = "double_option")]
  pub topic:            Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub remarks:          Option<Option<String>>,
  pub status:           Option<String>,
  pub expected_version: Option<u32>,
  pub comment:          Option<String>,
}

/// `PATCH /lessons/{id}`
pub async fn update<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PatchBody>,
) -> Result<Json<Lesson>, ApiError> {
  let patch = LessonPatch {
    student_id:       body.student_id,
    instructor_id:    body.instructor_id,
    course_id:        body.course_id,
    aircraft_id:      body.aircraft_id,
    date:             body.date,
    duration:         body.duration,
    topic:            body.topic,
    remarks:          body.remarks,
    status:           status("status", body.status.as_deref())?,
    expected_version: body.expected_version,
  };
  let lesson = store
    .update_lesson(id, patch, body.comment)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(lesson))
}

/// `DELETE /lessons/{id}`
pub async fn delete_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_lesson(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Lesson, id, existed)
}

/// `GET /lessons/{id}/history`
pub async fn history<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusChange<LessonStatus>>>, ApiError> {
  if store.get_lesson(id).await.map_err(ApiError::from_store)?.is_none() {
    return Err(ApiError::not_found(EntityKind::Lesson, id));
  }
  let changes = store.lesson_history(id).await.map_err(ApiError::from_store)?;
  Ok(Json(changes))
}
