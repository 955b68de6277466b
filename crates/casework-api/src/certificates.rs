//! Handlers for `/student-certificates`: certificates issued to students.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/student-certificates` | Filters: `q`, `student_id`, `course_id`, `certificate_id`, `status`; newest first |
//! | `POST`   | `/student-certificates` | Body: [`NewStudentCertificate`]; expiry defaults from the template |
//! | `GET`    | `/student-certificates/{id}` | |
//! | `PATCH`  | `/student-certificates/{id}` | Body: [`StudentCertificatePatch`]; `null` clears |
//! | `POST`   | `/student-certificates/{id}/status` | Body: `{"status":"Revoked"}` |
//! | `DELETE` | `/student-certificates/{id}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use casework_core::{
  EntityKind,
  school::{NewStudentCertificate, StudentCertificate, StudentCertificatePatch},
  status::{CertificateStatus, StatusValue},
  store::{CaseStore, StudentCertificateQuery},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  params::{deleted, found, status},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:              Option<String>,
  pub student_id:     Option<Uuid>,
  pub course_id:      Option<Uuid>,
  pub certificate_id: Option<Uuid>,
  pub status:         Option<String>,
}

pub async fn list<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<StudentCertificate>>, ApiError> {
  let query = StudentCertificateQuery {
    status:         status("status", params.status.as_deref())?,
    text:           params.q,
    student_id:     params.student_id,
    course_id:      params.course_id,
    certificate_id: params.certificate_id,
  };
  let issued = store
    .list_student_certificates(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(issued))
}

pub async fn issue<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewStudentCertificate>,
) -> Result<impl IntoResponse, ApiError> {
  let issued = store.issue_certificate(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(issued)))
}

pub async fn get_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<StudentCertificate>, ApiError> {
  let issued = store.get_student_certificate(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::StudentCertificate, id, issued)
}

pub async fn update<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StudentCertificatePatch>,
) -> Result<Json<StudentCertificate>, ApiError> {
  let issued = store
    .update_student_certificate(id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(issued))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  #[serde(default)]
  pub status: String,
}

pub async fn set_status<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<StudentCertificate>, ApiError> {
  let status = CertificateStatus::parse_field("status", &body.status)?;
  let issued = store
    .set_student_certificate_status(id, status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(issued))
}

pub async fn delete_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store
    .delete_student_certificate(id)
    .await
    .map_err(ApiError::from_store)?;
  deleted(EntityKind::StudentCertificate, id, existed)
}
