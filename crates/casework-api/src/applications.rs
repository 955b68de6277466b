//! Handlers for `/applications` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/applications` | Filters: `q`, `migrant_id`, `officer_id`, `status` (comma list), `submitted_from`, `submitted_to`; `sort`, `order`, `limit`, `offset` |
//! | `POST`   | `/applications` | Body: [`CreateBody`]; returns 201 |
//! | `GET`    | `/applications/{id}` | 404 if not found |
//! | `PATCH`  | `/applications/{id}` | Body: [`PatchBody`] |
//! | `DELETE` | `/applications/{id}` | 204, or 404 if nothing existed |
//! | `GET`    | `/applications/{id}/history` | Oldest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use casework_core::{
  EntityKind,
  application::{Application, ApplicationPatch, NewApplication},
  history::StatusChange,
  status::ApplicationStatus,
  store::{ApplicationQuery, ApplicationSortKey, CaseStore, Sort, SortDirection},
  validate::{ValidationErrors, Validator},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  params::{deleted, found, required, status, statuses},
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub q:              Option<String>,
  pub migrant_id:     Option<Uuid>,
  pub officer_id:     Option<Uuid>,
  /// Comma-separated, e.g. `Pending,InProgress`.
  pub status:         Option<String>,
  pub submitted_from: Option<DateTime<Utc>>,
  pub submitted_to:   Option<DateTime<Utc>>,
  pub sort:           Option<ApplicationSortKey>,
  #[serde(default)]
  pub order:          SortDirection,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
}

impl ListParams {
  fn into_query(self) -> Result<ApplicationQuery, ApiError> {
    Ok(ApplicationQuery {
      text:           self.q,
      migrant_id:     self.migrant_id,
      officer_id:     self.officer_id,
      statuses:       statuses("status", self.status.as_deref())?,
      submitted_from: self.submitted_from,
      submitted_to:   self.submitted_to,
      sort:           self.sort.map(|key| Sort { key, direction: self.order }),
      limit:          self.limit,
      offset:         self.offset,
    })
  }
}

/// `GET /applications`
pub async fn list<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Application>>, ApiError> {
  let query = params.into_query()?;
  let apps = store.list_applications(&query).await.map_err(ApiError::from_store)?;
  Ok(Json(apps))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub migrant_id: Option<Uuid>,
  pub officer_id: Option<Uuid>,
  #[serde(default)]
  pub kind:       String,
  /// Defaults to `Pending`.
  pub status:     Option<String>,
  /// Comment for the initial history record.
  pub comment:    Option<String>,
}

impl CreateBody {
  fn into_new(self) -> Result<NewApplication, ApiError> {
    let mut v = Validator::new();
    let migrant_id = required(&mut v, "migrant_id", self.migrant_id);
    let officer_id = required(&mut v, "officer_id", self.officer_id);
    let status = match status::<ApplicationStatus>("status", self.status.as_deref()) {
      Ok(s) => s.unwrap_or_default(),
      Err(errors) => {
        for e in errors.fields() {
          v.push(e.field, e.message.clone());
        }
        ApplicationStatus::default()
      }
    };
    v.require_text("kind", &self.kind);
    v.finish()?;

    let (Some(migrant_id), Some(officer_id)) = (migrant_id, officer_id) else {
      return Err(ValidationErrors::single("migrant_id", "is required").into());
    };
    Ok(NewApplication { migrant_id, officer_id, kind: self.kind, status, comment: self.comment })
  }
}

/// `POST /applications`
pub async fn create<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let app = store
    .create_application(body.into_new()?)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(app)))
}

// ─── Get / update / delete ───────────────────────────────────────────────────

/// `GET /applications/{id}`
pub async fn get_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
  let app = store.get_application(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Application, id, app)
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchBody {
  pub migrant_id:       Option<Uuid>,
  pub officer_id:       Option<Uuid>,
  pub kind:             Option<String>,
  pub status:           Option<String>,
  pub expected_version: Option<u32>,
  /// Annotates the history record if the status changes.
  pub comment:          Option<String>,
}

/// `PATCH /applications/{id}`
pub async fn update<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PatchBody>,
) -> Result<Json<Application>, ApiError> {
  let patch = ApplicationPatch {
    migrant_id:       body.migrant_id,
    officer_id:       body.officer_id,
    kind:             body.kind,
    status:           status("status", body.status.as_deref())?,
    expected_version: body.expected_version,
  };
  patch.validate()?;
  let app = store
    .update_application(id, patch, body.comment)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(app))
}

/// `DELETE /applications/{id}`; the history goes with it.
pub async fn delete_one<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_application(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Application, id, existed)
}

/// `GET /applications/{id}/history`
pub async fn history<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusChange<ApplicationStatus>>>, ApiError> {
  if store.get_application(id).await.map_err(ApiError::from_store)?.is_none() {
    return Err(ApiError::not_found(EntityKind::Application, id));
  }
  let changes = store.application_history(id).await.map_err(ApiError::from_store)?;
  Ok(Json(changes))
}
