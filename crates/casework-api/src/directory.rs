//! Handlers for `/migrants` and `/officers`.
//!
//! Both collections support `GET` (list), `POST` (201), `GET /{id}`,
//! `PATCH /{id}` and `DELETE /{id}`. Deleting a migrant or officer that still
//! has applications answers 409.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use casework_core::{
  EntityKind,
  directory::{Migrant, MigrantPatch, NewMigrant, NewOfficer, Officer, OfficerPatch},
  store::CaseStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  error::ApiError,
  params::{deleted, found},
};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  pub q: Option<String>,
}

// ─── Migrants ────────────────────────────────────────────────────────────────

/// `GET /migrants[?q=...]` matches name, passport number or phone.
pub async fn list_migrants<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Migrant>>, ApiError> {
  let migrants = store.list_migrants(params.q).await.map_err(ApiError::from_store)?;
  Ok(Json(migrants))
}

/// `POST /migrants`
pub async fn create_migrant<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewMigrant>,
) -> Result<impl IntoResponse, ApiError> {
  let migrant = store.add_migrant(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(migrant)))
}

/// `GET /migrants/{id}`
pub async fn get_migrant<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Migrant>, ApiError> {
  let migrant = store.get_migrant(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Migrant, id, migrant)
}

/// `PATCH /migrants/{id}`
pub async fn update_migrant<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MigrantPatch>,
) -> Result<Json<Migrant>, ApiError> {
  let migrant = store.update_migrant(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(migrant))
}

/// `DELETE /migrants/{id}`
pub async fn delete_migrant<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_migrant(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Migrant, id, existed)
}

// ─── Officers ────────────────────────────────────────────────────────────────

/// `GET /officers`
pub async fn list_officers<S: CaseStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Officer>>, ApiError> {
  let officers = store.list_officers().await.map_err(ApiError::from_store)?;
  Ok(Json(officers))
}

/// `POST /officers`; 422 on a taken login.
pub async fn create_officer<S: CaseStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewOfficer>,
) -> Result<impl IntoResponse, ApiError> {
  let officer = store.add_officer(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(officer)))
}

/// `GET /officers/{id}`
pub async fn get_officer<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Officer>, ApiError> {
  let officer = store.get_officer(id).await.map_err(ApiError::from_store)?;
  found(EntityKind::Officer, id, officer)
}

/// `PATCH /officers/{id}`; 422 when the new login belongs to someone else.
pub async fn update_officer<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<OfficerPatch>,
) -> Result<Json<Officer>, ApiError> {
  let officer = store.update_officer(id, body).await.map_err(ApiError::from_store)?;
  Ok(Json(officer))
}

/// `DELETE /officers/{id}`
pub async fn delete_officer<S: CaseStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  let existed = store.delete_officer(id).await.map_err(ApiError::from_store)?;
  deleted(EntityKind::Officer, id, existed)
}
