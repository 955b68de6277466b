//! `GET /search?q=...`: the first few hits from each collection, grouped.
//! A missing or blank `q` answers empty groups.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use casework_core::store::{CaseStore, SearchResults};

use crate::{directory::SearchParams, error::ApiError};

pub async fn search<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
  let results = store
    .search(params.q.unwrap_or_default())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(results))
}
