//! JSON REST API for Casework.
//!
//! Exposes an axum [`Router`] backed by any [`casework_core::store::CaseStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", casework_api::api_router(store.clone()))
//! ```
//!
//! # Errors
//!
//! Validation failures answer 422 with `{"error", "fields": [{field, message}]}`,
//! missing rows 404, blocked deletes and stale versions 409. Anything else is
//! logged and answers 500.

pub mod applications;
pub mod certificates;
pub mod directory;
pub mod error;
pub mod exams;
pub mod lessons;
mod params;
pub mod school;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use casework_core::store::CaseStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CaseStore + 'static,
{
  Router::new()
    // Migration desk
    .route(
      "/migrants",
      get(directory::list_migrants::<S>).post(directory::create_migrant::<S>),
    )
    .route(
      "/migrants/{id}",
      get(directory::get_migrant::<S>)
        .patch(directory::update_migrant::<S>)
        .delete(directory::delete_migrant::<S>),
    )
    .route(
      "/officers",
      get(directory::list_officers::<S>).post(directory::create_officer::<S>),
    )
    .route(
      "/officers/{id}",
      get(directory::get_officer::<S>)
        .patch(directory::update_officer::<S>)
        .delete(directory::delete_officer::<S>),
    )
    .route(
      "/applications",
      get(applications::list::<S>).post(applications::create::<S>),
    )
    .route(
      "/applications/{id}",
      get(applications::get_one::<S>)
        .patch(applications::update::<S>)
        .delete(applications::delete_one::<S>),
    )
    .route("/applications/{id}/history", get(applications::history::<S>))
    // Flight school
    .route("/courses", get(school::list_courses::<S>).post(school::create_course::<S>))
    .route(
      "/courses/{id}",
      get(school::get_course::<S>)
        .patch(school::update_course::<S>)
        .delete(school::delete_course::<S>),
    )
    .route("/students", get(school::list_students::<S>).post(school::create_student::<S>))
    .route(
      "/students/{id}",
      get(school::get_student::<S>)
        .patch(school::update_student::<S>)
        .delete(school::delete_student::<S>),
    )
    .route(
      "/instructors",
      get(school::list_instructors::<S>).post(school::create_instructor::<S>),
    )
    .route(
      "/instructors/{id}",
      get(school::get_instructor::<S>)
        .patch(school::update_instructor::<S>)
        .delete(school::delete_instructor::<S>),
    )
    .route("/aircraft", get(school::list_aircraft::<S>).post(school::create_aircraft::<S>))
    .route(
      "/aircraft/{id}",
      get(school::get_aircraft::<S>)
        .patch(school::update_aircraft::<S>)
        .delete(school::delete_aircraft::<S>),
    )
    .route(
      "/certificates",
      get(school::list_certificates::<S>).post(school::create_certificate::<S>),
    )
    .route(
      "/certificates/{id}",
      get(school::get_certificate::<S>)
        .patch(school::update_certificate::<S>)
        .delete(school::delete_certificate::<S>),
    )
    .route("/lessons", get(lessons::list::<S>).post(lessons::create::<S>))
    .route(
      "/lessons/{id}",
      get(lessons::get_one::<S>)
        .patch(lessons::update::<S>)
        .delete(lessons::delete_one::<S>),
    )
    .route("/lessons/{id}/history", get(lessons::history::<S>))
    .route(
      "/student-certificates",
      get(certificates::list::<S>).post(certificates::issue::<S>),
    )
    .route(
      "/student-certificates/{id}",
      get(certificates::get_one::<S>)
        .patch(certificates::update::<S>)
        .delete(certificates::delete_one::<S>),
    )
    .route("/student-certificates/{id}/status", post(certificates::set_status::<S>))
    .route("/exams", get(exams::list::<S>).post(exams::create::<S>))
    .route(
      "/exams/{id}",
      get(exams::get_one::<S>)
        .patch(exams::update::<S>)
        .delete(exams::delete_one::<S>),
    )
    // Both desks
    .route("/search", get(search::search::<S>))
    .with_state(store)
}
