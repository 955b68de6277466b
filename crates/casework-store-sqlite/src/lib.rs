//! SQLite backend for the Casework store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every write runs inside its own
//! [`rusqlite::Transaction`]; returning early drops it, which rolls back.

mod applications;
mod directory;
mod encode;
mod exams;
mod history;
mod lessons;
mod query;
mod refs;
mod schema;
mod school;
mod search;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
