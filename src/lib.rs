#![allow(dead_code)]

pub mod assembler;
pub mod config;
pub mod db;
pub mod domain;
pub mod logging;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use db::postgres::{PostgresCatalog, PostgresProgressStore};
use db::store::{Catalog, ProgressStore};
use state::AppState;

/// Builds the router against a live Postgres pool, for `main.rs`.
pub fn create_app(pool: sqlx::PgPool) -> axum::Router {
    let store = Arc::new(PostgresProgressStore::new(pool.clone()));
    let catalog = Arc::new(PostgresCatalog::new(pool));
    create_app_with(store, catalog)
}

/// Builds the router against any `ProgressStore`/`Catalog` pair,
/// grounded on the teacher's swappable-test-harness pattern
/// (`tests/common/mod.rs`) — tests pass the in-memory store here
/// instead of a Postgres pool.
pub fn create_app_with(store: Arc<dyn ProgressStore>, catalog: Arc<dyn Catalog>) -> axum::Router {
    let state = AppState::new(store, catalog);
    routes::router(state)
}
