use std::sync::Arc;
use std::time::Instant;

use crate::db::store::{Catalog, ProgressStore};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    store: Arc<dyn ProgressStore>,
    catalog: Arc<dyn Catalog>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProgressStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            started_at: Instant::now(),
            store,
            catalog,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn store(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }
}
