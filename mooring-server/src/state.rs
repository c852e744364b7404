//! Application state shared across handlers.

use std::sync::Arc;

use mooring_core::Db;

/// Shared application state.
///
/// Handlers borrow the database handle for the duration of a request; the
/// lifecycle layer in [`crate::app`] stays the owner and releases the pool
/// at shutdown.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    db: Db,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self {
            inner: Arc::new(AppStateInner { db }),
        }
    }

    pub fn db(&self) -> &Db {
        &self.inner.db
    }
}
