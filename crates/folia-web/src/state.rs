//! Shared handler state

use std::path::PathBuf;
use std::sync::Arc;

use folia_core::{Snapshot, SnapshotStore};

use crate::error::Result;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub images_dir: PathBuf,
    pub database: String,
}

impl AppState {
    pub fn new(store: Arc<SnapshotStore>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            images_dir: images_dir.into(),
            database: String::new(),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Published snapshot, or `NotReady` before the first rebuild lands.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        Ok(self.store.current()?)
    }
}
