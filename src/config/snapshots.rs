//! Snapshot Config

use std::path::PathBuf;

use clap::Args;

use crate::snapshots::{FileSnapshotStore, MemorySnapshotStore, SnapshotError, SnapshotStore};

/// Snapshot storage settings.
#[derive(Debug, Clone, Args)]
pub struct SnapshotConfig {
    /// Directory for cart/user snapshots; kept in memory when unset
    #[arg(long, env = "STORE_SNAPSHOT_DIR")]
    pub snapshot_dir: Option<PathBuf>,
}

impl SnapshotConfig {
    /// Open the configured snapshot store.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the snapshot directory cannot be created.
    pub fn open_store(&self) -> Result<Box<dyn SnapshotStore>, SnapshotError> {
        match &self.snapshot_dir {
            Some(dir) => Ok(Box::new(FileSnapshotStore::new(dir)?)),
            None => Ok(Box::new(MemorySnapshotStore::new())),
        }
    }
}
