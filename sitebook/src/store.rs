//! Opens the configured storage backend.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sitebook_core::config::{StorageBackend, StorageConfig};
use sitebook_core::{Database, JsonStore, SnapshotSource};

/// An opened store of either backend.
pub enum Store {
    Sqlite(Database),
    Json(JsonStore),
}

impl Store {
    /// Open the store described by `config`.
    ///
    /// SQLite databases are created and migrated on open. A JSON store is only
    /// read when queried, so a missing file surfaces as data-unavailable then.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let path = config.resolved_path();
        tracing::info!(backend = %config.backend, path = %path.display(), "Opening store");

        match config.backend {
            StorageBackend::Sqlite => {
                let db = Database::open(&path).context("failed to open database")?;
                db.migrate().context("failed to run database migrations")?;
                Ok(Store::Sqlite(db))
            }
            StorageBackend::Json => Ok(Store::Json(JsonStore::new(path))),
        }
    }

    /// Create the store if needed; returns a human-readable status line.
    pub fn init(&self, path: PathBuf) -> Result<String> {
        match self {
            Store::Sqlite(_) => Ok(format!("Database ready at {}", path.display())),
            Store::Json(store) => {
                let created = store.init().context("failed to initialize data file")?;
                Ok(if created {
                    format!("Created {} with a sample project", path.display())
                } else {
                    format!("Data file already exists at {}", path.display())
                })
            }
        }
    }

    pub fn source(&self) -> &dyn SnapshotSource {
        match self {
            Store::Sqlite(db) => db,
            Store::Json(store) => store,
        }
    }

    /// The SQLite database, for operations the JSON backend does not support.
    pub fn database(&self, operation: &str) -> Result<&Database> {
        match self {
            Store::Sqlite(db) => Ok(db),
            Store::Json(_) => bail!("{} requires the sqlite backend", operation),
        }
    }
}
