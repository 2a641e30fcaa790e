//! Single-document JSON store.
//!
//! The whole dataset lives in one pretty-printed JSON file with top-level
//! `projects`, `workers`, `vendors`, `expenses` and `project_workers` arrays.
//! Records are normalized on load (see [`crate::types`]).

use crate::error::{Error, Result};
use crate::snapshot::{Snapshot, SnapshotSource};
use crate::types::{Project, ProjectStatus};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Collections that carry an integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Projects,
    Workers,
    Vendors,
    Expenses,
}

/// A JSON file holding the full dataset
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with a seed document if it does not exist yet.
    ///
    /// Returns `true` when a new file was written.
    pub fn init(&self) -> Result<bool> {
        if self.path.exists() {
            tracing::info!(path = %self.path.display(), "Existing data file found");
            return Ok(false);
        }

        self.save(&Self::seed())?;
        tracing::info!(path = %self.path.display(), "Created data file with sample project");
        Ok(true)
    }

    /// Read and normalize the document.
    ///
    /// A missing or unparseable file is [`Error::DataUnavailable`].
    pub fn load(&self) -> Result<Snapshot> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::DataUnavailable(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::DataUnavailable(format!("cannot parse {}: {}", self.path.display(), e))
        })
    }

    /// Write the dataset as pretty-printed JSON, replacing the file atomically.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            records = snapshot.record_count(),
            "Saved data file"
        );
        Ok(())
    }

    /// Next free id in a collection: max id + 1, or 1 when empty.
    pub fn next_id(&self, collection: Collection) -> Result<i64> {
        Ok(next_id(&self.load()?, collection))
    }

    fn seed() -> Snapshot {
        Snapshot {
            projects: vec![Project {
                id: 1,
                name: "Sample Real Estate Project".to_string(),
                status: ProjectStatus::Active,
                budget: 500_000.0,
                spent: 0.0,
                progress_percent: 25.0,
                created_at: Some(Utc::now()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }
}

/// Max id + 1 within one collection of a snapshot.
pub fn next_id(snapshot: &Snapshot, collection: Collection) -> i64 {
    let max = match collection {
        Collection::Projects => snapshot.projects.iter().map(|p| p.id).max(),
        Collection::Workers => snapshot.workers.iter().map(|w| w.id).max(),
        Collection::Vendors => snapshot.vendors.iter().map(|v| v.id).max(),
        Collection::Expenses => snapshot.expenses.iter().map(|e| e.id).max(),
    };
    max.map_or(1, |id| id + 1)
}

impl SnapshotSource for JsonStore {
    fn snapshot(&self) -> Result<Snapshot> {
        self.load()
    }
}
