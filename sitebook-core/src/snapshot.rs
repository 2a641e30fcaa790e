//! Dataset snapshots.
//!
//! A [`Snapshot`] is an immutable copy of every entity collection, taken once
//! per analytics request. Storage backends provide it through
//! [`SnapshotSource`]; the analytics engine never reads storage directly.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::types::{Expense, Project, ProjectWorker, Vendor, Worker};

/// All entity collections for one aggregation pass, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "nullable")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "nullable")]
    pub workers: Vec<Worker>,
    #[serde(default, deserialize_with = "nullable")]
    pub vendors: Vec<Vendor>,
    #[serde(default, deserialize_with = "nullable")]
    pub expenses: Vec<Expense>,
    #[serde(
        default,
        rename = "project_workers",
        alias = "assignments",
        deserialize_with = "nullable"
    )]
    pub assignments: Vec<ProjectWorker>,
}

/// A collection written as `null` reads as empty.
fn nullable<'de, D, T>(de: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

impl Snapshot {
    /// Look up a project by id.
    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up a worker by id.
    pub fn worker(&self, id: i64) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    /// Look up a vendor by id.
    pub fn vendor(&self, id: i64) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.projects.len()
            + self.workers.len()
            + self.vendors.len()
            + self.expenses.len()
            + self.assignments.len()
    }
}

/// Anything that can produce a [`Snapshot`] of the current dataset.
///
/// Implementations report storage failures as
/// [`Error::DataUnavailable`](crate::Error::DataUnavailable) and do not retry.
pub trait SnapshotSource {
    fn snapshot(&self) -> Result<Snapshot>;
}

impl SnapshotSource for Snapshot {
    fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.clone())
    }
}
