//! Recent-activity feed.
//!
//! The newest entries of each collection (by insertion order, not by
//! timestamp) are tagged with a description, merged, and sorted newest-first.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::format_currency;
use crate::types::{Project, ProjectStatus, Vendor, Worker};

/// Projects taken from the tail of the project list.
pub const RECENT_PROJECTS: usize = 5;
/// Workers taken from the tail of the worker list.
pub const RECENT_WORKERS: usize = 3;
/// Vendors taken from the tail of the vendor list.
pub const RECENT_VENDORS: usize = 3;
/// Maximum feed length.
pub const FEED_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Project,
    Worker,
    Vendor,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Project => "project",
            ActivityKind::Worker => "worker",
            ActivityKind::Vendor => "vendor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Created,
    Updated,
    Added,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::Added => "added",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

/// One entry in the activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub action: ActivityAction,
    #[serde(rename = "entityId")]
    pub entity_id: i64,
    pub title: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub description: String,
    pub status: Option<String>,
    pub priority: Priority,
}

impl ActivityItem {
    fn from_project(project: &Project) -> Self {
        let action = if project.status == ProjectStatus::Planning {
            ActivityAction::Created
        } else {
            ActivityAction::Updated
        };
        Self {
            kind: ActivityKind::Project,
            action,
            entity_id: project.id,
            title: project.name.clone(),
            timestamp: project.created_at,
            description: format!(
                "Project \"{}\" {} with budget {}",
                project.name,
                action.as_str(),
                format_currency(project.budget)
            ),
            status: project.status.as_str().map(str::to_string),
            priority: Priority::High,
        }
    }

    fn from_worker(worker: &Worker) -> Self {
        Self {
            kind: ActivityKind::Worker,
            action: ActivityAction::Added,
            entity_id: worker.id,
            title: worker.name.clone(),
            timestamp: worker.created_at,
            description: format!(
                "New worker \"{}\" added as {}",
                worker.name,
                worker.role.as_deref().unwrap_or("unknown")
            ),
            status: Some("completed".to_string()),
            priority: Priority::Medium,
        }
    }

    fn from_vendor(vendor: &Vendor) -> Self {
        Self {
            kind: ActivityKind::Vendor,
            action: ActivityAction::Added,
            entity_id: vendor.id,
            title: vendor.name.clone(),
            timestamp: vendor.created_at,
            description: format!(
                "New vendor \"{}\" added in {} category",
                vendor.name,
                vendor.category.as_deref().unwrap_or("unknown")
            ),
            status: Some("completed".to_string()),
            priority: Priority::Medium,
        }
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Build the merged feed, newest first, at most [`FEED_LIMIT`] items.
///
/// The sort is stable, so equal timestamps keep merge order (projects, then
/// workers, then vendors). Items without a timestamp sort last.
pub fn build_activity_feed(
    projects: &[Project],
    workers: &[Worker],
    vendors: &[Vendor],
) -> Vec<ActivityItem> {
    let mut feed: Vec<ActivityItem> = tail(projects, RECENT_PROJECTS)
        .iter()
        .map(ActivityItem::from_project)
        .chain(tail(workers, RECENT_WORKERS).iter().map(ActivityItem::from_worker))
        .chain(tail(vendors, RECENT_VENDORS).iter().map(ActivityItem::from_vendor))
        .collect();

    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(FEED_LIMIT);
    feed
}
