//! Analytics query engine.
//!
//! The four query entry points are pure functions of a [`Snapshot`] (and, for
//! time-sensitive views, an explicit `now`). [`AnalyticsEngine`] wraps a
//! [`SnapshotSource`] so callers can run a query against live storage: each
//! call takes a fresh snapshot, computes, and discards it.
//!
//! ```text
//!   SnapshotSource ──snapshot()──▶ Snapshot ──▶ compute_* ──▶ view
//!   (Database, JsonStore)          (immutable)    (pure)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitebook_core::analytics::AnalyticsEngine;
//! use sitebook_core::Database;
//!
//! let db = Database::open_in_memory().unwrap();
//! db.migrate().unwrap();
//!
//! let engine = AnalyticsEngine::new(&db);
//! let dashboard = engine.dashboard(chrono::Utc::now()).unwrap();
//! println!("{} projects", dashboard.summary.total_projects);
//! ```

use chrono::{DateTime, Utc};
use std::time::Instant;

use super::dashboard::DashboardSnapshot;
use super::detail::ProjectDetailView;
use super::financial::FinancialAnalytics;
use super::worker::WorkerAnalytics;
use crate::error::Result;
use crate::snapshot::{Snapshot, SnapshotSource};

/// Compile the full dashboard.
pub fn compute_dashboard(snapshot: &Snapshot, now: DateTime<Utc>) -> DashboardSnapshot {
    DashboardSnapshot::compile(snapshot, now)
}

/// Deep view of one project; fails with `ProjectNotFound` if the id is absent.
pub fn compute_project_detail(
    snapshot: &Snapshot,
    project_id: i64,
    now: DateTime<Utc>,
) -> Result<ProjectDetailView> {
    ProjectDetailView::compute(snapshot, project_id, now)
}

/// Budget, expense, and cost-efficiency overview.
pub fn compute_financial_overview(snapshot: &Snapshot) -> FinancialAnalytics {
    FinancialAnalytics::compute(&snapshot.projects, &snapshot.workers, &snapshot.expenses)
}

/// Team composition, assignment load, and utilization.
pub fn compute_worker_analytics(snapshot: &Snapshot) -> WorkerAnalytics {
    WorkerAnalytics::compute(&snapshot.workers, &snapshot.projects, &snapshot.assignments)
}

/// Runs analytics queries against a snapshot source.
pub struct AnalyticsEngine<'a, S: SnapshotSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: SnapshotSource + ?Sized> AnalyticsEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Take a fresh snapshot; any storage failure surfaces as `DataUnavailable`.
    fn load(&self, query: &'static str) -> Result<(Snapshot, Instant)> {
        let start = Instant::now();
        let snapshot = self.source.snapshot().map_err(|e| {
            tracing::warn!(query, error = %e, "snapshot unavailable");
            e.unavailable()
        })?;
        tracing::debug!(query, records = snapshot.record_count(), "snapshot loaded");
        Ok((snapshot, start))
    }

    fn finish(query: &'static str, start: Instant) {
        tracing::info!(
            query,
            duration_ms = start.elapsed().as_millis() as u64,
            "analytics query complete"
        );
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardSnapshot> {
        let (snapshot, start) = self.load("dashboard")?;
        let dashboard = compute_dashboard(&snapshot, now);
        Self::finish("dashboard", start);
        Ok(dashboard)
    }

    pub fn project_detail(&self, project_id: i64, now: DateTime<Utc>) -> Result<ProjectDetailView> {
        let (snapshot, start) = self.load("project_detail")?;
        let view = compute_project_detail(&snapshot, project_id, now).map_err(|e| {
            tracing::info!(project_id, error = %e, "project detail unavailable");
            e
        })?;
        Self::finish("project_detail", start);
        Ok(view)
    }

    pub fn financial_overview(&self) -> Result<FinancialAnalytics> {
        let (snapshot, start) = self.load("financial_overview")?;
        let overview = compute_financial_overview(&snapshot);
        Self::finish("financial_overview", start);
        Ok(overview)
    }

    pub fn worker_analytics(&self) -> Result<WorkerAnalytics> {
        let (snapshot, start) = self.load("worker_analytics")?;
        let analytics = compute_worker_analytics(&snapshot);
        Self::finish("worker_analytics", start);
        Ok(analytics)
    }
}
