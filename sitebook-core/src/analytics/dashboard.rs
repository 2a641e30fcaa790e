//! Dashboard compilation.
//!
//! Runs every aggregator over one snapshot and assembles the composite
//! dashboard: summary KPIs, per-domain stats, financial and performance
//! panels, the activity feed, growth trends, and alerts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::activity::{build_activity_feed, ActivityItem};
use super::financial::FinancialStats;
use super::performance::PerformanceMetrics;
use super::project::ProjectStats;
use super::vendor::VendorStats;
use super::worker::WorkerStats;
use crate::snapshot::Snapshot;

/// Everything the dashboard shows, generated at `timestamp`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub summary: DashboardSummary,
    pub projects: ProjectStats,
    pub workers: WorkerStats,
    pub vendors: VendorStats,
    pub financial: FinancialStats,
    pub performance: PerformanceMetrics,
    pub recent_activities: Vec<ActivityItem>,
    pub trends: GrowthTrends,
    pub alerts: DashboardAlerts,
    pub timestamp: DateTime<Utc>,
    /// `timestamp` as epoch milliseconds
    pub generated_at: i64,
}

/// Headline numbers.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_projects: i64,
    pub total_workers: i64,
    pub total_vendors: i64,
    pub overall_budget: f64,
    pub budget_utilization: f64,
}

/// Month-over-month growth placeholders.
///
/// No history is retained, so these are a proxy of `total / (total - 1)` as a
/// percentage rather than a real trend.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthTrends {
    pub project_growth: i64,
    pub team_growth: i64,
    pub vendor_growth: i64,
}

impl GrowthTrends {
    /// Growth proxy for a collection size: `round(total / max(1, total - 1) × 100)`, 0 when empty.
    pub fn growth_proxy(total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        let previous = (total - 1).max(1) as f64;
        (total as f64 / previous * 100.0).round() as i64
    }
}

/// Alert messages; each is `None` when its condition does not hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAlerts {
    pub budget_alerts: Option<String>,
    pub progress_alerts: Option<String>,
    pub resource_alerts: Option<String>,
}

impl DashboardAlerts {
    fn compute(financial: &FinancialStats, performance: &PerformanceMetrics, workers: &WorkerStats) -> Self {
        Self {
            budget_alerts: (financial.projects_over_budget > 0)
                .then(|| format!("{} projects over budget", financial.projects_over_budget)),
            progress_alerts: (performance.delayed_projects > 0)
                .then(|| format!("{} projects delayed", performance.delayed_projects)),
            resource_alerts: (workers.total == 0).then(|| "No workers assigned".to_string()),
        }
    }

    /// Alerts that are currently raised.
    pub fn active(&self) -> Vec<&str> {
        [&self.budget_alerts, &self.progress_alerts, &self.resource_alerts]
            .into_iter()
            .filter_map(|a| a.as_deref())
            .collect()
    }
}

impl DashboardSnapshot {
    /// Compile the dashboard. Never fails: odd data degrades to zero-guarded values.
    pub fn compile(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        let projects = ProjectStats::from_projects(&snapshot.projects);
        let workers = WorkerStats::from_workers(&snapshot.workers);
        let vendors = VendorStats::from_vendors(&snapshot.vendors);
        let financial = FinancialStats::compute(&projects, &workers, &snapshot.projects);
        let performance = PerformanceMetrics::compute(&snapshot.projects, now);
        let recent_activities =
            build_activity_feed(&snapshot.projects, &snapshot.workers, &snapshot.vendors);

        let summary = DashboardSummary {
            total_projects: projects.total,
            total_workers: workers.total,
            total_vendors: vendors.total,
            overall_budget: projects.total_budget,
            budget_utilization: financial.budget_utilization,
        };

        let trends = GrowthTrends {
            project_growth: GrowthTrends::growth_proxy(projects.total),
            team_growth: GrowthTrends::growth_proxy(workers.total),
            vendor_growth: GrowthTrends::growth_proxy(vendors.total),
        };

        let alerts = DashboardAlerts::compute(&financial, &performance, &workers);

        Self {
            summary,
            projects,
            workers,
            vendors,
            financial,
            performance,
            recent_activities,
            trends,
            alerts,
            timestamp: now,
            generated_at: now.timestamp_millis(),
        }
    }
}
