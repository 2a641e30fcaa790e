//! Analytics module for sitebook
//!
//! Turns a dataset [`Snapshot`](crate::Snapshot) into management views:
//! - Metric primitives (grouped counts, sums, averages, zero-guarded ratios)
//! - Project, worker, and vendor roll-ups
//! - Financial health and schedule performance
//! - The recent-activity feed
//! - Single-project detail and worker productivity
//! - The composite dashboard
//!
//! Every analyzer is a pure function of its inputs. Time-sensitive views take
//! `now` as a parameter instead of reading the clock. See [`engine`] for the
//! query entry points.

pub mod activity;
pub mod dashboard;
pub mod detail;
pub mod engine;
pub mod financial;
pub mod metrics;
pub mod performance;
pub mod project;
pub mod vendor;
pub mod worker;

pub use activity::{build_activity_feed, ActivityAction, ActivityItem, ActivityKind, Priority};
pub use dashboard::{DashboardAlerts, DashboardSnapshot, DashboardSummary, GrowthTrends};
pub use detail::{AssignedWorker, ProjectDetailView};
pub use engine::{
    compute_dashboard, compute_financial_overview, compute_project_detail,
    compute_worker_analytics, AnalyticsEngine,
};
pub use financial::{BudgetAlert, CostEfficiency, FinancialAnalytics, FinancialStats};
pub use performance::{PerformanceMetrics, ScheduleState};
pub use project::{Milestone, ProjectStats};
pub use vendor::VendorStats;
pub use worker::{Utilization, WorkerAnalytics, WorkerAssignmentStats, WorkerStats};
