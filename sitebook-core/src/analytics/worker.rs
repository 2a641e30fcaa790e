//! Worker aggregation and productivity analytics.
//!
//! [`WorkerStats`] is the dashboard roll-up over the worker list alone.
//! [`WorkerAnalytics`] joins workers with their project assignments to
//! project monthly cost and classify utilization.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::metrics::{average, group_count, group_key, sum};
use crate::types::{Project, ProjectWorker, Worker};

/// Billable hours in a full-time month.
pub const HOURS_PER_MONTH: f64 = 160.0;
/// Weeks per month used when projecting weekly assignments.
pub const WEEKS_PER_MONTH: f64 = 4.0;
/// Weekly hours at or above which a worker is fully utilized.
pub const FULLY_UTILIZED_HOURS: f64 = 40.0;
/// Weekly hours below which a worker is under-utilized.
pub const UNDER_UTILIZED_HOURS: f64 = 20.0;

/// Statistics over all workers.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStats {
    pub total: i64,
    /// Worker count per role
    pub by_role: BTreeMap<String, i64>,
    pub total_hourly_rate: f64,
    pub average_hourly_rate: f64,
}

impl WorkerStats {
    pub fn from_workers(workers: &[Worker]) -> Self {
        Self {
            total: workers.len() as i64,
            by_role: group_count(workers, |w| w.role.as_deref()),
            total_hourly_rate: sum(workers, |w| w.hourly_rate),
            average_hourly_rate: average(workers, |w| w.hourly_rate),
        }
    }
}

/// Utilization class from summed weekly hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Utilization {
    FullyUtilized,
    UnderUtilized,
}

impl Utilization {
    /// Classify weekly hours; `None` when the worker is in neither bucket.
    pub fn classify(weekly_hours: f64) -> Option<Self> {
        if weekly_hours >= FULLY_UTILIZED_HOURS {
            Some(Utilization::FullyUtilized)
        } else if weekly_hours < UNDER_UTILIZED_HOURS {
            Some(Utilization::UnderUtilized)
        } else {
            None
        }
    }
}

/// Worker analytics across the whole team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerAnalytics {
    pub summary: WorkerSummary,
    pub by_role: BTreeMap<String, RoleGroup>,
    pub assignment_stats: Vec<WorkerAssignmentStats>,
    pub utilization: UtilizationCounts,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub total_workers: i64,
    /// Number of distinct roles (missing roles count as one)
    pub total_roles: i64,
    pub average_rate: f64,
    /// Every worker billed a full-time month
    pub total_monthly_cost: f64,
}

/// Workers sharing a role.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGroup {
    pub count: i64,
    pub total_rate: f64,
    pub workers: Vec<RoleMember>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleMember {
    pub name: String,
    pub rate: f64,
    pub contact: Option<String>,
}

/// Assignment load for a single worker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerAssignmentStats {
    pub worker_id: i64,
    pub name: String,
    pub role: Option<String>,
    pub total_projects: i64,
    pub total_weekly_hours: f64,
    /// `hourly_rate × total_weekly_hours × 4`
    pub monthly_cost: f64,
    pub utilization: Option<Utilization>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationCounts {
    pub fully_utilized: i64,
    pub under_utilized: i64,
}

#[derive(Default)]
struct Load {
    projects: i64,
    weekly_hours: f64,
}

impl WorkerAnalytics {
    /// Build team analytics. Assignments naming an unknown worker or an
    /// unknown project are ignored.
    pub fn compute(
        workers: &[Worker],
        projects: &[Project],
        assignments: &[ProjectWorker],
    ) -> Self {
        let project_ids: HashSet<i64> = projects.iter().map(|p| p.id).collect();
        let mut loads: HashMap<i64, Load> = HashMap::new();
        for assignment in assignments {
            if !project_ids.contains(&assignment.project_id) {
                tracing::debug!(
                    project_id = assignment.project_id,
                    worker_id = assignment.worker_id,
                    "skipping assignment to missing project"
                );
                continue;
            }
            let load = loads.entry(assignment.worker_id).or_default();
            load.projects += 1;
            if assignment.hours_per_week.is_finite() {
                load.weekly_hours += assignment.hours_per_week;
            }
        }

        let mut by_role: BTreeMap<String, RoleGroup> = BTreeMap::new();
        for worker in workers {
            let group = by_role.entry(group_key(worker.role.as_deref())).or_default();
            group.count += 1;
            group.total_rate += worker.hourly_rate;
            group.workers.push(RoleMember {
                name: worker.name.clone(),
                rate: worker.hourly_rate,
                contact: worker.contact.clone(),
            });
        }

        let assignment_stats: Vec<WorkerAssignmentStats> = workers
            .iter()
            .map(|worker| {
                let (projects, weekly_hours) = loads
                    .get(&worker.id)
                    .map(|l| (l.projects, l.weekly_hours))
                    .unwrap_or((0, 0.0));
                WorkerAssignmentStats {
                    worker_id: worker.id,
                    name: worker.name.clone(),
                    role: worker.role.clone(),
                    total_projects: projects,
                    total_weekly_hours: weekly_hours,
                    monthly_cost: worker.hourly_rate * weekly_hours * WEEKS_PER_MONTH,
                    utilization: Utilization::classify(weekly_hours),
                }
            })
            .collect();

        let mut utilization = UtilizationCounts::default();
        for stats in &assignment_stats {
            match stats.utilization {
                Some(Utilization::FullyUtilized) => utilization.fully_utilized += 1,
                Some(Utilization::UnderUtilized) => utilization.under_utilized += 1,
                None => {}
            }
        }

        let summary = WorkerSummary {
            total_workers: workers.len() as i64,
            total_roles: by_role.len() as i64,
            average_rate: average(workers, |w| w.hourly_rate),
            total_monthly_cost: sum(workers, |w| w.hourly_rate * HOURS_PER_MONTH),
        };

        Self {
            summary,
            by_role,
            assignment_stats,
            utilization,
        }
    }

    /// Stats row for one worker, if present.
    pub fn worker(&self, worker_id: i64) -> Option<&WorkerAssignmentStats> {
        self.assignment_stats
            .iter()
            .find(|s| s.worker_id == worker_id)
    }
}
