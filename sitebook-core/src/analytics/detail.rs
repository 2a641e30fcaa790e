//! Single-project deep view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::metrics::{group_sum, sum};
use super::project::{budget_utilization, efficiency, Milestone};
use super::worker::WEEKS_PER_MONTH;
use crate::error::{Error, Result};
use crate::snapshot::Snapshot;
use crate::types::{Project, Worker};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Enriched analytics for one project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailView {
    pub project: ProjectBudget,
    pub resources: ProjectResources,
    pub financial: ProjectFinancials,
    pub progress: ProjectProgress,
}

/// The project record plus its budget position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBudget {
    #[serde(flatten)]
    pub project: Project,
    pub budget_remaining: f64,
    pub budget_utilization: f64,
    /// Whole days until the end date, rounded up; negative once overdue
    pub days_remaining: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResources {
    pub total_workers: i64,
    pub assigned_workers: Vec<AssignedWorker>,
    /// Vendors attached to this project
    pub total_vendors: i64,
}

/// A worker record plus the weekly hours it is assigned to this project.
#[derive(Debug, Clone, Serialize)]
pub struct AssignedWorker {
    #[serde(flatten)]
    pub worker: Worker,
    pub hours_assigned: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinancials {
    pub total_expenses: f64,
    pub expense_breakdown: BTreeMap<String, f64>,
    /// Monthly labor cost of the assigned workers
    pub labor_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    /// End date not yet passed (true when there is no end date)
    pub on_track: bool,
    pub efficiency: f64,
    pub milestone: Milestone,
}

/// Whole days from `now` until `end`, rounded up.
pub fn days_until(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = end.signed_duration_since(now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

impl ProjectDetailView {
    /// Build the view for `project_id`.
    ///
    /// Fails with [`Error::ProjectNotFound`] when the id is absent. Assignments
    /// whose worker no longer exists are dropped.
    pub fn compute(snapshot: &Snapshot, project_id: i64, now: DateTime<Utc>) -> Result<Self> {
        let project = snapshot
            .project(project_id)
            .ok_or(Error::ProjectNotFound(project_id))?;

        let mut assigned_workers = Vec::new();
        for assignment in snapshot.assignments.iter().filter(|a| a.project_id == project_id) {
            match snapshot.worker(assignment.worker_id) {
                Some(worker) => assigned_workers.push(AssignedWorker {
                    worker: worker.clone(),
                    hours_assigned: assignment.hours_per_week,
                }),
                None => tracing::debug!(
                    project_id,
                    worker_id = assignment.worker_id,
                    "skipping assignment to missing worker"
                ),
            }
        }

        let expenses: Vec<_> = snapshot
            .expenses
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect();

        let labor_cost = sum(&assigned_workers, |a| {
            a.worker.hourly_rate * a.hours_assigned * WEEKS_PER_MONTH
        });

        let total_vendors = snapshot
            .vendors
            .iter()
            .filter(|v| v.project_id == Some(project_id))
            .count() as i64;

        Ok(Self {
            project: ProjectBudget {
                budget_remaining: project.budget - project.spent,
                budget_utilization: budget_utilization(project),
                days_remaining: project.end_date.map(|end| days_until(end, now)),
                project: project.clone(),
            },
            resources: ProjectResources {
                total_workers: assigned_workers.len() as i64,
                assigned_workers,
                total_vendors,
            },
            financial: ProjectFinancials {
                total_expenses: sum(&expenses, |e| e.amount),
                expense_breakdown: group_sum(&expenses, |e| e.category.as_deref(), |e| e.amount),
                labor_cost,
            },
            progress: ProjectProgress {
                on_track: project.end_date.map_or(true, |end| end >= now),
                efficiency: efficiency(project),
                milestone: Milestone::from_progress(project.progress_percent),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Expense, ProjectStatus, ProjectWorker, Vendor};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            projects: vec![
                Project {
                    id: 1,
                    name: "Harbor Lofts".to_string(),
                    status: ProjectStatus::Active,
                    budget: 10_000.0,
                    spent: 2_500.0,
                    progress_percent: 60.0,
                    end_date: Some(now() + Duration::hours(36)),
                    ..Default::default()
                },
                Project {
                    id: 2,
                    name: "Empty Lot".to_string(),
                    ..Default::default()
                },
            ],
            workers: vec![
                Worker {
                    id: 10,
                    name: "Ada".to_string(),
                    hourly_rate: 20.0,
                    ..Default::default()
                },
                Worker {
                    id: 11,
                    name: "Bo".to_string(),
                    hourly_rate: 30.0,
                    ..Default::default()
                },
            ],
            vendors: vec![
                Vendor {
                    id: 1,
                    project_id: Some(1),
                    ..Default::default()
                },
                Vendor {
                    id: 2,
                    project_id: None,
                    ..Default::default()
                },
            ],
            expenses: vec![
                Expense {
                    id: 1,
                    project_id: 1,
                    category: Some("Materials".to_string()),
                    amount: 400.0,
                    ..Default::default()
                },
                Expense {
                    id: 2,
                    project_id: 1,
                    category: Some("Materials".to_string()),
                    amount: 100.0,
                    ..Default::default()
                },
                Expense {
                    id: 3,
                    project_id: 1,
                    category: Some("Permits".to_string()),
                    amount: 50.0,
                    ..Default::default()
                },
                Expense {
                    id: 4,
                    project_id: 2,
                    category: Some("Permits".to_string()),
                    amount: 999.0,
                    ..Default::default()
                },
            ],
            assignments: vec![
                ProjectWorker {
                    project_id: 1,
                    worker_id: 10,
                    hours_per_week: 10.0,
                },
                ProjectWorker {
                    project_id: 1,
                    worker_id: 11,
                    hours_per_week: 5.0,
                },
                // Worker 12 was deleted
                ProjectWorker {
                    project_id: 1,
                    worker_id: 12,
                    hours_per_week: 40.0,
                },
            ],
        }
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let err = ProjectDetailView::compute(&snapshot(), 404, now()).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(404)));
    }

    #[test]
    fn test_detail_view() {
        let view = ProjectDetailView::compute(&snapshot(), 1, now()).unwrap();

        assert_eq!(view.project.budget_remaining, 7_500.0);
        assert_eq!(view.project.budget_utilization, 25.0);
        assert_eq!(view.project.days_remaining, Some(2));

        assert_eq!(view.resources.total_workers, 2);
        assert_eq!(view.resources.assigned_workers[0].worker.name, "Ada");
        assert_eq!(view.resources.assigned_workers[0].hours_assigned, 10.0);
        assert_eq!(view.resources.total_vendors, 1);

        assert_eq!(view.financial.total_expenses, 550.0);
        assert_eq!(view.financial.expense_breakdown["Materials"], 500.0);
        assert_eq!(view.financial.expense_breakdown["Permits"], 50.0);
        // 20 × 10 × 4 + 30 × 5 × 4
        assert_eq!(view.financial.labor_cost, 1_400.0);

        assert!(view.progress.on_track);
        assert_eq!(view.progress.efficiency, 240.0);
        assert_eq!(view.progress.milestone, Milestone::Halfway);
    }

    #[test]
    fn test_zero_budget_project() {
        let view = ProjectDetailView::compute(&snapshot(), 2, now()).unwrap();
        assert_eq!(view.project.budget_utilization, 0.0);
        assert_eq!(view.project.days_remaining, None);
        assert_eq!(view.progress.efficiency, 0.0);
        assert!(view.progress.on_track);
        assert_eq!(view.progress.milestone, Milestone::JustStarted);
        assert!(view.resources.assigned_workers.is_empty());
        assert_eq!(view.financial.total_expenses, 999.0);
    }

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(3), now()), 3);
        assert_eq!(days_until(now(), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(36), now()), -1);
    }

    #[test]
    fn test_detail_serializes_flattened_project() {
        let view = ProjectDetailView::compute(&snapshot(), 1, now()).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["project"]["name"], "Harbor Lofts");
        assert_eq!(json["project"]["budgetRemaining"], 7_500.0);
        assert_eq!(json["progress"]["milestone"], "Halfway");
        assert_eq!(json["resources"]["assignedWorkers"][1]["hours_assigned"], 5.0);
    }
}
