//! Project-level aggregation.
//!
//! Portfolio totals over the project list plus the per-project derivations
//! (utilization, efficiency, milestone) shared by the detail and financial views.

use std::collections::BTreeMap;

use serde::Serialize;

use super::metrics::{average, group_count, percentage, ratio, sum};
use crate::types::Project;

/// Portfolio statistics for all projects.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    /// Number of projects
    pub total: i64,
    /// Project count per status
    pub by_status: BTreeMap<String, i64>,
    /// Sum of all budgets
    pub total_budget: f64,
    /// Sum of all spending
    pub total_spent: f64,
    /// Mean budget per project
    pub average_budget: f64,
    /// Mean completion percentage
    pub average_progress: f64,
}

impl ProjectStats {
    /// Aggregate a project list.
    pub fn from_projects(projects: &[Project]) -> Self {
        Self {
            total: projects.len() as i64,
            by_status: group_count(projects, |p| p.status.as_str()),
            total_budget: sum(projects, |p| p.budget),
            total_spent: sum(projects, |p| p.spent),
            average_budget: average(projects, |p| p.budget),
            average_progress: average(projects, |p| p.progress_percent),
        }
    }
}

/// Coarse progress label for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Milestone {
    #[serde(rename = "Just Started")]
    JustStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Halfway")]
    Halfway,
    #[serde(rename = "Almost Complete")]
    AlmostComplete,
}

impl Milestone {
    /// Label for a completion percentage (thresholds 25/50/75).
    pub fn from_progress(progress_percent: f64) -> Self {
        if progress_percent >= 75.0 {
            Milestone::AlmostComplete
        } else if progress_percent >= 50.0 {
            Milestone::Halfway
        } else if progress_percent >= 25.0 {
            Milestone::InProgress
        } else {
            Milestone::JustStarted
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Milestone::JustStarted => "Just Started",
            Milestone::InProgress => "In Progress",
            Milestone::Halfway => "Halfway",
            Milestone::AlmostComplete => "Almost Complete",
        }
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Spending as a percentage of budget; 0 when there is no budget.
pub fn budget_utilization(project: &Project) -> f64 {
    percentage(project.spent, project.budget)
}

/// Progress bought per unit of budget fraction spent.
///
/// `progress_percent / (spent / budget)`. Unbounded above. Returns 0 when the
/// budget is not positive, and 0 when nothing has been spent yet (the ratio
/// would otherwise be infinite).
pub fn efficiency(project: &Project) -> f64 {
    if project.budget <= 0.0 {
        return 0.0;
    }
    let spent_fraction = ratio(project.spent, project.budget, 1.0);
    ratio(project.progress_percent, spent_fraction, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectStatus;

    fn project(status: ProjectStatus, budget: f64, spent: f64, progress: f64) -> Project {
        Project {
            status,
            budget,
            spent,
            progress_percent: progress,
            ..Default::default()
        }
    }

    #[test]
    fn test_project_stats() {
        let projects = vec![
            project(ProjectStatus::Active, 1000.0, 500.0, 50.0),
            project(ProjectStatus::Active, 3000.0, 100.0, 10.0),
            project(ProjectStatus::Unknown, 2000.0, 0.0, 0.0),
        ];
        let stats = ProjectStats::from_projects(&projects);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status.get("Active"), Some(&2));
        assert_eq!(stats.by_status.get("unknown"), Some(&1));
        assert_eq!(stats.total_budget, 6000.0);
        assert_eq!(stats.total_spent, 600.0);
        assert_eq!(stats.average_budget, 2000.0);
        assert_eq!(stats.average_progress, 20.0);
    }

    #[test]
    fn test_project_stats_empty() {
        let stats = ProjectStats::from_projects(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_status.is_empty());
        assert_eq!(stats.average_budget, 0.0);
        assert_eq!(stats.average_progress, 0.0);
    }

    #[test]
    fn test_milestone_thresholds() {
        assert_eq!(Milestone::from_progress(0.0), Milestone::JustStarted);
        assert_eq!(Milestone::from_progress(24.9), Milestone::JustStarted);
        assert_eq!(Milestone::from_progress(25.0), Milestone::InProgress);
        assert_eq!(Milestone::from_progress(50.0), Milestone::Halfway);
        assert_eq!(Milestone::from_progress(75.0), Milestone::AlmostComplete);
        assert_eq!(Milestone::from_progress(100.0).label(), "Almost Complete");
    }

    #[test]
    fn test_efficiency() {
        // Half done for a quarter of the budget
        let p = project(ProjectStatus::Active, 1000.0, 250.0, 50.0);
        assert_eq!(efficiency(&p), 200.0);
        assert_eq!(budget_utilization(&p), 25.0);
    }

    #[test]
    fn test_efficiency_zero_guards() {
        assert_eq!(efficiency(&project(ProjectStatus::Active, 0.0, 0.0, 40.0)), 0.0);
        assert_eq!(efficiency(&project(ProjectStatus::Active, 1000.0, 0.0, 40.0)), 0.0);
        assert_eq!(efficiency(&project(ProjectStatus::Active, -5.0, 10.0, 40.0)), 0.0);
        assert_eq!(budget_utilization(&project(ProjectStatus::Active, 0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_milestone_serializes_as_label() {
        let json = serde_json::to_value(Milestone::Halfway).unwrap();
        assert_eq!(json, serde_json::json!("Halfway"));
    }
}
