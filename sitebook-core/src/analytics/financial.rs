//! Financial health analytics.
//!
//! [`FinancialStats`] is the dashboard panel derived from the project and
//! worker roll-ups. [`FinancialAnalytics`] is the standalone financial
//! overview with budget distribution, expense breakdown, and per-project
//! cost efficiency.

use std::collections::BTreeMap;

use serde::Serialize;

use super::metrics::{group_sum, percentage, sum};
use super::project::{efficiency, ProjectStats};
use super::worker::{WorkerStats, HOURS_PER_MONTH};
use crate::types::{Expense, Project, Worker};

/// Portfolio-level financial signals for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStats {
    /// Total spent as a percentage of total budget
    pub budget_utilization: f64,
    /// Every worker billed a full-time month
    pub estimated_monthly_labor: f64,
    /// Total budget minus total spent; negative when the portfolio is over
    pub budget_remaining: f64,
    pub projects_over_budget: i64,
}

impl FinancialStats {
    pub fn compute(projects: &ProjectStats, workers: &WorkerStats, raw: &[Project]) -> Self {
        Self {
            budget_utilization: percentage(projects.total_spent, projects.total_budget),
            estimated_monthly_labor: workers.total_hourly_rate * HOURS_PER_MONTH,
            budget_remaining: projects.total_budget - projects.total_spent,
            projects_over_budget: raw.iter().filter(|p| p.is_over_budget()).count() as i64,
        }
    }
}

/// Standalone financial overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalytics {
    pub overview: FinancialOverview,
    /// Budget summed per project status
    pub budget_distribution: BTreeMap<String, f64>,
    /// Expense amount summed per category
    pub expense_breakdown: BTreeMap<String, f64>,
    pub cost_efficiency: Vec<CostEfficiency>,
    pub alerts: Vec<BudgetAlert>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub total_budget: f64,
    pub total_spent: f64,
    pub total_remaining: f64,
    pub monthly_labor_cost: f64,
    pub total_expenses: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEfficiency {
    pub project_id: i64,
    pub name: String,
    pub budget: f64,
    pub spent: f64,
    pub progress: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
}

/// A project that has spent past its budget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub project_id: i64,
    pub project: String,
    /// Amount spent beyond the budget
    pub over_budget: f64,
    pub severity: Severity,
}

impl FinancialAnalytics {
    pub fn compute(projects: &[Project], workers: &[Worker], expenses: &[Expense]) -> Self {
        let total_budget = sum(projects, |p| p.budget);
        let total_spent = sum(projects, |p| p.spent);

        let overview = FinancialOverview {
            total_budget,
            total_spent,
            total_remaining: sum(projects, |p| p.budget - p.spent),
            monthly_labor_cost: sum(workers, |w| w.hourly_rate * HOURS_PER_MONTH),
            total_expenses: sum(expenses, |e| e.amount),
        };

        let cost_efficiency = projects
            .iter()
            .map(|p| CostEfficiency {
                project_id: p.id,
                name: p.name.clone(),
                budget: p.budget,
                spent: p.spent,
                progress: p.progress_percent,
                efficiency: efficiency(p),
            })
            .collect();

        let alerts = projects
            .iter()
            .filter(|p| p.is_over_budget())
            .map(|p| BudgetAlert {
                project_id: p.id,
                project: p.name.clone(),
                over_budget: p.spent - p.budget,
                severity: Severity::High,
            })
            .collect();

        Self {
            overview,
            budget_distribution: group_sum(projects, |p| p.status.as_str(), |p| p.budget),
            expense_breakdown: group_sum(expenses, |e| e.category.as_deref(), |e| e.amount),
            cost_efficiency,
            alerts,
        }
    }
}
