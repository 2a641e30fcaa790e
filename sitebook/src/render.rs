//! Plain-text rendering of analytics views.

use chrono::{DateTime, Utc};
use sitebook_core::analytics::{
    DashboardSnapshot, FinancialAnalytics, ProjectDetailView, Utilization, WorkerAnalytics,
};
use sitebook_core::format::{format_currency, format_number, format_relative_time_opt};
use sitebook_core::Payment;
use std::collections::BTreeMap;

pub fn print_dashboard(dashboard: &DashboardSnapshot, now: DateTime<Utc>) {
    let summary = &dashboard.summary;
    println!("Portfolio Dashboard");
    println!("===================");
    println!("Projects:            {}", summary.total_projects);
    println!("Workers:             {}", summary.total_workers);
    println!("Vendors:             {}", summary.total_vendors);
    println!("Overall budget:      {}", format_currency(summary.overall_budget));
    println!("Budget utilization:  {}%", format_number(summary.budget_utilization));
    println!(
        "Budget remaining:    {}",
        format_currency(dashboard.financial.budget_remaining)
    );
    println!(
        "Monthly labor (est): {}",
        format_currency(dashboard.financial.estimated_monthly_labor)
    );

    println!();
    println!("Projects by status:");
    print_counts(&dashboard.projects.by_status);
    println!(
        "  average progress {}%, average budget {}",
        format_number(dashboard.projects.average_progress),
        format_currency(dashboard.projects.average_budget)
    );

    println!();
    println!("Workers by role:");
    print_counts(&dashboard.workers.by_role);
    println!(
        "  average rate {}/h",
        format_currency(dashboard.workers.average_hourly_rate)
    );

    println!();
    println!("Vendors by category:");
    print_counts(&dashboard.vendors.by_category);
    println!(
        "  average rating {}, top rated {}",
        format_number(dashboard.vendors.average_rating),
        dashboard.vendors.top_rated
    );

    let perf = &dashboard.performance;
    println!();
    println!("Schedule:");
    println!("  on time        {}", perf.on_time_projects);
    println!("  delayed        {}", perf.delayed_projects);
    println!("  high progress  {}", perf.high_progress_projects);
    println!("  low progress   {}", perf.low_progress_projects);

    println!();
    println!("Recent activity:");
    if dashboard.recent_activities.is_empty() {
        println!("  (none)");
    }
    for item in &dashboard.recent_activities {
        println!(
            "  {:>8}  [{}] {}",
            format_relative_time_opt(item.timestamp, now),
            item.kind.as_str(),
            item.description
        );
    }

    let alerts = dashboard.alerts.active();
    if !alerts.is_empty() {
        println!();
        println!("Alerts:");
        for alert in alerts {
            println!("  ! {}", alert);
        }
    }
}

pub fn print_project_detail(view: &ProjectDetailView) {
    let budget = &view.project;
    let project = &budget.project;

    println!("{} (#{})", project.name, project.id);
    println!("{}", "=".repeat(project.name.len() + 4 + project.id.to_string().len()));
    println!("Status:          {}", project.status);
    if let Some(location) = &project.location {
        println!("Location:        {}", location);
    }
    println!("Budget:          {}", format_currency(project.budget));
    println!("Spent:           {}", format_currency(project.spent));
    println!("Remaining:       {}", format_currency(budget.budget_remaining));
    println!("Utilization:     {}%", format_number(budget.budget_utilization));
    match budget.days_remaining {
        Some(days) if days < 0 => println!("Deadline:        {} days overdue", -days),
        Some(days) => println!("Deadline:        {} days left", days),
        None => println!("Deadline:        -"),
    }

    let progress = &view.progress;
    println!();
    println!(
        "Progress:        {}% ({})",
        format_number(project.progress_percent),
        progress.milestone
    );
    println!("Efficiency:      {}", format_number(progress.efficiency));
    println!(
        "On track:        {}",
        if progress.on_track { "yes" } else { "no" }
    );

    let resources = &view.resources;
    println!();
    println!(
        "Team ({} workers, {} vendors):",
        resources.total_workers, resources.total_vendors
    );
    for assigned in &resources.assigned_workers {
        println!(
            "  {:<20} {:<14} {:>5} h/wk  {}/h",
            assigned.worker.name,
            assigned.worker.role.as_deref().unwrap_or("-"),
            format_number(assigned.hours_assigned),
            format_currency(assigned.worker.hourly_rate)
        );
    }

    let financial = &view.financial;
    println!();
    println!("Labor cost/month: {}", format_currency(financial.labor_cost));
    println!("Expenses:         {}", format_currency(financial.total_expenses));
    print_amounts(&financial.expense_breakdown);
}

pub fn print_financial(view: &FinancialAnalytics) {
    let overview = &view.overview;
    println!("Financial Overview");
    println!("==================");
    println!("Total budget:     {}", format_currency(overview.total_budget));
    println!("Total spent:      {}", format_currency(overview.total_spent));
    println!("Total remaining:  {}", format_currency(overview.total_remaining));
    println!("Monthly labor:    {}", format_currency(overview.monthly_labor_cost));
    println!("Total expenses:   {}", format_currency(overview.total_expenses));

    println!();
    println!("Budget by status:");
    print_amounts(&view.budget_distribution);

    println!();
    println!("Expenses by category:");
    print_amounts(&view.expense_breakdown);

    println!();
    println!("Cost efficiency:");
    for row in &view.cost_efficiency {
        println!(
            "  {:<28} {:>12} of {:>12}  {:>5}%  efficiency {}",
            row.name,
            format_currency(row.spent),
            format_currency(row.budget),
            format_number(row.progress),
            format_number(row.efficiency)
        );
    }

    if !view.alerts.is_empty() {
        println!();
        println!("Over budget:");
        for alert in &view.alerts {
            println!(
                "  ! {} by {}",
                alert.project,
                format_currency(alert.over_budget)
            );
        }
    }
}

pub fn print_workers(view: &WorkerAnalytics) {
    let summary = &view.summary;
    println!("Worker Analytics");
    println!("================");
    println!("Workers:            {}", summary.total_workers);
    println!("Roles:              {}", summary.total_roles);
    println!("Average rate:       {}/h", format_currency(summary.average_rate));
    println!(
        "Monthly cost (est): {}",
        format_currency(summary.total_monthly_cost)
    );
    println!(
        "Utilization:        {} fully, {} under",
        view.utilization.fully_utilized, view.utilization.under_utilized
    );

    println!();
    println!("By role:");
    for (role, group) in &view.by_role {
        println!(
            "  {} ({}, {}/h combined)",
            role,
            group.count,
            format_currency(group.total_rate)
        );
        for member in &group.workers {
            println!(
                "    {:<20} {}/h  {}",
                member.name,
                format_currency(member.rate),
                member.contact.as_deref().unwrap_or("")
            );
        }
    }

    println!();
    println!("Assignments:");
    for stats in &view.assignment_stats {
        let label = match stats.utilization {
            Some(Utilization::FullyUtilized) => "fully utilized",
            Some(Utilization::UnderUtilized) => "under-utilized",
            None => "",
        };
        println!(
            "  #{:<4} {:<20} {} projects  {:>5} h/wk  {:>10}/mo  {}",
            stats.worker_id,
            stats.name,
            stats.total_projects,
            format_number(stats.total_weekly_hours),
            format_currency(stats.monthly_cost),
            label
        );
    }
}

pub fn print_payment(payment: &Payment) {
    println!(
        "Recorded payment #{} of {} to {} #{} on {}",
        payment.id,
        format_currency(payment.amount),
        payment.payee,
        payment.payee_id,
        payment.payment_date
    );
}

pub fn print_payments(payments: &[Payment]) {
    if payments.is_empty() {
        println!("No payments recorded.");
        return;
    }
    let total: f64 = payments.iter().map(|p| p.amount).sum();
    for payment in payments {
        println!(
            "  {}  {:>12}  {}",
            payment.payment_date,
            format_currency(payment.amount),
            payment.description.as_deref().unwrap_or("")
        );
    }
    println!("  {} payments, {} total", payments.len(), format_currency(total));
}

fn print_counts(counts: &BTreeMap<String, i64>) {
    if counts.is_empty() {
        println!("  (none)");
    }
    for (key, count) in counts {
        println!("  {:<20} {}", key, count);
    }
}

fn print_amounts(amounts: &BTreeMap<String, f64>) {
    if amounts.is_empty() {
        println!("  (none)");
    }
    for (key, amount) in amounts {
        println!("  {:<20} {}", key, format_currency(*amount));
    }
}
