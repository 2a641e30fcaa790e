//! sitebook - portfolio analytics for construction projects
//!
//! Runs the dashboard, project detail, financial, and worker queries against
//! the configured store and prints them as text or JSON. Also records worker
//! and vendor payments on the SQLite backend.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Data: $XDG_DATA_HOME/sitebook/data.db (~/.local/share/sitebook/data.db)
//! - Config: $XDG_CONFIG_HOME/sitebook/config.toml (~/.config/sitebook/config.toml)

mod render;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sitebook_core::analytics::AnalyticsEngine;
use sitebook_core::config::StorageBackend;
use sitebook_core::{Config, PayeeKind};

use crate::store::Store;

#[derive(Parser)]
#[command(name = "sitebook")]
#[command(about = "Portfolio analytics for construction projects")]
#[command(version)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Storage backend (overrides config)
    #[arg(long, global = true)]
    backend: Option<StorageBackend>,

    /// Path to the data file (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create the store (and seed a sample project for the JSON backend)
    Init,

    /// Show the portfolio dashboard
    Dashboard,

    /// Show the detail view for one project
    Project {
        /// Project ID
        id: i64,
    },

    /// Show the financial overview
    Financial,

    /// Show worker analytics
    Workers,

    /// Record a payment to a worker
    PayWorker(PaymentArgs),

    /// Record a payment to a vendor
    PayVendor(PaymentArgs),

    /// List payments made to a worker or vendor
    Payments {
        /// Payee kind: worker or vendor
        payee: PayeeKind,
        /// Worker or vendor ID
        id: i64,
    },
}

#[derive(clap::Args)]
struct PaymentArgs {
    /// Worker or vendor ID
    id: i64,

    /// Amount paid
    #[arg(short, long, allow_negative_numbers = true)]
    amount: f64,

    /// Payment date, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Free-form note
    #[arg(long)]
    description: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }
    if let Some(path) = args.store.clone() {
        config.storage.path = Some(path);
    }

    // Initialize logging
    let _log_guard =
        sitebook_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let store = Store::open(&config.storage)?;
    let now = Utc::now();

    match args.command {
        Command::Init => {
            let message = store.init(config.storage.resolved_path())?;
            println!("{}", message);
        }
        Command::Dashboard => {
            let dashboard = AnalyticsEngine::new(store.source())
                .dashboard(now)
                .context("failed to compile dashboard")?;
            emit(args.format, &dashboard, |d| render::print_dashboard(d, now))?;
        }
        Command::Project { id } => {
            let view = AnalyticsEngine::new(store.source())
                .project_detail(id, now)
                .with_context(|| format!("failed to load project {}", id))?;
            emit(args.format, &view, render::print_project_detail)?;
        }
        Command::Financial => {
            let view = AnalyticsEngine::new(store.source())
                .financial_overview()
                .context("failed to compute financial overview")?;
            emit(args.format, &view, render::print_financial)?;
        }
        Command::Workers => {
            let view = AnalyticsEngine::new(store.source())
                .worker_analytics()
                .context("failed to compute worker analytics")?;
            emit(args.format, &view, render::print_workers)?;
        }
        Command::PayWorker(payment) => {
            let db = store.database("pay-worker")?;
            let recorded = db
                .record_worker_payment(
                    payment.id,
                    payment.amount,
                    payment.date.unwrap_or_else(|| now.date_naive()),
                    payment.description.as_deref(),
                )
                .context("failed to record worker payment")?;
            emit(args.format, &recorded, render::print_payment)?;
        }
        Command::PayVendor(payment) => {
            let db = store.database("pay-vendor")?;
            let recorded = db
                .record_vendor_payment(
                    payment.id,
                    payment.amount,
                    payment.date.unwrap_or_else(|| now.date_naive()),
                    payment.description.as_deref(),
                )
                .context("failed to record vendor payment")?;
            emit(args.format, &recorded, render::print_payment)?;
        }
        Command::Payments { payee, id } => {
            let db = store.database("payments")?;
            let payments = match payee {
                PayeeKind::Worker => db.list_worker_payments(id),
                PayeeKind::Vendor => db.list_vendor_payments(id),
            }
            .with_context(|| format!("failed to list payments for {} {}", payee, id))?;
            emit(args.format, &payments, |p| render::print_payments(p))?;
        }
    }

    Ok(())
}

/// Print `value` as pretty JSON or through its text renderer.
fn emit<T: Serialize + ?Sized>(format: Format, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
            println!("{}", json);
        }
        Format::Text => text(value),
    }
    Ok(())
}
