//! # sitebook-core
//!
//! Core library for sitebook - portfolio analytics for construction and
//! real-estate projects.
//!
//! This library provides:
//! - Domain types for projects, workers, vendors, expenses, and assignments
//! - Storage backends (SQLite and a JSON document) behind [`SnapshotSource`]
//! - Analytics: the dashboard, project detail, financial overview, and worker analytics
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Every analytics request takes one [`Snapshot`] of the dataset and computes
//! its view from that snapshot alone. Views are never cached.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitebook_core::analytics::AnalyticsEngine;
//! use sitebook_core::{Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&config.storage.resolved_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let view = AnalyticsEngine::new(&db).financial_overview().expect("query failed");
//! println!("remaining: {}", view.overview.total_remaining);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::{Database, JsonStore};
pub use error::{Error, Result};
pub use snapshot::{Snapshot, SnapshotSource};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod snapshot;
pub mod types;
