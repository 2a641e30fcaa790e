//! Storage layer for sitebook
//!
//! Two backends produce dataset snapshots:
//! - SQLite with schema migrations and a payment ledger
//! - A single JSON document

pub mod json_store;
pub mod repo;
pub mod schema;

pub use json_store::{Collection, JsonStore};
pub use repo::Database;
