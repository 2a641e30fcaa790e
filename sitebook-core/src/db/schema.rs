//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: core entities
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL,
        location         TEXT,
        units            INTEGER,
        status           TEXT,
        budget           REAL NOT NULL DEFAULT 0,
        spent            REAL NOT NULL DEFAULT 0,
        progress_percent REAL NOT NULL DEFAULT 0,
        start_date       DATETIME,
        end_date         DATETIME,
        created_at       DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS workers (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL,
        role             TEXT,
        hourly_rate      REAL NOT NULL DEFAULT 0,
        contact          TEXT,
        total_paid       REAL NOT NULL DEFAULT 0,
        created_at       DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS vendors (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        name             TEXT NOT NULL,
        category         TEXT,
        contact          TEXT,
        rating           REAL NOT NULL DEFAULT 0,
        project_id       INTEGER REFERENCES projects(id) ON DELETE SET NULL,
        total_paid       REAL NOT NULL DEFAULT 0,
        created_at       DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS expenses (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id       INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        category         TEXT,
        amount           REAL NOT NULL DEFAULT 0,
        date             DATE,
        description      TEXT
    );

    CREATE TABLE IF NOT EXISTS project_workers (
        project_id       INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        worker_id        INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
        hours_per_week   REAL NOT NULL DEFAULT 0,
        PRIMARY KEY (project_id, worker_id)
    );

    CREATE INDEX IF NOT EXISTS idx_expenses_project ON expenses(project_id);
    CREATE INDEX IF NOT EXISTS idx_project_workers_worker ON project_workers(worker_id);
    CREATE INDEX IF NOT EXISTS idx_vendors_project ON vendors(project_id);
    "#,
    // Version 2: payment ledger
    r#"
    ALTER TABLE workers ADD COLUMN last_payment_date DATE;
    ALTER TABLE vendors ADD COLUMN last_payment_date DATE;

    CREATE TABLE IF NOT EXISTS worker_payments (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        worker_id        INTEGER NOT NULL REFERENCES workers(id) ON DELETE CASCADE,
        amount           REAL NOT NULL,
        payment_date     DATE NOT NULL,
        description      TEXT,
        created_at       DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS vendor_payments (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        vendor_id        INTEGER NOT NULL REFERENCES vendors(id) ON DELETE CASCADE,
        amount           REAL NOT NULL,
        payment_date     DATE NOT NULL,
        description      TEXT,
        created_at       DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_worker_payments_worker ON worker_payments(worker_id, payment_date);
    CREATE INDEX IF NOT EXISTS idx_vendor_payments_vendor ON vendor_payments(vendor_id, payment_date);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute_batch(&format!("PRAGMA user_version = {}", version))?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}
