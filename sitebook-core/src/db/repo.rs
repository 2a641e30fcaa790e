//! Database repository layer
//!
//! Provides query and insert operations for all entity types.

use crate::error::{Error, Result};
use crate::snapshot::{Snapshot, SnapshotSource};
use crate::types::*;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn();
        super::schema::run_migrations(&conn)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================
    // Project operations
    // ============================================

    /// Insert a project, returning its assigned id
    pub fn insert_project(&self, project: &Project) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO projects (name, location, units, status, budget, spent, progress_percent,
                                  start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                project.name,
                project.location,
                project.units,
                project.status.as_str(),
                project.budget,
                project.spent,
                project.progress_percent,
                project.start_date.map(|t| t.to_rfc3339()),
                project.end_date.map(|t| t.to_rfc3339()),
                project.created_at.unwrap_or_else(Utc::now).to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a project by ID
    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT * FROM projects WHERE id = ?",
            [id],
            Self::row_to_project,
        )
        .optional()
        .map_err(Error::from)
    }

    /// All projects in insertion order
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let conn = self.conn();
        Self::query_all(&conn, "SELECT * FROM projects ORDER BY id", Self::row_to_project)
    }

    fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
        let status: Option<String> = row.get("status")?;
        let start_date: Option<String> = row.get("start_date")?;
        let end_date: Option<String> = row.get("end_date")?;
        let created_at: Option<String> = row.get("created_at")?;

        Ok(Project {
            id: row.get("id")?,
            name: row.get("name")?,
            location: row.get("location")?,
            units: row.get("units")?,
            status: ProjectStatus::from(status),
            budget: row.get::<_, Option<f64>>("budget")?.unwrap_or(0.0),
            spent: row.get::<_, Option<f64>>("spent")?.unwrap_or(0.0),
            progress_percent: row.get::<_, Option<f64>>("progress_percent")?.unwrap_or(0.0),
            start_date: start_date.as_deref().and_then(parse_timestamp),
            end_date: end_date.as_deref().and_then(parse_timestamp),
            created_at: created_at.as_deref().and_then(parse_timestamp),
        })
    }

    fn project_exists(conn: &Connection, id: i64) -> Result<bool> {
        Ok(conn
            .query_row("SELECT 1 FROM projects WHERE id = ?", [id], |_| Ok(()))
            .optional()?
            .is_some())
    }

    // ============================================
    // Worker operations
    // ============================================

    /// Insert a worker, returning its assigned id
    pub fn insert_worker(&self, worker: &Worker) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO workers (name, role, hourly_rate, contact, total_paid, last_payment_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                worker.name,
                worker.role,
                worker.hourly_rate,
                worker.contact,
                worker.total_paid,
                worker.last_payment_date.map(|d| d.format(DATE_FORMAT).to_string()),
                worker.created_at.unwrap_or_else(Utc::now).to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a worker by ID
    pub fn get_worker(&self, id: i64) -> Result<Option<Worker>> {
        let conn = self.conn();
        conn.query_row("SELECT * FROM workers WHERE id = ?", [id], Self::row_to_worker)
            .optional()
            .map_err(Error::from)
    }

    /// All workers in insertion order
    pub fn list_workers(&self) -> Result<Vec<Worker>> {
        let conn = self.conn();
        Self::query_all(&conn, "SELECT * FROM workers ORDER BY id", Self::row_to_worker)
    }

    fn row_to_worker(row: &Row) -> rusqlite::Result<Worker> {
        let last_payment: Option<String> = row.get("last_payment_date")?;
        let created_at: Option<String> = row.get("created_at")?;

        Ok(Worker {
            id: row.get("id")?,
            name: row.get("name")?,
            role: row.get("role")?,
            hourly_rate: row.get::<_, Option<f64>>("hourly_rate")?.unwrap_or(0.0),
            contact: row.get("contact")?,
            total_paid: row.get::<_, Option<f64>>("total_paid")?.unwrap_or(0.0),
            last_payment_date: last_payment.as_deref().and_then(parse_date),
            created_at: created_at.as_deref().and_then(parse_timestamp),
        })
    }

    // ============================================
    // Vendor operations
    // ============================================

    /// Insert a vendor, returning its assigned id
    pub fn insert_vendor(&self, vendor: &Vendor) -> Result<i64> {
        let conn = self.conn();
        if let Some(project_id) = vendor.project_id {
            if !Self::project_exists(&conn, project_id)? {
                return Err(Error::ProjectNotFound(project_id));
            }
        }
        conn.execute(
            r#"
            INSERT INTO vendors (name, category, contact, rating, project_id, total_paid,
                                 last_payment_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                vendor.name,
                vendor.category,
                vendor.contact,
                vendor.rating,
                vendor.project_id,
                vendor.total_paid,
                vendor.last_payment_date.map(|d| d.format(DATE_FORMAT).to_string()),
                vendor.created_at.unwrap_or_else(Utc::now).to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a vendor by ID
    pub fn get_vendor(&self, id: i64) -> Result<Option<Vendor>> {
        let conn = self.conn();
        conn.query_row("SELECT * FROM vendors WHERE id = ?", [id], Self::row_to_vendor)
            .optional()
            .map_err(Error::from)
    }

    /// All vendors in insertion order
    pub fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let conn = self.conn();
        Self::query_all(&conn, "SELECT * FROM vendors ORDER BY id", Self::row_to_vendor)
    }

    fn row_to_vendor(row: &Row) -> rusqlite::Result<Vendor> {
        let last_payment: Option<String> = row.get("last_payment_date")?;
        let created_at: Option<String> = row.get("created_at")?;

        Ok(Vendor {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            contact: row.get("contact")?,
            rating: row.get::<_, Option<f64>>("rating")?.unwrap_or(0.0),
            project_id: row.get("project_id")?,
            total_paid: row.get::<_, Option<f64>>("total_paid")?.unwrap_or(0.0),
            last_payment_date: last_payment.as_deref().and_then(parse_date),
            created_at: created_at.as_deref().and_then(parse_timestamp),
        })
    }

    // ============================================
    // Expense operations
    // ============================================

    /// Insert an expense against an existing project, returning its id
    pub fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        let conn = self.conn();
        if !Self::project_exists(&conn, expense.project_id)? {
            return Err(Error::ProjectNotFound(expense.project_id));
        }
        conn.execute(
            r#"
            INSERT INTO expenses (project_id, category, amount, date, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                expense.project_id,
                expense.category,
                expense.amount,
                expense.date.map(|d| d.format(DATE_FORMAT).to_string()),
                expense.description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All expenses in insertion order
    pub fn list_expenses(&self) -> Result<Vec<Expense>> {
        let conn = self.conn();
        Self::query_all(&conn, "SELECT * FROM expenses ORDER BY id", Self::row_to_expense)
    }

    fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
        let date: Option<String> = row.get("date")?;

        Ok(Expense {
            id: row.get("id")?,
            project_id: row.get("project_id")?,
            category: row.get("category")?,
            amount: row.get::<_, Option<f64>>("amount")?.unwrap_or(0.0),
            date: date.as_deref().and_then(parse_date),
            description: row.get("description")?,
        })
    }

    // ============================================
    // Assignment operations
    // ============================================

    /// Assign a worker to a project, replacing the hours of an existing assignment
    pub fn assign_worker(&self, project_id: i64, worker_id: i64, hours_per_week: f64) -> Result<()> {
        let conn = self.conn();
        if !Self::project_exists(&conn, project_id)? {
            return Err(Error::ProjectNotFound(project_id));
        }
        if !Self::payee_exists(&conn, PayeeKind::Worker, worker_id)? {
            return Err(Error::WorkerNotFound(worker_id));
        }
        conn.execute(
            r#"
            INSERT INTO project_workers (project_id, worker_id, hours_per_week)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(project_id, worker_id) DO UPDATE SET
                hours_per_week = excluded.hours_per_week
            "#,
            params![project_id, worker_id, hours_per_week],
        )?;
        Ok(())
    }

    /// All assignments, ordered by project then worker
    pub fn list_assignments(&self) -> Result<Vec<ProjectWorker>> {
        let conn = self.conn();
        Self::query_all(
            &conn,
            "SELECT * FROM project_workers ORDER BY project_id, worker_id",
            Self::row_to_assignment,
        )
    }

    fn row_to_assignment(row: &Row) -> rusqlite::Result<ProjectWorker> {
        Ok(ProjectWorker {
            project_id: row.get("project_id")?,
            worker_id: row.get("worker_id")?,
            hours_per_week: row.get::<_, Option<f64>>("hours_per_week")?.unwrap_or(0.0),
        })
    }

    // ============================================
    // Payment ledger
    // ============================================

    /// Record a payment to a worker and bump their running totals
    pub fn record_worker_payment(
        &self,
        worker_id: i64,
        amount: f64,
        payment_date: NaiveDate,
        description: Option<&str>,
    ) -> Result<Payment> {
        self.record_payment(PayeeKind::Worker, worker_id, amount, payment_date, description)
    }

    /// Record a payment to a vendor and bump their running totals
    pub fn record_vendor_payment(
        &self,
        vendor_id: i64,
        amount: f64,
        payment_date: NaiveDate,
        description: Option<&str>,
    ) -> Result<Payment> {
        self.record_payment(PayeeKind::Vendor, vendor_id, amount, payment_date, description)
    }

    /// Payments made to a worker, newest payment date first
    pub fn list_worker_payments(&self, worker_id: i64) -> Result<Vec<Payment>> {
        self.list_payments(PayeeKind::Worker, worker_id)
    }

    /// Payments made to a vendor, newest payment date first
    pub fn list_vendor_payments(&self, vendor_id: i64) -> Result<Vec<Payment>> {
        self.list_payments(PayeeKind::Vendor, vendor_id)
    }

    fn record_payment(
        &self,
        payee: PayeeKind,
        payee_id: i64,
        amount: f64,
        payment_date: NaiveDate,
        description: Option<&str>,
    ) -> Result<Payment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }

        let (entity_table, payment_table, key_column) = ledger_tables(payee);
        let date = payment_date.format(DATE_FORMAT).to_string();
        let created_at = Utc::now();

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        if !Self::payee_exists(&tx, payee, payee_id)? {
            return Err(not_found(payee, payee_id));
        }

        tx.execute(
            &format!(
                "INSERT INTO {payment_table} ({key_column}, amount, payment_date, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ),
            params![payee_id, amount, date, description, created_at.to_rfc3339()],
        )?;
        let id = tx.last_insert_rowid();

        // last_payment_date only moves forward when back-dated payments arrive
        tx.execute(
            &format!(
                "UPDATE {entity_table} SET
                    total_paid = total_paid + ?1,
                    last_payment_date = CASE
                        WHEN last_payment_date IS NULL OR last_payment_date < ?2 THEN ?2
                        ELSE last_payment_date
                    END
                 WHERE id = ?3"
            ),
            params![amount, date, payee_id],
        )?;

        tx.commit()?;

        tracing::info!(payee = %payee, payee_id, amount, date = %date, "Recorded payment");

        Ok(Payment {
            id,
            payee,
            payee_id,
            amount,
            payment_date,
            description: description.map(str::to_string),
            created_at,
        })
    }

    fn list_payments(&self, payee: PayeeKind, payee_id: i64) -> Result<Vec<Payment>> {
        let (_, payment_table, key_column) = ledger_tables(payee);
        let conn = self.conn();

        if !Self::payee_exists(&conn, payee, payee_id)? {
            return Err(not_found(payee, payee_id));
        }

        let mut stmt = conn.prepare(&format!(
            "SELECT id, {key_column} AS payee_id, amount, payment_date, description, created_at
             FROM {payment_table}
             WHERE {key_column} = ?
             ORDER BY payment_date DESC, id DESC"
        ))?;
        let payments = stmt
            .query_map([payee_id], |row| Self::row_to_payment(row, payee))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(payments)
    }

    fn row_to_payment(row: &Row, payee: PayeeKind) -> rusqlite::Result<Payment> {
        let date: String = row.get("payment_date")?;
        let created_at: String = row.get("created_at")?;

        Ok(Payment {
            id: row.get("id")?,
            payee,
            payee_id: row.get("payee_id")?,
            amount: row.get("amount")?,
            payment_date: parse_date(&date).ok_or_else(|| bad_value("payment_date", &date))?,
            description: row.get("description")?,
            created_at: parse_timestamp(&created_at)
                .ok_or_else(|| bad_value("created_at", &created_at))?,
        })
    }

    fn payee_exists(conn: &Connection, payee: PayeeKind, id: i64) -> Result<bool> {
        let (entity_table, _, _) = ledger_tables(payee);
        Ok(conn
            .query_row(
                &format!("SELECT 1 FROM {entity_table} WHERE id = ?"),
                [id],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    // ============================================
    // Helpers
    // ============================================

    fn query_all<T>(
        conn: &Connection,
        sql: &str,
        map: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::from)
    }
}

/// (entity table, payment table, foreign key column) for a payee kind
fn ledger_tables(payee: PayeeKind) -> (&'static str, &'static str, &'static str) {
    match payee {
        PayeeKind::Worker => ("workers", "worker_payments", "worker_id"),
        PayeeKind::Vendor => ("vendors", "vendor_payments", "vendor_id"),
    }
}

/// Conversion error for a stored value that no longer parses
fn bad_value(column: &str, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        format!("unparseable {}: {:?}", column, value).into(),
    )
}

fn not_found(payee: PayeeKind, id: i64) -> Error {
    match payee {
        PayeeKind::Worker => Error::WorkerNotFound(id),
        PayeeKind::Vendor => Error::VendorNotFound(id),
    }
}

impl SnapshotSource for Database {
    /// Read every collection under one lock so the snapshot is consistent.
    fn snapshot(&self) -> Result<Snapshot> {
        let conn = self.conn();
        let load = || -> Result<Snapshot> {
            Ok(Snapshot {
                projects: Self::query_all(&conn, "SELECT * FROM projects ORDER BY id", Self::row_to_project)?,
                workers: Self::query_all(&conn, "SELECT * FROM workers ORDER BY id", Self::row_to_worker)?,
                vendors: Self::query_all(&conn, "SELECT * FROM vendors ORDER BY id", Self::row_to_vendor)?,
                expenses: Self::query_all(&conn, "SELECT * FROM expenses ORDER BY id", Self::row_to_expense)?,
                assignments: Self::query_all(
                    &conn,
                    "SELECT * FROM project_workers ORDER BY project_id, worker_id",
                    Self::row_to_assignment,
                )?,
            })
        };
        load().map_err(Error::unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_project() -> Project {
        Project {
            name: "Riverside Flats".to_string(),
            location: Some("Riverside".to_string()),
            units: Some(24),
            status: ProjectStatus::Active,
            budget: 500_000.0,
            spent: 125_000.0,
            progress_percent: 25.0,
            start_date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    fn create_test_worker(name: &str, rate: f64) -> Worker {
        Worker {
            name: name.to_string(),
            role: Some("Carpenter".to_string()),
            hourly_rate: rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_project_round_trip() {
        let db = test_db();
        let id = db.insert_project(&create_test_project()).unwrap();
        assert_eq!(id, 1);

        let project = db.get_project(id).unwrap().unwrap();
        assert_eq!(project.name, "Riverside Flats");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.units, Some(24));
        assert_eq!(project.budget, 500_000.0);
        assert_eq!(
            project.end_date,
            Some(Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap())
        );
        assert!(project.created_at.is_some());

        assert!(db.get_project(99).unwrap().is_none());
    }

    #[test]
    fn test_status_absent_reads_back_unknown() {
        let db = test_db();
        let id = db
            .insert_project(&Project {
                name: "Shed".to_string(),
                ..Default::default()
            })
            .unwrap();
        let project = db.get_project(id).unwrap().unwrap();
        assert_eq!(project.status, ProjectStatus::Unknown);
    }

    #[test]
    fn test_legacy_timestamp_formats() {
        let db = test_db();
        db.connection_for_tests()
            .execute(
                "INSERT INTO projects (name, start_date, created_at) VALUES ('Legacy', '2024-03-01', '2024-03-01 08:30:00')",
                [],
            )
            .unwrap();
        let project = db.list_projects().unwrap().remove(0);
        assert_eq!(
            project.start_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            project.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_assign_worker_upserts_hours() {
        let db = test_db();
        let project_id = db.insert_project(&create_test_project()).unwrap();
        let worker_id = db.insert_worker(&create_test_worker("Alice", 20.0)).unwrap();

        db.assign_worker(project_id, worker_id, 30.0).unwrap();
        db.assign_worker(project_id, worker_id, 45.0).unwrap();

        let assignments = db.list_assignments().unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].hours_per_week, 45.0);

        assert!(matches!(
            db.assign_worker(42, worker_id, 10.0),
            Err(Error::ProjectNotFound(42))
        ));
        assert!(matches!(
            db.assign_worker(project_id, 42, 10.0),
            Err(Error::WorkerNotFound(42))
        ));
    }

    #[test]
    fn test_expense_requires_project() {
        let db = test_db();
        let result = db.insert_expense(&Expense {
            project_id: 7,
            amount: 100.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::ProjectNotFound(7))));
    }

    #[test]
    fn test_record_worker_payment() {
        let db = test_db();
        let worker_id = db.insert_worker(&create_test_worker("Bob", 25.0)).unwrap();

        db.record_worker_payment(worker_id, 800.0, date("2024-05-10"), Some("week 19"))
            .unwrap();
        db.record_worker_payment(worker_id, 400.0, date("2024-05-17"), None)
            .unwrap();
        // Back-dated payment does not rewind the last payment date
        db.record_worker_payment(worker_id, 100.0, date("2024-05-01"), None)
            .unwrap();

        let worker = db.get_worker(worker_id).unwrap().unwrap();
        assert_eq!(worker.total_paid, 1300.0);
        assert_eq!(worker.last_payment_date, Some(date("2024-05-17")));

        let payments = db.list_worker_payments(worker_id).unwrap();
        let dates: Vec<_> = payments.iter().map(|p| p.payment_date).collect();
        assert_eq!(
            dates,
            vec![date("2024-05-17"), date("2024-05-10"), date("2024-05-01")]
        );
        assert_eq!(payments[1].description.as_deref(), Some("week 19"));
        assert!(payments.iter().all(|p| p.payee == PayeeKind::Worker));
    }

    #[test]
    fn test_record_vendor_payment() {
        let db = test_db();
        let vendor_id = db
            .insert_vendor(&Vendor {
                name: "Acme Concrete".to_string(),
                category: Some("Materials".to_string()),
                rating: 4.5,
                ..Default::default()
            })
            .unwrap();

        let payment = db
            .record_vendor_payment(vendor_id, 2500.0, date("2024-04-02"), None)
            .unwrap();
        assert_eq!(payment.payee, PayeeKind::Vendor);
        assert_eq!(payment.payee_id, vendor_id);

        let vendor = db.get_vendor(vendor_id).unwrap().unwrap();
        assert_eq!(vendor.total_paid, 2500.0);
        assert_eq!(vendor.last_payment_date, Some(date("2024-04-02")));
    }

    #[test]
    fn test_payment_validation() {
        let db = test_db();
        let worker_id = db.insert_worker(&create_test_worker("Cara", 30.0)).unwrap();

        assert!(matches!(
            db.record_worker_payment(worker_id, 0.0, date("2024-01-01"), None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            db.record_worker_payment(worker_id, -5.0, date("2024-01-01"), None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            db.record_worker_payment(99, 10.0, date("2024-01-01"), None),
            Err(Error::WorkerNotFound(99))
        ));
        assert!(matches!(
            db.record_vendor_payment(99, 10.0, date("2024-01-01"), None),
            Err(Error::VendorNotFound(99))
        ));
        assert!(matches!(
            db.list_vendor_payments(99),
            Err(Error::VendorNotFound(99))
        ));

        // Nothing was written by the rejected attempts
        let worker = db.get_worker(worker_id).unwrap().unwrap();
        assert_eq!(worker.total_paid, 0.0);
        assert!(db.list_worker_payments(worker_id).unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_collects_everything() {
        let db = test_db();
        let project_id = db.insert_project(&create_test_project()).unwrap();
        let alice = db.insert_worker(&create_test_worker("Alice", 20.0)).unwrap();
        let bob = db.insert_worker(&create_test_worker("Bob", 30.0)).unwrap();
        db.assign_worker(project_id, bob, 20.0).unwrap();
        db.assign_worker(project_id, alice, 40.0).unwrap();
        db.insert_vendor(&Vendor {
            name: "Acme".to_string(),
            project_id: Some(project_id),
            ..Default::default()
        })
        .unwrap();
        db.insert_expense(&Expense {
            project_id,
            category: Some("Materials".to_string()),
            amount: 1200.0,
            date: Some(date("2024-02-01")),
            ..Default::default()
        })
        .unwrap();

        let snapshot = db.snapshot().unwrap();
        assert_eq!(snapshot.projects.len(), 1);
        let names: Vec<_> = snapshot.workers.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(snapshot.vendors[0].project_id, Some(project_id));
        assert_eq!(snapshot.expenses[0].amount, 1200.0);
        assert_eq!(snapshot.assignments.len(), 2);
        assert_eq!(snapshot.assignments[0].worker_id, alice);
    }

    #[test]
    fn test_snapshot_without_schema_is_unavailable() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.snapshot(), Err(Error::DataUnavailable(_))));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        assert!(path.exists());
    }

    impl Database {
        fn connection_for_tests(&self) -> MutexGuard<'_, Connection> {
            self.conn()
        }
    }
}
