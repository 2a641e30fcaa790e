//! Core domain types for sitebook
//!
//! These types are the canonical records that the persistence layer hands to
//! the analytics engine. They are read-only inputs to every analyzer.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Project** | A construction project with a budget and a completion percentage |
//! | **Worker** | A person paid by the hour who can be assigned to projects |
//! | **Vendor** | A supplier or subcontractor, rated 1–5 |
//! | **Expense** | A charge booked against one project |
//! | **Assignment** | A worker's weekly hours on one project ([`ProjectWorker`]) |
//! | **Payment** | A ledger entry paying a worker or vendor |
//!
//! ## Normalization
//!
//! Records arrive from SQLite rows or from a hand-edited JSON file, so every
//! field deserializes leniently: missing values take their defaults, numbers
//! may arrive as strings (`"500000.00"`), and dates may be full timestamps or
//! bare `YYYY-MM-DD` days. Values that cannot be understood degrade to the
//! default instead of failing the whole document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================
// Project
// ============================================

/// Lifecycle state of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
    /// A status string this version does not recognize
    Other(String),
    /// No status recorded
    #[default]
    Unknown,
}

impl ProjectStatus {
    /// Returns the display/storage form, or `None` for [`ProjectStatus::Unknown`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ProjectStatus::Planning => Some("Planning"),
            ProjectStatus::Active => Some("Active"),
            ProjectStatus::OnHold => Some("On Hold"),
            ProjectStatus::Completed => Some("Completed"),
            ProjectStatus::Cancelled => Some("Cancelled"),
            ProjectStatus::Other(s) => Some(s.as_str()),
            ProjectStatus::Unknown => None,
        }
    }

    /// Parse a stored status string. Never fails.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let normalized: String = trimmed
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "" => ProjectStatus::Unknown,
            "planning" => ProjectStatus::Planning,
            "active" => ProjectStatus::Active,
            "onhold" => ProjectStatus::OnHold,
            "completed" => ProjectStatus::Completed,
            "cancelled" | "canceled" => ProjectStatus::Cancelled,
            _ => ProjectStatus::Other(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().unwrap_or("unknown"))
    }
}

impl From<Option<String>> for ProjectStatus {
    fn from(value: Option<String>) -> Self {
        value
            .as_deref()
            .map(ProjectStatus::parse)
            .unwrap_or_default()
    }
}

impl Serialize for ProjectStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProjectStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ProjectStatus::from(lenient::text(deserializer)?))
    }
}

/// A construction project.
///
/// `spent` may exceed `budget`; that is an over-budget state, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub units: Option<i64>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "lenient::number")]
    pub budget: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spent: f64,
    /// Completion percentage, 0–100
    #[serde(default, deserialize_with = "lenient::number")]
    pub progress_percent: f64,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Whether spending has passed the budget.
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}

// ============================================
// People and suppliers
// ============================================

/// An hourly worker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Worker {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub hourly_rate: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_paid: f64,
    #[serde(default, deserialize_with = "lenient::date")]
    pub last_payment_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A supplier or subcontractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact: Option<String>,
    /// Rating, 1–5
    #[serde(default, deserialize_with = "lenient::number")]
    pub rating: f64,
    /// Project this vendor is attached to, if any
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_paid: f64,
    #[serde(default, deserialize_with = "lenient::date")]
    pub last_payment_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================
// Costs and assignments
// ============================================

/// A charge booked against a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::id")]
    pub project_id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

/// A worker's weekly commitment to one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectWorker {
    #[serde(default, deserialize_with = "lenient::id")]
    pub project_id: i64,
    #[serde(default, deserialize_with = "lenient::id")]
    pub worker_id: i64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub hours_per_week: f64,
}

// ============================================
// Payment ledger
// ============================================

/// Who a payment was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayeeKind {
    Worker,
    Vendor,
}

impl PayeeKind {
    /// Returns the identifier used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PayeeKind::Worker => "worker",
            PayeeKind::Vendor => "vendor",
        }
    }
}

impl std::fmt::Display for PayeeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PayeeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "worker" => Ok(PayeeKind::Worker),
            "vendor" => Ok(PayeeKind::Vendor),
            _ => Err(format!("unknown payee kind: {}", s)),
        }
    }
}

/// A recorded payment to a worker or vendor.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub payee: PayeeKind,
    pub payee_id: i64,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================
// Timestamp parsing
// ============================================

/// Parse a stored timestamp in any of the formats the data files use.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (naive values are taken as UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a stored calendar date; timestamps are truncated to their UTC day.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|dt| dt.date_naive()))
}

/// Field-level deserializers that never reject a present-but-odd value.
mod lenient {
    use super::{parse_date, parse_timestamp};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number_from(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        let value = Option::<Value>::deserialize(de)?;
        Ok(match value {
            None | Some(Value::Null) => 0.0,
            Some(v) => number_from(&v).unwrap_or_else(|| {
                tracing::debug!(value = %v, "non-numeric value normalized to 0");
                0.0
            }),
        })
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<Value>::deserialize(de)?;
        Ok(value.as_ref().and_then(number_from).map(|n| n as i64))
    }

    pub fn id<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
        Ok(optional_id(de)?.unwrap_or(0))
    }

    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(de)?;
        Ok(match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        })
    }

    pub fn name<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(text(de)?.unwrap_or_default())
    }

    pub fn datetime<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<Value>::deserialize(de)?;
        Ok(match value {
            Some(Value::String(s)) => {
                let parsed = parse_timestamp(&s);
                if parsed.is_none() && !s.trim().is_empty() {
                    tracing::debug!(value = %s, "unparseable timestamp dropped");
                }
                parsed
            }
            // Epoch milliseconds
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        })
    }

    pub fn date<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = Option::<Value>::deserialize(de)?;
        Ok(match value {
            Some(Value::String(s)) => parse_date(&s),
            _ => None,
        })
    }
}
