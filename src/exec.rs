//! Execution guard: the only path through which statements reach the
//! warehouse session.
//!
//! Caller-supplied SQL is sanitized, a row limit is appended unless the
//! caller opted out, and a wrapped `COUNT(*)` probe classifies the
//! expected result size before the fetch. The probe is advisory: a probe
//! failure is recorded in the outcome and the fetch still runs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GuardSettings;
use crate::error::Error;

/// One result row: column name (uppercase, as the warehouse reports it)
/// to value.
pub type Row = serde_json::Map<String, Value>;

/// Errors from the warehouse session boundary.
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// The warehouse rejected or failed a statement.
    #[error("warehouse error: {message} (code: {code})")]
    Remote {
        /// Error code reported by the warehouse.
        code: String,
        /// Error message reported by the warehouse.
        message: String,
    },

    /// The session could not be reached.
    #[error("warehouse connection failed: {0}")]
    ConnectionFailed(String),

    /// A result row could not be decoded.
    #[error("failed to decode result row: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WarehouseError {
    /// Create a remote error from an error response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Blocking access to the warehouse session.
///
/// `query` returns rows; `execute` is for statements without a result
/// set (DDL, persistence writes) and takes positional `?` binds.
pub trait Warehouse {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, WarehouseError>;

    fn execute(&mut self, sql: &str, binds: &[Value]) -> Result<(), WarehouseError>;
}

static LIMIT_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\blimit\b").unwrap());

/// Strip surrounding whitespace and any trailing semicolons, including
/// whitespace-interleaved runs like `"; ;"`.
///
/// Idempotent; safe to call on already-sanitized text.
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace())
        .to_string()
}

/// True if the statement already contains a `LIMIT` keyword.
pub fn has_limit(sql: &str) -> bool {
    LIMIT_KEYWORD.is_match(sql)
}

/// Sanitize a statement and append a row limit when needed.
///
/// The limit is only appended when `all_rows` is false and the statement
/// does not already carry a `LIMIT` keyword (matched case-insensitively,
/// on word boundaries).
pub fn prepare(raw: &str, all_rows: bool, limit_rows: u32) -> String {
    let sql = sanitize(raw);
    if all_rows || has_limit(&sql) {
        return sql;
    }
    format!("{} LIMIT {}", sql, limit_rows)
}

/// Classification of the probe count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEstimate {
    /// The query matches no rows.
    Empty,
    /// The query matches a manageable number of rows.
    Normal(u64),
    /// The count exceeds the configured threshold; the UI should warn
    /// before fetching everything.
    Large(u64),
}

impl RowEstimate {
    fn classify(count: u64, threshold: u64) -> Self {
        if count == 0 {
            RowEstimate::Empty
        } else if count > threshold {
            RowEstimate::Large(count)
        } else {
            RowEstimate::Normal(count)
        }
    }
}

/// Result of a guarded execution.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// The statement that was actually sent to the warehouse.
    pub sql: String,
    /// Probe classification, when the probe succeeded.
    pub estimate: Option<RowEstimate>,
    /// Probe failure message, when it did not.
    pub probe_error: Option<String>,
    /// Fetched rows.
    pub rows: Vec<Row>,
}

/// The execution guard.
#[derive(Debug, Clone)]
pub struct Guard {
    settings: GuardSettings,
}

impl Default for Guard {
    fn default() -> Self {
        Self::new(GuardSettings::default())
    }
}

impl Guard {
    pub fn new(settings: GuardSettings) -> Self {
        Self { settings }
    }

    /// Count the rows a statement would produce.
    ///
    /// Wraps the sanitized statement in `SELECT COUNT(*) FROM (...)` and
    /// reads the single value back.
    pub fn probe(&self, warehouse: &mut dyn Warehouse, sql: &str) -> Result<u64, Error> {
        let probe_sql = format!("SELECT COUNT(*) FROM ({})", sql);
        debug!(sql = %probe_sql, "running row-count probe");
        let rows = warehouse.query(&probe_sql).map_err(|e| Error::Probe {
            message: e.to_string(),
            sql: probe_sql.clone(),
        })?;
        let count = rows
            .first()
            .and_then(|row| row.values().next())
            .and_then(count_value)
            .ok_or_else(|| Error::Probe {
                message: "probe returned no count".to_string(),
                sql: probe_sql,
            })?;
        Ok(count)
    }

    /// Sanitize, probe, limit, and fetch.
    ///
    /// The probe runs against the pre-limit statement so the estimate
    /// reflects the full result. A probe failure is recorded in the
    /// outcome and the fetch proceeds; a fetch failure is an error.
    pub fn run(
        &self,
        warehouse: &mut dyn Warehouse,
        raw: &str,
        all_rows: bool,
    ) -> Result<ExecutionOutcome, Error> {
        let sanitized = sanitize(raw);

        let (estimate, probe_error) = match self.probe(warehouse, &sanitized) {
            Ok(count) => (
                Some(RowEstimate::classify(
                    count,
                    self.settings.large_result_threshold,
                )),
                None,
            ),
            Err(e) => {
                warn!(error = %e, "row-count probe failed, fetching anyway");
                (None, Some(e.to_string()))
            }
        };

        let sql = prepare(&sanitized, all_rows, self.settings.default_limit_rows);
        debug!(sql = %sql, "executing query");
        let rows = warehouse.query(&sql).map_err(|e| Error::Execution {
            message: e.to_string(),
            sql: sql.clone(),
        })?;

        Ok(ExecutionOutcome {
            sql,
            estimate,
            probe_error,
            rows,
        })
    }
}

/// Extract a count from the probe cell; warehouses report counts as
/// numbers or numeric strings depending on the driver.
fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
