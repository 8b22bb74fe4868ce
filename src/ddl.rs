//! Work-table and scheduling DDL.
//!
//! Search results can be materialized as `WORK_` tables and refreshed on
//! a cron schedule through warehouse tasks. Table names entered by users
//! are sanitized to `[A-Z0-9_]` before they reach a statement.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sql::{quote_ident, quote_literal};

static INVALID_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Z0-9_]").unwrap());

/// Prefix of all materialized work tables.
pub const WORK_TABLE_PREFIX: &str = "WORK_";

/// Sanitize a user-entered work-table name.
///
/// Uppercases, replaces everything outside `[A-Z0-9_]` with `_`, and
/// ensures the `WORK_` prefix.
pub fn work_table_name(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let cleaned = INVALID_NAME_CHARS.replace_all(&upper, "_");
    if cleaned.starts_with(WORK_TABLE_PREFIX) {
        cleaned.into_owned()
    } else {
        format!("{}{}", WORK_TABLE_PREFIX, cleaned)
    }
}

/// `CREATE OR REPLACE TABLE <name> AS (<query>)`.
///
/// `table` is a sanitized work-table name; `query` is a composed or
/// guarded statement.
pub fn create_table_as(table: &str, query: &str) -> String {
    format!(
        "CREATE OR REPLACE TABLE {} AS (\n{}\n)",
        quote_ident(table),
        query
    )
}

/// `CREATE OR REPLACE TABLE` from described columns.
///
/// Column names are quoted; declared types are emitted verbatim.
pub fn create_table(table: &str, columns: &[(String, String)]) -> String {
    let body = columns
        .iter()
        .map(|(name, declared_type)| format!("  {} {}", quote_ident(name), declared_type))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "CREATE OR REPLACE TABLE {} (\n{}\n)",
        quote_ident(table),
        body
    )
}

/// `CREATE OR REPLACE TASK` that refreshes a work table on a cron
/// schedule.
///
/// The schedule string is a quoted literal (`USING CRON <expr> <tz>`);
/// the refresh statement itself is the task body and needs no escaping.
pub fn create_refresh_task(
    task: &str,
    warehouse: &str,
    cron: &str,
    timezone: &str,
    table: &str,
    query: &str,
) -> String {
    let schedule = format!("USING CRON {} {}", cron, timezone);
    format!(
        "CREATE OR REPLACE TASK {}\n  WAREHOUSE = {}\n  SCHEDULE = {}\nAS\n{}",
        quote_ident(task),
        quote_ident(warehouse),
        quote_literal(&schedule),
        create_table_as(table, query)
    )
}

/// Task state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Resume,
    Suspend,
}

/// `ALTER TASK <name> RESUME|SUSPEND`.
pub fn alter_task(task: &str, state: TaskState) -> String {
    let verb = match state {
        TaskState::Resume => "RESUME",
        TaskState::Suspend => "SUSPEND",
    };
    format!("ALTER TASK {} {}", quote_ident(task), verb)
}
