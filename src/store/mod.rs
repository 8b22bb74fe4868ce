//! Persistence stores for saved queries and announcements.
//!
//! Statements here run against the application's bookkeeping tables
//! through the same [`Warehouse`](crate::exec::Warehouse) boundary as
//! search queries. All values travel as `?` binds.

mod announcements;
mod saved;

pub use announcements::{Announcement, AnnouncementPatch, AnnouncementStore};
pub use saved::{SavedQuery, SavedQueryStore};

use serde_json::Value;
use uuid::Uuid;

use crate::exec::Row;

/// Generate an object id: `<prefix>_` plus the first 12 hex characters
/// of a v4 UUID.
pub fn new_object_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..12])
}

/// Read a string cell; missing or non-string cells decode as empty.
pub(crate) fn get_str(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Read an optional string cell; SQL NULL decodes as `None`.
pub(crate) fn get_opt_str(row: &Row, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Read a boolean cell; drivers report booleans as bool or text.
pub(crate) fn get_bool(row: &Row, key: &str) -> bool {
    match row.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Read an integer cell; drivers report counts as numbers or text.
pub(crate) fn get_i64(row: &Row, key: &str) -> i64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
