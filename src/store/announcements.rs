//! Announcements feed.
//!
//! Operators post announcements shown on the landing page. Updates are
//! partial: only the fields present in the patch are written, and
//! `UPDATED_AT` is touched on every write.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{get_bool, get_i64, get_opt_str, get_str, new_object_id};
use crate::error::Error;
use crate::exec::{Row, Warehouse};

const TABLE: &str = "ANNOUNCEMENTS";

/// One announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Higher sorts first.
    pub priority: i64,
    pub visible: bool,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Announcement {
    fn from_row(row: &Row) -> Self {
        Self {
            id: get_str(row, "ID"),
            title: get_str(row, "TITLE"),
            body: get_str(row, "BODY"),
            priority: get_i64(row, "PRIORITY"),
            visible: get_bool(row, "SHOW_FLAG"),
            starts_at: get_opt_str(row, "STARTS_AT"),
            ends_at: get_opt_str(row, "ENDS_AT"),
            created_at: get_str(row, "CREATED_AT"),
            updated_at: get_opt_str(row, "UPDATED_AT"),
        }
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub priority: Option<i64>,
    pub visible: Option<bool>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
}

impl AnnouncementPatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.priority.is_none()
            && self.visible.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
    }

    /// SET fragments and binds, in column order.
    fn assignments(&self) -> (Vec<&'static str>, Vec<Value>) {
        let mut sets = Vec::new();
        let mut binds = Vec::new();
        if let Some(v) = &self.title {
            sets.push("TITLE = ?");
            binds.push(json!(v));
        }
        if let Some(v) = &self.body {
            sets.push("BODY = ?");
            binds.push(json!(v));
        }
        if let Some(v) = self.priority {
            sets.push("PRIORITY = ?");
            binds.push(json!(v));
        }
        if let Some(v) = self.visible {
            sets.push("SHOW_FLAG = ?");
            binds.push(json!(v));
        }
        if let Some(v) = &self.starts_at {
            sets.push("STARTS_AT = ?");
            binds.push(json!(v));
        }
        if let Some(v) = &self.ends_at {
            sets.push("ENDS_AT = ?");
            binds.push(json!(v));
        }
        (sets, binds)
    }
}

/// Store over the announcements table.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementStore;

impl AnnouncementStore {
    pub fn new() -> Self {
        Self
    }

    /// Post a new announcement and return its generated id.
    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &self,
        warehouse: &mut dyn Warehouse,
        title: &str,
        body: &str,
        priority: i64,
        visible: bool,
        starts_at: Option<&str>,
        ends_at: Option<&str>,
    ) -> Result<String, Error> {
        let id = new_object_id("ann");
        let stmt = format!(
            "INSERT INTO {} (ID, TITLE, BODY, PRIORITY, SHOW_FLAG, STARTS_AT, ENDS_AT, CREATED_AT) \
             VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP())",
            TABLE
        );
        debug!(id = %id, "posting announcement");
        warehouse.execute(
            &stmt,
            &[
                json!(id.clone()),
                json!(title),
                json!(body),
                json!(priority),
                json!(visible),
                starts_at.map(|v| json!(v)).unwrap_or(Value::Null),
                ends_at.map(|v| json!(v)).unwrap_or(Value::Null),
            ],
        )?;
        Ok(id)
    }

    /// Apply a partial update. An empty patch is a no-op.
    pub fn update(
        &self,
        warehouse: &mut dyn Warehouse,
        id: &str,
        patch: &AnnouncementPatch,
    ) -> Result<(), Error> {
        if patch.is_empty() {
            return Ok(());
        }
        let (sets, mut binds) = patch.assignments();
        let stmt = format!(
            "UPDATE {} SET {}, UPDATED_AT = CURRENT_TIMESTAMP() WHERE ID = ?",
            TABLE,
            sets.join(", ")
        );
        binds.push(json!(id));
        warehouse.execute(&stmt, &binds)?;
        Ok(())
    }

    /// Toggle visibility.
    pub fn set_visible(
        &self,
        warehouse: &mut dyn Warehouse,
        id: &str,
        visible: bool,
    ) -> Result<(), Error> {
        let stmt = format!(
            "UPDATE {} SET SHOW_FLAG = ?, UPDATED_AT = CURRENT_TIMESTAMP() WHERE ID = ?",
            TABLE
        );
        warehouse.execute(&stmt, &[json!(visible), json!(id)])?;
        Ok(())
    }

    /// Delete an announcement.
    pub fn delete(&self, warehouse: &mut dyn Warehouse, id: &str) -> Result<(), Error> {
        let stmt = format!("DELETE FROM {} WHERE ID = ?", TABLE);
        debug!(id = %id, "deleting announcement");
        warehouse.execute(&stmt, &[json!(id)])?;
        Ok(())
    }

    /// List every announcement, highest priority first, newest within a
    /// priority.
    pub fn list(&self, warehouse: &mut dyn Warehouse) -> Result<Vec<Announcement>, Error> {
        let stmt = format!(
            "SELECT * FROM {} ORDER BY PRIORITY DESC, CREATED_AT DESC",
            TABLE
        );
        let rows = warehouse.query(&stmt)?;
        Ok(rows.iter().map(Announcement::from_row).collect())
    }

    /// List the announcements currently visible on the landing page.
    pub fn list_active(&self, warehouse: &mut dyn Warehouse) -> Result<Vec<Announcement>, Error> {
        let stmt = format!(
            "SELECT * FROM {} WHERE SHOW_FLAG = TRUE \
             AND (STARTS_AT IS NULL OR STARTS_AT <= CURRENT_TIMESTAMP()) \
             AND (ENDS_AT IS NULL OR ENDS_AT >= CURRENT_TIMESTAMP()) \
             ORDER BY PRIORITY DESC, CREATED_AT DESC",
            TABLE
        );
        let rows = warehouse.query(&stmt)?;
        Ok(rows.iter().map(Announcement::from_row).collect())
    }
}
