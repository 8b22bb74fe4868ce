//! Saved search objects.
//!
//! Standard searches (built from the GUI) and ad-hoc searches (raw SQL)
//! are saved to separate bookkeeping tables with the same shape.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{get_bool, get_i64, get_opt_str, get_str, new_object_id};
use crate::error::Error;
use crate::exec::{Row, Warehouse};

/// A saved search object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: String,
    pub name: String,
    pub description: String,
    /// The saved statement text.
    pub sql: String,
    pub favorite: bool,
    pub execution_count: i64,
    pub created_at: String,
    pub last_executed: Option<String>,
}

impl SavedQuery {
    fn from_row(row: &Row) -> Self {
        Self {
            id: get_str(row, "ID"),
            name: get_str(row, "NAME"),
            description: get_str(row, "DESCRIPTION"),
            sql: get_str(row, "QUERY_TEXT"),
            favorite: get_bool(row, "FAVORITE"),
            execution_count: get_i64(row, "EXECUTION_COUNT"),
            created_at: get_str(row, "CREATED_AT"),
            last_executed: get_opt_str(row, "LAST_EXECUTED"),
        }
    }
}

/// Store over one of the saved-object tables.
#[derive(Debug, Clone)]
pub struct SavedQueryStore {
    table: &'static str,
    id_prefix: &'static str,
}

impl SavedQueryStore {
    /// Store for GUI-built standard searches.
    pub fn standard() -> Self {
        Self {
            table: "STANDARD_SEARCH_OBJECTS",
            id_prefix: "obj",
        }
    }

    /// Store for raw-SQL ad-hoc searches.
    pub fn adhoc() -> Self {
        Self {
            table: "ADHOC_SEARCH_OBJECTS",
            id_prefix: "adhoc",
        }
    }

    /// Save a new object and return its generated id.
    pub fn insert(
        &self,
        warehouse: &mut dyn Warehouse,
        name: &str,
        description: &str,
        sql: &str,
    ) -> Result<String, Error> {
        let id = new_object_id(self.id_prefix);
        let stmt = format!(
            "INSERT INTO {} (ID, NAME, DESCRIPTION, QUERY_TEXT, FAVORITE, EXECUTION_COUNT, CREATED_AT) \
             VALUES (?, ?, ?, ?, FALSE, 0, CURRENT_TIMESTAMP())",
            self.table
        );
        debug!(table = self.table, id = %id, "saving search object");
        warehouse.execute(
            &stmt,
            &[json!(id.clone()), json!(name), json!(description), json!(sql)],
        )?;
        Ok(id)
    }

    /// List all saved objects, newest first.
    pub fn list(&self, warehouse: &mut dyn Warehouse) -> Result<Vec<SavedQuery>, Error> {
        let stmt = format!("SELECT * FROM {} ORDER BY CREATED_AT DESC", self.table);
        let rows = warehouse.query(&stmt)?;
        Ok(rows.iter().map(SavedQuery::from_row).collect())
    }

    /// Mark or unmark an object as favorite.
    pub fn set_favorite(
        &self,
        warehouse: &mut dyn Warehouse,
        id: &str,
        favorite: bool,
    ) -> Result<(), Error> {
        let stmt = format!("UPDATE {} SET FAVORITE = ? WHERE ID = ?", self.table);
        warehouse.execute(&stmt, &[json!(favorite), json!(id)])?;
        Ok(())
    }

    /// Bump the execution counter and touch the last-executed time.
    pub fn record_execution(&self, warehouse: &mut dyn Warehouse, id: &str) -> Result<(), Error> {
        let stmt = format!(
            "UPDATE {} SET EXECUTION_COUNT = EXECUTION_COUNT + 1, \
             LAST_EXECUTED = CURRENT_TIMESTAMP() WHERE ID = ?",
            self.table
        );
        warehouse.execute(&stmt, &[json!(id)])?;
        Ok(())
    }

    /// Delete a saved object.
    pub fn delete(&self, warehouse: &mut dyn Warehouse, id: &str) -> Result<(), Error> {
        let stmt = format!("DELETE FROM {} WHERE ID = ?", self.table);
        debug!(table = self.table, id = %id, "deleting search object");
        warehouse.execute(&stmt, &[json!(id)])?;
        Ok(())
    }
}
