//! Catalog introspection boundary.
//!
//! The [`Catalog`] trait abstracts over the warehouse's metadata views.
//! Everything here is blocking; the crate runs inside a single
//! interactive session.

use serde::{Deserialize, Serialize};

use crate::config::CatalogSettings;
use crate::exec::WarehouseError;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, WarehouseError>;

/// A fully qualified relation name: database.schema.name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedRelation {
    pub database: String,
    pub schema: String,
    pub name: String,
}

impl QualifiedRelation {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }
}

/// One column as reported by `DESCRIBE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, unquoted.
    pub name: String,
    /// Declared type text, verbatim (`NUMBER(38,0)`, `VARCHAR`, ...).
    pub declared_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// Kind of a listed relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    Table,
    View,
}

impl RelationKind {
    fn tag(&self) -> &'static str {
        match self {
            RelationKind::Table => "[TABLE]",
            RelationKind::View => "[VIEW]",
        }
    }
}

/// A table or view in a schema listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEntry {
    pub name: String,
    pub kind: RelationKind,
}

impl RelationEntry {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::Table,
        }
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RelationKind::View,
        }
    }

    /// Display label shown in the picker, e.g. `[TABLE] CUSTOMERS`.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind.tag(), self.name)
    }

    /// Parse a picker label back into an entry.
    pub fn from_label(label: &str) -> Option<Self> {
        let (tag, name) = label.split_once(' ')?;
        let kind = match tag {
            "[TABLE]" => RelationKind::Table,
            "[VIEW]" => RelationKind::View,
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            kind,
        })
    }
}

/// Blocking access to warehouse metadata.
pub trait Catalog {
    /// List database names visible to the session.
    fn list_databases(&mut self) -> CatalogResult<Vec<String>>;

    /// List schema names in a database.
    fn list_schemas(&mut self, database: &str) -> CatalogResult<Vec<String>>;

    /// List tables and views in a schema.
    fn list_relations(&mut self, database: &str, schema: &str) -> CatalogResult<Vec<RelationEntry>>;

    /// Describe the columns of a relation, in table order.
    fn describe_table(&mut self, relation: &QualifiedRelation)
        -> CatalogResult<Vec<ColumnDescriptor>>;
}

/// Apply the configured exclusions to a database listing and sort it.
pub fn filter_databases(names: Vec<String>, settings: &CatalogSettings) -> Vec<String> {
    let mut out: Vec<String> = names
        .into_iter()
        .filter(|n| !settings.excluded_databases.iter().any(|e| e == n))
        .collect();
    out.sort();
    out
}

/// Apply the configured exclusions to a schema listing and sort it.
pub fn filter_schemas(names: Vec<String>, settings: &CatalogSettings) -> Vec<String> {
    let mut out: Vec<String> = names
        .into_iter()
        .filter(|n| !settings.excluded_schemas.iter().any(|e| e == n))
        .collect();
    out.sort();
    out
}

/// Drop application bookkeeping tables and session temp tables from a
/// relation listing, then sort by name.
pub fn filter_relations(
    entries: Vec<RelationEntry>,
    settings: &CatalogSettings,
) -> Vec<RelationEntry> {
    let mut out: Vec<RelationEntry> = entries
        .into_iter()
        .filter(|e| !settings.system_tables.iter().any(|s| s == &e.name))
        .filter(|e| {
            settings.temp_table_prefix.is_empty()
                || !e.name.starts_with(&settings.temp_table_prefix)
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}
