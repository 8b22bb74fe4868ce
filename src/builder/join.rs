//! Join specification and column resolution.
//!
//! Up to three relations join in a chain under the fixed aliases `t1`,
//! `t2`, `t3`. Resolution walks every table's columns in catalog order
//! and produces the selectable output list:
//!
//! - columns named as a join key are excluded outright (their values are
//!   equal across the joined tables);
//! - names that still appear in more than one table are renamed
//!   `tN_<name>` so the output has no duplicate headers;
//! - everything else stays under its own name, alias-qualified.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{ColumnDescriptor, QualifiedRelation};
use crate::error::Error;

/// Join type of one link in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    FullOuter,
}

/// One link of the join chain.
///
/// The first link joins `t1` to `t2` (`left_key` on `t1`); the second
/// joins `t2` to `t3` (`left_key` is the middle table's second key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinLink {
    pub join_type: JoinType,
    pub left_key: String,
    pub right_key: String,
}

impl JoinLink {
    pub fn new(
        join_type: JoinType,
        left_key: impl Into<String>,
        right_key: impl Into<String>,
    ) -> Self {
        Self {
            join_type,
            left_key: left_key.into(),
            right_key: right_key.into(),
        }
    }
}

/// One joined relation with its described columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTable {
    pub relation: QualifiedRelation,
    pub columns: Vec<ColumnDescriptor>,
}

impl JoinTable {
    pub fn new(relation: QualifiedRelation, columns: Vec<ColumnDescriptor>) -> Self {
        Self { relation, columns }
    }
}

/// A 2- or 3-table join chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub tables: Vec<JoinTable>,
    pub links: Vec<JoinLink>,
}

impl JoinSpec {
    pub fn new(tables: Vec<JoinTable>, links: Vec<JoinLink>) -> Self {
        Self { tables, links }
    }

    /// Check the chain shape: 2 or 3 tables, one link between each pair.
    pub fn validate(&self) -> Result<(), Error> {
        if !(2..=3).contains(&self.tables.len()) {
            return Err(Error::Composition(format!(
                "a join needs 2 or 3 tables, got {}",
                self.tables.len()
            )));
        }
        if self.links.len() != self.tables.len() - 1 {
            return Err(Error::Composition(format!(
                "{} tables need {} join links, got {}",
                self.tables.len(),
                self.tables.len() - 1,
                self.links.len()
            )));
        }
        Ok(())
    }

    /// Alias of the table at `index`: `t1`, `t2`, `t3`.
    pub fn alias(index: usize) -> String {
        format!("t{}", index + 1)
    }
}

/// One selectable output column after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    /// Table alias (`t1`, ...).
    pub alias: String,
    /// Original column name.
    pub name: String,
    /// Declared type carried through for the classifier.
    pub declared_type: String,
    /// Collision rename (`t1_status`), if the name appears in more than
    /// one table.
    pub rename: Option<String>,
}

impl ResolvedColumn {
    /// Alias-qualified reference, e.g. `t1.STATUS`.
    pub fn column_ref(&self) -> String {
        format!("{}.{}", self.alias, self.name)
    }

    /// Header shown for this column in the result grid.
    pub fn label(&self) -> String {
        match &self.rename {
            Some(rename) => rename.clone(),
            None => self.column_ref(),
        }
    }
}

/// Deterministic output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Selectable columns, in table order then catalog order.
    pub columns: Vec<ResolvedColumn>,
    /// Join-key names dropped from the selectable set, sorted.
    pub excluded_join_keys: Vec<String>,
}

/// Resolve the selectable columns of a join chain.
pub fn resolve(spec: &JoinSpec) -> Result<Resolution, Error> {
    spec.validate()?;

    let join_keys: BTreeSet<&str> = spec
        .links
        .iter()
        .flat_map(|l| [l.left_key.as_str(), l.right_key.as_str()])
        .collect();

    // Collision counting runs over the columns that survive join-key
    // exclusion.
    let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for table in &spec.tables {
        for col in &table.columns {
            if join_keys.contains(col.name.as_str()) {
                continue;
            }
            *name_counts.entry(col.name.as_str()).or_insert(0) += 1;
        }
    }

    let mut columns = Vec::new();
    let mut excluded: BTreeSet<String> = BTreeSet::new();
    for (idx, table) in spec.tables.iter().enumerate() {
        let alias = JoinSpec::alias(idx);
        for col in &table.columns {
            if join_keys.contains(col.name.as_str()) {
                excluded.insert(col.name.clone());
                continue;
            }
            let rename = if name_counts[col.name.as_str()] > 1 {
                Some(format!("{}_{}", alias, col.name.to_lowercase()))
            } else {
                None
            };
            columns.push(ResolvedColumn {
                alias: alias.clone(),
                name: col.name.clone(),
                declared_type: col.declared_type.clone(),
                rename,
            });
        }
    }

    Ok(Resolution {
        columns,
        excluded_join_keys: excluded.into_iter().collect(),
    })
}
