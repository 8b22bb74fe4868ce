//! # Floe
//!
//! SQL synthesis core for a GUI-driven warehouse search application.
//!
//! ## Architecture
//!
//! The UI collects structured inputs; this crate turns them into safe
//! SQL and guards everything that reaches the warehouse session:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        UI Selections (tables, filters, grouping)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder::join / builder::condition]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Resolved Columns + Ordered Conditions + Grouping     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder::compose]
//! ┌─────────────────────────────────────────────────────────┐
//! │       GeneratedStatement (token stream → SQL text)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [exec]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Execution Guard (sanitize, LIMIT, COUNT(*) probe)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`catalog::Catalog`] and [`exec::Warehouse`] traits are the only
//! seams to the outside; everything else is pure and synchronous.

pub mod builder;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod ddl;
pub mod error;
pub mod exec;
pub mod sql;
pub mod store;

pub use error::{Error, Result};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::builder::{
        resolve, AggregateFn, Comparison, Connector, DateRange, FilterCondition,
        GeneratedStatement, GroupingEntry, GroupingSpec, JoinLink, JoinSpec, JoinTable, JoinType,
        Resolution, ResolvedColumn, SearchQuery, SelectItem, SortCondition, SortDir, SortKind,
        Source,
    };
    pub use crate::catalog::{
        Catalog, ColumnDescriptor, QualifiedRelation, RelationEntry, RelationKind,
    };
    pub use crate::classify::{is_date_like, is_date_type, is_numeric};
    pub use crate::config::Settings;
    pub use crate::error::Error;
    pub use crate::exec::{ExecutionOutcome, Guard, Row, RowEstimate, Warehouse, WarehouseError};
    pub use crate::sql::{quote_ident, quote_literal, Token, TokenStream};
    pub use crate::store::{AnnouncementStore, SavedQuery, SavedQueryStore};
}

// Also export the workhorse types at the crate root
pub use builder::{GeneratedStatement, SearchQuery};
pub use catalog::{ColumnDescriptor, QualifiedRelation};
pub use exec::{Guard, Warehouse};
pub use sql::{quote_ident, quote_literal, Token, TokenStream};
