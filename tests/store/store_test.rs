//! Persistence statement shapes and binds.

use serde_json::{json, Value};

use floe::prelude::*;
use floe::store::AnnouncementPatch;

/// Warehouse that records every call and returns scripted rows.
#[derive(Default)]
struct RecordingWarehouse {
    calls: Vec<(String, Vec<Value>)>,
    rows: Vec<Row>,
}

impl Warehouse for RecordingWarehouse {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, WarehouseError> {
        self.calls.push((sql.to_string(), Vec::new()));
        Ok(self.rows.clone())
    }

    fn execute(&mut self, sql: &str, binds: &[Value]) -> Result<(), WarehouseError> {
        self.calls.push((sql.to_string(), binds.to_vec()));
        Ok(())
    }
}

#[test]
fn saved_query_insert_binds_all_values() {
    let mut wh = RecordingWarehouse::default();
    let store = SavedQueryStore::standard();

    let id = store
        .insert(&mut wh, "monthly balances", "per-branch totals", "SELECT 1")
        .unwrap();

    assert!(id.starts_with("obj_"));
    assert_eq!(id.len(), "obj_".len() + 12);

    let (sql, binds) = &wh.calls[0];
    assert!(sql.starts_with("INSERT INTO STANDARD_SEARCH_OBJECTS"));
    assert!(sql.contains("VALUES (?, ?, ?, ?, FALSE, 0, CURRENT_TIMESTAMP())"));
    assert_eq!(
        binds,
        &vec![
            json!(id),
            json!("monthly balances"),
            json!("per-branch totals"),
            json!("SELECT 1")
        ]
    );
}

#[test]
fn adhoc_store_uses_its_own_table_and_prefix() {
    let mut wh = RecordingWarehouse::default();
    let id = SavedQueryStore::adhoc()
        .insert(&mut wh, "raw scan", "", "SELECT 2")
        .unwrap();

    assert!(id.starts_with("adhoc_"));
    assert!(wh.calls[0].0.starts_with("INSERT INTO ADHOC_SEARCH_OBJECTS"));
}

#[test]
fn list_orders_newest_first() {
    let mut wh = RecordingWarehouse::default();
    SavedQueryStore::standard().list(&mut wh).unwrap();
    assert_eq!(
        wh.calls[0].0,
        "SELECT * FROM STANDARD_SEARCH_OBJECTS ORDER BY CREATED_AT DESC"
    );
}

#[test]
fn list_decodes_rows() {
    let mut row = Row::new();
    row.insert("ID".into(), json!("obj_aaaabbbbcccc"));
    row.insert("NAME".into(), json!("favorites"));
    row.insert("QUERY_TEXT".into(), json!("SELECT 1"));
    row.insert("FAVORITE".into(), json!("TRUE"));
    row.insert("EXECUTION_COUNT".into(), json!("7"));

    let mut wh = RecordingWarehouse {
        rows: vec![row],
        ..Default::default()
    };
    let saved = SavedQueryStore::standard().list(&mut wh).unwrap();

    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, "obj_aaaabbbbcccc");
    assert!(saved[0].favorite);
    assert_eq!(saved[0].execution_count, 7);
    assert_eq!(saved[0].last_executed, None);
}

#[test]
fn favorites_and_execution_counter() {
    let mut wh = RecordingWarehouse::default();
    let store = SavedQueryStore::standard();

    store.set_favorite(&mut wh, "obj_x", true).unwrap();
    store.record_execution(&mut wh, "obj_x").unwrap();

    let (sql, binds) = &wh.calls[0];
    assert_eq!(
        sql,
        "UPDATE STANDARD_SEARCH_OBJECTS SET FAVORITE = ? WHERE ID = ?"
    );
    assert_eq!(binds, &vec![json!(true), json!("obj_x")]);

    let (sql, binds) = &wh.calls[1];
    assert!(sql.contains("EXECUTION_COUNT = EXECUTION_COUNT + 1"));
    assert!(sql.contains("LAST_EXECUTED = CURRENT_TIMESTAMP()"));
    assert_eq!(binds, &vec![json!("obj_x")]);
}

#[test]
fn announcement_insert_binds_nullable_window() {
    let mut wh = RecordingWarehouse::default();
    let id = AnnouncementStore::new()
        .insert(&mut wh, "maintenance", "warehouse down Sunday", 5, true, None, Some("2024-09-01"))
        .unwrap();

    assert!(id.starts_with("ann_"));
    let (sql, binds) = &wh.calls[0];
    assert!(sql.starts_with("INSERT INTO ANNOUNCEMENTS"));
    assert_eq!(binds[5], Value::Null);
    assert_eq!(binds[6], json!("2024-09-01"));
}

#[test]
fn announcement_update_builds_dynamic_set_list() {
    let mut wh = RecordingWarehouse::default();
    let patch = AnnouncementPatch {
        body: Some("rescheduled".into()),
        priority: Some(2),
        ..Default::default()
    };
    AnnouncementStore::new()
        .update(&mut wh, "ann_x", &patch)
        .unwrap();

    let (sql, binds) = &wh.calls[0];
    assert_eq!(
        sql,
        "UPDATE ANNOUNCEMENTS SET BODY = ?, PRIORITY = ?, UPDATED_AT = CURRENT_TIMESTAMP() WHERE ID = ?"
    );
    assert_eq!(binds, &vec![json!("rescheduled"), json!(2), json!("ann_x")]);
}

#[test]
fn announcement_empty_patch_is_a_no_op() {
    let mut wh = RecordingWarehouse::default();
    AnnouncementStore::new()
        .update(&mut wh, "ann_x", &AnnouncementPatch::default())
        .unwrap();
    assert!(wh.calls.is_empty());
}

#[test]
fn active_listing_filters_on_window_and_flag() {
    let mut wh = RecordingWarehouse::default();
    AnnouncementStore::new().list_active(&mut wh).unwrap();

    let sql = &wh.calls[0].0;
    assert!(sql.contains("SHOW_FLAG = TRUE"));
    assert!(sql.contains("STARTS_AT IS NULL OR STARTS_AT <= CURRENT_TIMESTAMP()"));
    assert!(sql.contains("ENDS_AT IS NULL OR ENDS_AT >= CURRENT_TIMESTAMP()"));
    assert!(sql.ends_with("ORDER BY PRIORITY DESC, CREATED_AT DESC"));
}
