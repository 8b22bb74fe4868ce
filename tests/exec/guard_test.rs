//! Execution guard against a scripted fake warehouse.

use std::collections::VecDeque;

use serde_json::{json, Value};

use floe::config::GuardSettings;
use floe::prelude::*;

/// Warehouse that replays scripted responses and records every
/// statement it receives.
#[derive(Default)]
struct FakeWarehouse {
    responses: VecDeque<Result<Vec<Row>, WarehouseError>>,
    statements: Vec<String>,
}

impl FakeWarehouse {
    fn respond(mut self, response: Result<Vec<Row>, WarehouseError>) -> Self {
        self.responses.push_back(response);
        self
    }

    fn count_row(count: u64) -> Vec<Row> {
        let mut row = Row::new();
        row.insert("COUNT(*)".to_string(), json!(count));
        vec![row]
    }

    fn data_rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                let mut row = Row::new();
                row.insert("ID".to_string(), json!(i));
                row
            })
            .collect()
    }
}

impl Warehouse for FakeWarehouse {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, WarehouseError> {
        self.statements.push(sql.to_string());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn execute(&mut self, sql: &str, _binds: &[Value]) -> Result<(), WarehouseError> {
        self.statements.push(sql.to_string());
        Ok(())
    }
}

fn guard(limit_rows: u32) -> Guard {
    Guard::new(GuardSettings {
        default_limit_rows: limit_rows,
        large_result_threshold: 5000,
    })
}

#[test]
fn prepare_appends_limit_and_strips_semicolon() {
    assert_eq!(
        floe::exec::prepare("SELECT * FROM T;  ", false, 100),
        "SELECT * FROM T LIMIT 100"
    );
}

#[test]
fn prepare_leaves_existing_limit_untouched() {
    assert_eq!(
        floe::exec::prepare("SELECT * FROM T LIMIT 10", false, 100),
        "SELECT * FROM T LIMIT 10"
    );
}

#[test]
fn run_probes_before_fetching() {
    let mut wh = FakeWarehouse::default()
        .respond(Ok(FakeWarehouse::count_row(3)))
        .respond(Ok(FakeWarehouse::data_rows(3)));

    let outcome = guard(100).run(&mut wh, "SELECT * FROM T;", false).unwrap();

    assert_eq!(
        wh.statements,
        vec![
            "SELECT COUNT(*) FROM (SELECT * FROM T)".to_string(),
            "SELECT * FROM T LIMIT 100".to_string(),
        ]
    );
    assert_eq!(outcome.estimate, Some(RowEstimate::Normal(3)));
    assert_eq!(outcome.probe_error, None);
    assert_eq!(outcome.rows.len(), 3);
    assert_eq!(outcome.sql, "SELECT * FROM T LIMIT 100");
}

#[test]
fn probe_runs_against_the_unlimited_statement() {
    let mut wh = FakeWarehouse::default()
        .respond(Ok(FakeWarehouse::count_row(1)))
        .respond(Ok(Vec::new()));

    guard(50).run(&mut wh, "SELECT * FROM T", false).unwrap();

    // The probe must reflect the full result, not the limited fetch.
    assert!(!wh.statements[0].contains("LIMIT"));
    assert!(wh.statements[1].ends_with("LIMIT 50"));
}

#[test]
fn large_results_are_flagged() {
    let mut wh = FakeWarehouse::default()
        .respond(Ok(FakeWarehouse::count_row(6000)))
        .respond(Ok(FakeWarehouse::data_rows(2)));

    let outcome = guard(100).run(&mut wh, "SELECT * FROM T", false).unwrap();
    assert_eq!(outcome.estimate, Some(RowEstimate::Large(6000)));
}

#[test]
fn empty_results_are_flagged() {
    let mut wh = FakeWarehouse::default()
        .respond(Ok(FakeWarehouse::count_row(0)))
        .respond(Ok(Vec::new()));

    let outcome = guard(100).run(&mut wh, "SELECT * FROM T", false).unwrap();
    assert_eq!(outcome.estimate, Some(RowEstimate::Empty));
}

#[test]
fn probe_failure_does_not_abort_the_fetch() {
    let mut wh = FakeWarehouse::default()
        .respond(Err(WarehouseError::remote("002003", "object not visible")))
        .respond(Ok(FakeWarehouse::data_rows(1)));

    let outcome = guard(100).run(&mut wh, "SELECT * FROM T", false).unwrap();

    assert_eq!(outcome.estimate, None);
    let message = outcome.probe_error.expect("probe error recorded");
    assert!(message.contains("object not visible"));
    assert_eq!(outcome.rows.len(), 1);
}

#[test]
fn fetch_failure_is_an_execution_error_with_sql_attached() {
    let mut wh = FakeWarehouse::default()
        .respond(Ok(FakeWarehouse::count_row(1)))
        .respond(Err(WarehouseError::remote("000904", "invalid identifier")));

    let result = guard(100).run(&mut wh, "SELECT * FROM T", false);
    match result {
        Err(Error::Execution { message, sql }) => {
            assert!(message.contains("invalid identifier"));
            assert_eq!(sql, "SELECT * FROM T LIMIT 100");
        }
        other => panic!("expected execution error, got {:?}", other),
    }
}

#[test]
fn all_rows_skips_the_limit_but_not_the_probe() {
    let mut wh = FakeWarehouse::default()
        .respond(Ok(FakeWarehouse::count_row(10)))
        .respond(Ok(Vec::new()));

    let outcome = guard(100).run(&mut wh, "SELECT * FROM T", true).unwrap();
    assert_eq!(outcome.sql, "SELECT * FROM T");
    assert_eq!(outcome.estimate, Some(RowEstimate::Normal(10)));
}

#[test]
fn string_counts_from_the_driver_are_accepted() {
    let mut row = Row::new();
    row.insert("COUNT(*)".to_string(), json!("42"));
    let mut wh = FakeWarehouse::default()
        .respond(Ok(vec![row]))
        .respond(Ok(Vec::new()));

    let outcome = guard(100).run(&mut wh, "SELECT * FROM T", false).unwrap();
    assert_eq!(outcome.estimate, Some(RowEstimate::Normal(42)));
}
