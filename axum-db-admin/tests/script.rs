mod common;

use axum_db_admin::{
    run_script, CellValue, DatabaseError, DatabaseProvider, PageRequest, QueryResult, ScriptError,
    SqliteProvider, TableBrowser,
};
use std::sync::Arc;

async fn item_count(provider: &SqliteProvider) -> i64 {
    match provider.execute("SELECT COUNT(*) AS total FROM items").await.unwrap() {
        QueryResult::Rows { rows, .. } => rows[0][0].as_integer().unwrap(),
        QueryResult::Command { .. } => panic!("expected rows"),
    }
}

#[tokio::test]
async fn test_script_reports_each_query_with_its_index() {
    let pool = common::memory_pool().await;
    let provider = SqliteProvider::new(pool);

    let report = run_script(&provider, "SELECT 1 AS a; SELECT 2 AS b;").await.unwrap();

    assert_eq!(report.message, "SQL file executed successfully.");
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].index, 1);
    assert_eq!(report.results[0].columns, vec!["a"]);
    assert_eq!(report.results[0].rows, vec![vec![CellValue::Integer(1)]]);
    assert_eq!(report.results[1].index, 2);
    assert_eq!(report.results[1].sql, "SELECT 2 AS b");
}

#[tokio::test]
async fn test_commands_run_but_are_not_reported() {
    let pool = common::memory_pool().await;
    let provider = SqliteProvider::new(pool);

    let script = "
        -- create and fill
        CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT);
        INSERT INTO items (label) VALUES ('a'), ('b');
        /* read back */ SELECT label FROM items ORDER BY id;
    ";
    let report = run_script(&provider, script).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].index, 3);
    assert_eq!(
        report.results[0].rows,
        vec![vec![CellValue::Text("a".into())], vec![CellValue::Text("b".into())]]
    );
    assert_eq!(item_count(&provider).await, 2);
}

#[tokio::test]
async fn test_forbidden_statement_means_nothing_runs() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 5).await;
    let provider = SqliteProvider::new(pool);

    let script = "INSERT INTO items (id, label) VALUES (100, 'new'); DELETE FROM items; SELECT * FROM items";
    let error = run_script(&provider, script).await.unwrap_err();

    match error {
        ScriptError::Forbidden { index, keyword, .. } => {
            assert_eq!(index, 2);
            assert_eq!(keyword, "DELETE");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(item_count(&provider).await, 5);
}

#[tokio::test]
async fn test_failing_statement_keeps_earlier_ones() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 1).await;
    let provider = SqliteProvider::new(pool);

    let script = "INSERT INTO items (id, label) VALUES (2, 'two'); SELEC oops; INSERT INTO items (id, label) VALUES (3, 'three')";
    let error = run_script(&provider, script).await.unwrap_err();

    match error {
        ScriptError::Statement { index, source } => {
            assert_eq!(index, 2);
            assert!(source.is_syntax(), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(item_count(&provider).await, 2);
}

#[tokio::test]
async fn test_empty_scripts_are_rejected() {
    let pool = common::memory_pool().await;
    let provider = SqliteProvider::new(pool);

    assert!(matches!(run_script(&provider, "").await, Err(ScriptError::EmptyScript)));
    assert!(matches!(run_script(&provider, "  \n\t ").await, Err(ScriptError::EmptyScript)));

    // Comments alone are not empty, they just produce no statements
    let report = run_script(&provider, "-- nothing here\n").await.unwrap();
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_select_without_rows_keeps_its_columns() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 3).await;
    let provider = SqliteProvider::new(pool);

    let result = provider
        .execute("SELECT id, label FROM items WHERE id > 100")
        .await
        .unwrap();
    assert_eq!(
        result,
        QueryResult::Rows {
            columns: vec!["id".into(), "label".into()],
            rows: vec![],
        }
    );
}

#[tokio::test]
async fn test_browser_pages_normalize_the_table_name() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 45).await;
    let browser = TableBrowser::new(Arc::new(SqliteProvider::new(pool)), "sqlite::memory:");

    let rows = browser.fetch_page("ITEMS", PageRequest::new(2, 10)).await.unwrap();
    let ids: Vec<_> = rows.iter().map(|row| row.get("id").cloned()).collect();
    let expected: Vec<_> = (21..=30).map(|id| Some(CellValue::Integer(id))).collect();
    assert_eq!(ids, expected);
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["id", "label", "price"]);

    assert_eq!(browser.count_rows(" Items ").await.unwrap(), 45);

    let last = browser.table_page("items", PageRequest::new(4, 10)).await.unwrap();
    assert_eq!(last.total, 45);
    assert_eq!(last.rows.len(), 5);
    assert_eq!(last.table_name.as_str(), "items");

    let beyond = browser.fetch_page("items", PageRequest::new(10, 10)).await.unwrap();
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn test_browser_rejects_hostile_names() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 3).await;
    let browser = TableBrowser::new(Arc::new(SqliteProvider::new(pool)), "sqlite::memory:");

    let error = browser.count_rows("items; DROP TABLE items").await.unwrap_err();
    assert!(matches!(error, DatabaseError::InvalidName { .. }), "{error}");

    let error = browser.fetch_page("missing_table", PageRequest::new(0, 10)).await.unwrap_err();
    assert!(error.is_syntax(), "{error}");

    assert_eq!(browser.count_rows("items").await.unwrap(), 3);
}

#[tokio::test]
async fn test_browser_lists_tables() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 1).await;
    common::create_rental_store(&pool).await;
    let browser = TableBrowser::new(Arc::new(SqliteProvider::new(pool)), "sqlite:./data/sakila.db");

    let tables = browser.list_tables().await.unwrap();
    assert!(tables.contains(&"items".to_string()));
    assert!(tables.contains(&"film".to_string()));
    assert!(tables.windows(2).all(|pair| pair[0] <= pair[1]));
}
