mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use axum_db_admin::{AdminConfig, DbAdminLayer};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

const BOUNDARY: &str = "----db-admin-test-boundary";

fn router(pool: SqlitePool) -> Router {
    DbAdminLayer::sqlite(pool, AdminConfig::new("sqlite:./data/sakila.db")).into_router()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let (status, body) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK, "{uri}");
    serde_json::from_slice(&body).unwrap()
}

fn upload(field: &str, file_name: &str, contents: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/sql\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::post("/ejecutar-sql")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn post_script(app: &Router, request: Request<Body>) -> Value {
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_tables() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 1).await;
    let app = router(pool);

    let view = get_json(&app, "/tablas").await;
    assert_eq!(view, json!({ "tables": ["items"] }));
}

#[tokio::test]
async fn test_show_table_page() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 45).await;
    let app = router(pool);

    let view = get_json(&app, "/tabla/ITEMS?pagina=2&tamanio=10").await;
    assert_eq!(view["tableName"], "items");
    assert_eq!(view["page"], 2);
    assert_eq!(view["pageSize"], 10);
    assert_eq!(view["total"], 45);
    assert!(view.get("error").is_none());

    let rows = view["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], json!({ "id": 21, "label": "item 21", "price": 31.5 }));
    assert_eq!(rows[9]["id"], 30);
}

#[tokio::test]
async fn test_show_table_defaults_and_clamping() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 45).await;
    let app = router(pool);

    let view = get_json(&app, "/tabla/items").await;
    assert_eq!(view["page"], 0);
    assert_eq!(view["pageSize"], 20);
    assert_eq!(view["rows"].as_array().unwrap().len(), 20);

    let view = get_json(&app, "/tabla/items?tamanio=0").await;
    assert_eq!(view["pageSize"], 1);

    let view = get_json(&app, "/tabla/items?tamanio=100000").await;
    assert_eq!(view["pageSize"], 500);
    assert_eq!(view["rows"].as_array().unwrap().len(), 45);
}

#[tokio::test]
async fn test_show_table_errors_render_as_banner() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 3).await;
    let app = router(pool);

    let view = get_json(&app, "/tabla/items%3B%20DROP%20TABLE%20items").await;
    let error = view["error"].as_str().unwrap();
    assert!(error.starts_with("Could not reach the database or the table does not exist"));
    assert!(error.contains("No valid table name"), "{error}");
    assert!(view.get("rows").is_none());

    let view = get_json(&app, "/tabla/nowhere").await;
    assert!(view["error"].as_str().unwrap().contains("not valid"));

    // The table survived
    let view = get_json(&app, "/tabla/items").await;
    assert_eq!(view["total"], 3);
}

#[tokio::test]
async fn test_show_table_with_malformed_paging_renders_banner() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 3).await;
    let app = router(pool);

    for uri in [
        "/tabla/items?pagina=-1",
        "/tabla/items?pagina=abc",
        "/tabla/items?tamanio=-5",
        "/tabla/items?pagina=1&tamanio=ten",
    ] {
        let view = get_json(&app, uri).await;
        let error = view["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid pagination parameters"), "{uri}: {error}");
        assert!(view.get("rows").is_none(), "{uri}");
    }
}

#[tokio::test]
async fn test_upload_runs_script() {
    let pool = common::memory_pool().await;
    let app = router(pool);

    let script = "CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT);\n\
                  INSERT INTO notes (body) VALUES ('hello');\n\
                  SELECT id, body FROM notes;\n\
                  SELECT COUNT(*) AS total FROM notes;";
    let view = post_script(&app, upload("archivo", "Notes.SQL", script)).await;

    assert_eq!(view["message"], "SQL file executed successfully.");
    assert!(view.get("error").is_none());
    assert_eq!(
        view["results"],
        json!([
            { "index": 3, "sql": "SELECT id, body FROM notes", "columns": ["id", "body"], "rows": [[1, "hello"]] },
            { "index": 4, "sql": "SELECT COUNT(*) AS total FROM notes", "columns": ["total"], "rows": [[1]] }
        ])
    );
}

#[tokio::test]
async fn test_upload_without_queries_has_no_results() {
    let pool = common::memory_pool().await;
    let app = router(pool);

    let view = post_script(&app, upload("archivo", "setup.sql", "CREATE TABLE t (id INTEGER);")).await;
    assert_eq!(view, json!({ "message": "SQL file executed successfully." }));
}

#[tokio::test]
async fn test_upload_with_forbidden_statement_changes_nothing() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 5).await;
    let app = router(pool);

    let script = "INSERT INTO items (id, label) VALUES (99, 'x');\ndrop table items;\nSELECT 1;";
    let view = post_script(&app, upload("archivo", "evil.sql", script)).await;

    let error = view["error"].as_str().unwrap();
    assert!(error.contains("forbidden instruction (DROP)"), "{error}");
    assert!(error.contains("#2"), "{error}");
    assert!(view.get("message").is_none());

    let view = get_json(&app, "/tabla/items").await;
    assert_eq!(view["total"], 5);
}

#[tokio::test]
async fn test_upload_empty_or_missing_file() {
    let pool = common::memory_pool().await;
    let app = router(pool);

    let view = post_script(&app, upload("archivo", "empty.sql", "   ")).await;
    assert_eq!(view, json!({ "error": "Select a valid SQL file to upload." }));

    let view = post_script(&app, upload("other", "script.sql", "SELECT 1")).await;
    assert_eq!(view, json!({ "error": "Select a valid SQL file to upload." }));
}

#[tokio::test]
async fn test_dashboard() {
    let pool = common::memory_pool().await;
    common::create_rental_store(&pool).await;
    let app = router(pool);

    let view = get_json(&app, "/dashboard").await;
    assert!(view.get("error").is_none(), "{view}");
    assert_eq!(view["totalCustomers"], 3);
    assert_eq!(view["totalCountries"], 2);
    assert_eq!(view["totalFilms"], 4);

    let charts = view["charts"].as_array().unwrap();
    assert_eq!(charts.len(), 6);
    assert_eq!(charts[0]["key"], "filmsByRating");
    assert_eq!(charts[0]["file"], "stat_peliculas_por_rating.sql");
    assert_eq!(charts[0]["result"]["rows"], json!([["G", 1], ["PG", 2], ["R", 1]]));

    let by_month = charts.iter().find(|chart| chart["key"] == "rentalsByMonth").unwrap();
    assert_eq!(by_month["result"]["rows"], json!([["2005-05", 2], ["2005-06", 1]]));

    let by_country = charts.iter().find(|chart| chart["key"] == "customersByCountry").unwrap();
    assert_eq!(by_country["result"]["rows"], json!([["Spain", 2], ["Japan", 1]]));
}

#[tokio::test]
async fn test_dashboard_failure_keeps_earlier_charts() {
    let pool = common::memory_pool().await;
    sqlx::query("CREATE TABLE film (film_id INTEGER PRIMARY KEY, title TEXT, rating TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    let app = router(pool);

    let view = get_json(&app, "/dashboard").await;
    let error = view["error"].as_str().unwrap();
    assert!(error.starts_with("Database error: "), "{error}");
    assert!(error.contains("stat_actores_por_letra.sql"), "{error}");

    let charts = view["charts"].as_array().unwrap();
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0]["key"], "filmsByRating");
    assert!(view.get("totalFilms").is_none());
}

#[tokio::test]
async fn test_health_and_frontend() {
    let pool = common::memory_pool().await;
    let app = router(pool.clone());

    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Server is healthy");

    let (status, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("<base href=\"/\">"));

    let (status, _) = send(&app, Request::get("/assets/app.js").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    pool.close().await;
    let (status, _) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_base_path_mounting() {
    let pool = common::memory_pool().await;
    common::create_items(&pool, 2).await;
    let app = DbAdminLayer::sqlite(pool, AdminConfig::new("sqlite::memory:"))
        .with_base_path("/admin/")
        .into_router();

    let view = get_json(&app, "/admin/tablas").await;
    assert_eq!(view["tables"], json!(["items"]));

    let (status, body) = send(&app, Request::get("/admin").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("<base href=\"/admin/\">"));

    let (status, body) = send(&app, Request::get("/admin/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("<base href=\"/admin/\">"));

    let (status, _) = send(&app, Request::get("/admin/assets/app.css").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Request::get("/tablas").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
