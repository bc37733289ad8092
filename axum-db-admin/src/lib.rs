//! # axum-db-admin
//!
//! A browser-based database administration tool, mountable as an Axum router.
//!
//! ## Features
//!
//! - Table listing and paginated table browsing
//! - SQL file upload with a keyword denylist in front of execution
//! - Dashboard backed by canned `.sql` queries
//! - Support for SQLite and PostgreSQL
//!
//! ## Security Warning
//!
//! **This is a development tool only!**
//!
//! - No authentication/authorization built-in
//! - Exposes full database schema and data
//! - The SQL denylist only blocks DROP, ALTER, DELETE, UPDATE, TRUNCATE,
//!   RENAME and MODIFY COLUMN; INSERT, CREATE, GRANT and the rest still run
//! - Should never be exposed in production or public networks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_db_admin::{AdminConfig, DbAdminLayer};
//! use sqlx::SqlitePool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let database_url = "sqlite:./data/sakila.db";
//!     let pool = SqlitePool::connect(database_url)
//!         .await
//!         .unwrap();
//!
//!     let app = Router::new()
//!         .route("/hello", get(|| async { "Hello, World!" }))
//!         .merge(
//!             DbAdminLayer::sqlite(pool, AdminConfig::new(database_url))
//!                 .with_base_path("/admin")
//!                 .into_router(),
//!         );
//!
//!     // Serve the application...
//! }
//! ```

// Public modules
pub mod api;
pub mod browser;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod frontend;
pub mod gate;
pub mod layer;
pub mod names;
pub mod schema;

// Public exports
pub use browser::TableBrowser;
pub use config::AdminConfig;
pub use dashboard::{CannedQueries, Dashboard};
pub use gate::{run_script, ScriptError};
pub use layer::DbAdminLayer;
pub use names::{normalize, normalize_sql_filename, normalize_table_name, SqlFileName, TableName};
pub use schema::{
    CellValue, DashboardView, PageRequest, QueryResult, ScriptReport, StatementResult, TablePage,
    TableRow,
};

// Re-export database providers
pub use database::traits::{DatabaseError, DatabaseProvider};

#[cfg(feature = "sqlite")]
pub use database::sqlite::SqliteProvider;

#[cfg(feature = "postgres")]
pub use database::postgres::PostgresProvider;
