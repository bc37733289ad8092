//! DbAdminLayer - Main Axum integration layer
//!
//! This module provides the main entry point for mounting the admin tool into
//! an Axum application.

use crate::api::{
    dashboard_handler, execute_script_handler, health_handler, list_tables_handler,
    show_table_handler, AdminState,
};
use crate::config::AdminConfig;
use crate::database::traits::DatabaseProvider;
use crate::frontend::{create_frontend_router, serve_index_page, FrontendState};
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[cfg(feature = "sqlite")]
use crate::database::sqlite::SqliteProvider;

#[cfg(feature = "postgres")]
use crate::database::postgres::PostgresProvider;

/// Main layer for mounting the admin tool into an Axum application
///
/// # Example
///
/// ```rust,no_run
/// use axum::Router;
/// use axum_db_admin::{AdminConfig, DbAdminLayer};
/// use sqlx::SqlitePool;
///
/// # async fn example() {
/// let database_url = "sqlite:./data/sakila.db";
/// let pool = SqlitePool::connect(database_url).await.unwrap();
/// let admin = DbAdminLayer::sqlite(pool, AdminConfig::new(database_url));
/// let app = Router::new().merge(admin.into_router());
/// # }
/// ```
pub struct DbAdminLayer<DB: DatabaseProvider> {
    base_path: String,
    config: AdminConfig,
    database: Arc<DB>,
}

impl<DB: DatabaseProvider> DbAdminLayer<DB> {
    /// Create a new admin layer mounted at the root path
    ///
    /// # Arguments
    ///
    /// * `database` - The database provider implementation
    /// * `config` - Connection string, canned query location and page sizes
    pub fn new(database: DB, config: AdminConfig) -> Self {
        Self {
            base_path: String::new(),
            config,
            database: Arc::new(database),
        }
    }

    /// Mount under a path prefix such as `/admin` instead of the root
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_string();
        self
    }

    /// Convert into an Axum Router that can be merged
    ///
    /// The returned router includes:
    /// - Frontend serving at `{base_path}/` and `{base_path}/assets/*`
    /// - `GET /tablas`, `GET /tabla/{name}`, `POST /ejecutar-sql`,
    ///   `GET /dashboard` and `GET /health` under `{base_path}`
    /// - Request tracing and permissive CORS middleware
    pub fn into_router(self) -> Router {
        let state = Arc::new(AdminState::new(self.database, self.config));

        let view_router = Router::new()
            .route("/tablas", get(list_tables_handler::<DB>))
            .route("/tabla/{name}", get(show_table_handler::<DB>))
            .route("/ejecutar-sql", post(execute_script_handler::<DB>))
            .route("/dashboard", get(dashboard_handler::<DB>))
            .route("/health", get(health_handler::<DB>))
            .with_state(state);

        let admin_router = view_router.merge(create_frontend_router(self.base_path.clone()));

        // Axum does not nest at the root, merge instead. A nested "/" only
        // matches the bare prefix, so `{base_path}/` gets the landing page too
        let router = if self.base_path.is_empty() {
            admin_router
        } else {
            let landing_page =
                get(serve_index_page).with_state(FrontendState::new(self.base_path.clone()));
            Router::new()
                .nest(&self.base_path, admin_router)
                .route(&format!("{}/", self.base_path), landing_page)
        };

        router
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }
}

#[cfg(feature = "sqlite")]
impl DbAdminLayer<SqliteProvider> {
    /// Create an admin layer for SQLite
    ///
    /// # Arguments
    ///
    /// * `pool` - The SQLite connection pool
    /// * `config` - Admin settings; `database_url` should match the pool
    pub fn sqlite(pool: sqlx::SqlitePool, config: AdminConfig) -> Self {
        Self::new(SqliteProvider::new(pool), config)
    }
}

#[cfg(feature = "postgres")]
impl DbAdminLayer<PostgresProvider> {
    /// Create an admin layer for PostgreSQL
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    /// * `config` - Admin settings; `database_url` should match the pool
    pub fn postgres(pool: sqlx::PgPool, config: AdminConfig) -> Self {
        Self::new(PostgresProvider::new(pool), config)
    }
}
