//! HTTP endpoints
//!
//! Every view endpoint answers `200 OK` with a JSON view model. Failures are
//! logged and turned into the view's `error` field so the page still renders.

use std::sync::Arc;

use crate::browser::TableBrowser;
use crate::config::AdminConfig;
use crate::dashboard::Dashboard;
use crate::database::traits::DatabaseProvider;

pub mod dashboard;
pub mod health;
pub mod script;
pub mod tables;

// Re-export handlers for convenience
pub use dashboard::dashboard_handler;
pub use health::health_handler;
pub use script::execute_script_handler;
pub use tables::{list_tables_handler, show_table_handler};

/// Shared state behind every endpoint
pub struct AdminState<DB: DatabaseProvider> {
    pub database: Arc<DB>,
    pub browser: TableBrowser<DB>,
    pub dashboard: Dashboard<DB>,
    pub config: AdminConfig,
}

impl<DB: DatabaseProvider> AdminState<DB> {
    pub fn new(database: Arc<DB>, config: AdminConfig) -> Self {
        Self {
            browser: TableBrowser::new(database.clone(), config.database_url.clone()),
            dashboard: Dashboard::new(database.clone(), config.canned_queries()),
            database,
            config,
        }
    }
}
