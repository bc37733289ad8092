//! Settings the admin router is constructed with

use serde::Deserialize;
use std::path::PathBuf;

use crate::dashboard::CannedQueries;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 500;

/// Explicit configuration for [`crate::DbAdminLayer`]
///
/// The connection string drives the schema name used when listing tables; the
/// pool itself is built by the host application.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Connection string of the administered database
    pub database_url: String,

    /// Directory with canned `.sql` files; the embedded set is used when unset
    pub canned_query_directory: Option<PathBuf>,

    /// Page size when the request does not ask for one
    pub default_page_size: u32,

    /// Upper bound applied to requested page sizes
    pub max_page_size: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            canned_query_directory: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl AdminConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    pub fn with_canned_query_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.canned_query_directory = Some(directory.into());
        self
    }

    pub fn with_page_sizes(mut self, default_page_size: u32, max_page_size: u32) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    pub fn canned_queries(&self) -> CannedQueries {
        CannedQueries::from_directory(self.canned_query_directory.clone())
    }

    /// Requested page size, or the default, clamped to `1..=max_page_size`
    pub fn effective_page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}
