//! Table browsing: listing, counting and paging through table rows

use std::sync::Arc;

use crate::database::{DatabaseError, DatabaseProvider};
use crate::names::{normalize_table_name, TableName};
use crate::schema::{PageRequest, TablePage, TableRow};

/// Derive the schema (database) name from a connection string
///
/// Takes the last non-empty `/`-separated segment and drops any `?query`
/// suffix, so `postgres://user@host:5432/sakila?sslmode=disable` gives
/// `sakila`.
pub fn schema_from_url(database_url: &str) -> Result<String, DatabaseError> {
    let segment = database_url
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .ok_or_else(|| DatabaseError::InvalidConfiguration(database_url.to_string()))?;

    let schema = segment.split('?').next().unwrap_or_default();
    if schema.is_empty() {
        return Err(DatabaseError::InvalidConfiguration(database_url.to_string()));
    }

    Ok(schema.to_string())
}

/// Read-only view over the tables of the configured database
pub struct TableBrowser<DB: DatabaseProvider> {
    database: Arc<DB>,
    database_url: String,
}

impl<DB: DatabaseProvider> TableBrowser<DB> {
    /// # Arguments
    ///
    /// * `database` - Provider used for every lookup
    /// * `database_url` - Connection string the schema name is derived from
    pub fn new(database: Arc<DB>, database_url: impl Into<String>) -> Self {
        Self {
            database,
            database_url: database_url.into(),
        }
    }

    /// Names of the base tables in the configured schema
    pub async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let schema = schema_from_url(&self.database_url)?;
        self.database.list_tables(&schema).await
    }

    /// Number of rows in a table, 0 when the count query returns nothing
    pub async fn count_rows(&self, raw_table_name: &str) -> Result<u64, DatabaseError> {
        let table = normalize_table_name(raw_table_name);
        self.database
            .count_rows(&table)
            .await
            .map_err(|error| Self::explain_sentinel(raw_table_name, &table, error))
    }

    /// One page of rows with their columns in database order
    pub async fn fetch_page(
        &self,
        raw_table_name: &str,
        page: PageRequest,
    ) -> Result<Vec<TableRow>, DatabaseError> {
        let table = normalize_table_name(raw_table_name);
        self.database
            .fetch_page(&table, page)
            .await
            .map_err(|error| Self::explain_sentinel(raw_table_name, &table, error))
    }

    /// Everything the table view shows: the page, the normalized name and the
    /// total row count
    pub async fn table_page(
        &self,
        raw_table_name: &str,
        page: PageRequest,
    ) -> Result<TablePage, DatabaseError> {
        let rows = self.fetch_page(raw_table_name, page).await?;
        let total = self.count_rows(raw_table_name).await?;

        Ok(TablePage {
            table_name: normalize_table_name(raw_table_name),
            page: page.page,
            page_size: page.page_size,
            total,
            rows,
        })
    }

    /// A lookup on the sentinel is expected to miss; report it as an invalid
    /// name rather than as a missing table
    fn explain_sentinel(raw_table_name: &str, table: &TableName, error: DatabaseError) -> DatabaseError {
        if table.is_sentinel() && error.is_syntax() {
            DatabaseError::InvalidName {
                raw: raw_table_name.to_string(),
            }
        } else {
            error
        }
    }
}
