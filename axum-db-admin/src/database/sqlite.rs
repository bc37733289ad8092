//! SQLite database provider implementation

use crate::database::traits::{is_select_statement, DatabaseError, DatabaseProvider};
use crate::names::TableName;
use crate::schema::{CellValue, PageRequest, QueryResult, TableRow};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteColumn, SqliteRow};
use sqlx::{Column, Executor, Row, Sqlite, SqlitePool, Statement, TypeInfo, ValueRef};

/// SQLite database provider
pub struct SqliteProvider {
    pool: SqlitePool,
}

impl SqliteProvider {
    /// Create a new SQLite provider
    ///
    /// # Arguments
    ///
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, DatabaseError> {
        self.pool
            .acquire()
            .await
            .map_err(|error| DatabaseError::from_driver("acquire a connection", error))
    }

    /// Convert a SQLite row into an ordered column -> value row
    fn row_to_table_row(row: &SqliteRow) -> Result<TableRow, DatabaseError> {
        let mut table_row = TableRow::with_capacity(row.len());
        for column in row.columns() {
            table_row.push(column.name(), Self::extract_column_value(row, column)?);
        }
        Ok(table_row)
    }

    /// Convert a SQLite row into positional values
    fn row_to_values(row: &SqliteRow) -> Result<Vec<CellValue>, DatabaseError> {
        row.columns()
            .iter()
            .map(|column| Self::extract_column_value(row, column))
            .collect()
    }

    /// Extract a column value from a SQLite row
    ///
    /// SQLite is dynamically typed: the declared column type only tells us
    /// about booleans and dates, everything else follows the storage class of
    /// the value itself.
    fn extract_column_value(row: &SqliteRow, column: &SqliteColumn) -> Result<CellValue, DatabaseError> {
        let index = column.ordinal();
        let raw = row
            .try_get_raw(index)
            .map_err(|error| DatabaseError::from_driver("read a column value", error))?;

        if raw.is_null() {
            return Ok(CellValue::Null);
        }

        let storage_class = raw.type_info().name().to_uppercase();

        match column.type_info().name().to_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => {
                if let Ok(value) = row.try_get::<bool, _>(index) {
                    return Ok(CellValue::Boolean(value));
                }
            }
            "DATE" | "DATETIME" | "TIMESTAMP" | "TIME" => {
                if let Ok(value) = row.try_get::<String, _>(index) {
                    return Ok(CellValue::Temporal(value));
                }
            }
            _ => {}
        }

        match storage_class.as_str() {
            "INTEGER" => {
                if let Ok(value) = row.try_get::<i64, _>(index) {
                    return Ok(CellValue::Integer(value));
                }
            }
            "REAL" => {
                if let Ok(value) = row.try_get::<f64, _>(index) {
                    return Ok(CellValue::Float(value));
                }
            }
            "TEXT" => {
                if let Ok(value) = row.try_get::<String, _>(index) {
                    return Ok(CellValue::Text(value));
                }
            }
            "BLOB" => {
                if let Ok(value) = row.try_get::<Vec<u8>, _>(index) {
                    return Ok(CellValue::Text(format!("[BLOB: {} bytes]", value.len())));
                }
            }
            _ => {}
        }

        // Fallback: try common types in order
        if let Ok(value) = row.try_get::<i64, _>(index) {
            return Ok(CellValue::Integer(value));
        }
        if let Ok(value) = row.try_get::<f64, _>(index) {
            return Ok(CellValue::Float(value));
        }
        if let Ok(value) = row.try_get::<String, _>(index) {
            return Ok(CellValue::Text(value));
        }

        Ok(CellValue::Null)
    }
}

#[async_trait]
impl DatabaseProvider for SqliteProvider {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DatabaseError> {
        // A SQLite file is a single schema, the derived name only identifies it
        tracing::debug!(schema, "listing tables of the main SQLite schema");

        let mut connection = self.acquire().await?;
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut *connection)
        .await
        .map_err(|error| DatabaseError::from_driver("list the tables", error))
    }

    async fn count_rows(&self, table: &TableName) -> Result<u64, DatabaseError> {
        let count_query = format!("SELECT COUNT(*) AS total FROM {}", table);

        let mut connection = self.acquire().await?;
        let total: Option<i64> = sqlx::query_scalar(&count_query)
            .fetch_optional(&mut *connection)
            .await
            .map_err(|error| DatabaseError::from_driver("count the rows of the table", error))?;

        Ok(total.unwrap_or(0).max(0) as u64)
    }

    async fn fetch_page(
        &self,
        table: &TableName,
        page: PageRequest,
    ) -> Result<Vec<TableRow>, DatabaseError> {
        let select_query = format!("SELECT * FROM {} LIMIT ? OFFSET ?", table);

        let mut connection = self.acquire().await?;
        let rows = sqlx::query(&select_query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *connection)
            .await
            .map_err(|error| DatabaseError::from_driver("read the table data", error))?;

        rows.iter().map(Self::row_to_table_row).collect()
    }

    async fn execute(&self, statement: &str) -> Result<QueryResult, DatabaseError> {
        let statement = statement.trim();
        let mut connection = self.acquire().await?;

        if !is_select_statement(statement) {
            sqlx::query(statement)
                .execute(&mut *connection)
                .await
                .map_err(|error| DatabaseError::from_driver("execute the statement", error))?;
            return Ok(QueryResult::command());
        }

        let rows = sqlx::query(statement)
            .fetch_all(&mut *connection)
            .await
            .map_err(|error| DatabaseError::from_driver("execute the statement", error))?;

        // An empty result still reports its columns through the prepared statement
        let columns = match rows.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect(),
            None => (&mut *connection)
                .prepare(statement)
                .await
                .map_err(|error| DatabaseError::from_driver("execute the statement", error))?
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect(),
        };

        let rows = rows
            .iter()
            .map(Self::row_to_values)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult::Rows { columns, rows })
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        let mut connection = self.acquire().await?;
        sqlx::query("SELECT 1")
            .execute(&mut *connection)
            .await
            .map_err(|error| DatabaseError::from_driver("reach the database", error))?;
        Ok(())
    }
}
