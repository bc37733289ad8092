//! PostgreSQL database provider implementation

use crate::database::traits::{is_select_statement, DatabaseError, DatabaseProvider};
use crate::names::TableName;
use crate::schema::{CellValue, PageRequest, QueryResult, TableRow};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::types::PgInterval;
use sqlx::postgres::{PgColumn, PgRow};
use std::fmt::Display;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::types::{BigDecimal, Uuid};
use sqlx::{Column, Executor, PgPool, Postgres, Row, Statement, TypeInfo, ValueRef};

/// PostgreSQL database provider
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    /// Create a new PostgreSQL provider
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, DatabaseError> {
        self.pool
            .acquire()
            .await
            .map_err(|error| DatabaseError::from_driver("acquire a connection", error))
    }

    fn row_to_table_row(row: &PgRow) -> Result<TableRow, DatabaseError> {
        let mut table_row = TableRow::with_capacity(row.len());
        for column in row.columns() {
            table_row.push(column.name(), Self::extract_column_value(row, column)?);
        }
        Ok(table_row)
    }

    fn row_to_values(row: &PgRow) -> Result<Vec<CellValue>, DatabaseError> {
        row.columns()
            .iter()
            .map(|column| Self::extract_column_value(row, column))
            .collect()
    }

    /// Convert one PostgreSQL value into a cell, keeping its native kind
    fn extract_column_value(row: &PgRow, column: &PgColumn) -> Result<CellValue, DatabaseError> {
        let index = column.ordinal();
        let raw = row
            .try_get_raw(index)
            .map_err(|error| DatabaseError::from_driver("read a column value", error))?;

        if raw.is_null() {
            return Ok(CellValue::Null);
        }

        let decode_error = |error| DatabaseError::from_driver("read a column value", error);

        let value = match column.type_info().name() {
            "BOOL" => CellValue::Boolean(row.try_get::<bool, _>(index).map_err(decode_error)?),
            "INT2" => CellValue::Integer(i64::from(row.try_get::<i16, _>(index).map_err(decode_error)?)),
            "INT4" => CellValue::Integer(i64::from(row.try_get::<i32, _>(index).map_err(decode_error)?)),
            "INT8" => CellValue::Integer(row.try_get::<i64, _>(index).map_err(decode_error)?),
            "FLOAT4" => CellValue::Float(f64::from(row.try_get::<f32, _>(index).map_err(decode_error)?)),
            "FLOAT8" => CellValue::Float(row.try_get::<f64, _>(index).map_err(decode_error)?),
            "NUMERIC" => CellValue::Decimal(
                row.try_get::<BigDecimal, _>(index)
                    .map_err(decode_error)?
                    .to_string(),
            ),
            "TEXT" | "VARCHAR" | "CHAR" | "NAME" | "BPCHAR" => {
                CellValue::Text(row.try_get::<String, _>(index).map_err(decode_error)?)
            }
            "TIMESTAMP" => CellValue::Temporal(
                row.try_get::<NaiveDateTime, _>(index)
                    .map_err(decode_error)?
                    .to_string(),
            ),
            "TIMESTAMPTZ" => CellValue::Temporal(
                row.try_get::<DateTime<Utc>, _>(index)
                    .map_err(decode_error)?
                    .to_rfc3339(),
            ),
            "DATE" => CellValue::Temporal(
                row.try_get::<NaiveDate, _>(index)
                    .map_err(decode_error)?
                    .to_string(),
            ),
            "TIME" => CellValue::Temporal(
                row.try_get::<NaiveTime, _>(index)
                    .map_err(decode_error)?
                    .to_string(),
            ),
            "UUID" => CellValue::Text(row.try_get::<Uuid, _>(index).map_err(decode_error)?.to_string()),
            "JSON" | "JSONB" => CellValue::Text(
                row.try_get::<sqlx::types::JsonValue, _>(index)
                    .map_err(decode_error)?
                    .to_string(),
            ),
            "BYTEA" => {
                let bytes: Vec<u8> = row.try_get(index).map_err(decode_error)?;
                CellValue::Text(format!("[BLOB: {} bytes]", bytes.len()))
            }
            "INTERVAL" => CellValue::Text(format_interval(
                &row.try_get::<PgInterval, _>(index).map_err(decode_error)?,
            )),
            "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => CellValue::Text(format_array(
                &row.try_get::<Vec<Option<String>>, _>(index).map_err(decode_error)?,
            )),
            "INT2[]" => CellValue::Text(format_array(
                &row.try_get::<Vec<Option<i16>>, _>(index).map_err(decode_error)?,
            )),
            "INT4[]" => CellValue::Text(format_array(
                &row.try_get::<Vec<Option<i32>>, _>(index).map_err(decode_error)?,
            )),
            "INT8[]" => CellValue::Text(format_array(
                &row.try_get::<Vec<Option<i64>>, _>(index).map_err(decode_error)?,
            )),
            "BOOL[]" => CellValue::Text(format_array(
                &row.try_get::<Vec<Option<bool>>, _>(index).map_err(decode_error)?,
            )),
            // Enums and other text-compatible types decode as strings; anything
            // the driver refuses is shown by its type name
            other => match row.try_get::<String, _>(index) {
                Ok(text) => CellValue::Text(text),
                Err(_) => CellValue::Text(format!("[{}]", other)),
            },
        };

        Ok(value)
    }
}

/// Render an array in PostgreSQL's text form: `{a,"b c",NULL}`
fn format_array<T: Display>(items: &[Option<T>]) -> String {
    let elements: Vec<String> = items
        .iter()
        .map(|item| match item {
            None => "NULL".to_string(),
            Some(value) => quote_array_element(&value.to_string()),
        })
        .collect();

    format!("{{{}}}", elements.join(","))
}

fn quote_array_element(element: &str) -> String {
    let needs_quotes = element.is_empty()
        || element.eq_ignore_ascii_case("NULL")
        || element
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '{' | '}' | '"' | '\\'));

    if !needs_quotes {
        return element.to_string();
    }

    let escaped = element.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Render an interval the way PostgreSQL's default `IntervalStyle` does:
/// `1 year 2 mons 3 days 04:05:06.5`
fn format_interval(interval: &PgInterval) -> String {
    let mut parts = Vec::new();

    let years = interval.months / 12;
    let months = interval.months % 12;
    for (amount, singular, plural) in [(years, "year", "years"), (months, "mon", "mons"), (interval.days, "day", "days")] {
        if amount != 0 {
            parts.push(format!("{} {}", amount, if amount.abs() == 1 { singular } else { plural }));
        }
    }

    if interval.microseconds != 0 || parts.is_empty() {
        let sign = if interval.microseconds < 0 { "-" } else { "" };
        let total = interval.microseconds.unsigned_abs();
        let hours = total / 3_600_000_000;
        let minutes = total / 60_000_000 % 60;
        let seconds = total / 1_000_000 % 60;
        let fraction = total % 1_000_000;

        let mut time = format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds);
        if fraction != 0 {
            time.push_str(format!(".{:06}", fraction).trim_end_matches('0'));
        }
        parts.push(time);
    }

    parts.join(" ")
}

#[async_trait]
impl DatabaseProvider for PostgresProvider {
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DatabaseError> {
        // The last URL segment names the database, which is the catalog in
        // information_schema terms
        let query = r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_catalog = $1
              AND table_type = 'BASE TABLE'
              AND table_schema NOT IN ('pg_catalog', 'information_schema')
            ORDER BY table_name
        "#;

        let mut connection = self.acquire().await?;
        sqlx::query_scalar::<_, String>(query)
            .bind(schema)
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
        let select_query = format!("SELECT * FROM {} LIMIT $1 OFFSET $2", table);

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
