//! Data types shared between the database layer and the HTTP views
//!
//! Everything here is created per request and discarded after rendering.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::names::TableName;

/// Message returned for every statement that does not produce rows
pub const COMMAND_SUCCESS_MESSAGE: &str = "Statement executed successfully.";

/// A single value read from a result set
///
/// Serializes to the natural JSON value. Decimals and temporal values are
/// rendered as strings to keep precision and the database's own formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Decimal(String),
    Text(String),
    Temporal(String),
}

impl CellValue {
    /// Interpret the value as an integer count
    ///
    /// Numbers are truncated towards zero; text must parse as a whole integer.
    /// Booleans, temporal values and NULL never count.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            CellValue::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            CellValue::Decimal(value) => {
                let integer_part = value.split('.').next().unwrap_or_default();
                match integer_part {
                    "" | "-" => Some(0),
                    digits => digits.parse().ok(),
                }
            }
            CellValue::Text(value) => value.parse().ok(),
            _ => None,
        }
    }
}

/// One table row: column name to value, in database column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<(String, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Append a column. Insertion order is kept.
    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    /// First value stored under `column`
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Outcome of executing one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Query form: column names and positional rows
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    },

    /// Command form: a fixed success message
    Command { message: String },
}

impl QueryResult {
    pub fn command() -> Self {
        QueryResult::Command {
            message: COMMAND_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Requested page of a table, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Value bound to `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// Value bound to `OFFSET`: `page * page_size`
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.page_size)
    }
}

/// Query string for `GET /tabla/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct TablePageQuery {
    #[serde(default)]
    pub pagina: u32,

    pub tamanio: Option<u32>,
}

/// One page of a table together with what the page view shows around it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub table_name: TableName,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub rows: Vec<TableRow>,
}

/// Query result of one uploaded statement, tagged with its position in the file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResult {
    /// 1-based position among the non-empty statements of the file
    pub index: usize,

    /// Statement text as executed
    pub sql: String,

    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Successful run of an uploaded script
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptReport {
    pub message: String,

    /// Query-form results only, in file order
    pub results: Vec<StatementResult>,
}

/// View model for `GET /tablas`
#[derive(Debug, Clone, Default, Serialize)]
pub struct TablesView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// View model for `GET /tabla/{name}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableView {
    #[serde(flatten)]
    pub page: Option<TablePage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// View model for `POST /ejecutar-sql`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<StatementResult>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A canned query result shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct NamedResult {
    pub key: String,
    pub file: String,
    pub result: QueryResult,
}

/// View model for `GET /dashboard`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub charts: Vec<NamedResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_customers: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_countries: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_films: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        let page = PageRequest::new(2, 10);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 20);

        let huge = PageRequest::new(u32::MAX, u32::MAX);
        assert_eq!(huge.offset(), i64::from(u32::MAX) * i64::from(u32::MAX));
    }

    #[test]
    fn test_cell_value_as_integer() {
        assert_eq!(CellValue::Integer(42).as_integer(), Some(42));
        assert_eq!(CellValue::Float(7.9).as_integer(), Some(7));
        assert_eq!(CellValue::Decimal("599.00".into()).as_integer(), Some(599));
        assert_eq!(CellValue::Decimal("-3.5".into()).as_integer(), Some(-3));
        assert_eq!(CellValue::Text("16".into()).as_integer(), Some(16));
        assert_eq!(CellValue::Text("abc".into()).as_integer(), None);
        assert_eq!(CellValue::Text(" 16".into()).as_integer(), None);
        assert_eq!(CellValue::Boolean(true).as_integer(), None);
        assert_eq!(CellValue::Temporal("2005-05-24".into()).as_integer(), None);
        assert_eq!(CellValue::Null.as_integer(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_integer(), None);
    }

    #[test]
    fn test_table_row_preserves_column_order() {
        let mut row = TableRow::new();
        row.push("zeta", CellValue::Integer(1));
        row.push("alpha", CellValue::Text("a".into()));
        row.push("mid", CellValue::Null);

        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(row.get("alpha"), Some(&CellValue::Text("a".into())));
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"zeta":1,"alpha":"a","mid":null}"#
        );
    }

    #[test]
    fn test_query_result_serialization_shapes() {
        let rows = QueryResult::Rows {
            columns: vec!["total".into()],
            rows: vec![vec![CellValue::Integer(42)]],
        };
        assert_eq!(
            serde_json::to_value(&rows).unwrap(),
            serde_json::json!({ "columns": ["total"], "rows": [[42]] })
        );

        let command = QueryResult::command();
        assert!(matches!(command, QueryResult::Command { .. }));
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            serde_json::json!({ "message": COMMAND_SUCCESS_MESSAGE })
        );
    }

    #[test]
    fn test_views_skip_empty_fields() {
        let view = TablesView {
            tables: None,
            error: Some("boom".into()),
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({ "error": "boom" })
        );
    }
}
