//! Database provider trait
//!
//! This trait defines the interface that all database implementations must provide.

use crate::names::TableName;
use crate::schema::{PageRequest, QueryResult, TableRow};
use async_trait::async_trait;
use thiserror::Error;

/// Database provider trait for table browsing and statement execution
///
/// Every method acquires one pooled connection for its whole duration and
/// hands it back to the pool when it returns, on success and on error.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + 'static {
    /// List the names of all base tables in `schema`
    ///
    /// # Arguments
    ///
    /// * `schema` - Schema (database) name derived from the connection string
    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DatabaseError>;

    /// Count the rows of an already normalized table, 0 when nothing comes back
    async fn count_rows(&self, table: &TableName) -> Result<u64, DatabaseError>;

    /// Fetch one page of rows, binding `LIMIT` and `OFFSET` as parameters
    ///
    /// # Arguments
    ///
    /// * `table` - Normalized table name, interpolated into the statement
    /// * `page` - Page number and page size
    ///
    /// # Returns
    ///
    /// Rows with their columns in database order
    async fn fetch_page(
        &self,
        table: &TableName,
        page: PageRequest,
    ) -> Result<Vec<TableRow>, DatabaseError>;

    /// Execute a single statement
    ///
    /// Statements starting with `SELECT` return [`QueryResult::Rows`]; any
    /// other statement is executed as a command and returns
    /// [`QueryResult::Command`].
    ///
    /// # Security Warning
    ///
    /// Apart from what the caller already filtered, anything is executed.
    async fn execute(&self, statement: &str) -> Result<QueryResult, DatabaseError>;

    /// Cheap connectivity probe
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Whether a statement runs as a query returning rows
pub fn is_select_statement(statement: &str) -> bool {
    statement
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("SELECT"))
}

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Malformed SQL, or a statement naming an object that does not exist
    #[error("The SQL statement is not valid while trying to {action}: {detail}")]
    Syntax { action: String, detail: String },

    /// The database refused the operation for the connected user
    #[error("Insufficient privilege to {action}: {detail}")]
    Permission { action: String, detail: String },

    /// The database could not be reached
    #[error("Could not connect to the database: {0}")]
    Connection(String),

    /// Any other failure reported by the driver
    #[error("Could not {action}: {detail}")]
    Execution { action: String, detail: String },

    /// No valid identifier could be derived from the requested name
    #[error("No valid table name could be derived from '{raw}'")]
    InvalidName { raw: String },

    /// A canned query could not be loaded, read or executed
    #[error("Could not load, read or execute the SQL file '{file}': {detail}")]
    ResourceLoad { file: String, detail: String },

    /// The connection string does not name a schema
    #[error("Invalid database URL: {0}")]
    InvalidConfiguration(String),
}

impl DatabaseError {
    /// Translate a driver error into the taxonomy above
    ///
    /// This is the only place that inspects driver errors. Permission errors
    /// are detected by sniffing the message text, which differs between
    /// engines; replace with engine-specific error codes here if needed.
    pub fn from_driver(action: &str, error: sqlx::Error) -> Self {
        let detail = error.to_string();

        if detail.to_lowercase().contains("denied") {
            return DatabaseError::Permission {
                action: action.to_string(),
                detail,
            };
        }

        match &error {
            sqlx::Error::Database(database_error) if is_syntax_class(&**database_error) => {
                DatabaseError::Syntax {
                    action: action.to_string(),
                    detail,
                }
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseError::Connection(detail),
            _ => DatabaseError::Execution {
                action: action.to_string(),
                detail,
            },
        }
    }

    /// Whether the underlying failure is of the syntax class
    pub fn is_syntax(&self) -> bool {
        matches!(self, DatabaseError::Syntax { .. })
    }
}

/// SQLSTATE class 42 covers syntax errors and access to undefined objects.
/// SQLite reports no SQLSTATE, only its message text.
fn is_syntax_class(error: &dyn sqlx::error::DatabaseError) -> bool {
    if let Some(code) = error.code() {
        if code.starts_with("42") {
            return true;
        }
    }

    let message = error.message().to_lowercase();
    message.contains("syntax error")
        || message.contains("no such table")
        || message.contains("no such column")
        || message.contains("incomplete input")
}
