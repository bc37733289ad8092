//! Uploaded SQL scripts: comment stripping, statement splitting and the
//! keyword denylist
//!
//! The denylist is NOT a security boundary. It does not look at CREATE, GRANT
//! or vendor-specific destructive syntax, and a keyword hidden inside a string
//! literal or produced by dynamic SQL slips through. Blocking those properly
//! needs a real SQL parser. Splitting on `;` is just as naive: a semicolon
//! inside a string literal splits the statement.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::database::{DatabaseError, DatabaseProvider};
use crate::schema::{QueryResult, ScriptReport, StatementResult};

/// Message shown after every statement of a script ran
pub const SCRIPT_SUCCESS_MESSAGE: &str = "SQL file executed successfully.";

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*--.*$").expect("valid line comment pattern"));

// `.` does not cross newlines: block comments spanning lines are left in place
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*.*?\*/").expect("valid block comment pattern"));

static FORBIDDEN_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(DROP|ALTER|DELETE|UPDATE|TRUNCATE|RENAME|MODIFY\s+COLUMN)\b")
        .expect("valid denylist pattern")
});

/// Strip comments and split a script into its non-empty, trimmed statements
pub fn sanitize_and_split(script: &str) -> Vec<String> {
    let without_line_comments = LINE_COMMENT.replace_all(script, "");
    let without_comments = BLOCK_COMMENT.replace_all(&without_line_comments, "");

    without_comments
        .trim()
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a statement contains a denylisted keyword as a whole word
pub fn statement_is_forbidden(statement: &str) -> bool {
    FORBIDDEN_KEYWORDS.is_match(statement)
}

/// The first denylisted keyword in a statement, uppercased
pub fn forbidden_keyword(statement: &str) -> Option<String> {
    FORBIDDEN_KEYWORDS.find(statement).map(|keyword| {
        keyword
            .as_str()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase()
    })
}

/// Why an uploaded script did not run to completion
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Nothing was uploaded
    #[error("Select a valid SQL file to upload.")]
    EmptyScript,

    /// A statement hit the denylist; nothing was executed
    #[error("The file contains a forbidden instruction ({keyword}) in statement #{index}: {statement}")]
    Forbidden {
        index: usize,
        keyword: String,
        statement: String,
    },

    /// A statement failed; statements before it stay executed
    #[error("Error in statement #{index}: {source}")]
    Statement {
        index: usize,
        #[source]
        source: DatabaseError,
    },
}

/// Validate and run an uploaded script
///
/// Every statement is checked against the denylist before the first one is
/// executed, so a forbidden statement anywhere in the file means nothing runs.
/// Statements then execute one at a time in file order. There is no
/// transaction around the file: when statement `n` fails, statements `1..n`
/// stay applied and the rest is skipped.
///
/// Statement indexes are 1-based and only count non-empty statements.
pub async fn run_script<DB>(database: &DB, script: &str) -> Result<ScriptReport, ScriptError>
where
    DB: DatabaseProvider + ?Sized,
{
    if script.trim().is_empty() {
        return Err(ScriptError::EmptyScript);
    }

    let statements = sanitize_and_split(script);

    for (position, statement) in statements.iter().enumerate() {
        if let Some(keyword) = forbidden_keyword(statement) {
            tracing::warn!(index = position + 1, %keyword, "rejecting uploaded SQL script");
            return Err(ScriptError::Forbidden {
                index: position + 1,
                keyword,
                statement: statement.clone(),
            });
        }
    }

    let mut results = Vec::new();
    for (position, statement) in statements.into_iter().enumerate() {
        let index = position + 1;

        match database.execute(&statement).await {
            Ok(QueryResult::Rows { columns, rows }) => results.push(StatementResult {
                index,
                sql: statement,
                columns,
                rows,
            }),
            Ok(QueryResult::Command { .. }) => {}
            Err(source) => {
                tracing::warn!(index, error = %source, "uploaded SQL statement failed");
                return Err(ScriptError::Statement { index, source });
            }
        }
    }

    tracing::info!(results = results.len(), "uploaded SQL script executed");

    Ok(ScriptReport {
        message: SCRIPT_SUCCESS_MESSAGE.to_string(),
        results,
    })
}
