//! Identifier normalization
//!
//! Table names end up interpolated into raw SQL (`SELECT * FROM <name>`) and
//! canned-query names end up as file paths. Neither can be bound as a query
//! parameter, so both go through the whitelists in this module first. The
//! [`TableName`] and [`SqlFileName`] newtypes can only be built here.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Returned when no valid table name can be derived from the input
pub const INVALID_TABLE_NAME: &str = "tabla_invalida";

/// Returned when no valid SQL file name can be derived from the input
pub const INVALID_SQL_FILENAME: &str = "archivo_invalido.sql";

/// Characters that always send the input to the sentinel instead of being
/// rewritten: string/identifier quotes, statement separators and path separators.
const REJECTED_CHARACTERS: &[char] = &['\'', '"', '`', ';', '/', '\\'];

static INVALID_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_.\-]").expect("valid character class"));

static TABLE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("valid table name pattern"));

static SQL_FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.\-]+\.sql$").expect("valid file name pattern"));

/// Trim, lowercase and replace every character outside `[a-z0-9_.-]` with `_`
///
/// Never fails. Empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    INVALID_CHARACTERS.replace_all(&lowered, "_").into_owned()
}

/// Normalize a user-supplied table name
///
/// Falls back to [`INVALID_TABLE_NAME`] when the normalized form does not match
/// `^[a-z0-9_]+$`. Lookups against the sentinel are expected to miss.
pub fn normalize_table_name(raw: &str) -> TableName {
    if raw.contains(REJECTED_CHARACTERS) {
        return TableName(INVALID_TABLE_NAME.to_string());
    }

    let normalized = normalize(raw);
    if TABLE_NAME_PATTERN.is_match(&normalized) {
        TableName(normalized)
    } else {
        TableName(INVALID_TABLE_NAME.to_string())
    }
}

/// Normalize a canned-query or uploaded file name, appending `.sql` if missing
pub fn normalize_sql_filename(raw: &str) -> SqlFileName {
    if raw.contains(REJECTED_CHARACTERS) {
        return SqlFileName(INVALID_SQL_FILENAME.to_string());
    }

    let mut normalized = normalize(raw);
    if !normalized.ends_with(".sql") {
        normalized.push_str(".sql");
    }

    if SQL_FILENAME_PATTERN.is_match(&normalized) {
        SqlFileName(normalized)
    } else {
        SqlFileName(INVALID_SQL_FILENAME.to_string())
    }
}

/// A whitelisted table name, safe to interpolate into SQL text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization gave up and produced the sentinel
    pub fn is_sentinel(&self) -> bool {
        self.0 == INVALID_TABLE_NAME
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// A whitelisted `.sql` file name with no path components
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SqlFileName(String);

impl SqlFileName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_sentinel(&self) -> bool {
        self.0 == INVALID_SQL_FILENAME
    }
}

impl fmt::Display for SqlFileName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
