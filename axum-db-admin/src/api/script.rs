//! SQL script upload endpoint

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::AdminState;
use crate::database::traits::DatabaseProvider;
use crate::gate::{run_script, ScriptError};
use crate::names::normalize_sql_filename;
use crate::schema::ScriptView;

/// Multipart field carrying the script
pub const UPLOAD_FIELD: &str = "archivo";

struct Upload {
    file_name: Option<String>,
    contents: String,
}

/// Handler for POST /ejecutar-sql
///
/// Runs an uploaded SQL file through the denylist, then executes it statement
/// by statement.
///
/// # Security Warning
///
/// The denylist only rejects DROP, ALTER, DELETE, UPDATE, TRUNCATE, RENAME and
/// MODIFY COLUMN. Everything else in the file is executed.
///
/// Response (success):
/// ```json
/// {
///   "message": "SQL file executed successfully.",
///   "results": [{ "index": 1, "sql": "SELECT 1", "columns": ["1"], "rows": [[1]] }]
/// }
/// ```
///
/// Response (rejected):
/// ```json
/// {
///   "error": "The file contains a forbidden instruction (DROP) in statement #2: DROP TABLE film"
/// }
/// ```
pub async fn execute_script_handler<DB: DatabaseProvider>(
    State(state): State<Arc<AdminState<DB>>>,
    mut multipart: Multipart,
) -> Json<ScriptView> {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_view(ScriptError::EmptyScript.to_string()),
        Err(error) => {
            tracing::warn!(error = %error, "failed to read uploaded SQL file");
            return error_view(format!("Unexpected error while processing the SQL file: {}", error));
        }
    };

    let file = normalize_sql_filename(upload.file_name.as_deref().unwrap_or_default());
    tracing::info!(%file, bytes = upload.contents.len(), "running uploaded SQL file");

    match run_script(&*state.database, &upload.contents).await {
        Ok(report) => Json(ScriptView {
            message: Some(report.message),
            results: (!report.results.is_empty()).then_some(report.results),
            error: None,
        }),
        Err(error) => error_view(error.to_string()),
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Some(Upload {
            file_name,
            contents: String::from_utf8_lossy(&bytes).into_owned(),
        }));
    }

    Ok(None)
}

fn error_view(error: String) -> Json<ScriptView> {
    Json(ScriptView {
        message: None,
        results: None,
        error: Some(error),
    })
}
