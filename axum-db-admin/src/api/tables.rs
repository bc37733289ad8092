//! Table listing and table page endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
};
use std::sync::Arc;

use crate::api::AdminState;
use crate::database::traits::DatabaseProvider;
use crate::schema::{PageRequest, TablePageQuery, TableView, TablesView};

/// Handler for GET /tablas
///
/// Lists the tables of the schema named by the configured connection string.
pub async fn list_tables_handler<DB: DatabaseProvider>(
    State(state): State<Arc<AdminState<DB>>>,
) -> Json<TablesView> {
    match state.browser.list_tables().await {
        Ok(tables) => Json(TablesView {
            tables: Some(tables),
            error: None,
        }),
        Err(error) => {
            tracing::error!(error = %error, "failed to list tables");
            Json(TablesView {
                tables: None,
                error: Some(format!("Database error: {}", error)),
            })
        }
    }
}

/// Handler for GET /tabla/{name}
///
/// Query parameters:
/// - pagina: zero-based page number (default: 0)
/// - tamanio: rows per page (default: 20, clamped to the configured maximum)
///
/// # Arguments
///
/// * `state` - Shared admin state
/// * `table_name` - Raw table name from the path, normalized before use
/// * `query` - Pagination parameters; a malformed query string becomes the error banner
pub async fn show_table_handler<DB: DatabaseProvider>(
    State(state): State<Arc<AdminState<DB>>>,
    Path(table_name): Path<String>,
    query: Result<Query<TablePageQuery>, QueryRejection>,
) -> Json<TableView> {
    // Negative or non-numeric paging values still render the page, with a banner
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            tracing::warn!(table = %table_name, error = %rejection.body_text(), "invalid pagination parameters");
            return Json(TableView {
                page: None,
                error: Some(format!("Invalid pagination parameters: {}", rejection.body_text())),
            });
        }
    };

    let page = PageRequest::new(query.pagina, state.config.effective_page_size(query.tamanio));

    match state.browser.table_page(&table_name, page).await {
        Ok(table_page) => Json(TableView {
            page: Some(table_page),
            error: None,
        }),
        Err(error) => {
            tracing::warn!(table = %table_name, error = %error, "failed to show table");
            Json(TableView {
                page: None,
                error: Some(format!(
                    "Could not reach the database or the table does not exist: {}",
                    error
                )),
            })
        }
    }
}
