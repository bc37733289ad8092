//! Health probe

use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use crate::api::AdminState;
use crate::database::traits::DatabaseProvider;

/// Handler for GET /health
pub async fn health_handler<DB: DatabaseProvider>(
    State(state): State<Arc<AdminState<DB>>>,
) -> (StatusCode, &'static str) {
    match state.database.ping().await {
        Ok(()) => (StatusCode::OK, "Server is healthy"),
        Err(error) => {
            tracing::warn!(error = %error, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}
