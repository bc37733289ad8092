//! Dashboard endpoint

use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::api::AdminState;
use crate::database::traits::DatabaseProvider;
use crate::schema::DashboardView;

/// Handler for GET /dashboard
///
/// Returns the chart datasets and the customer, country and film totals.
pub async fn dashboard_handler<DB: DatabaseProvider>(
    State(state): State<Arc<AdminState<DB>>>,
) -> Json<DashboardView> {
    let mut view = state.dashboard.load().await;
    if let Some(error) = view.error.take() {
        view.error = Some(format!("Database error: {}", error));
    }
    Json(view)
}
