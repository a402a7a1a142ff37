//! Sync (upsert) HTTP handler.
//!
//! The client keeps budgets locally and pushes a whole month at a time to
//! `POST /sync`. The month is inserted, or fully overwritten if it already exists.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    error::AppError,
    extract::AppJson,
    handlers::budgets::require_month,
    models::budget::{SyncBudgetRequest, SyncResponse, current_timestamp},
    services::budget_store::BudgetStore,
};

/// Error returned by the sync endpoint.
///
/// Database failures use the sync-specific body
/// `{"success": false, "error": "Failed to sync to database"}` so the client can
/// keep checking `success`. Any other error renders like every other endpoint.
#[derive(Debug)]
pub struct SyncError(AppError);

impl From<AppError> for SyncError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::Database(error) => {
                tracing::error!("Sync error: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to sync to database"
                    })),
                )
                    .into_response()
            }
            other => other.into_response(),
        }
    }
}

/// Insert or overwrite the budget for one month.
///
/// # Request Body
///
/// ```json
/// {
///   "month": "2025-01",
///   "income": 5000,
///   "expenses": {
///     "bills": 1200,
///     "food": 450,
///     "transport": 120,
///     "subscriptions": 35,
///     "miscellaneous": 80
///   }
/// }
/// ```
///
/// Every amount is overwritten; anything missing is stored as `null`.
///
/// # Response
///
/// - **Success (200 OK)**: `{"success": true, "timestamp": 1735689600000}`,
///   where `timestamp` is the stored `updated_at`
/// - **Error (400)**: Malformed body or empty month
/// - **Error (500)**: `{"success": false, "error": "Failed to sync to database"}`
pub async fn sync_budget<S: BudgetStore>(
    State(store): State<S>,
    AppJson(request): AppJson<SyncBudgetRequest>,
) -> Result<Json<SyncResponse>, SyncError> {
    require_month(&request.month)?;

    let timestamp = current_timestamp();
    let month = request.month.clone();

    store.upsert(request.into_budget(timestamp)).await?;

    tracing::info!("Synced: {month}");

    Ok(Json(SyncResponse {
        success: true,
        timestamp,
    }))
}
