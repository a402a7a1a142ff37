//! Budget CRUD HTTP handlers.
//!
//! This module implements the budget endpoints:
//! - GET /budgets - List all budgets, oldest month first
//! - GET /budgets/{month} - Get one budget
//! - POST /budgets - Create a budget
//! - PUT /budgets/{month} - Update some or all amounts of a budget
//! - DELETE /budgets/{month} - Delete a budget
//!
//! The `month` path segment is used as-is: it is neither trimmed nor
//! checked against the "YYYY-MM" convention.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    extract::AppJson,
    models::budget::{
        Budget, CreateBudgetRequest, MessageResponse, UpdateBudgetRequest, current_timestamp,
    },
    services::budget_store::BudgetStore,
};

/// List every budget.
///
/// # Response
///
/// - **Success (200 OK)**: Array of budgets ordered by month ascending (may be empty)
/// - **Error (500)**: Database error
pub async fn list_budgets<S: BudgetStore>(
    State(store): State<S>,
) -> Result<Json<Vec<Budget>>, AppError> {
    let budgets = store.list().await?;

    Ok(Json(budgets))
}

/// Get the budget for one month.
///
/// # Response
///
/// - **Success (200 OK)**: The budget
/// - **Error (404)**: No budget for this month
/// - **Error (500)**: Database error
pub async fn get_budget<S: BudgetStore>(
    State(store): State<S>,
    Path(month): Path<String>,
) -> Result<Json<Budget>, AppError> {
    let budget = store.get(&month).await?.ok_or(AppError::NotFound)?;

    Ok(Json(budget))
}

/// Create a new budget.
///
/// # Request Body
///
/// ```json
/// {
///   "month": "2025-01",
///   "income": 5000,
///   "bills": 1200
/// }
/// ```
///
/// Omitted amounts are stored as 0.
///
/// # Response
///
/// - **Success (201 Created)**: The stored budget
/// - **Error (400)**: Malformed body or empty month
/// - **Error (500)**: Database error, including a budget for this month already existing
pub async fn create_budget<S: BudgetStore>(
    State(store): State<S>,
    AppJson(request): AppJson<CreateBudgetRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_month(&request.month)?;

    let budget = store
        .create(request.into_budget(current_timestamp()))
        .await?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// Update an existing budget.
///
/// # Request Body
///
/// Any subset of the amounts, e.g.
///
/// ```json
/// { "food": 450 }
/// ```
///
/// Amounts missing from the body keep their stored value. Amounts present in
/// the body are written, including `0` and `null`. `updated_at` is always refreshed.
///
/// # Response
///
/// - **Success (200 OK)**: The updated budget
/// - **Error (400)**: Malformed body
/// - **Error (404)**: No budget for this month
/// - **Error (500)**: Database error
pub async fn update_budget<S: BudgetStore>(
    State(store): State<S>,
    Path(month): Path<String>,
    AppJson(changes): AppJson<UpdateBudgetRequest>,
) -> Result<Json<Budget>, AppError> {
    let budget = store
        .update(&month, changes, current_timestamp())
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(budget))
}

/// Delete the budget for one month.
///
/// # Response
///
/// - **Success (200 OK)**: `{"message": "Budget deleted successfully"}`
/// - **Error (404)**: No budget for this month
/// - **Error (500)**: Database error
pub async fn delete_budget<S: BudgetStore>(
    State(store): State<S>,
    Path(month): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !store.delete(&month).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(MessageResponse {
        message: "Budget deleted successfully".to_string(),
    }))
}

/// Reject an empty or whitespace-only month before it becomes a primary key.
pub(crate) fn require_month(month: &str) -> Result<(), AppError> {
    if month.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "month must not be empty".to_string(),
        ));
    }

    Ok(())
}
