//! HTTP routing.

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, services::budget_store::BudgetStore};

/// Build the application router over `store`.
///
/// # Routes
///
/// - `GET /health`
/// - `GET, POST /budgets`
/// - `GET, PUT, DELETE /budgets/{month}`
/// - `POST /sync`
///
/// Every route is wrapped in request tracing and a permissive CORS policy, since
/// the budgeting client is served from a different origin.
pub fn build_router<S: BudgetStore>(store: S) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check::<S>))
        .route(
            "/budgets",
            get(handlers::budgets::list_budgets::<S>).post(handlers::budgets::create_budget::<S>),
        )
        .route(
            "/budgets/{month}",
            get(handlers::budgets::get_budget::<S>)
                .put(handlers::budgets::update_budget::<S>)
                .delete(handlers::budgets::delete_budget::<S>),
        )
        .route("/sync", post(handlers::sync::sync_budget::<S>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        // Share the store with all handlers via State extraction
        .with_state(store)
}
