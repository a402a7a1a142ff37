//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params)
//! 2. Calls the budget store
//! 3. Returns HTTP response (JSON, status code)
//!
//! Handlers are generic over [`BudgetStore`](crate::services::budget_store::BudgetStore)
//! and receive it as axum `State`.

/// Budget CRUD endpoints
pub mod budgets;
/// Service health endpoint
pub mod health;
/// Client sync (upsert) endpoint
pub mod sync;
