//! Business logic layer.
//!
//! Services sit between the HTTP handlers and the database, keeping SQL out of
//! the request handling code.

/// Storage of monthly budgets
pub mod budget_store;
