//! Database connection pool and schema initialization.
//!
//! This module provides utilities for:
//! - Creating and closing the PostgreSQL connection pool
//! - Ensuring the `budgets` table exists before the server accepts traffic

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// DDL for the `budgets` table.
///
/// Monetary columns default to 0 but stay nullable. `updated_at` holds
/// milliseconds since the Unix epoch and is always written by the server.
const CREATE_BUDGETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS budgets (
    month TEXT PRIMARY KEY,
    income NUMERIC(12,2) DEFAULT 0,
    bills NUMERIC(12,2) DEFAULT 0,
    food NUMERIC(12,2) DEFAULT 0,
    transport NUMERIC(12,2) DEFAULT 0,
    subscriptions NUMERIC(12,2) DEFAULT 0,
    miscellaneous NUMERIC(12,2) DEFAULT 0,
    updated_at BIGINT NOT NULL
)
"#;

/// Create a new PostgreSQL connection pool.
///
/// The pool bounds the number of simultaneous backend operations to `max_connections`.
/// Callers beyond that limit wait for a connection to be released.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Ensure the `budgets` table exists.
///
/// `CREATE TABLE IF NOT EXISTS` makes this safe to run any number of times,
/// including concurrently from several processes.
///
/// # Errors
///
/// Returns an error if the database is unreachable or rejects the statement.
pub async fn initialize_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_BUDGETS_TABLE).execute(pool).await?;

    Ok(())
}
