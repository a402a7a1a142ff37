//! Budget store - persistence of monthly budget records.
//!
//! Handlers talk to a [`BudgetStore`] rather than to the pool directly. The
//! production implementation, [`PgBudgetStore`], issues every query through the
//! shared PostgreSQL pool.
//!
//! # Consistency
//!
//! Cross-request consistency is left to PostgreSQL:
//! - Upserts are a single `INSERT ... ON CONFLICT` statement
//! - Updates lock the row for the duration of the read-modify-write
//! - Deletes use the affected-row count instead of a separate existence check

use std::future::Future;

use crate::{
    db::DbPool,
    error::AppError,
    models::budget::{Budget, UpdateBudgetRequest},
};

/// Handles the creation, retrieval, modification and removal of budgets.
pub trait BudgetStore: Clone + Send + Sync + 'static {
    /// Retrieve every budget, ordered by month ascending.
    fn list(&self) -> impl Future<Output = Result<Vec<Budget>, AppError>> + Send;

    /// Retrieve the budget for exactly `month`, if one exists.
    fn get(&self, month: &str) -> impl Future<Output = Result<Option<Budget>, AppError>> + Send;

    /// Insert a new budget and return the stored row.
    ///
    /// # Errors
    ///
    /// A budget for the same month already existing is a `Database` error.
    fn create(&self, budget: Budget) -> impl Future<Output = Result<Budget, AppError>> + Send;

    /// Apply `changes` to the budget for `month`.
    ///
    /// Returns `None` if no budget exists for `month`.
    fn update(
        &self,
        month: &str,
        changes: UpdateBudgetRequest,
        updated_at: i64,
    ) -> impl Future<Output = Result<Option<Budget>, AppError>> + Send;

    /// Remove the budget for `month`, returning whether a row was deleted.
    fn delete(&self, month: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Insert `budget`, or overwrite every amount of an existing budget for the same month.
    fn upsert(&self, budget: Budget) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Check that the backing store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// [`BudgetStore`] backed by the `budgets` table in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgBudgetStore {
    pool: DbPool,
}

impl PgBudgetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl BudgetStore for PgBudgetStore {
    async fn list(&self) -> Result<Vec<Budget>, AppError> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT month, income, bills, food, transport, subscriptions, miscellaneous, updated_at
            FROM budgets
            ORDER BY month ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(budgets)
    }

    async fn get(&self, month: &str) -> Result<Option<Budget>, AppError> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT month, income, bills, food, transport, subscriptions, miscellaneous, updated_at
            FROM budgets
            WHERE month = $1
            "#,
        )
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(budget)
    }

    async fn create(&self, budget: Budget) -> Result<Budget, AppError> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets
                (month, income, bills, food, transport, subscriptions, miscellaneous, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING month, income, bills, food, transport, subscriptions, miscellaneous, updated_at
            "#,
        )
        .bind(budget.month)
        .bind(budget.income)
        .bind(budget.bills)
        .bind(budget.food)
        .bind(budget.transport)
        .bind(budget.subscriptions)
        .bind(budget.miscellaneous)
        .bind(budget.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(budget)
    }

    async fn update(
        &self,
        month: &str,
        changes: UpdateBudgetRequest,
        updated_at: i64,
    ) -> Result<Option<Budget>, AppError> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE holds the row until commit so a concurrent write cannot interleave
        let Some(current) = sqlx::query_as::<_, Budget>(
            r#"
            SELECT month, income, bills, food, transport, subscriptions, miscellaneous, updated_at
            FROM budgets
            WHERE month = $1
            FOR UPDATE
            "#,
        )
        .bind(month)
        .fetch_optional(&mut *tx)
        .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let merged = changes.apply(current, updated_at);

        let updated = sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets SET
                income = $1,
                bills = $2,
                food = $3,
                transport = $4,
                subscriptions = $5,
                miscellaneous = $6,
                updated_at = $7
            WHERE month = $8
            RETURNING month, income, bills, food, transport, subscriptions, miscellaneous, updated_at
            "#,
        )
        .bind(merged.income)
        .bind(merged.bills)
        .bind(merged.food)
        .bind(merged.transport)
        .bind(merged.subscriptions)
        .bind(merged.miscellaneous)
        .bind(merged.updated_at)
        .bind(month)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete(&self, month: &str) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM budgets WHERE month = $1")
            .bind(month)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn upsert(&self, budget: Budget) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO budgets
                (month, income, bills, food, transport, subscriptions, miscellaneous, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (month) DO UPDATE SET
                income = EXCLUDED.income,
                bills = EXCLUDED.bills,
                food = EXCLUDED.food,
                transport = EXCLUDED.transport,
                subscriptions = EXCLUDED.subscriptions,
                miscellaneous = EXCLUDED.miscellaneous,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(budget.month)
        .bind(budget.income)
        .bind(budget.bills)
        .bind(budget.food)
        .bind(budget.transport)
        .bind(budget.subscriptions)
        .bind(budget.miscellaneous)
        .bind(budget.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;

        Ok(())
    }
}
