//! Helpers shared by the handler tests.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum_test::TestServer;

use crate::{
    error::AppError,
    models::budget::{Budget, UpdateBudgetRequest},
    routes::build_router,
    services::budget_store::BudgetStore,
};

/// A [`BudgetStore`] holding budgets in memory, keyed (and so ordered) by month.
///
/// Setting `fail` makes every operation return a database error.
#[derive(Debug, Clone, Default)]
pub struct MemoryBudgetStore {
    budgets: Arc<Mutex<BTreeMap<String, Budget>>>,
    fail: bool,
}

impl MemoryBudgetStore {
    /// A store whose every operation fails as if the database were unreachable.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }

    fn budgets(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Budget>> {
        self.budgets.lock().expect("budget map lock poisoned")
    }
}

impl BudgetStore for MemoryBudgetStore {
    async fn list(&self) -> Result<Vec<Budget>, AppError> {
        self.check()?;
        Ok(self.budgets().values().cloned().collect())
    }

    async fn get(&self, month: &str) -> Result<Option<Budget>, AppError> {
        self.check()?;
        Ok(self.budgets().get(month).cloned())
    }

    async fn create(&self, budget: Budget) -> Result<Budget, AppError> {
        self.check()?;
        let mut budgets = self.budgets();
        if budgets.contains_key(&budget.month) {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint \"budgets_pkey\": {}",
                budget.month
            ))));
        }
        budgets.insert(budget.month.clone(), budget.clone());
        Ok(budget)
    }

    async fn update(
        &self,
        month: &str,
        changes: UpdateBudgetRequest,
        updated_at: i64,
    ) -> Result<Option<Budget>, AppError> {
        self.check()?;
        let mut budgets = self.budgets();
        let Some(current) = budgets.get(month).cloned() else {
            return Ok(None);
        };
        let updated = changes.apply(current, updated_at);
        budgets.insert(month.to_string(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, month: &str) -> Result<bool, AppError> {
        self.check()?;
        Ok(self.budgets().remove(month).is_some())
    }

    async fn upsert(&self, budget: Budget) -> Result<(), AppError> {
        self.check()?;
        self.budgets().insert(budget.month.clone(), budget);
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }
}

/// Serve the full router over `store`.
pub fn test_server(store: MemoryBudgetStore) -> TestServer {
    TestServer::new(build_router(store))
}
