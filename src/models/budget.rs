//! Budget data models and API request/response types.
//!
//! This module defines:
//! - `Budget`: Database entity representing one month's budget
//! - `CreateBudgetRequest`: Flat request body for creating a budget
//! - `UpdateBudgetRequest`: Flat, partial request body for updating a budget
//! - `SyncBudgetRequest`: Nested request body sent by the client's sync routine
//! - `SyncResponse` and `MessageResponse`: acknowledgement bodies
//!
//! Create/update and sync deliberately use different shapes: the client's sync
//! routine groups the spending categories under `expenses`, while the CRUD
//! endpoints take them at the top level.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Represents a budget record from the `budgets` table.
///
/// # Monetary Values
///
/// Amounts are stored as `NUMERIC(12,2)` and held as [`Decimal`] so that
/// cents survive the round trip. The columns default to 0 but are nullable, so
/// a sync or update that writes `null` reads back as `None`.
///
/// # JSON Example
///
/// ```json
/// {
///   "month": "2025-01",
///   "income": 5000.0,
///   "bills": 1200.0,
///   "food": 0.0,
///   "transport": 0.0,
///   "subscriptions": 0.0,
///   "miscellaneous": 0.0,
///   "updated_at": 1735689600000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Budget {
    /// Month this budget covers, conventionally "YYYY-MM"
    ///
    /// Primary key. The format is not validated, but lexicographic order on
    /// "YYYY-MM" strings is chronological order.
    pub month: String,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub income: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub bills: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub food: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub transport: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub subscriptions: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub miscellaneous: Option<Decimal>,

    /// Milliseconds since the Unix epoch of the last write, always set by the server
    pub updated_at: i64,
}

/// Request body for creating a new budget.
///
/// # JSON Example
///
/// ```json
/// {
///   "month": "2025-01",
///   "income": 5000,
///   "bills": 1200
/// }
/// ```
///
/// # Validation
///
/// - `month`: Required, non-empty
/// - Monetary fields: Optional, absent or `null` become 0
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub month: String,
    pub income: Option<Decimal>,
    pub bills: Option<Decimal>,
    pub food: Option<Decimal>,
    pub transport: Option<Decimal>,
    pub subscriptions: Option<Decimal>,
    pub miscellaneous: Option<Decimal>,
}

impl CreateBudgetRequest {
    /// Build the record to insert, substituting 0 for every omitted amount.
    pub fn into_budget(self, updated_at: i64) -> Budget {
        let or_zero = |value: Option<Decimal>| Some(value.unwrap_or(Decimal::ZERO));

        Budget {
            month: self.month,
            income: or_zero(self.income),
            bills: or_zero(self.bills),
            food: or_zero(self.food),
            transport: or_zero(self.transport),
            subscriptions: or_zero(self.subscriptions),
            miscellaneous: or_zero(self.miscellaneous),
            updated_at,
        }
    }
}

/// Request body for updating an existing budget.
///
/// Each field distinguishes "key absent" (`None`, keep the stored value) from
/// "key present" (`Some(_)`, overwrite). A present `null` is `Some(None)` and
/// clears the column; a present `0` is `Some(Some(0))`.
///
/// # JSON Example
///
/// ```json
/// { "food": 450.5 }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetRequest {
    #[serde(default, deserialize_with = "present")]
    pub income: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub bills: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub food: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub transport: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub subscriptions: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub miscellaneous: Option<Option<Decimal>>,
}

/// Marks a field as present, even when its value is `null`.
///
/// Only called by serde when the key exists; absent keys fall back to `default`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl UpdateBudgetRequest {
    /// Merge the provided fields over `current`, stamping the result with `updated_at`.
    ///
    /// Every monetary field is carried into the result, changed or not.
    pub fn apply(self, current: Budget, updated_at: i64) -> Budget {
        Budget {
            month: current.month,
            income: self.income.unwrap_or(current.income),
            bills: self.bills.unwrap_or(current.bills),
            food: self.food.unwrap_or(current.food),
            transport: self.transport.unwrap_or(current.transport),
            subscriptions: self.subscriptions.unwrap_or(current.subscriptions),
            miscellaneous: self.miscellaneous.unwrap_or(current.miscellaneous),
            updated_at,
        }
    }
}

/// Request body for the sync (upsert) endpoint.
///
/// # JSON Example
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
/// Sync overwrites every amount unconditionally. Anything missing from the
/// body, including the whole `expenses` object, is written as `null`.
#[derive(Debug, Deserialize)]
pub struct SyncBudgetRequest {
    pub month: String,
    pub income: Option<Decimal>,
    #[serde(default)]
    pub expenses: Expenses,
}

/// Spending categories nested under `expenses` in a sync request.
#[derive(Debug, Default, Deserialize)]
pub struct Expenses {
    pub bills: Option<Decimal>,
    pub food: Option<Decimal>,
    pub transport: Option<Decimal>,
    pub subscriptions: Option<Decimal>,
    pub miscellaneous: Option<Decimal>,
}

impl SyncBudgetRequest {
    /// Flatten the nested body into the record to upsert.
    pub fn into_budget(self, updated_at: i64) -> Budget {
        Budget {
            month: self.month,
            income: self.income,
            bills: self.expenses.bills,
            food: self.expenses.food,
            transport: self.expenses.transport,
            subscriptions: self.expenses.subscriptions,
            miscellaneous: self.expenses.miscellaneous,
            updated_at,
        }
    }
}

/// Response body for a successful sync.
///
/// `timestamp` is the value written to `updated_at`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub timestamp: i64,
}

/// Plain acknowledgement body, e.g. after a delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Current time in milliseconds since the Unix epoch.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn stored_budget() -> Budget {
        Budget {
            month: "2024-05".to_string(),
            income: Some(Decimal::new(400000, 2)),
            bills: Some(Decimal::new(90000, 2)),
            food: Some(Decimal::new(30000, 2)),
            transport: Some(Decimal::new(8000, 2)),
            subscriptions: Some(Decimal::new(2500, 2)),
            miscellaneous: Some(Decimal::new(5000, 2)),
            updated_at: 1,
        }
    }

    #[test]
    fn create_request_defaults_missing_amounts_to_zero() {
        let request: CreateBudgetRequest =
            serde_json::from_value(json!({"month": "2025-01", "income": 5000, "bills": 1200}))
                .unwrap();

        let budget = request.into_budget(42);

        assert_eq!(budget.month, "2025-01");
        assert_eq!(budget.income, Some(Decimal::from(5000)));
        assert_eq!(budget.bills, Some(Decimal::from(1200)));
        assert_eq!(budget.food, Some(Decimal::ZERO));
        assert_eq!(budget.transport, Some(Decimal::ZERO));
        assert_eq!(budget.subscriptions, Some(Decimal::ZERO));
        assert_eq!(budget.miscellaneous, Some(Decimal::ZERO));
        assert_eq!(budget.updated_at, 42);
    }

    #[test]
    fn create_request_requires_month() {
        let result = serde_json::from_value::<CreateBudgetRequest>(json!({"income": 10}));

        assert!(result.is_err());
    }

    #[test]
    fn create_request_accepts_numeric_strings() {
        let request: CreateBudgetRequest =
            serde_json::from_value(json!({"month": "2025-01", "food": "12.34"})).unwrap();

        assert_eq!(request.food, Some(Decimal::new(1234, 2)));
    }

    #[test]
    fn update_request_distinguishes_absent_null_and_zero() {
        let request: UpdateBudgetRequest =
            serde_json::from_value(json!({"food": 0, "bills": null})).unwrap();

        assert_eq!(request.food, Some(Some(Decimal::ZERO)));
        assert_eq!(request.bills, Some(None));
        assert_eq!(request.income, None);
        assert_eq!(request.transport, None);
    }

    #[test]
    fn update_keeps_fields_that_were_not_provided() {
        let request: UpdateBudgetRequest = serde_json::from_value(json!({"food": 450})).unwrap();
        let current = stored_budget();

        let updated = request.apply(current.clone(), 99);

        assert_eq!(updated.food, Some(Decimal::from(450)));
        assert_eq!(updated.income, current.income);
        assert_eq!(updated.bills, current.bills);
        assert_eq!(updated.transport, current.transport);
        assert_eq!(updated.subscriptions, current.subscriptions);
        assert_eq!(updated.miscellaneous, current.miscellaneous);
        assert_eq!(updated.month, current.month);
        assert_eq!(updated.updated_at, 99);
    }

    #[test]
    fn update_honors_explicit_zero_and_null() {
        let request: UpdateBudgetRequest =
            serde_json::from_value(json!({"income": 0, "subscriptions": null})).unwrap();

        let updated = request.apply(stored_budget(), 2);

        assert_eq!(updated.income, Some(Decimal::ZERO));
        assert_eq!(updated.subscriptions, None);
    }

    #[test]
    fn empty_update_only_refreshes_timestamp() {
        let current = stored_budget();

        let updated = UpdateBudgetRequest::default().apply(current.clone(), 7);

        assert_eq!(Budget { updated_at: 1, ..updated }, current);
    }

    #[test]
    fn sync_request_flattens_expenses() {
        let request: SyncBudgetRequest = serde_json::from_value(json!({
            "month": "2025-02",
            "income": 5000,
            "expenses": {
                "bills": 1200,
                "food": 450,
                "transport": 120,
                "subscriptions": 35,
                "miscellaneous": 80
            }
        }))
        .unwrap();

        let budget = request.into_budget(10);

        assert_eq!(budget.income, Some(Decimal::from(5000)));
        assert_eq!(budget.bills, Some(Decimal::from(1200)));
        assert_eq!(budget.food, Some(Decimal::from(450)));
        assert_eq!(budget.transport, Some(Decimal::from(120)));
        assert_eq!(budget.subscriptions, Some(Decimal::from(35)));
        assert_eq!(budget.miscellaneous, Some(Decimal::from(80)));
        assert_eq!(budget.updated_at, 10);
    }

    #[test]
    fn sync_request_writes_null_for_missing_amounts() {
        let request: SyncBudgetRequest =
            serde_json::from_value(json!({"month": "2025-02", "expenses": {"food": 12}})).unwrap();

        let budget = request.into_budget(10);

        assert_eq!(budget.income, None);
        assert_eq!(budget.food, Some(Decimal::from(12)));
        assert_eq!(budget.bills, None);
        assert_eq!(budget.miscellaneous, None);
    }

    #[test]
    fn sync_request_without_expenses_object() {
        let request: SyncBudgetRequest =
            serde_json::from_value(json!({"month": "2025-02", "income": 1})).unwrap();

        let budget = request.into_budget(10);

        assert_eq!(budget.income, Some(Decimal::ONE));
        assert_eq!(budget.bills, None);
        assert_eq!(budget.food, None);
    }

    #[test]
    fn budget_serializes_amounts_as_numbers() {
        let mut budget = stored_budget();
        budget.transport = None;

        let value = serde_json::to_value(&budget).unwrap();

        assert_eq!(value["month"], "2024-05");
        assert_eq!(value["income"].as_f64(), Some(4000.0));
        assert_eq!(value["subscriptions"].as_f64(), Some(25.0));
        assert!(value["transport"].is_null());
        assert_eq!(value["updated_at"], 1);
    }
}
