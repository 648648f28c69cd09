//! Row models
//!
//! Persistent records as they come back from the store. Goal ownership is
//! rooted at the user; deposits are immutable ledger rows owned by exactly
//! one goal.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A savings goal owned by one user.
///
/// `current_amount` is derived live from the deposit ledger on every read
/// path; the stored column is never mutated, so the value here can never go
/// stale relative to the deposits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_id: Uuid,
}

/// A single deposit recorded against a goal. Append-only: no update or
/// delete path exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deposit {
    pub id: i64,
    pub goal_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Per-goal projection used by the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoalSummary {
    pub id: i64,
    pub title: String,
    pub target_amount: Decimal,
    /// Live sum of this goal's deposits; zero when none exist.
    pub current_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
