//! Summary aggregator
//!
//! Read-only projection over goals and the deposit ledger. Saved amounts
//! are always the live ledger sums, so the summary can never go stale
//! relative to the deposits it reports on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::GoalSummary;
use crate::error::AppError;

/// Result of the summarize operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub total_saved: Decimal,
    pub goals: Vec<GoalSummary>,
}

/// Handler for the owner-wide savings summary
pub struct SummaryHandler {
    pool: PgPool,
}

impl SummaryHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Summarize all goals owned by `owner`.
    ///
    /// Goals with no deposits contribute zero (COALESCE), not an error.
    /// Ordering matches the goal listing: start date descending, insertion
    /// order on ties.
    pub async fn summarize(&self, owner: Uuid) -> Result<SummaryResult, AppError> {
        let goals: Vec<GoalSummary> = sqlx::query_as(
            r#"
            SELECT g.id, g.title, g.target_amount,
                   COALESCE(SUM(d.amount), 0) AS current_amount,
                   g.start_date, g.end_date
            FROM goals g
            LEFT JOIN deposits d ON d.goal_id = g.id
            WHERE g.user_id = $1
            GROUP BY g.id
            ORDER BY g.start_date DESC, g.id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let total_saved = goals
            .iter()
            .fold(Decimal::ZERO, |acc, g| acc + g.current_amount);

        Ok(SummaryResult { total_saved, goals })
    }
}
