//! Deposit ledger handler
//!
//! Appends to the deposit ledger. Recording a deposit is the one multi-step
//! transactional operation in the system: the ownership probe and the
//! insert commit or roll back together, so a crash in between never leaves
//! a partially-applied deposit.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Amount, Deposit};
use crate::error::AppError;

use super::RecordDepositCommand;

/// Handler for the append-only deposit ledger
pub struct DepositHandler {
    pool: PgPool,
}

impl DepositHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Record
    // =========================================================================

    /// Record a deposit against a goal owned by `owner`.
    ///
    /// Validation happens before the transaction opens; inside it, the
    /// ownership probe and the insert share one commit point. Any storage
    /// failure rolls the whole region back and surfaces as a 500 with the
    /// cause logged, never retried here.
    pub async fn record(
        &self,
        owner: Uuid,
        goal_id: i64,
        command: RecordDepositCommand,
    ) -> Result<Deposit, AppError> {
        let amount = Amount::new(command.amount)
            .map_err(|e| AppError::Validation(format!("amount: {e}")))?;

        let mut tx = self.pool.begin().await?;

        // Ownership and existence in one predicate: a foreign goal reads
        // exactly like a missing one.
        let goal_exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM goals WHERE id = $1 AND user_id = $2")
                .bind(goal_id)
                .bind(owner)
                .fetch_optional(&mut *tx)
                .await?;

        if goal_exists.is_none() {
            return Err(AppError::NotFound("Goal"));
        }

        let deposit: Deposit = sqlx::query_as(
            r#"
            INSERT INTO deposits (goal_id, amount, date)
            VALUES ($1, $2, $3)
            RETURNING id, goal_id, amount, date
            "#,
        )
        .bind(goal_id)
        .bind(amount.value())
        .bind(command.date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            deposit_id = deposit.id,
            goal_id,
            amount = %amount,
            "Deposit recorded"
        );

        Ok(deposit)
    }

    // =========================================================================
    // List
    // =========================================================================

    /// List a goal's deposits, newest date first, insertion order on ties.
    ///
    /// The read re-checks ownership with the same predicate as `record`, so
    /// a guessable goal id never discloses another user's ledger.
    pub async fn list_for_goal(&self, owner: Uuid, goal_id: i64) -> Result<Vec<Deposit>, AppError> {
        let goal_exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM goals WHERE id = $1 AND user_id = $2")
                .bind(goal_id)
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;

        if goal_exists.is_none() {
            return Err(AppError::NotFound("Goal"));
        }

        let deposits: Vec<Deposit> = sqlx::query_as(
            r#"
            SELECT id, goal_id, amount, date
            FROM deposits
            WHERE goal_id = $1
            ORDER BY date DESC, id ASC
            "#,
        )
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deposits)
    }
}
