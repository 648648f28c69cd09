//! Goal registry handler
//!
//! CRUD over goals, ownership-scoped to the acting user. The ownership
//! predicate (`user_id = owner`) lives in the same statement as each lookup
//! or mutation, so check and act cannot race.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Amount, Goal};
use crate::error::AppError;

use super::GoalCommand;

/// Handler for goal CRUD operations
pub struct GoalHandler {
    pool: PgPool,
}

impl GoalHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn validate(command: &GoalCommand) -> Result<(), AppError> {
        if command.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        Amount::new(command.target_amount)
            .map_err(|e| AppError::Validation(format!("target_amount: {e}")))?;
        Ok(())
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Create a goal owned by `owner`, starting with nothing saved.
    pub async fn create(&self, owner: Uuid, command: GoalCommand) -> Result<Goal, AppError> {
        Self::validate(&command)?;

        let goal: Goal = sqlx::query_as(
            r#"
            INSERT INTO goals (title, target_amount, start_date, end_date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, target_amount, current_amount, start_date, end_date, user_id
            "#,
        )
        .bind(command.title.trim())
        .bind(command.target_amount)
        .bind(command.start_date)
        .bind(command.end_date)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(goal_id = goal.id, user_id = %owner, "Goal created");

        Ok(goal)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Replace a goal's mutable fields.
    ///
    /// Zero rows updated means the goal is absent or owned by someone else;
    /// both cases report the same `NotFound` so non-owners cannot tell a
    /// foreign goal from a missing one.
    pub async fn update(
        &self,
        owner: Uuid,
        goal_id: i64,
        command: GoalCommand,
    ) -> Result<Goal, AppError> {
        Self::validate(&command)?;

        let goal: Option<Goal> = sqlx::query_as(
            r#"
            UPDATE goals
            SET title = $1, target_amount = $2, start_date = $3, end_date = $4
            WHERE id = $5 AND user_id = $6
            RETURNING id, title, target_amount,
                (SELECT COALESCE(SUM(amount), 0) FROM deposits WHERE goal_id = goals.id)
                    AS current_amount,
                start_date, end_date, user_id
            "#,
        )
        .bind(command.title.trim())
        .bind(command.target_amount)
        .bind(command.start_date)
        .bind(command.end_date)
        .bind(goal_id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        goal.ok_or(AppError::NotFound("Goal"))
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete a goal owned by `owner`.
    ///
    /// Idempotent: deleting an absent (or foreign) goal succeeds with zero
    /// rows affected, unlike update.
    pub async fn delete(&self, owner: Uuid, goal_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!(goal_id, user_id = %owner, "Goal deleted");
        }

        Ok(())
    }

    // =========================================================================
    // List
    // =========================================================================

    /// List the caller's goals, most recent start date first.
    ///
    /// Saved amounts are joined in live from the deposit ledger; the id
    /// tie-break keeps the ordering stable across identical start dates.
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Goal>, AppError> {
        let goals: Vec<Goal> = sqlx::query_as(
            r#"
            SELECT g.id, g.title, g.target_amount,
                   COALESCE(SUM(d.amount), 0) AS current_amount,
                   g.start_date, g.end_date, g.user_id
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

        Ok(goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn command(title: &str, target: rust_decimal::Decimal) -> GoalCommand {
        GoalCommand::new(
            title.to_string(),
            target,
            "2024-01-01".parse().unwrap(),
            "2024-12-31".parse().unwrap(),
        )
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = GoalHandler::validate(&command("  ", dec!(1000)));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_positive_target_rejected() {
        assert!(GoalHandler::validate(&command("Trip", dec!(0))).is_err());
        assert!(GoalHandler::validate(&command("Trip", dec!(-10))).is_err());
    }

    #[test]
    fn test_valid_command_accepted() {
        assert!(GoalHandler::validate(&command("Trip", dec!(1000))).is_ok());
    }
}
