//! Registration and login handlers
//!
//! Credential store access plus token issuance. The stored password column
//! only ever holds the argon2 verifier.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;
use crate::auth::TokenService;
use crate::error::AppError;

use super::{LoginCommand, RegisterCommand};

// =========================================================================
// RegisterHandler
// =========================================================================

/// Handler for user registration
pub struct RegisterHandler {
    pool: PgPool,
}

impl RegisterHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the register command
    pub async fn execute(&self, command: RegisterCommand) -> Result<(), AppError> {
        let name = command.name.trim();
        let email = command.email.trim();
        if name.is_empty() || email.is_empty() || command.password.is_empty() {
            return Err(AppError::Validation(
                "name, email and password are required".to_string(),
            ));
        }

        let verifier = password::hash_password(&command.password)?;

        // Single INSERT: the unique index on email is the duplicate check,
        // so there is no window between a prior SELECT and the write.
        sqlx::query("INSERT INTO users (id, name, email, password) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(&verifier)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "Email already registered"))?;

        tracing::info!(email = %email, "User registered");

        Ok(())
    }
}

// =========================================================================
// LoginHandler
// =========================================================================

/// Handler for credential verification and token issuance
pub struct LoginHandler {
    pool: PgPool,
    tokens: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(pool: PgPool, tokens: Arc<TokenService>) -> Self {
        Self { pool, tokens }
    }

    /// Execute the login command, returning a signed bearer token.
    ///
    /// Unknown email and wrong password produce the same error, so callers
    /// cannot probe which emails are registered.
    pub async fn execute(&self, command: LoginCommand) -> Result<String, AppError> {
        let email = command.email.trim();
        if email.is_empty() || command.password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let row: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, password FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        let (user_id, stored_verifier) = row.ok_or(AppError::InvalidCredentials)?;

        if !password::verify_password(&command.password, &stored_verifier)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user_id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::debug!(user_id = %user_id, "Token issued");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_command_fields() {
        let cmd = RegisterCommand::new(
            "Alice".to_string(),
            "alice@x.com".to_string(),
            "pw1".to_string(),
        );

        assert_eq!(cmd.name, "Alice");
        assert_eq!(cmd.email, "alice@x.com");
    }

    #[test]
    fn test_login_command_fields() {
        let cmd = LoginCommand::new("alice@x.com".to_string(), "pw1".to_string());

        assert_eq!(cmd.email, "alice@x.com");
        assert_eq!(cmd.password, "pw1");
    }
}
