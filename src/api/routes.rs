//! API Routes
//!
//! HTTP endpoint definitions. Each handler validates its body into a
//! command and delegates to the matching operation handler; missing fields
//! become a typed validation error, never an unchecked read.

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Deposit, Goal};
use crate::error::AppError;
use crate::handlers::{
    DepositHandler, GoalCommand, GoalHandler, LoginCommand, LoginHandler, RecordDepositCommand,
    RegisterCommand, RegisterHandler, SummaryHandler,
};

use super::middleware::{auth_middleware, AuthenticatedUser};
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoalRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub target_amount: Option<Decimal>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_saved: Decimal,
    pub goals: Vec<crate::domain::GoalSummary>,
}

impl GoalRequest {
    fn into_command(self) -> Result<GoalCommand, AppError> {
        let title = self
            .title
            .ok_or_else(|| AppError::Validation("title is required".to_string()))?;
        let target_amount = self
            .target_amount
            .ok_or_else(|| AppError::Validation("target_amount is required".to_string()))?;
        let start_date = self
            .start_date
            .ok_or_else(|| AppError::Validation("start_date is required".to_string()))?;
        let end_date = self
            .end_date
            .ok_or_else(|| AppError::Validation("end_date is required".to_string()))?;

        Ok(GoalCommand::new(title, target_amount, start_date, end_date))
    }
}

impl DepositRequest {
    fn into_command(self) -> Result<RecordDepositCommand, AppError> {
        let amount = self
            .amount
            .ok_or_else(|| AppError::Validation("amount is required".to_string()))?;
        let date = self
            .date
            .ok_or_else(|| AppError::Validation("date is required".to_string()))?;

        Ok(RecordDepositCommand::new(amount, date))
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the application router.
///
/// Auth routes and the health check are public; everything else sits
/// behind the bearer-token access guard.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/goals", post(create_goal).get(list_goals))
        .route("/goals/:goal_id", put(update_goal).delete(delete_goal))
        .route(
            "/goals/:goal_id/deposits",
            post(record_deposit).get(list_deposits),
        )
        .route("/summary", get(summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(public)
        .merge(protected)
        .layer(middleware::from_fn(super::middleware::logging_middleware))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// POST /auth/register
// =========================================================================

/// Register a new user
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let command = RegisterCommand::new(
        request.name.unwrap_or_default(),
        request.email.unwrap_or_default(),
        request.password.unwrap_or_default(),
    );

    RegisterHandler::new(state.pool).execute(command).await?;

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

// =========================================================================
// POST /auth/login
// =========================================================================

/// Verify credentials and issue a bearer token
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let command = LoginCommand::new(
        request.email.unwrap_or_default(),
        request.password.unwrap_or_default(),
    );

    let token = LoginHandler::new(state.pool, state.tokens)
        .execute(command)
        .await?;

    Ok(Json(TokenResponse { token }))
}

// =========================================================================
// POST /goals
// =========================================================================

/// Create a goal owned by the authenticated user
async fn create_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<GoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let command = request.into_command()?;
    let goal = GoalHandler::new(state.pool)
        .create(user.user_id, command)
        .await?;

    Ok(Json(goal))
}

// =========================================================================
// PUT /goals/:goal_id
// =========================================================================

/// Update a goal; foreign goals are indistinguishable from missing ones
async fn update_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(goal_id): Path<i64>,
    Json(request): Json<GoalRequest>,
) -> Result<Json<Goal>, AppError> {
    let command = request.into_command()?;
    let goal = GoalHandler::new(state.pool)
        .update(user.user_id, goal_id, command)
        .await?;

    Ok(Json(goal))
}

// =========================================================================
// DELETE /goals/:goal_id
// =========================================================================

/// Delete a goal (idempotent)
async fn delete_goal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(goal_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    GoalHandler::new(state.pool)
        .delete(user.user_id, goal_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Goal deleted".to_string(),
    }))
}

// =========================================================================
// GET /goals
// =========================================================================

/// List the authenticated user's goals, start date descending
async fn list_goals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Goal>>, AppError> {
    let goals = GoalHandler::new(state.pool).list(user.user_id).await?;

    Ok(Json(goals))
}

// =========================================================================
// POST /goals/:goal_id/deposits
// =========================================================================

/// Record a deposit against an owned goal (transactional)
async fn record_deposit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(goal_id): Path<i64>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<Deposit>, AppError> {
    let command = request.into_command()?;
    let deposit = DepositHandler::new(state.pool)
        .record(user.user_id, goal_id, command)
        .await?;

    Ok(Json(deposit))
}

// =========================================================================
// GET /goals/:goal_id/deposits
// =========================================================================

/// List an owned goal's deposits, date descending
async fn list_deposits(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(goal_id): Path<i64>,
) -> Result<Json<Vec<Deposit>>, AppError> {
    let deposits = DepositHandler::new(state.pool)
        .list_for_goal(user.user_id, goal_id)
        .await?;

    Ok(Json(deposits))
}

// =========================================================================
// GET /summary
// =========================================================================

/// Total saved across all goals, each derived live from the ledger
async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<SummaryResponse>, AppError> {
    let result = SummaryHandler::new(state.pool)
        .summarize(user.user_id)
        .await?;

    Ok(Json(SummaryResponse {
        total_saved: result.total_saved,
        goals: result.goals,
    }))
}
