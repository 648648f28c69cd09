//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use savium::auth::TokenService;
use savium::AppState;

/// Fixed signing key for tests (32 ASCII bytes)
pub const TEST_SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

/// Build router state over an existing pool
pub fn test_state(pool: PgPool) -> AppState {
    AppState::new(pool, TokenService::new(TEST_SECRET))
}

/// Build router state with a lazy pool that never connects.
///
/// Good enough for tests that are rejected by the access guard before any
/// query runs.
pub fn test_state_without_db() -> AppState {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://localhost:1/savium_unreachable")
        .expect("lazy pool construction cannot fail");
    test_state(pool)
}

/// Setup test database - apply schema and truncate tables
#[allow(dead_code)]
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Schema is idempotent (IF NOT EXISTS throughout)
    pool.execute(include_str!("../../migrations/001_init.sql"))
        .await
        .expect("Failed to apply schema");

    // Clean up DB for fresh state; goals and deposits cascade
    sqlx::query("TRUNCATE TABLE users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}
