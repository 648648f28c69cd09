//! API module
//!
//! HTTP API endpoints, middleware, and shared router state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenService;

pub mod middleware;
pub mod routes;

pub use routes::create_router;

/// Process-wide resources injected into every route.
///
/// Components never open their own connections; the pool is the only
/// shared mutable state between requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self {
            pool,
            tokens: Arc::new(tokens),
        }
    }
}
