//! savium Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod domain;
pub mod handlers;

// Private modules (used only by main.rs binary)
pub mod config;
pub mod db;
mod error;

pub use api::AppState;
pub use config::Config;
pub use domain::{Amount, AmountError};
pub use error::{AppError, AppResult};
