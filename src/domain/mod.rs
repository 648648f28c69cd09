//! Domain module
//!
//! Core domain types and business logic.

pub mod amount;
pub mod models;

pub use amount::{Amount, AmountError};
pub use models::{Deposit, Goal, GoalSummary};
