//! Operation handlers module
//!
//! One handler per operation family, each owning its SQL. Every mutating
//! handler takes the acting user's id as resolved by the access guard,
//! never from the request body.

mod auth_handler;
mod commands;
mod deposit_handler;
mod goal_handler;
mod summary_handler;

pub use auth_handler::{LoginHandler, RegisterHandler};
pub use commands::*;
pub use deposit_handler::DepositHandler;
pub use goal_handler::GoalHandler;
pub use summary_handler::SummaryHandler;
