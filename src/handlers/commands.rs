//! Command definitions
//!
//! Commands represent intentions to change the system state. Fields arrive
//! as options so that an absent JSON field surfaces as a validation error
//! in the handler rather than an extractor rejection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =========================================================================
// RegisterCommand
// =========================================================================

/// Command to register a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

// =========================================================================
// LoginCommand
// =========================================================================

/// Command to authenticate with stored credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

// =========================================================================
// GoalCommand
// =========================================================================

/// Command to create or replace a goal's mutable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalCommand {
    pub title: String,
    pub target_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl GoalCommand {
    pub fn new(
        title: String,
        target_amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            title,
            target_amount,
            start_date,
            end_date,
        }
    }
}

// =========================================================================
// RecordDepositCommand
// =========================================================================

/// Command to append a deposit to a goal's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDepositCommand {
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl RecordDepositCommand {
    pub fn new(amount: Decimal, date: NaiveDate) -> Self {
        Self { amount, date }
    }
}
