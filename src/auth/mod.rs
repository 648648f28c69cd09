//! Authentication module
//!
//! Password verifier storage and bearer token issuance/validation.

pub mod password;
pub mod token;

pub use token::{TokenError, TokenService, TOKEN_TTL};
