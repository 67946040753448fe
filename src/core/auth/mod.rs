// src/core/auth/mod.rs

//! Credential verification and bearer-token issuance/validation.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{IssuedToken, TokenService};
