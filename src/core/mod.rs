// src/core/mod.rs

//! Core domain logic: permission resolution, authorization, ownership
//! checking, and the resource gateway boundary.

pub mod auth;
pub mod authz;
pub mod directory;
pub mod errors;
pub mod gateway;
pub mod locks;
pub mod metrics;
pub mod ownership;
pub mod permissions;

pub use errors::StratoError;
