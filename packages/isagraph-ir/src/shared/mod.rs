//! Shared module - Common types used by every feature
//!
//! Nothing in here depends on a feature module.

pub mod models;

pub use models::*;
