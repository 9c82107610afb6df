//! # bd-core
//!
//! Core types, traits, and utilities for BatiDevis RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types and the `ValidationErrors` collection
//! - Result type aliases and the `ServiceResult` pattern
//! - Core traits (Identifiable, Timestamped, persistence collaborators)
//! - Shared value types (date ranges, money sanitation, document numbering)
//! - Engine configuration

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use types::*;
