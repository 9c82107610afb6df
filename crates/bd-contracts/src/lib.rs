//! # bd-contracts
//!
//! Validation contracts for BatiDevis RS.
//!
//! Contracts run at the data-entry boundary, before anything reaches the
//! pricing or reconciliation engines. The engines assume validated input
//! and only sanitize, never re-validate.

pub mod base;
pub mod catalog;
pub mod projects;
pub mod quotes;

pub use base::{Contract, ValidationResult};
pub use catalog::{AssemblyContract, CatalogItemContract, ComponentContract};
pub use projects::{ExpenseContract, ProjectContract};
pub use quotes::QuoteContract;
