//! # bd-services
//!
//! The BatiDevis engines:
//! - `pricing`: margin-coefficient price derivation and re-derivation
//! - `lines`: quote line-tree editing (insert, move, duplicate, remove)
//! - `totals`: single-pass hierarchical chapter subtotals
//! - `quotes`: quote construction and lifecycle transitions
//! - `projects`: project lifecycle and expense logging
//! - `reconciliation`: forecast vs. actual cost reports and variances
//!
//! Every engine is synchronous and operates on in-memory aggregates handed
//! in by the caller; persistence stays behind the collaborator traits in
//! `bd-core`.

pub mod lines;
pub mod pricing;
pub mod projects;
pub mod quotes;
pub mod reconciliation;
pub mod totals;

pub use bd_core::result::{BdResult, ServiceResult};
