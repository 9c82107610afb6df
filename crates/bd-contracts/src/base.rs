//! Base contract system

use bd_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }
}

/// Shared numeric rules used by several contracts
pub(crate) fn check_positive(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.add(field, "must be greater than zero");
    }
}

pub(crate) fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.add(field, "must be zero or greater");
    }
}

pub(crate) fn check_rate(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !(value.is_finite() && (0.0..=100.0).contains(&value)) {
        errors.add(field, "must be a percentage between 0 and 100");
    }
}
