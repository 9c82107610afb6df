//! Core error types for BatiDevis RS

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all BatiDevis operations
#[derive(Error, Debug)]
pub enum BdError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invariant violated: {message}")]
    Invariant { message: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BdError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BdError::NotFound { .. } => "not_found",
            BdError::Validation(_) => "validation_failed",
            BdError::Invariant { .. } => "invariant_violated",
            BdError::Internal(_) => "internal_error",
            BdError::Config(_) => "configuration_error",
        }
    }
}

/// Validation errors collection, gathered field by field at the data-entry
/// boundary before any engine computation runs.
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// Turn the collected errors into a result, `Ok` when nothing was added.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collects_by_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("quantity", "must be greater than zero");
        errors.add("quantity", "must be a number");
        errors.add_base("quote has no client");

        assert!(!errors.is_empty());
        assert!(errors.has_error("quantity"));
        assert_eq!(errors.get("quantity").map(|m| m.len()), Some(2));
        assert_eq!(errors.full_messages().len(), 3);
    }

    #[test]
    fn test_validation_errors_merge() {
        let mut a = ValidationErrors::new();
        a.add("name", "is required");

        let mut b = ValidationErrors::new();
        b.add("name", "is too long");
        b.add_base("something else");

        a.merge(b);
        assert_eq!(a.get("name").map(|m| m.len()), Some(2));
        assert_eq!(a.base_errors.len(), 1);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add_base("broken");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BdError::not_found("quote", "number", "DEV-2024-0001").error_code(),
            "not_found"
        );
        assert_eq!(BdError::invariant("nope").error_code(), "invariant_violated");
    }
}
