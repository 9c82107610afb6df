//! Result type aliases and the service result pattern

use std::fmt;

use crate::error::{BdError, ValidationErrors};

/// Standard Result type for BatiDevis operations
pub type BdResult<T> = Result<T, BdError>;

/// Represents the outcome of a service call: a result value on success,
/// a `ValidationErrors` collection on failure, and an optional display
/// message either way.
#[derive(Debug)]
pub struct ServiceResult<T> {
    success: bool,
    result: Option<T>,
    errors: ValidationErrors,
    message: Option<String>,
}

impl<T> ServiceResult<T> {
    /// Create a successful service result
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: ValidationErrors::new(),
            message: None,
        }
    }

    /// Create a successful service result with a message
    pub fn success_with_message(result: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(result)
        }
    }

    /// Create a failed service result
    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            result: None,
            errors,
            message: None,
        }
    }

    /// Create a failed service result with a single field error
    pub fn failure_with_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::failure(errors)
    }

    /// Create a failed service result with a base error
    pub fn failure_with_base_error(message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add_base(message);
        Self::failure(errors)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Get the result (if successful)
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Take the result (consuming it)
    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    /// Unwrap the result, panicking if it was a failure
    pub fn unwrap(self) -> T {
        self.result.expect("called unwrap on a failed ServiceResult")
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.full_messages()
    }

    /// Map the result value if successful
    pub fn map<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> U,
    {
        ServiceResult {
            success: self.success,
            result: self.result.map(f),
            errors: self.errors,
            message: self.message,
        }
    }

    /// Chain with another service call if successful
    pub fn and_then<U, F>(self, f: F) -> ServiceResult<U>
    where
        F: FnOnce(T) -> ServiceResult<U>,
    {
        match (self.success, self.result) {
            (true, Some(result)) => f(result),
            _ => ServiceResult::failure(self.errors),
        }
    }
}

impl<T> From<Result<T, ValidationErrors>> for ServiceResult<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(value) => ServiceResult::success(value),
            Err(errors) => ServiceResult::failure(errors),
        }
    }
}

impl<T> From<ServiceResult<T>> for Result<T, ValidationErrors> {
    fn from(result: ServiceResult<T>) -> Self {
        if result.success {
            result.result.ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add_base("Service succeeded but no result was returned");
                errors
            })
        } else {
            Err(result.errors)
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServiceResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            match self.result {
                Some(ref result) => write!(f, "Success: {}", result),
                None => write!(f, "Success"),
            }
        } else {
            write!(f, "Failure: {}", self.errors.full_messages().join(", "))
        }
    }
}
