//! Project and expense contracts

use bd_core::error::ValidationErrors;
use bd_models::{ActualExpense, Project};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::base::{check_non_negative, check_positive, Contract, ValidationResult};

static PROJECT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PROJ-\d{4}-\d{4}$").expect("project number pattern"));

/// Contract for project entry and persistence
#[derive(Debug, Default)]
pub struct ProjectContract;

impl Contract<Project> for ProjectContract {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if !PROJECT_NUMBER_RE.is_match(&project.number) {
            errors.add("number", "must match PROJ-<year>-<4-digit-sequence>");
        }
        if project.client_reference.trim().is_empty() {
            errors.add("client_reference", "is required");
        }
        if project.linked_quotes().is_empty() {
            errors.add("linked_quotes", "a project needs at least one linked quote");
        }

        errors.into_result()
    }
}

/// Contract for one logged expense
#[derive(Debug, Default)]
pub struct ExpenseContract;

impl Contract<ActualExpense> for ExpenseContract {
    fn validate(&self, expense: &ActualExpense) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if expense.designation.trim().is_empty() {
            errors.add("designation", "is required");
        }
        check_positive(&mut errors, "quantity", expense.quantity);
        check_non_negative(&mut errors, "unit_price", expense.unit_price);

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_models::ItemType;
    use chrono::NaiveDate;

    #[test]
    fn test_project_number_format() {
        let project = Project::new("PROJ-2024-0001", "CLIENT-12", "DEV-2024-0001");
        assert!(ProjectContract.validate(&project).is_ok());

        let bad = Project::new("P-2024-1", "CLIENT-12", "DEV-2024-0001");
        let errors = ProjectContract.validate(&bad).unwrap_err();
        assert!(errors.has_error("number"));
    }

    #[test]
    fn test_project_requires_client() {
        let project = Project::new("PROJ-2024-0001", " ", "DEV-2024-0001");
        let errors = ProjectContract.validate(&project).unwrap_err();
        assert!(errors.has_error("client_reference"));
    }

    #[test]
    fn test_expense_contract() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let good = ActualExpense::new(ItemType::Material, "Sable", 2.0, 35.0, date);
        assert!(ExpenseContract.validate(&good).is_ok());

        let bad = ActualExpense::new(ItemType::Material, "", 0.0, -1.0, date);
        let errors = ExpenseContract.validate(&bad).unwrap_err();
        assert!(errors.has_error("designation"));
        assert!(errors.has_error("quantity"));
        assert!(errors.has_error("unit_price"));
    }
}
