//! Project lifecycle
//!
//! Opening a project from an accepted quote and feeding its expense log.
//! Quote attach/detach live on the model itself, where the
//! at-least-one-quote invariant is enforced.

use bd_core::result::ServiceResult;
use bd_contracts::{Contract, ExpenseContract, ProjectContract};
use bd_models::{ActualExpense, Project, Quote, QuoteStatus};

/// Open a project from an accepted quote. The quote becomes the first
/// linked quote and the client reference carries over.
pub fn create_from_quote(quote: &Quote, number: impl Into<String>) -> ServiceResult<Project> {
    if quote.status != QuoteStatus::Accepted {
        return ServiceResult::failure_with_base_error(
            "only an accepted quote can open a project",
        );
    }

    let project = Project::new(number, quote.client_reference.clone(), quote.number.clone());
    if let Err(errors) = ProjectContract.validate(&project) {
        return ServiceResult::failure(errors);
    }

    ServiceResult::success(project)
}

/// Contract-validated append to the expense log
pub fn log_expense(project: &mut Project, expense: ActualExpense) -> ServiceResult<()> {
    if let Err(errors) = ExpenseContract.validate(&expense) {
        return ServiceResult::failure(errors);
    }
    project.log_expense(expense);
    ServiceResult::success(())
}
