//! Project (chantier) model
//!
//! A project tracks a real-world job opened from an accepted quote: the
//! quotes it is billed against and the expenses actually incurred on site.

use bd_core::error::BdError;
use bd_core::result::BdResult;
use bd_core::traits::{Id, Identifiable, Numbered, Timestamped};
use bd_core::types::{sane_amount, DateRange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ItemType;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Pending,
    Active,
    Done,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One expense logged against a project by on-site cost entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualExpense {
    pub id: Uuid,

    /// Same tag set as catalog items, so planned and real costs aggregate
    /// under the same buckets
    pub expense_type: ItemType,

    pub designation: String,

    pub quantity: f64,

    pub unit: String,

    pub unit_price: f64,

    pub date: NaiveDate,

    /// Optional link back to the catalog item this expense corresponds to
    pub catalog_item_id: Option<Id>,
}

impl ActualExpense {
    pub fn new(
        expense_type: ItemType,
        designation: impl Into<String>,
        quantity: f64,
        unit_price: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense_type,
            designation: designation.into(),
            quantity,
            unit: String::new(),
            unit_price,
            date,
            catalog_item_id: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_catalog_item(mut self, catalog_item_id: Id) -> Self {
        self.catalog_item_id = Some(catalog_item_id);
        self
    }

    pub fn amount(&self) -> f64 {
        sane_amount(self.quantity) * sane_amount(self.unit_price)
    }
}

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Option<Id>,

    /// Unique document number (PROJ-<year>-<sequence> by convention)
    pub number: String,

    pub client_reference: String,

    /// Numbers of the quotes this project is billed against. A project
    /// always keeps at least one; the field stays private so the invariant
    /// cannot be bypassed.
    linked_quotes: Vec<String>,

    pub dates: DateRange,

    #[serde(default)]
    pub status: ProjectStatus,

    pub site_address: Option<String>,

    /// Append-only expense log
    expenses: Vec<ActualExpense>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Project {
    /// A project is born from its first quote, which guarantees the
    /// at-least-one-quote invariant from the start.
    pub fn new(
        number: impl Into<String>,
        client_reference: impl Into<String>,
        first_quote: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            number: number.into(),
            client_reference: client_reference.into(),
            linked_quotes: vec![first_quote.into()],
            dates: DateRange::default(),
            status: ProjectStatus::Pending,
            site_address: None,
            expenses: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn linked_quotes(&self) -> &[String] {
        &self.linked_quotes
    }

    /// Link another quote. Linking an already-linked number is a no-op.
    pub fn attach_quote(&mut self, number: impl Into<String>) {
        let number = number.into();
        if !self.linked_quotes.contains(&number) {
            self.linked_quotes.push(number);
        }
    }

    /// Unlink a quote. Removing the last linked quote is rejected and the
    /// list is left untouched; the check happens before any mutation.
    pub fn detach_quote(&mut self, number: &str) -> BdResult<()> {
        let index = self
            .linked_quotes
            .iter()
            .position(|n| n == number)
            .ok_or_else(|| BdError::not_found("quote", "number", number))?;

        if self.linked_quotes.len() == 1 {
            return Err(BdError::invariant(
                "a project must keep at least one linked quote",
            ));
        }

        self.linked_quotes.remove(index);
        Ok(())
    }

    pub fn expenses(&self) -> &[ActualExpense] {
        &self.expenses
    }

    pub fn log_expense(&mut self, expense: ActualExpense) {
        self.expenses.push(expense);
    }

    pub fn total_spent(&self) -> f64 {
        self.expenses.iter().map(ActualExpense::amount).sum()
    }
}

impl Identifiable for Project {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Numbered for Project {
    fn number(&self) -> &str {
        &self.number
    }
}

impl Timestamped for Project {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project::new("PROJ-2024-0001", "CLIENT-12", "DEV-2024-0001")
    }

    #[test]
    fn test_new_project_has_one_quote() {
        let project = project();
        assert_eq!(project.linked_quotes(), ["DEV-2024-0001"]);
        assert_eq!(project.status, ProjectStatus::Pending);
    }

    #[test]
    fn test_attach_deduplicates() {
        let mut project = project();
        project.attach_quote("DEV-2024-0002");
        project.attach_quote("DEV-2024-0002");
        assert_eq!(project.linked_quotes().len(), 2);
    }

    #[test]
    fn test_detach_last_quote_is_rejected() {
        let mut project = project();
        let result = project.detach_quote("DEV-2024-0001");
        assert!(matches!(result, Err(BdError::Invariant { .. })));
        // the list is unchanged after the failed attempt
        assert_eq!(project.linked_quotes(), ["DEV-2024-0001"]);
    }

    #[test]
    fn test_detach_with_remaining_quotes() {
        let mut project = project();
        project.attach_quote("DEV-2024-0002");
        assert!(project.detach_quote("DEV-2024-0001").is_ok());
        assert_eq!(project.linked_quotes(), ["DEV-2024-0002"]);
    }

    #[test]
    fn test_detach_unknown_quote() {
        let mut project = project();
        let result = project.detach_quote("DEV-2024-0099");
        assert!(matches!(result, Err(BdError::NotFound { .. })));
    }

    #[test]
    fn test_expense_log() {
        let mut project = project();
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        project.log_expense(
            ActualExpense::new(ItemType::Material, "Sable", 2.0, 35.0, date).with_unit("t"),
        );
        project.log_expense(ActualExpense::new(ItemType::Labor, "Pose", 8.0, 40.0, date));

        assert_eq!(project.expenses().len(), 2);
        assert_eq!(project.total_spent(), 390.0);
    }
}
