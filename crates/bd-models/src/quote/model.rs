//! Quote model
//!
//! The aggregate root of the composition side: header fields, the ordered
//! line list, the pricing knobs, and the derived totals.

use bd_core::traits::{Id, Identifiable, Numbered, Timestamped};
use bd_core::types::round_cents;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::line::{LineId, QuoteLine};

/// Quote lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Rejected,
    Accepted,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Rejected => "rejected",
            Self::Accepted => "accepted",
        }
    }

    /// Allowed lifecycle transitions. A draft is sent; a sent quote is
    /// accepted, rejected, or recalled to draft; a rejected quote may be
    /// sent again. Acceptance is terminal.
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        matches!(
            (self, next),
            (Draft, Sent) | (Sent, Accepted) | (Sent, Rejected) | (Sent, Draft) | (Rejected, Sent)
        )
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived quote totals. The discount applies to the pre-tax total and VAT
/// is computed on the discounted base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTotals {
    pub total_ht: f64,
    pub discount_amount: f64,
    pub net_ht: f64,
    pub vat_amount: f64,
    pub total_ttc: f64,
}

/// Quote entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Option<Id>,

    /// Unique document number (DEV-<year>-<sequence> by convention)
    #[validate(length(min = 1, max = 50))]
    pub number: String,

    pub date: NaiveDate,

    pub client_reference: String,

    pub subject: String,

    /// The ordered line tree. Mutated through the line services; depth
    /// invariants are re-derived there after structural edits.
    pub lines: Vec<QuoteLine>,

    /// Monotonic line-id counter; ids of removed lines are never reused
    #[serde(default)]
    next_line_id: LineId,

    /// Multiplier from cost price to sale price
    pub margin_coefficient: f64,

    /// Discount in percent of the pre-tax total
    pub discount_rate: f64,

    /// VAT rate in percent
    pub vat_rate: f64,

    /// Validity in days from the quote date
    pub validity_days: u32,

    pub notes: Option<String>,
    pub terms: Option<String>,

    #[serde(default)]
    pub status: QuoteStatus,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn new(
        number: impl Into<String>,
        date: NaiveDate,
        client_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            number: number.into(),
            date,
            client_reference: client_reference.into(),
            subject: String::new(),
            lines: Vec::new(),
            next_line_id: 0,
            margin_coefficient: 1.0,
            discount_rate: 0.0,
            vat_rate: 20.0,
            validity_days: 30,
            notes: None,
            terms: None,
            status: QuoteStatus::Draft,
            created_at: None,
            updated_at: None,
        }
    }

    /// Hand out the next line id. Ids start at 1 and only ever grow, so a
    /// removed line's id never comes back.
    pub fn allocate_line_id(&mut self) -> LineId {
        self.next_line_id += 1;
        self.next_line_id
    }

    pub fn line(&self, id: LineId) -> Option<&QuoteLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut QuoteLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    pub fn line_index(&self, id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    pub fn work_items(&self) -> impl Iterator<Item = &QuoteLine> {
        self.lines.iter().filter(|line| line.is_work_item())
    }

    /// Pre-tax total: the sum of all work-item line amounts
    pub fn total_ht(&self) -> f64 {
        round_cents(self.work_items().map(QuoteLine::amount).sum())
    }

    pub fn totals(&self) -> QuoteTotals {
        let total_ht = self.total_ht();
        let discount_amount = round_cents(total_ht * self.discount_rate.clamp(0.0, 100.0) / 100.0);
        let net_ht = round_cents(total_ht - discount_amount);
        let vat_amount = round_cents(net_ht * self.vat_rate.clamp(0.0, 100.0) / 100.0);
        QuoteTotals {
            total_ht,
            discount_amount,
            net_ht,
            vat_amount,
            total_ttc: round_cents(net_ht + vat_amount),
        }
    }

    /// Last day the quoted prices hold
    pub fn expiry_date(&self) -> NaiveDate {
        self.date + Duration::days(self.validity_days as i64)
    }
}

impl Identifiable for Quote {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Numbered for Quote {
    fn number(&self) -> &str {
        &self.number
    }
}

impl Timestamped for Quote {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
