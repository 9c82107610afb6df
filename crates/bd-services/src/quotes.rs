//! Quote lifecycle
//!
//! Construction from the engine defaults and the guarded status
//! transitions. Everything that touches the line tree lives in the
//! `lines` module instead.

use bd_core::config::EngineConfig;
use bd_core::error::BdError;
use bd_core::result::BdResult;
use bd_models::{Quote, QuoteStatus};
use chrono::NaiveDate;

/// Build a fresh draft with the configured defaults applied
pub fn new_quote(
    config: &EngineConfig,
    number: impl Into<String>,
    date: NaiveDate,
    client_reference: impl Into<String>,
) -> Quote {
    let mut quote = Quote::new(number, date, client_reference);
    quote.margin_coefficient = config.default_margin_coefficient;
    quote.vat_rate = config.default_vat_rate;
    quote.validity_days = config.default_validity_days;
    quote
}

/// Move a quote to the given status, rejecting transitions outside the
/// lifecycle table. Nothing is mutated on rejection.
pub fn transition(quote: &mut Quote, next: QuoteStatus) -> BdResult<()> {
    if !quote.status.can_transition_to(next) {
        return Err(BdError::invariant(format!(
            "a {} quote cannot become {}",
            quote.status, next
        )));
    }
    tracing::debug!(quote = %quote.number, from = %quote.status, to = %next, "status transition");
    quote.status = next;
    Ok(())
}

pub fn mark_sent(quote: &mut Quote) -> BdResult<()> {
    transition(quote, QuoteStatus::Sent)
}

pub fn accept(quote: &mut Quote) -> BdResult<()> {
    transition(quote, QuoteStatus::Accepted)
}

pub fn reject(quote: &mut Quote) -> BdResult<()> {
    transition(quote, QuoteStatus::Rejected)
}

/// Put a rejected quote back in circulation
pub fn resend(quote: &mut Quote) -> BdResult<()> {
    transition(quote, QuoteStatus::Sent)
}
