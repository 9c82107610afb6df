//! Quote contract
//!
//! Applied before a quote is handed to the persistence collaborator.

use bd_core::error::ValidationErrors;
use bd_models::{LineKind, Quote, QuoteStatus, MAX_DEPTH, MIN_DEPTH};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::base::{check_non_negative, check_positive, check_rate, Contract, ValidationResult};
use crate::catalog::ComponentContract;

static QUOTE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DEV-\d{4}-\d{4}$").expect("quote number pattern"));

/// Contract for quote entry and persistence
#[derive(Debug, Default)]
pub struct QuoteContract;

impl QuoteContract {
    fn validate_number(&self, quote: &Quote, errors: &mut ValidationErrors) {
        if !QUOTE_NUMBER_RE.is_match(&quote.number) {
            errors.add("number", "must match DEV-<year>-<4-digit-sequence>");
        }
    }

    fn validate_client(&self, quote: &Quote, errors: &mut ValidationErrors) {
        // a draft may still be anonymous; anything sent out must name a client
        if quote.status != QuoteStatus::Draft && quote.client_reference.trim().is_empty() {
            errors.add("client_reference", "is required once the quote leaves draft");
        }
    }

    fn validate_rates(&self, quote: &Quote, errors: &mut ValidationErrors) {
        check_positive(errors, "margin_coefficient", quote.margin_coefficient);
        check_rate(errors, "discount_rate", quote.discount_rate);
        check_rate(errors, "vat_rate", quote.vat_rate);
    }

    fn validate_lines(&self, quote: &Quote, errors: &mut ValidationErrors) {
        let component_contract = ComponentContract;
        for line in &quote.lines {
            if !(MIN_DEPTH..=MAX_DEPTH).contains(&line.depth) {
                errors.add(
                    format!("lines[{}].depth", line.id),
                    format!("must be between {} and {}", MIN_DEPTH, MAX_DEPTH),
                );
            }
            if let LineKind::WorkItem {
                quantity,
                unit_sale_price,
                components,
                ..
            } = &line.kind
            {
                let prefix = format!("lines[{}].", line.id);
                check_non_negative(errors, &format!("{}quantity", prefix), *quantity);
                check_non_negative(
                    errors,
                    &format!("{}unit_sale_price", prefix),
                    *unit_sale_price,
                );
                if components.is_empty() {
                    errors.add(
                        format!("{}components", prefix),
                        "a work-item must carry its component snapshot",
                    );
                }
                for (index, component) in components.iter().enumerate() {
                    component_contract.collect(
                        component,
                        &format!("{}components[{}].", prefix, index),
                        errors,
                    );
                }
            }
        }
    }
}

impl Contract<Quote> for QuoteContract {
    fn validate(&self, quote: &Quote) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_number(quote, &mut errors);
        self.validate_client(quote, &mut errors);
        self.validate_rates(quote, &mut errors);
        self.validate_lines(quote, &mut errors);

        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        // the line tree and the totals move through the line services only
        matches!(
            attribute,
            "date"
                | "client_reference"
                | "subject"
                | "margin_coefficient"
                | "discount_rate"
                | "vat_rate"
                | "validity_days"
                | "notes"
                | "terms"
        )
    }
}
