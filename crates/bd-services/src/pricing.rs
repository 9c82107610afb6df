//! Pricing engine
//!
//! Sale prices are derived, never stored authoritative: a work-item's
//! unit sale price is its frozen component cost times a margin
//! coefficient. Re-derivation is always explicit; nothing here subscribes
//! to catalog or coefficient changes.

use bd_core::error::BdError;
use bd_core::result::BdResult;
use bd_core::types::{round_cents, sane_amount};
use bd_models::{Component, LineId, LineKind, Quote};

/// Derive a unit sale price from a cost price and a margin coefficient.
/// Pure; degenerate inputs yield zero.
pub fn derive_unit_sale_price(cost_per_unit: f64, margin_coefficient: f64) -> f64 {
    round_cents(sane_amount(cost_per_unit) * sane_amount(margin_coefficient))
}

/// Set the quote-level coefficient and re-derive the sale price of every
/// work-item line that still carries its frozen component snapshot.
/// Quantities and snapshots are left untouched; component-less work-items
/// are skipped. Applying the same coefficient twice is a no-op.
pub fn apply_coefficient(quote: &mut Quote, coefficient: f64) {
    let coefficient = sane_amount(coefficient);
    quote.margin_coefficient = coefficient;

    let mut rederived = 0usize;
    for line in &mut quote.lines {
        if let LineKind::WorkItem {
            unit_sale_price,
            components,
            ..
        } = &mut line.kind
        {
            if components.is_empty() {
                continue;
            }
            let cost: f64 = components.iter().map(Component::line_cost).sum();
            *unit_sale_price = round_cents(cost * coefficient);
            rederived += 1;
        }
    }

    tracing::debug!(
        quote = %quote.number,
        coefficient,
        lines = rederived,
        "re-derived work-item sale prices"
    );
}

/// Edit one frozen component in place and recompute that line's sale price
/// only. The line's own implied margin (previous sale price over previous
/// cost) is preserved, so a manual price override survives component edits
/// until the quote coefficient is explicitly reapplied.
pub fn edit_component(
    quote: &mut Quote,
    line_id: LineId,
    component_index: usize,
    quantity: f64,
    unit_price: f64,
) -> BdResult<()> {
    let quote_coefficient = quote.margin_coefficient;
    let line = quote
        .line_mut(line_id)
        .ok_or_else(|| BdError::not_found("quote line", "id", line_id))?;

    let LineKind::WorkItem {
        unit_sale_price,
        components,
        ..
    } = &mut line.kind
    else {
        return Err(BdError::invariant("only work-item lines carry components"));
    };

    if component_index >= components.len() {
        return Err(BdError::not_found("component", "index", component_index));
    }

    let previous_cost: f64 = components.iter().map(Component::line_cost).sum();
    let implied_margin = if previous_cost > 0.0 {
        *unit_sale_price / previous_cost
    } else {
        quote_coefficient
    };

    components[component_index].quantity = quantity;
    components[component_index].unit_price = unit_price;

    let new_cost: f64 = components.iter().map(Component::line_cost).sum();
    *unit_sale_price = derive_unit_sale_price(new_cost, implied_margin);

    Ok(())
}

/// Manual per-line price override. Stands until the quote coefficient is
/// reapplied over it.
pub fn set_unit_sale_price(quote: &mut Quote, line_id: LineId, price: f64) -> BdResult<()> {
    let line = quote
        .line_mut(line_id)
        .ok_or_else(|| BdError::not_found("quote line", "id", line_id))?;

    let LineKind::WorkItem {
        unit_sale_price, ..
    } = &mut line.kind
    else {
        return Err(BdError::invariant("only work-item lines carry a sale price"));
    };

    *unit_sale_price = sane_amount(price);
    Ok(())
}
