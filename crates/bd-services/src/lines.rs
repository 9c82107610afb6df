//! Quote line-tree editing
//!
//! The line list stays flat; a line's depth number is the only nesting
//! information. Structural edits therefore end with a depth re-derivation
//! pass so every work-item again carries the depth of the closest chapter
//! above it.

use bd_core::error::BdError;
use bd_core::result::BdResult;
use bd_models::quote::line::clamp_depth;
use bd_models::{Assembly, LineId, LineKind, Quote, QuoteLine, MIN_DEPTH};

use crate::pricing;

/// Direction for adjacent-line moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Append a chapter heading with an explicit depth
pub fn insert_chapter(quote: &mut Quote, title: impl Into<String>, depth: u8) -> LineId {
    let id = quote.allocate_line_id();
    quote.lines.push(QuoteLine::chapter(id, title, depth));
    id
}

/// Append a free-text line with an explicit depth
pub fn insert_text(quote: &mut Quote, content: impl Into<String>, depth: u8) -> LineId {
    let id = quote.allocate_line_id();
    quote.lines.push(QuoteLine::text(id, content, depth));
    id
}

/// Append a work-item built from an assembly: the assembly's current
/// components are deep-copied into the line, the sale price is derived
/// from the quote coefficient, and the line inherits the depth of the
/// nearest preceding chapter (1 when there is none). After this the
/// assembly and the line evolve independently.
pub fn insert_work_item(quote: &mut Quote, assembly: &Assembly, quantity: f64) -> LineId {
    let components = assembly.components.clone();
    let unit_sale_price =
        pricing::derive_unit_sale_price(assembly.cost_price_per_unit(), quote.margin_coefficient);
    let depth = current_chapter_depth(quote);

    let id = quote.allocate_line_id();
    quote.lines.push(QuoteLine {
        id,
        depth,
        kind: LineKind::WorkItem {
            assembly_id: assembly.id,
            reference: assembly.reference.clone(),
            description: assembly.name.clone(),
            quantity,
            unit: assembly.unit.clone(),
            unit_sale_price,
            components,
        },
    });
    id
}

/// Resolving variant of [`insert_work_item`]: looks the assembly up by
/// reference first and refuses to insert anything when it cannot be found.
pub fn insert_work_item_by_reference(
    quote: &mut Quote,
    assemblies: &[Assembly],
    reference: &str,
    quantity: f64,
) -> BdResult<LineId> {
    let assembly = assemblies
        .iter()
        .find(|a| a.reference == reference)
        .ok_or_else(|| BdError::not_found("assembly", "reference", reference))?;
    Ok(insert_work_item(quote, assembly, quantity))
}

/// Swap a line with its neighbour. Moving past either end of the list is
/// a no-op. Crossing a chapter boundary changes which chapter a work-item
/// belongs to, so depths are re-derived afterwards.
pub fn move_line(quote: &mut Quote, line_id: LineId, direction: Direction) -> BdResult<()> {
    let index = quote
        .line_index(line_id)
        .ok_or_else(|| BdError::not_found("quote line", "id", line_id))?;

    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => (index + 1 < quote.lines.len()).then_some(index + 1),
    };

    if let Some(target) = target {
        quote.lines.swap(index, target);
        rederive_depths(quote);
    }
    Ok(())
}

/// Clone a line right after its source. The copy gets a fresh id and
/// keeps the source's depth and content.
pub fn duplicate_line(quote: &mut Quote, line_id: LineId) -> BdResult<LineId> {
    let index = quote
        .line_index(line_id)
        .ok_or_else(|| BdError::not_found("quote line", "id", line_id))?;

    let mut copy = quote.lines[index].clone();
    copy.id = quote.allocate_line_id();
    let id = copy.id;
    quote.lines.insert(index + 1, copy);
    Ok(id)
}

/// Delete a line. Surviving line ids are not renumbered. Removing a
/// chapter re-parents the work-items below it, so depths are re-derived.
pub fn remove_line(quote: &mut Quote, line_id: LineId) -> BdResult<()> {
    let index = quote
        .line_index(line_id)
        .ok_or_else(|| BdError::not_found("quote line", "id", line_id))?;

    let removed = quote.lines.remove(index);
    if removed.is_chapter() {
        rederive_depths(quote);
    }
    Ok(())
}

/// Change a chapter's depth, then re-derive the work-items under it
pub fn set_chapter_depth(quote: &mut Quote, line_id: LineId, depth: u8) -> BdResult<()> {
    let line = quote
        .line_mut(line_id)
        .ok_or_else(|| BdError::not_found("quote line", "id", line_id))?;

    if !line.is_chapter() {
        return Err(BdError::invariant("only chapters carry an explicit depth"));
    }
    line.depth = clamp_depth(depth);
    rederive_depths(quote);
    Ok(())
}

/// Re-walk the list and give every work-item the depth of the last chapter
/// seen before it (1 before any chapter). Text lines keep their own depth.
pub fn rederive_depths(quote: &mut Quote) {
    let mut current = MIN_DEPTH;
    for line in &mut quote.lines {
        match line.kind {
            LineKind::Chapter { .. } => current = line.depth,
            LineKind::WorkItem { .. } => line.depth = current,
            LineKind::Text { .. } => {}
        }
    }
}

fn current_chapter_depth(quote: &Quote) -> u8 {
    quote
        .lines
        .iter()
        .rev()
        .find(|line| line.is_chapter())
        .map(|line| line.depth)
        .unwrap_or(MIN_DEPTH)
}
