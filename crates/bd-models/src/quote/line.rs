//! Quote lines
//!
//! A quote body is a flat, ordered list of lines. Nesting is implicit:
//! every line carries a depth between 1 and 3, and a work-item belongs to
//! the closest chapter above it. There is no parent/child linkage; keeping
//! the list flat is what makes reordering a constant-time swap.

use bd_core::traits::Id;
use bd_core::types::sane_amount;
use serde::{Deserialize, Serialize};

use crate::assembly::Component;

/// Line identifier, unique within one quote and monotonically assigned
pub type LineId = u32;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 3;

pub fn clamp_depth(depth: u8) -> u8 {
    depth.clamp(MIN_DEPTH, MAX_DEPTH)
}

/// The three line kinds. One tagged union rather than a single record with
/// optional fields, so each kind only carries what is valid for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    /// Heading used to group and subtotal the work-items below it
    Chapter { title: String },

    /// Free text, no price impact
    Text { content: String },

    /// An assembly instance: quantity, sale price, and a frozen snapshot of
    /// the assembly's components taken at insertion time
    #[serde(rename_all = "camelCase")]
    WorkItem {
        assembly_id: Option<Id>,
        reference: String,
        description: String,
        quantity: f64,
        unit: String,
        unit_sale_price: f64,
        components: Vec<Component>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub id: LineId,
    pub depth: u8,
    #[serde(flatten)]
    pub kind: LineKind,
}

impl QuoteLine {
    pub fn chapter(id: LineId, title: impl Into<String>, depth: u8) -> Self {
        Self {
            id,
            depth: clamp_depth(depth),
            kind: LineKind::Chapter {
                title: title.into(),
            },
        }
    }

    pub fn text(id: LineId, content: impl Into<String>, depth: u8) -> Self {
        Self {
            id,
            depth: clamp_depth(depth),
            kind: LineKind::Text {
                content: content.into(),
            },
        }
    }

    pub fn is_chapter(&self) -> bool {
        matches!(self.kind, LineKind::Chapter { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LineKind::Text { .. })
    }

    pub fn is_work_item(&self) -> bool {
        matches!(self.kind, LineKind::WorkItem { .. })
    }

    /// Chapter title, if this line is a chapter
    pub fn title(&self) -> Option<&str> {
        match &self.kind {
            LineKind::Chapter { title } => Some(title),
            _ => None,
        }
    }

    /// Monetary contribution of this line: quantity times unit sale price
    /// for work-items, zero for everything else.
    pub fn amount(&self) -> f64 {
        match &self.kind {
            LineKind::WorkItem {
                quantity,
                unit_sale_price,
                ..
            } => sane_amount(*quantity) * sane_amount(*unit_sale_price),
            _ => 0.0,
        }
    }

    /// Cost price per unit from the frozen component snapshot
    /// (work-items only)
    pub fn cost_per_unit(&self) -> Option<f64> {
        match &self.kind {
            LineKind::WorkItem { components, .. } => {
                Some(components.iter().map(Component::line_cost).sum())
            }
            _ => None,
        }
    }

    /// Frozen components of a work-item line
    pub fn components(&self) -> Option<&[Component]> {
        match &self.kind {
            LineKind::WorkItem { components, .. } => Some(components),
            _ => None,
        }
    }
}
