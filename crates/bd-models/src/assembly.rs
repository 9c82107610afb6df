//! Assemblies (ouvrages) and their components
//!
//! An assembly bundles catalog-item quantities into one unit of finished
//! work. Components hold a frozen value copy of the catalog data they were
//! built from; later catalog edits never reach back into an existing
//! component.

use bd_core::traits::{Id, Identifiable, Timestamped};
use bd_core::types::sane_amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{CatalogItem, ItemType};

/// One catalog-item quantity inside an assembly, or frozen into a quote
/// work-item. Quantity must be positive, unit price non-negative; both are
/// contract-checked at entry and sanitized again inside computations.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Link back to the catalog item this was copied from
    pub catalog_item_id: Option<Id>,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub unit: String,

    #[serde(default)]
    pub item_type: ItemType,

    /// Quantity per unit of assembly
    pub quantity: f64,

    /// Purchase price per unit, frozen at capture time
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

impl Component {
    /// Capture a value copy of a catalog item. The copy is deliberately
    /// detached: editing the catalog afterwards leaves it untouched.
    pub fn freeze(item: &CatalogItem, quantity: f64) -> Self {
        Self {
            catalog_item_id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            item_type: item.item_type,
            quantity,
            unit_price: item.unit_price,
        }
    }

    /// Cost contribution of this component per unit of assembly
    pub fn line_cost(&self) -> f64 {
        sane_amount(self.quantity) * sane_amount(self.unit_price)
    }
}

/// Assembly entity: a reusable, priced bundle of components
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    pub id: Option<Id>,

    /// Unique reference code
    #[validate(length(min = 1, max = 50))]
    pub reference: String,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub category: Option<String>,

    /// Unit of finished work (m2 of wall, ml of trench, ...)
    pub unit: String,

    pub components: Vec<Component>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Assembly {
    pub fn new(
        reference: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            name: name.into(),
            unit: unit.into(),
            ..Default::default()
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn push_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Cost price for one unit of finished work
    pub fn cost_price_per_unit(&self) -> f64 {
        self.components.iter().map(Component::line_cost).sum()
    }
}

impl Identifiable for Assembly {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Assembly {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
