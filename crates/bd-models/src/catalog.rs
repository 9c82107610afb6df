//! Catalog items
//!
//! The priced leaves everything else is built from. Catalog management is a
//! collaborator concern; the core reads items and never mutates them.

use bd_core::traits::{Id, Identifiable, Timestamped};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind tag carried by every catalog item and every cost entry derived
/// from one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Material,
    Supply,
    Labor,
    Consumable,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Material,
        ItemType::Supply,
        ItemType::Labor,
        ItemType::Consumable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Supply => "supply",
            Self::Labor => "labor",
            Self::Consumable => "consumable",
        }
    }

    pub fn is_labor(&self) -> bool {
        matches!(self, Self::Labor)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "material" => Ok(ItemType::Material),
            "supply" => Ok(ItemType::Supply),
            "labor" => Ok(ItemType::Labor),
            "consumable" => Ok(ItemType::Consumable),
            _ => Err(format!(
                "Invalid item type: {}. Use material, supply, labor, or consumable",
                s
            )),
        }
    }
}

/// Catalog item entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Option<Id>,

    /// Unique reference code
    #[validate(length(min = 1, max = 50))]
    pub reference: String,

    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Unit of measure (m2, ml, h, u, ...)
    pub unit: String,

    /// Purchase price per unit
    #[validate(range(min = 0.0))]
    pub unit_price: f64,

    #[serde(default)]
    pub item_type: ItemType,

    pub category: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    pub fn new(
        reference: impl Into<String>,
        name: impl Into<String>,
        unit: impl Into<String>,
        unit_price: f64,
        item_type: ItemType,
    ) -> Self {
        Self {
            reference: reference.into(),
            name: name.into(),
            unit: unit.into(),
            unit_price,
            item_type,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl Identifiable for CatalogItem {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for CatalogItem {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
