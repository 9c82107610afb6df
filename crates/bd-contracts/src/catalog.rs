//! Contracts for catalog items, components, and assemblies

use bd_core::error::ValidationErrors;
use bd_models::{Assembly, CatalogItem, Component};

use crate::base::{check_non_negative, check_positive, Contract, ValidationResult};

/// Contract for catalog item entry
#[derive(Debug, Default)]
pub struct CatalogItemContract;

impl Contract<CatalogItem> for CatalogItemContract {
    fn validate(&self, item: &CatalogItem) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if item.reference.trim().is_empty() {
            errors.add("reference", "is required");
        }
        if item.name.trim().is_empty() {
            errors.add("name", "is required");
        }
        check_non_negative(&mut errors, "unit_price", item.unit_price);

        errors.into_result()
    }

    fn is_writable(&self, attribute: &str) -> bool {
        matches!(
            attribute,
            "reference" | "name" | "unit" | "unit_price" | "item_type" | "category"
        )
    }
}

/// Contract for a single component of an assembly or work-item
#[derive(Debug, Default)]
pub struct ComponentContract;

impl ComponentContract {
    pub fn collect(&self, component: &Component, prefix: &str, errors: &mut ValidationErrors) {
        if component.name.trim().is_empty() {
            errors.add(format!("{}name", prefix), "is required");
        }
        check_positive(errors, &format!("{}quantity", prefix), component.quantity);
        check_non_negative(errors, &format!("{}unit_price", prefix), component.unit_price);
    }
}

impl Contract<Component> for ComponentContract {
    fn validate(&self, component: &Component) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        self.collect(component, "", &mut errors);
        errors.into_result()
    }
}

/// Contract for assembly entry, including every component
#[derive(Debug, Default)]
pub struct AssemblyContract;

impl Contract<Assembly> for AssemblyContract {
    fn validate(&self, assembly: &Assembly) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if assembly.reference.trim().is_empty() {
            errors.add("reference", "is required");
        }
        if assembly.name.trim().is_empty() {
            errors.add("name", "is required");
        }

        let component_contract = ComponentContract;
        for (index, component) in assembly.components.iter().enumerate() {
            let prefix = format!("components[{}].", index);
            component_contract.collect(component, &prefix, &mut errors);
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bd_models::ItemType;

    fn component(quantity: f64, unit_price: f64) -> Component {
        Component {
            catalog_item_id: Some(1),
            name: "Plaque BA13".to_string(),
            unit: "m2".to_string(),
            item_type: ItemType::Material,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_component_quantity_must_be_positive() {
        let contract = ComponentContract;
        assert!(contract.validate(&component(2.0, 4.0)).is_ok());

        let result = contract.validate(&component(0.0, 4.0));
        assert!(result.unwrap_err().has_error("quantity"));

        let result = contract.validate(&component(2.0, -1.0));
        assert!(result.unwrap_err().has_error("unit_price"));
    }

    #[test]
    fn test_assembly_contract_indexes_component_errors() {
        let assembly = Assembly::new("CLOISON-72", "Cloison 72/48", "m2")
            .with_component(component(2.0, 4.0))
            .with_component(component(-1.0, 4.0));

        let errors = AssemblyContract.validate(&assembly).unwrap_err();
        assert!(errors.has_error("components[1].quantity"));
        assert!(!errors.has_error("components[0].quantity"));
    }

    #[test]
    fn test_catalog_item_contract() {
        let contract = CatalogItemContract;
        let good = CatalogItem::new("PLQ", "Plaque", "m2", 4.0, ItemType::Material);
        assert!(contract.validate(&good).is_ok());

        let mut bad = good.clone();
        bad.reference = "  ".to_string();
        bad.unit_price = -2.0;
        let errors = contract.validate(&bad).unwrap_err();
        assert!(errors.has_error("reference"));
        assert!(errors.has_error("unit_price"));
    }
}
