//! Project reconciliation engine
//!
//! Answers the question every site manager asks at the end of a job: what
//! did we plan to spend, what did we actually spend, and where did the
//! difference come from. Planned costs come out of the frozen component
//! snapshots of the linked quotes; real costs come out of the project's
//! expense log. Both sides aggregate under the same
//! `(catalog item, item type)` keys so they can be compared line by line.

use std::collections::HashMap;

use bd_core::traits::Id;
use bd_core::types::{is_hour_unit, round_cents, sane_amount};
use bd_models::{ItemType, LineKind, Project, Quote};
use serde::Serialize;

/// Aggregation key: a catalog item (when known) within an item-type bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostKey {
    pub catalog_item_id: Option<Id>,
    pub item_type: ItemType,
}

/// One aggregated cost line. Designation, unit, and unit price are the
/// last seen values and serve display only; quantity and amount are the
/// accumulated truth.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub key: CostKey,
    pub designation: String,
    pub unit: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub amount: f64,
}

/// Aggregated costs, shaped the same for the forecast and the actual side
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// One line per key, ordered by item type then designation
    pub lines: Vec<CostLine>,
    /// Amount totals per item-type bucket
    pub by_type: HashMap<ItemType, f64>,
    /// Labor quantities carried in hour units
    pub labor_hours: f64,
}

impl CostBreakdown {
    pub fn amount_for_type(&self, item_type: ItemType) -> f64 {
        self.by_type.get(&item_type).copied().unwrap_or(0.0)
    }

    pub fn total_amount(&self) -> f64 {
        round_cents(self.lines.iter().map(|line| line.amount).sum())
    }
}

/// Planned costs of a project, from its linked quotes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub breakdown: CostBreakdown,
    /// Sum of the linked quotes' own pre-tax totals. This is the money
    /// total the client signed, and the figure variances run against.
    pub total_cost: f64,
    /// Sum of the component-level accumulation. Diverges from
    /// `total_cost` exactly when lines carry manual price overrides;
    /// kept as a cross-check, not as the total.
    pub component_cost: f64,
    pub resolved_quotes: usize,
    pub skipped_quotes: Vec<String>,
}

/// Real costs of a project, from its expense log
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualReport {
    pub breakdown: CostBreakdown,
    pub total_cost: f64,
}

/// Forecast/actual comparison for one item-type bucket
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceLine {
    pub item_type: ItemType,
    pub forecast: f64,
    pub actual: f64,
    /// Positive means over budget
    pub variance: f64,
    pub variance_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VarianceReport {
    pub by_type: Vec<VarianceLine>,
    pub total_forecast: f64,
    pub total_actual: f64,
    pub variance: f64,
    pub variance_pct: f64,
}

/// Resolves linked quote numbers. Implemented by whatever the caller has
/// already materialized in memory.
pub trait QuoteLookup {
    fn quote(&self, number: &str) -> Option<&Quote>;
}

impl QuoteLookup for HashMap<String, Quote> {
    fn quote(&self, number: &str) -> Option<&Quote> {
        self.get(number)
    }
}

impl QuoteLookup for Vec<Quote> {
    fn quote(&self, number: &str) -> Option<&Quote> {
        self.iter().find(|quote| quote.number == number)
    }
}

#[derive(Default)]
struct Accumulator {
    map: HashMap<CostKey, CostLine>,
    labor_hours: f64,
}

impl Accumulator {
    fn add(
        &mut self,
        key: CostKey,
        designation: &str,
        unit: &str,
        unit_price: f64,
        quantity: f64,
        amount: f64,
    ) {
        let line = self.map.entry(key).or_insert_with(|| CostLine {
            key,
            designation: String::new(),
            unit: String::new(),
            unit_price: 0.0,
            quantity: 0.0,
            amount: 0.0,
        });
        // display fields track the latest contribution
        line.designation = designation.to_string();
        line.unit = unit.to_string();
        line.unit_price = unit_price;
        line.quantity += quantity;
        line.amount += amount;

        if key.item_type.is_labor() && is_hour_unit(unit) {
            self.labor_hours += quantity;
        }
    }

    fn into_breakdown(self) -> CostBreakdown {
        let mut by_type: HashMap<ItemType, f64> = HashMap::new();
        let mut lines: Vec<CostLine> = self.map.into_values().collect();
        for line in &mut lines {
            line.quantity = round_cents(line.quantity);
            line.amount = round_cents(line.amount);
            *by_type.entry(line.key.item_type).or_insert(0.0) += line.amount;
        }
        for amount in by_type.values_mut() {
            *amount = round_cents(*amount);
        }

        let type_rank = |t: ItemType| ItemType::ALL.iter().position(|x| *x == t).unwrap_or(0);
        lines.sort_by(|a, b| {
            type_rank(a.key.item_type)
                .cmp(&type_rank(b.key.item_type))
                .then_with(|| a.designation.cmp(&b.designation))
        });

        CostBreakdown {
            lines,
            by_type,
            labor_hours: round_cents(self.labor_hours),
        }
    }
}

/// Build the planned-cost report from every resolvable linked quote.
/// Unresolvable numbers are skipped with a warning; a partial forecast
/// beats none when history has been pruned.
pub fn forecast<L: QuoteLookup + ?Sized>(project: &Project, lookup: &L) -> ForecastReport {
    let mut acc = Accumulator::default();
    let mut total_cost = 0.0;
    let mut resolved_quotes = 0usize;
    let mut skipped_quotes = Vec::new();

    for number in project.linked_quotes() {
        let Some(quote) = lookup.quote(number) else {
            tracing::warn!(
                project = %project.number,
                quote = %number,
                "linked quote could not be resolved; leaving it out of the forecast"
            );
            skipped_quotes.push(number.clone());
            continue;
        };
        resolved_quotes += 1;
        total_cost += quote.total_ht();

        for line in &quote.lines {
            let LineKind::WorkItem {
                quantity: line_quantity,
                components,
                ..
            } = &line.kind
            else {
                continue;
            };
            let line_quantity = sane_amount(*line_quantity);

            for component in components {
                let quantity = sane_amount(component.quantity) * line_quantity;
                let amount = quantity * sane_amount(component.unit_price);
                acc.add(
                    CostKey {
                        catalog_item_id: component.catalog_item_id,
                        item_type: component.item_type,
                    },
                    &component.name,
                    &component.unit,
                    component.unit_price,
                    quantity,
                    amount,
                );
            }
        }
    }

    let breakdown = acc.into_breakdown();
    ForecastReport {
        component_cost: breakdown.total_amount(),
        breakdown,
        total_cost: round_cents(total_cost),
        resolved_quotes,
        skipped_quotes,
    }
}

/// Build the real-cost report from the project's expense log
pub fn actual(project: &Project) -> ActualReport {
    let mut acc = Accumulator::default();

    for expense in project.expenses() {
        let quantity = sane_amount(expense.quantity);
        let amount = quantity * sane_amount(expense.unit_price);
        acc.add(
            CostKey {
                catalog_item_id: expense.catalog_item_id,
                item_type: expense.expense_type,
            },
            &expense.designation,
            &expense.unit,
            expense.unit_price,
            quantity,
            amount,
        );
    }

    let breakdown = acc.into_breakdown();
    ActualReport {
        total_cost: breakdown.total_amount(),
        breakdown,
    }
}

/// Compare planned and real costs, per item-type bucket and in total
pub fn variance<L: QuoteLookup + ?Sized>(project: &Project, lookup: &L) -> VarianceReport {
    let planned = forecast(project, lookup);
    let real = actual(project);

    let by_type = ItemType::ALL
        .iter()
        .map(|&item_type| {
            let forecast_amount = planned.breakdown.amount_for_type(item_type);
            let actual_amount = real.breakdown.amount_for_type(item_type);
            let variance = round_cents(actual_amount - forecast_amount);
            VarianceLine {
                item_type,
                forecast: forecast_amount,
                actual: actual_amount,
                variance,
                variance_pct: variance_pct(forecast_amount, variance),
            }
        })
        .collect();

    let variance = round_cents(real.total_cost - planned.total_cost);
    VarianceReport {
        by_type,
        total_forecast: planned.total_cost,
        total_actual: real.total_cost,
        variance,
        variance_pct: variance_pct(planned.total_cost, variance),
    }
}

/// Percentage deviation, defined as zero for an empty forecast so a
/// bucket with no planned spend never divides by zero
fn variance_pct(forecast: f64, variance: f64) -> f64 {
    if forecast == 0.0 {
        0.0
    } else {
        round_cents(variance / forecast * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines;
    use bd_models::{ActualExpense, Assembly, CatalogItem, Component};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    fn labor_item() -> CatalogItem {
        let mut item = CatalogItem::new("MO", "Pose", "h", 40.0, ItemType::Labor);
        item.id = Some(2);
        item
    }

    fn material_item(price: f64) -> CatalogItem {
        let mut item = CatalogItem::new("MAT", "Fourniture", "u", price, ItemType::Material);
        item.id = Some(1);
        item
    }

    fn quote_with_assembly(number: &str, assembly: &Assembly, quantity: f64) -> Quote {
        let mut quote = Quote::new(
            number,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "CLIENT-12",
        );
        quote.margin_coefficient = 1.35;
        lines::insert_work_item(&mut quote, assembly, quantity);
        quote
    }

    fn project_with(quotes: &[&Quote]) -> (Project, Vec<Quote>) {
        let mut project = Project::new("PROJ-2024-0001", "CLIENT-12", quotes[0].number.clone());
        for quote in &quotes[1..] {
            project.attach_quote(quote.number.clone());
        }
        (project, quotes.iter().map(|q| (*q).clone()).collect())
    }

    #[test]
    fn test_end_to_end_variance_scenario() {
        // one work-item: 1 unit of an assembly costing 100, coefficient 1.35
        let assembly = Assembly::new("ASM", "Assembly", "u")
            .with_component(Component::freeze(&material_item(100.0), 1.0));
        let quote = quote_with_assembly("DEV-2024-0001", &assembly, 1.0);
        let (mut project, quotes) = project_with(&[&quote]);

        let planned = forecast(&project, &quotes);
        assert_eq!(planned.total_cost, 135.0);
        assert_eq!(planned.component_cost, 100.0);

        // the same item bought at cost
        project.log_expense(
            ActualExpense::new(ItemType::Material, "Fourniture", 1.0, 100.0, date())
                .with_catalog_item(1),
        );

        let report = variance(&project, &quotes);
        assert_eq!(report.total_actual, 100.0);
        assert_eq!(report.variance, -35.0);
        assert_eq!(report.variance_pct, -25.93);
    }

    #[test]
    fn test_forecast_multiplies_by_line_quantity() {
        let assembly = Assembly::new("ASM", "Assembly", "m2")
            .with_component(Component::freeze(&material_item(4.0), 2.0))
            .with_component(Component::freeze(&labor_item(), 0.5));
        let quote = quote_with_assembly("DEV-2024-0001", &assembly, 10.0);
        let (project, quotes) = project_with(&[&quote]);

        let planned = forecast(&project, &quotes);
        // 10 m2 * 2.0 units of material, 10 m2 * 0.5 h of labor
        let material = planned
            .breakdown
            .lines
            .iter()
            .find(|l| l.key.item_type == ItemType::Material)
            .unwrap();
        assert_eq!(material.quantity, 20.0);
        assert_eq!(material.amount, 80.0);

        assert_eq!(planned.breakdown.labor_hours, 5.0);
        assert_eq!(planned.breakdown.amount_for_type(ItemType::Labor), 200.0);
    }

    #[test]
    fn test_forecast_merges_items_across_quotes() {
        let assembly = Assembly::new("ASM", "Assembly", "u")
            .with_component(Component::freeze(&material_item(10.0), 1.0));
        let a = quote_with_assembly("DEV-2024-0001", &assembly, 2.0);
        let b = quote_with_assembly("DEV-2024-0002", &assembly, 3.0);
        let (project, quotes) = project_with(&[&a, &b]);

        let planned = forecast(&project, &quotes);
        assert_eq!(planned.resolved_quotes, 2);
        assert_eq!(planned.breakdown.lines.len(), 1);
        assert_eq!(planned.breakdown.lines[0].quantity, 5.0);
        assert_eq!(planned.breakdown.lines[0].amount, 50.0);
    }

    #[test]
    fn test_unresolved_quote_is_skipped_not_fatal() {
        let assembly = Assembly::new("ASM", "Assembly", "u")
            .with_component(Component::freeze(&material_item(10.0), 1.0));
        let quote = quote_with_assembly("DEV-2024-0001", &assembly, 1.0);

        let mut project = Project::new("PROJ-2024-0001", "CLIENT-12", "DEV-2024-0001");
        project.attach_quote("DEV-2019-0042"); // pruned long ago

        let planned = forecast(&project, &vec![quote]);
        assert_eq!(planned.resolved_quotes, 1);
        assert_eq!(planned.skipped_quotes, ["DEV-2019-0042"]);
        assert_eq!(planned.total_cost, 13.5);
    }

    #[test]
    fn test_actual_groups_by_item_and_type() {
        let mut project = Project::new("PROJ-2024-0001", "CLIENT-12", "DEV-2024-0001");
        project.log_expense(
            ActualExpense::new(ItemType::Material, "Sable", 2.0, 35.0, date()).with_catalog_item(1),
        );
        project.log_expense(
            ActualExpense::new(ItemType::Material, "Sable", 1.0, 36.0, date()).with_catalog_item(1),
        );
        project.log_expense(
            ActualExpense::new(ItemType::Labor, "Pose", 8.0, 40.0, date()).with_unit("h"),
        );

        let report = actual(&project);
        assert_eq!(report.breakdown.lines.len(), 2);

        let sand = report
            .breakdown
            .lines
            .iter()
            .find(|l| l.key.item_type == ItemType::Material)
            .unwrap();
        assert_eq!(sand.quantity, 3.0);
        assert_eq!(sand.amount, 106.0);
        // display price is the last one seen
        assert_eq!(sand.unit_price, 36.0);

        assert_eq!(report.breakdown.labor_hours, 8.0);
        assert_eq!(report.total_cost, 426.0);
    }

    #[test]
    fn test_zero_forecast_yields_zero_pct() {
        let mut project = Project::new("PROJ-2024-0001", "CLIENT-12", "DEV-2024-0001");
        project.log_expense(ActualExpense::new(
            ItemType::Consumable,
            "Visserie",
            1.0,
            50.0,
            date(),
        ));

        // no quotes resolvable: forecast is empty on every bucket
        let report = variance(&project, &Vec::<Quote>::new());
        let consumables = report
            .by_type
            .iter()
            .find(|line| line.item_type == ItemType::Consumable)
            .unwrap();
        assert_eq!(consumables.forecast, 0.0);
        assert_eq!(consumables.variance, 50.0);
        assert_eq!(consumables.variance_pct, 0.0);

        assert_eq!(report.variance, 50.0);
        assert_eq!(report.variance_pct, 0.0);
    }

    #[test]
    fn test_variance_sign_convention() {
        let assembly = Assembly::new("ASM", "Assembly", "u")
            .with_component(Component::freeze(&material_item(100.0), 1.0));
        let quote = quote_with_assembly("DEV-2024-0001", &assembly, 1.0);
        let (mut project, quotes) = project_with(&[&quote]);

        // spending more than planned goes positive
        project.log_expense(
            ActualExpense::new(ItemType::Material, "Fourniture", 1.0, 180.0, date())
                .with_catalog_item(1),
        );
        let report = variance(&project, &quotes);
        assert!(report.variance > 0.0);

        let materials = report
            .by_type
            .iter()
            .find(|line| line.item_type == ItemType::Material)
            .unwrap();
        assert_eq!(materials.forecast, 100.0);
        assert_eq!(materials.actual, 180.0);
        assert_eq!(materials.variance, 80.0);
        assert_eq!(materials.variance_pct, 80.0);
    }
}
