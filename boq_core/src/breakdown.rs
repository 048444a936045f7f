//! # BOQ Breakdown
//!
//! Expands the category aggregates into ordered, display-ready line items.
//! Every category carries one or more **driver** lines, which sum exactly to
//! the category subtotal after rounding reconciliation, plus **illustrative**
//! lines: sub-allocations shown for context (masonry share of labor, rental
//! equipment, the per-room addition figure) that are never summed into any
//! aggregate. The [`LineRole`] tag keeps the two apart in the type system so
//! a consumer cannot double-count decorations into the total.
//!
//! ## Example
//!
//! ```rust
//! use boq_core::breakdown::{build_breakdown, CostCategory};
//! use boq_core::catalog::RateCatalog;
//! use boq_core::costing::aggregate;
//! use boq_core::project::ProjectSpecification;
//! use boq_core::takeoff::takeoff;
//!
//! let spec = ProjectSpecification::new("Demo", 1000.0, "Karachi");
//! let catalog = RateCatalog::builtin();
//! let quantities = takeoff(&spec);
//! let totals = aggregate(&spec, &quantities, catalog).unwrap();
//!
//! let breakdown = build_breakdown(&spec, &quantities, &totals, catalog).unwrap();
//! let materials = breakdown.section(CostCategory::Materials).unwrap();
//! assert_eq!(materials.subtotal, totals.material_cost.round());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{MaterialKind, RateCatalog};
use crate::costing::{material_line_cost, CostTotals};
use crate::errors::{BoqResult, EstimateError};
use crate::project::ProjectSpecification;
use crate::takeoff::Quantities;
use crate::units::{group_thousands, Pkr};

/// Informational per-room addition rate shown in the Miscellaneous section
pub const ROOM_ADDITION_RATE: f64 = 60_000.0;

/// BOQ cost categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    Materials,
    Labor,
    Equipment,
    Finishes,
    Miscellaneous,
}

impl CostCategory {
    /// All categories in display order
    pub const ALL: [CostCategory; 5] = [
        CostCategory::Materials,
        CostCategory::Labor,
        CostCategory::Equipment,
        CostCategory::Finishes,
        CostCategory::Miscellaneous,
    ];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            CostCategory::Materials => "Materials",
            CostCategory::Labor => "Labor",
            CostCategory::Equipment => "Equipment",
            CostCategory::Finishes => "Finishes",
            CostCategory::Miscellaneous => "Miscellaneous",
        }
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Whether a line item constitutes its category's aggregate or merely
/// decorates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    /// Sums into the category subtotal (and so into `total_cost`)
    Driver,
    /// Presentation detail; excluded from every sum
    Illustrative,
}

/// A single BOQ row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Row description (e.g. "Cement", "Construction Labor")
    pub description: String,

    /// Human-readable quantity (e.g. "400 bags", "4 room(s)")
    pub quantity_display: String,

    /// Human-readable unit rate (e.g. "PKR 1,250/bag", "N/A")
    pub rate_display: String,

    /// Rounded whole-PKR amount
    pub amount: f64,

    /// Driver or illustrative
    pub role: LineRole,
}

impl LineItem {
    fn driver(
        description: impl Into<String>,
        quantity_display: impl Into<String>,
        rate_display: impl Into<String>,
        amount: f64,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity_display: quantity_display.into(),
            rate_display: rate_display.into(),
            amount: amount.round(),
            role: LineRole::Driver,
        }
    }

    fn illustrative(
        description: impl Into<String>,
        quantity_display: impl Into<String>,
        rate_display: impl Into<String>,
        amount: f64,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity_display: quantity_display.into(),
            rate_display: rate_display.into(),
            amount: amount.round(),
            role: LineRole::Illustrative,
        }
    }
}

/// One category's ordered line items plus its reconciled subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySection {
    /// The category this section belongs to
    pub category: CostCategory,

    /// Ordered line items, drivers first
    pub items: Vec<LineItem>,

    /// Rounded category aggregate; equals the sum of driver line amounts
    pub subtotal: f64,
}

impl CategorySection {
    /// Sum of driver line amounts (equals `subtotal` by construction)
    pub fn driver_total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| item.role == LineRole::Driver)
            .map(|item| item.amount)
            .sum()
    }
}

/// The full BOQ breakdown: category sections in display order.
///
/// The Finishes section is present only when the specification includes
/// finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Category sections in display order
    pub sections: Vec<CategorySection>,
}

impl Breakdown {
    /// Get a category's section, if present
    pub fn section(&self, category: CostCategory) -> Option<&CategorySection> {
        self.sections.iter().find(|s| s.category == category)
    }
}

fn pkr_rate(rate: f64, unit: &str) -> String {
    format!("{}{}", Pkr(rate), unit)
}

fn area_by_floors(spec: &ProjectSpecification) -> String {
    format!(
        "{} sq.ft x {} floor(s)",
        group_thousands(spec.total_area_sqft),
        spec.floor_count
    )
}

fn rooms_display(spec: &ProjectSpecification) -> String {
    format!("{} room(s)", spec.room_count)
}

/// Materials: one driver line per material. Rounding remainder is folded
/// into the last line so the section sums exactly to the rounded aggregate.
fn materials_section(
    spec: &ProjectSpecification,
    quantities: &Quantities,
    totals: &CostTotals,
    catalog: &RateCatalog,
) -> BoqResult<CategorySection> {
    let tier = spec.material_tier();
    let mut items = Vec::with_capacity(MaterialKind::ALL.len());

    for kind in MaterialKind::ALL {
        let rate = catalog
            .material_rate(&spec.location, kind)
            .ok_or_else(|| {
                EstimateError::missing_rate(kind.catalog_name(), spec.location.clone())
            })?
            .rate_for(tier);
        // Display the rate per single quantity unit
        let unit_rate = if kind.per_thousand_rate() {
            rate / 1000.0
        } else {
            rate
        };
        let cost = material_line_cost(spec, quantities, catalog, kind)?;

        items.push(LineItem::driver(
            kind.display_name(),
            format!(
                "{} {}",
                group_thousands(quantities.for_kind(kind)),
                kind.quantity_unit()
            ),
            pkr_rate(unit_rate, kind.rate_unit()),
            cost,
        ));
    }

    let subtotal = totals.material_cost.round();
    let line_sum: f64 = items.iter().map(|item| item.amount).sum();
    let remainder = subtotal - line_sum;
    if remainder != 0.0 {
        if let Some(last) = items.last_mut() {
            last.amount += remainder;
        }
    }

    Ok(CategorySection {
        category: CostCategory::Materials,
        items,
        subtotal,
    })
}

fn labor_section(
    spec: &ProjectSpecification,
    totals: &CostTotals,
    catalog: &RateCatalog,
) -> CategorySection {
    let labor_rate = catalog
        .city(&spec.location)
        .map(|c| c.labor_rate_per_sqft)
        .unwrap_or_default();
    let effective_area = spec.effective_area_sqft();

    let mason_days = (effective_area / 100.0).round();
    let electrician_days = (effective_area / 150.0).round();
    let rooms = spec.room_count as f64;

    CategorySection {
        category: CostCategory::Labor,
        items: vec![
            LineItem::driver(
                "Construction Labor",
                area_by_floors(spec),
                pkr_rate(labor_rate, "/sq.ft"),
                totals.labor_cost,
            ),
            LineItem::illustrative(
                "Masonry Work",
                format!("{} mason-days", group_thousands(mason_days)),
                "PKR 2,500/day",
                effective_area / 100.0 * 2500.0,
            ),
            LineItem::illustrative(
                "Carpentry Work",
                rooms_display(spec),
                "PKR 45,000/room",
                rooms * 45_000.0,
            ),
            LineItem::illustrative(
                "Electrical Work",
                format!("{} electrician-days", group_thousands(electrician_days)),
                "PKR 2,200/day",
                effective_area / 150.0 * 2200.0,
            ),
            LineItem::illustrative(
                "Plumbing Work",
                rooms_display(spec),
                "PKR 35,000/room",
                rooms * 35_000.0,
            ),
        ],
        subtotal: totals.labor_cost.round(),
    }
}

fn equipment_section(totals: &CostTotals) -> CategorySection {
    CategorySection {
        category: CostCategory::Equipment,
        items: vec![
            LineItem::driver(
                "Equipment Rental",
                "Project duration",
                "18% of labor cost",
                totals.equipment_cost,
            ),
            LineItem::illustrative("Concrete Mixer", "15 days", "PKR 3,000/day", 45_000.0),
            LineItem::illustrative("Scaffolding", "30 days", "PKR 800/day", 24_000.0),
            LineItem::illustrative("Power Tools", "45 days", "PKR 1,000/day", 45_000.0),
            LineItem::illustrative("Safety Equipment", "Lump sum", "N/A", 15_000.0),
        ],
        subtotal: totals.equipment_cost.round(),
    }
}

fn finishes_section(spec: &ProjectSpecification, totals: &CostTotals) -> Option<CategorySection> {
    let tier = spec.finishes_tier()?;
    let rate = tier.finish_rate_per_sqft();
    let effective_area = spec.effective_area_sqft();
    let tile_area = spec.room_count as f64 * 80.0;

    Some(CategorySection {
        category: CostCategory::Finishes,
        items: vec![
            LineItem::driver(
                "Interior Finishes",
                area_by_floors(spec),
                pkr_rate(rate, "/sq.ft"),
                totals.finishes_cost,
            ),
            LineItem::illustrative(
                "Flooring",
                format!("{} sq.ft", group_thousands(effective_area)),
                pkr_rate(rate * 0.4, "/sq.ft"),
                effective_area * rate * 0.4,
            ),
            LineItem::illustrative(
                "Painting",
                format!("{} sq.ft (walls)", group_thousands(effective_area * 3.5)),
                pkr_rate(rate * 0.3, "/sq.ft"),
                effective_area * 3.5 * rate * 0.3,
            ),
            LineItem::illustrative(
                "Bathroom Tiles",
                format!("{} sq.ft", group_thousands(tile_area)),
                pkr_rate(rate * 0.5, "/sq.ft"),
                tile_area * rate * 0.5,
            ),
            LineItem::illustrative(
                "False Ceiling",
                format!("{} sq.ft", group_thousands(effective_area)),
                pkr_rate(rate * 0.3, "/sq.ft"),
                effective_area * rate * 0.3,
            ),
        ],
        subtotal: totals.finishes_cost.round(),
    })
}

fn miscellaneous_section(spec: &ProjectSpecification, totals: &CostTotals) -> CategorySection {
    let rooms = spec.room_count as f64;

    CategorySection {
        category: CostCategory::Miscellaneous,
        items: vec![
            LineItem::driver(
                "Other Costs",
                "12% of subtotal",
                "N/A",
                totals.other_costs,
            ),
            LineItem::illustrative(
                "Project Management",
                "40% of other costs",
                "N/A",
                totals.other_costs * 0.4,
            ),
            LineItem::illustrative("Transportation", "1 month", "PKR 25,000/month", 25_000.0),
            LineItem::illustrative("Permits & Legal Fees", "Lump sum", "N/A", 35_000.0),
            LineItem::illustrative(
                "Contingency",
                "5% of total",
                "N/A",
                totals.total_cost * 0.05,
            ),
            LineItem::illustrative(
                "Room Addition Cost",
                rooms_display(spec),
                "PKR 60,000/room",
                rooms * ROOM_ADDITION_RATE,
            ),
        ],
        subtotal: totals.other_costs.round(),
    }
}

/// Build the full BOQ breakdown for a specification.
///
/// Callable independently of [`crate::estimate::estimate`], e.g. to
/// regenerate a display breakdown from stored quantities and totals with
/// the same spec/catalog snapshot.
pub fn build_breakdown(
    spec: &ProjectSpecification,
    quantities: &Quantities,
    totals: &CostTotals,
    catalog: &RateCatalog,
) -> BoqResult<Breakdown> {
    let mut sections = vec![
        materials_section(spec, quantities, totals, catalog)?,
        labor_section(spec, totals, catalog),
        equipment_section(totals),
    ];
    if let Some(finishes) = finishes_section(spec, totals) {
        sections.push(finishes);
    }
    sections.push(miscellaneous_section(spec, totals));

    Ok(Breakdown { sections })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::aggregate;
    use crate::takeoff::takeoff;

    fn breakdown_for(spec: &ProjectSpecification) -> (CostTotals, Breakdown) {
        let catalog = RateCatalog::builtin();
        let quantities = takeoff(spec);
        let totals = aggregate(spec, &quantities, catalog).unwrap();
        let breakdown = build_breakdown(spec, &quantities, &totals, catalog).unwrap();
        (totals, breakdown)
    }

    fn spec_1000_sqft() -> ProjectSpecification {
        ProjectSpecification::new("Breakdown Test", 1000.0, "Karachi").with_rooms(4, 10.0, 20.0)
    }

    #[test]
    fn test_materials_lines_concrete_scenario() {
        let (_, breakdown) = breakdown_for(&spec_1000_sqft());
        let materials = breakdown.section(CostCategory::Materials).unwrap();

        let amounts: Vec<f64> = materials.items.iter().map(|i| i.amount).collect();
        assert_eq!(
            amounts,
            vec![500_000.0, 980_000.0, 112_000.0, 36_000.0, 31_500.0]
        );
        assert_eq!(materials.subtotal, 1_659_500.0);

        let cement = &materials.items[0];
        assert_eq!(cement.description, "Cement");
        assert_eq!(cement.quantity_display, "400 bags");
        assert_eq!(cement.rate_display, "PKR 1,250/bag");

        // Per-1000 rates display per single unit
        let bricks = &materials.items[2];
        assert_eq!(bricks.rate_display, "PKR 14/pc");
    }

    #[test]
    fn test_every_section_reconciles_to_its_aggregate() {
        let specs = [
            spec_1000_sqft(),
            // Fractional line costs force a rounding remainder
            ProjectSpecification::new("Fractional", 777.0, "Hyderabad")
                .with_rooms(3, 11.0, 13.0)
                .with_quality("premium")
                .with_finishes("luxury"),
            spec_1000_sqft().with_quality("luxury").with_floors(2),
        ];
        for spec in specs {
            let (totals, breakdown) = breakdown_for(&spec);
            for section in &breakdown.sections {
                assert_eq!(
                    section.driver_total(),
                    section.subtotal,
                    "driver lines must sum to the subtotal for {}",
                    section.category
                );
            }
            let materials = breakdown.section(CostCategory::Materials).unwrap();
            assert_eq!(materials.subtotal, totals.material_cost.round());
            let misc = breakdown.section(CostCategory::Miscellaneous).unwrap();
            assert_eq!(misc.subtotal, totals.other_costs.round());
        }
    }

    #[test]
    fn test_finishes_section_gated() {
        let (_, without) = breakdown_for(&spec_1000_sqft());
        assert!(without.section(CostCategory::Finishes).is_none());

        let (totals, with) = breakdown_for(&spec_1000_sqft().with_finishes("premium"));
        let finishes = with.section(CostCategory::Finishes).unwrap();
        assert_eq!(finishes.subtotal, totals.finishes_cost.round());
    }

    #[test]
    fn test_illustrative_lines_never_sum_into_subtotals() {
        let (totals, breakdown) = breakdown_for(&spec_1000_sqft().with_finishes("standard"));
        for section in &breakdown.sections {
            let drivers = section.driver_total();
            assert_eq!(drivers, section.subtotal);
            // Materials is all drivers; every other category carries
            // illustrative decoration on top of its drivers
            if section.category != CostCategory::Materials {
                let all_lines: f64 = section.items.iter().map(|i| i.amount).sum();
                assert!(
                    all_lines > drivers,
                    "{} should carry illustrative decoration",
                    section.category
                );
            }
        }
        // And the grand total is driven by driver lines alone
        let driver_sum: f64 = breakdown.sections.iter().map(|s| s.subtotal).sum();
        assert!((driver_sum - totals.total_cost.round()).abs() <= 1.0);
    }

    #[test]
    fn test_room_addition_is_illustrative() {
        let (_, breakdown) = breakdown_for(&spec_1000_sqft());
        let misc = breakdown.section(CostCategory::Miscellaneous).unwrap();
        let room_line = misc
            .items
            .iter()
            .find(|i| i.description == "Room Addition Cost")
            .unwrap();
        assert_eq!(room_line.role, LineRole::Illustrative);
        assert_eq!(room_line.amount, 4.0 * ROOM_ADDITION_RATE);
        assert_eq!(room_line.quantity_display, "4 room(s)");
    }

    #[test]
    fn test_labor_sub_items_are_illustrative() {
        let (totals, breakdown) = breakdown_for(&spec_1000_sqft());
        let labor = breakdown.section(CostCategory::Labor).unwrap();

        assert_eq!(labor.items[0].role, LineRole::Driver);
        assert_eq!(labor.items[0].amount, totals.labor_cost.round());
        for item in &labor.items[1..] {
            assert_eq!(item.role, LineRole::Illustrative);
        }
        // Masonry: 1000 sqft / 100 = 10 mason-days at 2,500
        let masonry = &labor.items[1];
        assert_eq!(masonry.quantity_display, "10 mason-days");
        assert_eq!(masonry.amount, 25_000.0);
    }

    #[test]
    fn test_sections_in_display_order() {
        let (_, breakdown) = breakdown_for(&spec_1000_sqft().with_finishes("standard"));
        let order: Vec<CostCategory> = breakdown.sections.iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                CostCategory::Materials,
                CostCategory::Labor,
                CostCategory::Equipment,
                CostCategory::Finishes,
                CostCategory::Miscellaneous,
            ]
        );
    }

    #[test]
    fn test_breakdown_serialization_roundtrip() {
        let (_, breakdown) = breakdown_for(&spec_1000_sqft());
        let json = serde_json::to_string_pretty(&breakdown).unwrap();
        assert!(json.contains("\"Driver\""));
        assert!(json.contains("\"Illustrative\""));
        let parsed: Breakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, breakdown);
    }
}
