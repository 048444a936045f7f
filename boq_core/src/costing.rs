//! # Cost Aggregation
//!
//! Multiplies takeoff quantities by catalog rates into the five category
//! aggregates and the final total. All intermediate values are carried at
//! full precision; only presented numbers are rounded (see
//! [`crate::breakdown`] and [`crate::estimate`]).
//!
//! ## Formulas
//!
//! ```text
//! material_cost  = sum over materials of quantity x rate  (per-1000 units normalized)
//! labor_cost     = area x labor_rate(location) x floors
//! equipment_cost = 0.18 x labor_cost
//! finishes_cost  = included ? area x finish_rate(tier) x floors : 0
//! other_costs    = 0.12 x (material + labor + equipment + finishes)
//! total_cost     = subtotal + other_costs
//! ```
//!
//! Ceiling height and room count contribute no term of their own:
//! ceiling height is recorded with the specification only, and the
//! per-room addition figure appears only as an illustrative breakdown
//! line, never in `total_cost`.

use serde::{Deserialize, Serialize};

use crate::catalog::{MaterialKind, RateCatalog};
use crate::errors::{BoqResult, EstimateError};
use crate::project::ProjectSpecification;
use crate::takeoff::Quantities;

/// Equipment cost as a fraction of labor cost
pub const EQUIPMENT_LABOR_RATIO: f64 = 0.18;
/// Miscellaneous/other costs as a fraction of the subtotal
pub const OTHER_COSTS_RATIO: f64 = 0.12;

/// The five category aggregates plus the total, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    /// Material cost across cement, steel, bricks, sand, crush
    pub material_cost: f64,
    /// Construction labor cost
    pub labor_cost: f64,
    /// Equipment cost (derived from labor)
    pub equipment_cost: f64,
    /// Interior finishes cost (zero when finishes are excluded)
    pub finishes_cost: f64,
    /// Miscellaneous/other costs (12% of subtotal)
    pub other_costs: f64,
    /// Grand total
    pub total_cost: f64,
}

impl CostTotals {
    /// Subtotal before other costs
    pub fn subtotal(&self) -> f64 {
        self.material_cost + self.labor_cost + self.equipment_cost + self.finishes_cost
    }
}

/// Line cost for one material: quantity times rate, with per-1000 units
/// (bricks per 1000 pcs, sand/crush per ~1000 cft truck) normalized.
pub(crate) fn material_line_cost(
    spec: &ProjectSpecification,
    quantities: &Quantities,
    catalog: &RateCatalog,
    kind: MaterialKind,
) -> BoqResult<f64> {
    let rate = catalog
        .material_rate(&spec.location, kind)
        .ok_or_else(|| EstimateError::missing_rate(kind.catalog_name(), spec.location.clone()))?
        .rate_for(spec.material_tier());

    let quantity = quantities.for_kind(kind);
    let cost = if kind.per_thousand_rate() {
        (quantity / 1000.0) * rate
    } else {
        quantity * rate
    };
    Ok(cost)
}

/// Aggregate quantities and rates into category costs and the total.
///
/// Assumes a validated specification; still fails cleanly (rather than
/// costing with zeros) if the catalog cannot supply a labor or material
/// rate.
pub fn aggregate(
    spec: &ProjectSpecification,
    quantities: &Quantities,
    catalog: &RateCatalog,
) -> BoqResult<CostTotals> {
    let city = catalog
        .city(&spec.location)
        .ok_or_else(|| EstimateError::unknown_location(spec.location.clone()))?;

    let mut material_cost = 0.0;
    for kind in MaterialKind::ALL {
        material_cost += material_line_cost(spec, quantities, catalog, kind)?;
    }

    let floors = spec.floor_count as f64;
    let labor_cost = spec.total_area_sqft * city.labor_rate_per_sqft * floors;
    let equipment_cost = labor_cost * EQUIPMENT_LABOR_RATIO;

    let finishes_cost = match spec.finishes_tier() {
        Some(tier) => spec.total_area_sqft * tier.finish_rate_per_sqft() * floors,
        None => 0.0,
    };

    let subtotal = material_cost + labor_cost + equipment_cost + finishes_cost;
    let other_costs = subtotal * OTHER_COSTS_RATIO;

    Ok(CostTotals {
        material_cost,
        labor_cost,
        equipment_cost,
        finishes_cost,
        other_costs,
        total_cost: subtotal + other_costs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::takeoff::takeoff;

    fn spec_1000_sqft() -> ProjectSpecification {
        ProjectSpecification::new("Costing Test", 1000.0, "Karachi").with_rooms(4, 10.0, 20.0)
    }

    fn totals_for(spec: &ProjectSpecification) -> CostTotals {
        let quantities = takeoff(spec);
        aggregate(spec, &quantities, RateCatalog::builtin()).unwrap()
    }

    #[test]
    fn test_concrete_scenario_1000_sqft_karachi() {
        let totals = totals_for(&spec_1000_sqft());

        // cement 400 x 1250 + steel 3500 x 280 + bricks 8 x 14000
        //   + sand 1.2 x 30000 + crush 0.9 x 35000
        assert_eq!(totals.material_cost, 1_659_500.0);
        assert_eq!(totals.labor_cost, 550_000.0);
        assert_eq!(totals.equipment_cost, 99_000.0);
        assert_eq!(totals.finishes_cost, 0.0);
        assert_eq!(totals.other_costs, 0.12 * 2_308_500.0);
        assert_eq!(totals.total_cost, 2_585_520.0);
    }

    #[test]
    fn test_total_decomposes_into_categories() {
        let specs = [
            spec_1000_sqft(),
            spec_1000_sqft().with_quality("luxury").with_floors(2),
            ProjectSpecification::new("Hyd", 1850.0, "Hyderabad")
                .with_rooms(6, 12.0, 14.0)
                .with_quality("premium")
                .with_finishes("premium"),
        ];
        for spec in specs {
            let totals = totals_for(&spec);
            let recomposed = totals.material_cost
                + totals.labor_cost
                + totals.equipment_cost
                + totals.finishes_cost
                + totals.other_costs;
            assert!((totals.total_cost - recomposed).abs() < 1e-6);
            assert!(
                (totals.other_costs - OTHER_COSTS_RATIO * totals.subtotal()).abs() < 1e-6
            );
        }
    }

    #[test]
    fn test_monotonic_in_area() {
        let small = totals_for(&spec_1000_sqft());
        let large = totals_for(
            &ProjectSpecification::new("Bigger", 1500.0, "Karachi").with_rooms(4, 10.0, 20.0),
        );
        assert!(large.material_cost > small.material_cost);
        assert!(large.labor_cost > small.labor_cost);
        assert!(large.total_cost > small.total_cost);
    }

    #[test]
    fn test_quality_ordering_on_material_cost() {
        let standard = totals_for(&spec_1000_sqft());
        let premium = totals_for(&spec_1000_sqft().with_quality("premium"));
        let luxury = totals_for(&spec_1000_sqft().with_quality("luxury"));
        assert!(luxury.material_cost > premium.material_cost);
        assert!(premium.material_cost > standard.material_cost);
    }

    #[test]
    fn test_finishes_gating() {
        let without = totals_for(&spec_1000_sqft());
        assert_eq!(without.finishes_cost, 0.0);

        let with = totals_for(&spec_1000_sqft().with_finishes("standard"));
        assert_eq!(with.finishes_cost, 1000.0 * 450.0);

        let luxury = totals_for(&spec_1000_sqft().with_finishes("luxury"));
        assert_eq!(luxury.finishes_cost, 1000.0 * 1300.0);
    }

    #[test]
    fn test_finishes_scale_with_floors() {
        let totals = totals_for(
            &spec_1000_sqft()
                .with_finishes("premium")
                .with_floors(2),
        );
        assert_eq!(totals.finishes_cost, 1000.0 * 750.0 * 2.0);
    }

    #[test]
    fn test_equipment_is_fraction_of_labor() {
        let totals = totals_for(&spec_1000_sqft().with_floors(3));
        assert!(
            (totals.equipment_cost - EQUIPMENT_LABOR_RATIO * totals.labor_cost).abs() < 1e-9
        );
    }

    #[test]
    fn test_labor_uses_city_rate() {
        let sukkur = totals_for(
            &ProjectSpecification::new("Sukkur House", 1000.0, "Sukkur")
                .with_rooms(4, 10.0, 20.0),
        );
        assert_eq!(sukkur.labor_cost, 400_000.0);
    }

    #[test]
    fn test_unknown_city_errors() {
        let spec = ProjectSpecification::new("Lost", 1000.0, "Atlantis");
        let quantities = takeoff(&spec);
        let err = aggregate(&spec, &quantities, RateCatalog::builtin()).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_LOCATION");
    }

    #[test]
    fn test_missing_rate_is_an_error_not_zero() {
        // Catalog with a city but an empty material set everywhere
        let mut catalog = RateCatalog::builtin().clone();
        catalog.material_rates.clear();

        let spec = spec_1000_sqft();
        let quantities = takeoff(&spec);
        let err = aggregate(&spec, &quantities, &catalog).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_RATE");
    }
}
