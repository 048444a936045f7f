//! # Estimate Pipeline
//!
//! The single entry point tying the stages together:
//! validate -> takeoff -> aggregate -> breakdown -> `EstimateResult`.
//!
//! Each stage is a pure function of its inputs; the same shared module
//! backs both the authoritative totals and the display breakdown, so the
//! two can never drift apart.
//!
//! ## Example
//!
//! ```rust
//! use boq_core::catalog::RateCatalog;
//! use boq_core::estimate::estimate;
//! use boq_core::project::ProjectSpecification;
//!
//! let spec = ProjectSpecification::new("Gulshan Villa", 1000.0, "Karachi")
//!     .with_rooms(4, 10.0, 20.0);
//!
//! let result = estimate(&spec, RateCatalog::builtin()).unwrap();
//! assert_eq!(result.total_cost, 2_585_520.0);
//! assert_eq!(result.labor_cost, 550_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::breakdown::{build_breakdown, Breakdown};
use crate::catalog::RateCatalog;
use crate::costing::aggregate;
use crate::errors::BoqResult;
use crate::project::ProjectSpecification;
use crate::takeoff::takeoff;

/// Stated accuracy of a material-takeoff-based estimate
pub const ACCURACY_NOTE: &str = "±7-9% (material take-off based)";

/// Minimum construction duration in days
pub const MIN_DURATION_DAYS: u32 = 45;

/// One finished estimate: rounded whole-PKR category costs, the total, and
/// the itemized breakdown.
///
/// Immutable once produced. Currency fields are whole-unit PKR amounts
/// serialized as numbers, never formatted strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    /// Material cost (cement, steel, bricks, sand, crush)
    pub material_cost: f64,

    /// Construction labor cost
    pub labor_cost: f64,

    /// Equipment cost (18% of labor)
    pub equipment_cost: f64,

    /// Interior finishes cost; zero when finishes are excluded
    pub finishes_cost: f64,

    /// Miscellaneous/other costs (12% of subtotal)
    pub other_costs: f64,

    /// Grand total
    pub total_cost: f64,

    /// Itemized per-category breakdown
    pub breakdown: Breakdown,

    /// Estimated construction duration in days
    pub duration_days: u32,

    /// Accuracy note for the caller's display
    pub accuracy: String,

    /// Room-area utilization advisory (percent of project area)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization_percent: Option<f64>,
}

/// Estimated duration: 45 days per 1000 sqft per floor, floored at 45.
fn duration_days(spec: &ProjectSpecification) -> u32 {
    let days = (spec.total_area_sqft / 1000.0 * 45.0 * spec.floor_count as f64).round() as u32;
    days.max(MIN_DURATION_DAYS)
}

/// Produce a full estimate for a specification.
///
/// Validates the specification first; a validation failure rejects the
/// input and nothing is computed. All monetary values are carried at full
/// precision through the stages and rounded only here, at the boundary.
pub fn estimate(
    spec: &ProjectSpecification,
    catalog: &RateCatalog,
) -> BoqResult<EstimateResult> {
    spec.validate(catalog)?;

    let quantities = takeoff(spec);
    let totals = aggregate(spec, &quantities, catalog)?;
    let breakdown = build_breakdown(spec, &quantities, &totals, catalog)?;

    Ok(EstimateResult {
        material_cost: totals.material_cost.round(),
        labor_cost: totals.labor_cost.round(),
        equipment_cost: totals.equipment_cost.round(),
        finishes_cost: totals.finishes_cost.round(),
        other_costs: totals.other_costs.round(),
        total_cost: totals.total_cost.round(),
        breakdown,
        duration_days: duration_days(spec),
        accuracy: ACCURACY_NOTE.to_string(),
        utilization_percent: spec.space_utilization_percent(),
    })
}
