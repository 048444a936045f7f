//! # Quantity Takeoff
//!
//! Converts a project specification into physical material quantities.
//! All takeoff formulas are deterministic linear functions of the effective
//! area (project area x floor count) and, for cement and steel, the quality
//! factor.
//!
//! Quantities are carried unrounded; rounding happens only at line-item
//! display time so no rounding error compounds into the aggregate totals.
//!
//! ## Example
//!
//! ```rust
//! use boq_core::project::ProjectSpecification;
//! use boq_core::takeoff::takeoff;
//!
//! let spec = ProjectSpecification::new("Demo", 1000.0, "Karachi");
//! let quantities = takeoff(&spec);
//! assert_eq!(quantities.cement_bags, 400.0);
//! assert_eq!(quantities.steel_kg, 3500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::MaterialKind;
use crate::project::ProjectSpecification;

/// Cement bags per sqft of effective area
pub const CEMENT_BAGS_PER_SQFT: f64 = 0.40;
/// Reinforcement steel kg per sqft of effective area
pub const STEEL_KG_PER_SQFT: f64 = 3.50;
/// Bricks per sqft of effective area (quality-independent)
pub const BRICKS_PER_SQFT: f64 = 8.0;
/// Sand cft per sqft of effective area (quality-independent)
pub const SAND_CFT_PER_SQFT: f64 = 1.20;
/// Crush cft per sqft of effective area (quality-independent)
pub const CRUSH_CFT_PER_SQFT: f64 = 0.90;

/// Physical material quantities for one estimate, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantities {
    /// Cement in bags
    pub cement_bags: f64,
    /// Reinforcement steel in kg
    pub steel_kg: f64,
    /// Bricks in pieces
    pub bricks_count: f64,
    /// Sand in cft
    pub sand_cft: f64,
    /// Crush (coarse aggregate) in cft
    pub crush_cft: f64,
}

impl Quantities {
    /// Quantity for a material kind
    pub fn for_kind(&self, kind: MaterialKind) -> f64 {
        match kind {
            MaterialKind::Cement => self.cement_bags,
            MaterialKind::Steel => self.steel_kg,
            MaterialKind::Bricks => self.bricks_count,
            MaterialKind::Sand => self.sand_cft,
            MaterialKind::Crush => self.crush_cft,
        }
    }
}

/// Compute material quantities for a specification.
///
/// Cement and steel scale with the quality factor; bricks, sand, and crush
/// are quality-independent.
pub fn takeoff(spec: &ProjectSpecification) -> Quantities {
    let effective_area = spec.effective_area_sqft();
    let qf = spec.material_tier().factor();

    Quantities {
        cement_bags: effective_area * CEMENT_BAGS_PER_SQFT * qf,
        steel_kg: effective_area * STEEL_KG_PER_SQFT * qf,
        bricks_count: effective_area * BRICKS_PER_SQFT,
        sand_cft: effective_area * SAND_CFT_PER_SQFT,
        crush_cft: effective_area * CRUSH_CFT_PER_SQFT,
    }
}
