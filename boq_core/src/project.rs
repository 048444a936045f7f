//! # Project Specification
//!
//! The `ProjectSpecification` struct is the input value object for one
//! estimate. It is constructed per user submission, validated against a
//! rate catalog, consumed once by the calculation pipeline, and never
//! mutated afterwards.
//!
//! ## Example
//!
//! ```rust
//! use boq_core::project::ProjectSpecification;
//! use boq_core::catalog::RateCatalog;
//!
//! let spec = ProjectSpecification::new("Gulshan Villa", 1000.0, "Karachi")
//!     .with_rooms(4, 10.0, 20.0)
//!     .with_quality("standard");
//!
//! spec.validate(RateCatalog::builtin()).unwrap();
//! assert_eq!(spec.room_area_sqft(), 800.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{QualityTier, RateCatalog};
use crate::errors::{BoqResult, EstimateError};

/// Ceiling height options offered to the user.
///
/// Recorded with the specification and serialized, but informational only:
/// no costing formula consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CeilingHeight {
    /// 10 ft (typical residential)
    #[default]
    #[serde(rename = "10")]
    Ft10,
    /// 12 ft
    #[serde(rename = "12")]
    Ft12,
    /// 14 ft
    #[serde(rename = "14")]
    Ft14,
}

impl CeilingHeight {
    /// All ceiling height variants for UI selection
    pub const ALL: [CeilingHeight; 3] = [
        CeilingHeight::Ft10,
        CeilingHeight::Ft12,
        CeilingHeight::Ft14,
    ];

    /// Height in feet
    pub fn feet(&self) -> f64 {
        match self {
            CeilingHeight::Ft10 => 10.0,
            CeilingHeight::Ft12 => 12.0,
            CeilingHeight::Ft14 => 14.0,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            CeilingHeight::Ft10 => "10 ft",
            CeilingHeight::Ft12 => "12 ft",
            CeilingHeight::Ft14 => "14 ft",
        }
    }
}

impl std::fmt::Display for CeilingHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_floor_count() -> u32 {
    1
}

/// Input for one cost estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "project_name": "Gulshan Villa",
///   "total_area_sqft": 1000.0,
///   "location": "Karachi",
///   "room_count": 4,
///   "room_length_ft": 10.0,
///   "room_width_ft": 20.0,
///   "material_quality": "standard",
///   "finishes_included": false,
///   "floor_count": 1,
///   "ceiling_height": "10"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSpecification {
    /// Project display name
    pub project_name: String,

    /// Gross project area in sqft (per floor)
    pub total_area_sqft: f64,

    /// City name; must resolve in the rate catalog
    pub location: String,

    /// Number of rooms
    pub room_count: u32,

    /// Room length in ft
    pub room_length_ft: f64,

    /// Room width in ft
    pub room_width_ft: f64,

    /// Material quality label ("standard", "premium", "luxury").
    ///
    /// Resolved leniently: unrecognized labels cost as standard.
    pub material_quality: String,

    /// Whether interior finishes are part of the estimate
    pub finishes_included: bool,

    /// Finishes quality label; required when `finishes_included` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finishes_quality: Option<String>,

    /// Number of floors
    #[serde(default = "default_floor_count")]
    pub floor_count: u32,

    /// Ceiling height (informational; enters no formula)
    #[serde(default)]
    pub ceiling_height: CeilingHeight,
}

impl ProjectSpecification {
    /// Create a specification with defaults: one 10x10 room, standard
    /// quality, no finishes, one floor.
    pub fn new(
        project_name: impl Into<String>,
        total_area_sqft: f64,
        location: impl Into<String>,
    ) -> Self {
        ProjectSpecification {
            project_name: project_name.into(),
            total_area_sqft,
            location: location.into(),
            room_count: 1,
            room_length_ft: 10.0,
            room_width_ft: 10.0,
            material_quality: "standard".to_string(),
            finishes_included: false,
            finishes_quality: None,
            floor_count: 1,
            ceiling_height: CeilingHeight::default(),
        }
    }

    /// Set the room layout
    pub fn with_rooms(mut self, count: u32, length_ft: f64, width_ft: f64) -> Self {
        self.room_count = count;
        self.room_length_ft = length_ft;
        self.room_width_ft = width_ft;
        self
    }

    /// Set the material quality label
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.material_quality = quality.into();
        self
    }

    /// Include finishes at the given quality
    pub fn with_finishes(mut self, quality: impl Into<String>) -> Self {
        self.finishes_included = true;
        self.finishes_quality = Some(quality.into());
        self
    }

    /// Set the floor count
    pub fn with_floors(mut self, floors: u32) -> Self {
        self.floor_count = floors;
        self
    }

    /// Set the ceiling height
    pub fn with_ceiling(mut self, height: CeilingHeight) -> Self {
        self.ceiling_height = height;
        self
    }

    /// Total area of all rooms in sqft
    pub fn room_area_sqft(&self) -> f64 {
        self.room_count as f64 * self.room_length_ft * self.room_width_ft
    }

    /// Project area times floor count, the base unit for takeoff formulas
    pub fn effective_area_sqft(&self) -> f64 {
        self.total_area_sqft * self.floor_count as f64
    }

    /// Material quality tier, resolved leniently
    pub fn material_tier(&self) -> QualityTier {
        QualityTier::resolve(&self.material_quality)
    }

    /// Finishes tier when finishes are included, resolved leniently.
    ///
    /// Validation enforces a recognized label up front; here an absent or
    /// unrecognized label costs as standard, matching the lenient
    /// material-quality handling.
    pub fn finishes_tier(&self) -> Option<QualityTier> {
        if !self.finishes_included {
            return None;
        }
        Some(
            self.finishes_quality
                .as_deref()
                .map(QualityTier::resolve)
                .unwrap_or_default(),
        )
    }

    /// Room-area-to-project-area utilization as a percentage.
    ///
    /// Informational advisory for judging space efficiency. `None` when the
    /// inputs needed to compute it are not positive. Never an error; the
    /// hard room-area check lives in [`validate`](Self::validate).
    pub fn space_utilization_percent(&self) -> Option<f64> {
        if self.total_area_sqft > 0.0
            && self.room_count > 0
            && self.room_length_ft > 0.0
            && self.room_width_ft > 0.0
        {
            Some(self.room_area_sqft() / self.total_area_sqft * 100.0)
        } else {
            None
        }
    }

    /// Validate this specification against a rate catalog.
    ///
    /// Checks run in order:
    /// 1. required text fields non-empty
    /// 2. numeric fields positive
    /// 3. location resolves in the catalog
    /// 4. finishes quality recognized when finishes are included
    /// 5. total room area does not exceed project area (hard rejection)
    pub fn validate(&self, catalog: &RateCatalog) -> BoqResult<()> {
        if self.project_name.trim().is_empty() {
            return Err(EstimateError::missing_field("project_name"));
        }
        if self.location.trim().is_empty() {
            return Err(EstimateError::missing_field("location"));
        }
        if self.material_quality.trim().is_empty() {
            return Err(EstimateError::missing_field("material_quality"));
        }

        if !(self.total_area_sqft > 0.0) {
            return Err(EstimateError::invalid_value(
                "total_area_sqft",
                self.total_area_sqft.to_string(),
                "Project area must be positive",
            ));
        }
        if self.room_count == 0 {
            return Err(EstimateError::invalid_value(
                "room_count",
                self.room_count.to_string(),
                "Room count must be positive",
            ));
        }
        if !(self.room_length_ft > 0.0) {
            return Err(EstimateError::invalid_value(
                "room_length_ft",
                self.room_length_ft.to_string(),
                "Room length must be positive",
            ));
        }
        if !(self.room_width_ft > 0.0) {
            return Err(EstimateError::invalid_value(
                "room_width_ft",
                self.room_width_ft.to_string(),
                "Room width must be positive",
            ));
        }
        if self.floor_count == 0 {
            return Err(EstimateError::invalid_value(
                "floor_count",
                self.floor_count.to_string(),
                "Floor count must be positive",
            ));
        }

        if !catalog.contains_city(&self.location) {
            return Err(EstimateError::unknown_location(self.location.clone()));
        }

        if self.finishes_included {
            let recognized = self
                .finishes_quality
                .as_deref()
                .map(|q| QualityTier::from_str_flexible(q).is_ok())
                .unwrap_or(false);
            if !recognized {
                return Err(EstimateError::missing_field("finishes_quality"));
            }
        }

        let room_area = self.room_area_sqft();
        if room_area > self.total_area_sqft {
            return Err(EstimateError::room_area_exceeds(
                room_area,
                self.total_area_sqft,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_spec() -> ProjectSpecification {
        ProjectSpecification::new("Test House", 1000.0, "Karachi").with_rooms(4, 10.0, 20.0)
    }

    #[test]
    fn test_valid_spec_passes() {
        let spec = valid_spec();
        assert!(spec.validate(RateCatalog::builtin()).is_ok());
    }

    #[test]
    fn test_missing_name_rejected() {
        let mut spec = valid_spec();
        spec.project_name = "  ".to_string();
        let err = spec.validate(RateCatalog::builtin()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_non_positive_fields_rejected() {
        let catalog = RateCatalog::builtin();

        let mut spec = valid_spec();
        spec.total_area_sqft = 0.0;
        assert_eq!(
            spec.validate(catalog).unwrap_err().error_code(),
            "INVALID_VALUE"
        );

        let mut spec = valid_spec();
        spec.room_count = 0;
        assert_eq!(
            spec.validate(catalog).unwrap_err().error_code(),
            "INVALID_VALUE"
        );

        let mut spec = valid_spec();
        spec.room_length_ft = -5.0;
        assert_eq!(
            spec.validate(catalog).unwrap_err().error_code(),
            "INVALID_VALUE"
        );

        let mut spec = valid_spec();
        spec.floor_count = 0;
        assert_eq!(
            spec.validate(catalog).unwrap_err().error_code(),
            "INVALID_VALUE"
        );
    }

    #[test]
    fn test_nan_area_rejected() {
        let mut spec = valid_spec();
        spec.total_area_sqft = f64::NAN;
        assert_eq!(
            spec.validate(RateCatalog::builtin())
                .unwrap_err()
                .error_code(),
            "INVALID_VALUE"
        );
    }

    #[test]
    fn test_unknown_location_rejected() {
        let mut spec = valid_spec();
        spec.location = "Atlantis".to_string();
        let err = spec.validate(RateCatalog::builtin()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::unknown_location("Atlantis".to_string())
        );
    }

    #[test]
    fn test_finishes_quality_required_when_included() {
        let mut spec = valid_spec();
        spec.finishes_included = true;
        spec.finishes_quality = None;
        let err = spec.validate(RateCatalog::builtin()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("finishes_quality"));

        spec.finishes_quality = Some("deluxe".to_string());
        let err = spec.validate(RateCatalog::builtin()).unwrap_err();
        assert_eq!(err, EstimateError::missing_field("finishes_quality"));

        spec.finishes_quality = Some("Premium".to_string());
        assert!(spec.validate(RateCatalog::builtin()).is_ok());
    }

    #[test]
    fn test_room_area_hard_rejection() {
        // 5 rooms of 15x15 = 1125 sqft > 1000 sqft project area
        let spec = ProjectSpecification::new("Overdense", 1000.0, "Karachi")
            .with_rooms(5, 15.0, 15.0);
        let err = spec.validate(RateCatalog::builtin()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::room_area_exceeds(1125.0, 1000.0)
        );
    }

    #[test]
    fn test_room_area_at_limit_passes() {
        // Exactly filling the project area is allowed
        let spec = ProjectSpecification::new("Tight", 1000.0, "Karachi")
            .with_rooms(5, 10.0, 20.0);
        assert!(spec.validate(RateCatalog::builtin()).is_ok());
    }

    #[test]
    fn test_space_utilization_advisory() {
        let spec = valid_spec();
        let pct = spec.space_utilization_percent().unwrap();
        assert!((pct - 80.0).abs() < 1e-9);

        let mut spec = valid_spec();
        spec.room_width_ft = 0.0;
        assert!(spec.space_utilization_percent().is_none());
    }

    #[test]
    fn test_effective_area_scales_with_floors() {
        let spec = valid_spec().with_floors(3);
        assert_eq!(spec.effective_area_sqft(), 3000.0);
    }

    #[test]
    fn test_lenient_material_tier() {
        let spec = valid_spec().with_quality("Luxury");
        assert_eq!(spec.material_tier(), QualityTier::Luxury);

        let spec = valid_spec().with_quality("platinum");
        assert_eq!(spec.material_tier(), QualityTier::Standard);
    }

    #[test]
    fn test_spec_serialization_roundtrip() {
        let spec = valid_spec()
            .with_quality("premium")
            .with_finishes("luxury")
            .with_floors(2)
            .with_ceiling(CeilingHeight::Ft12);
        let json = serde_json::to_string_pretty(&spec).unwrap();
        assert!(json.contains("\"ceiling_height\": \"12\""));
        let parsed: ProjectSpecification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_floor_count_defaults_to_one() {
        let json = r#"{
            "project_name": "Minimal",
            "total_area_sqft": 500.0,
            "location": "Sukkur",
            "room_count": 2,
            "room_length_ft": 10.0,
            "room_width_ft": 12.0,
            "material_quality": "standard",
            "finishes_included": false
        }"#;
        let spec: ProjectSpecification = serde_json::from_str(json).unwrap();
        assert_eq!(spec.floor_count, 1);
        assert_eq!(spec.ceiling_height, CeilingHeight::Ft10);
    }
}
