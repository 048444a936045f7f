//! # Rate Catalog
//!
//! Reference data for costing: per-city labor rates and per-city material
//! rate sets, plus the quality tiers that select between standard, premium,
//! and luxury pricing.
//!
//! Catalogs are plain serde data. The built-in 2024 catalog covers Karachi,
//! Hyderabad, and Sukkur; callers can load replacement catalogs from JSON
//! (see [`crate::file_io::load_catalog`]) so rates update without
//! recompiling the engine.
//!
//! ## Example
//!
//! ```rust
//! use boq_core::catalog::{MaterialKind, QualityTier, RateCatalog};
//!
//! let catalog = RateCatalog::builtin();
//! let city = catalog.city("Karachi").unwrap();
//! assert_eq!(city.labor_rate_per_sqft, 550.0);
//!
//! let cement = catalog
//!     .material_rate("Karachi", MaterialKind::Cement)
//!     .unwrap();
//! assert_eq!(cement.rate_for(QualityTier::Standard), 1250.0);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{BoqResult, EstimateError};

/// Material quality tier selecting rates and the quantity multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Standard construction grade
    #[default]
    Standard,
    /// Premium grade
    Premium,
    /// Luxury grade
    Luxury,
}

impl QualityTier {
    /// All quality tiers for UI selection
    pub const ALL: [QualityTier; 3] = [
        QualityTier::Standard,
        QualityTier::Premium,
        QualityTier::Luxury,
    ];

    /// Quality factor applied to the quantity-driven takeoff terms
    pub fn factor(&self) -> f64 {
        match self {
            QualityTier::Standard => 1.00,
            QualityTier::Premium => 1.10,
            QualityTier::Luxury => 1.20,
        }
    }

    /// Finish rate in PKR per sqft per floor, applied when finishes are included
    pub fn finish_rate_per_sqft(&self) -> f64 {
        match self {
            QualityTier::Standard => 450.0,
            QualityTier::Premium => 750.0,
            QualityTier::Luxury => 1300.0,
        }
    }

    /// Parse from common string representations.
    ///
    /// Strict: unknown labels are an error. Used when validating the
    /// finishes tier, which must be one of the recognized tiers.
    pub fn from_str_flexible(s: &str) -> BoqResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "std" => Ok(QualityTier::Standard),
            "premium" => Ok(QualityTier::Premium),
            "luxury" | "lux" => Ok(QualityTier::Luxury),
            _ => Err(EstimateError::invalid_value(
                "quality",
                s,
                "Expected one of: standard, premium, luxury",
            )),
        }
    }

    /// Resolve a material-quality label leniently.
    ///
    /// Unknown labels take the explicit default arm and cost as Standard,
    /// keeping the engine permissive toward forward-compatible quality
    /// names. This leniency is intentional; do not replace with
    /// `from_str_flexible`.
    pub fn resolve(label: &str) -> QualityTier {
        match label.trim().to_ascii_lowercase().as_str() {
            "standard" => QualityTier::Standard,
            "premium" => QualityTier::Premium,
            "luxury" => QualityTier::Luxury,
            _ => QualityTier::Standard,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            QualityTier::Standard => "Standard",
            QualityTier::Premium => "Premium",
            QualityTier::Luxury => "Luxury",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The material types the takeoff produces quantities for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Portland cement, quantified in bags
    Cement,
    /// Reinforcement steel, quantified in kg
    Steel,
    /// Fired clay bricks, quantified in pieces
    Bricks,
    /// Fine aggregate, quantified in cft
    Sand,
    /// Coarse aggregate (crushed stone), quantified in cft
    Crush,
}

impl MaterialKind {
    /// All material kinds, in BOQ display order
    pub const ALL: [MaterialKind; 5] = [
        MaterialKind::Cement,
        MaterialKind::Steel,
        MaterialKind::Bricks,
        MaterialKind::Sand,
        MaterialKind::Crush,
    ];

    /// Display name for BOQ line items
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialKind::Cement => "Cement",
            MaterialKind::Steel => "Steel",
            MaterialKind::Bricks => "Bricks",
            MaterialKind::Sand => "Sand",
            MaterialKind::Crush => "Crush",
        }
    }

    /// The name this material is keyed by in catalog rate sets
    pub fn catalog_name(&self) -> &'static str {
        match self {
            MaterialKind::Cement => "Cement",
            MaterialKind::Steel => "Steel Bars",
            MaterialKind::Bricks => "Bricks",
            MaterialKind::Sand => "Sand",
            MaterialKind::Crush => "Crush",
        }
    }

    /// Physical unit of the takeoff quantity
    pub fn quantity_unit(&self) -> &'static str {
        match self {
            MaterialKind::Cement => "bags",
            MaterialKind::Steel => "kg",
            MaterialKind::Bricks => "pcs",
            MaterialKind::Sand => "cft",
            MaterialKind::Crush => "cft",
        }
    }

    /// Unit suffix for displaying the per-quantity rate (e.g. "/bag")
    pub fn rate_unit(&self) -> &'static str {
        match self {
            MaterialKind::Cement => "/bag",
            MaterialKind::Steel => "/kg",
            MaterialKind::Bricks => "/pc",
            MaterialKind::Sand => "/cft",
            MaterialKind::Crush => "/cft",
        }
    }

    /// Whether the catalog rate is quoted per 1000 quantity units.
    ///
    /// Bricks are priced per 1000 pcs; sand and crush per truck (~1000 cft).
    /// Cement (per bag) and steel (per kg) are priced per quantity unit.
    pub fn per_thousand_rate(&self) -> bool {
        matches!(
            self,
            MaterialKind::Bricks | MaterialKind::Sand | MaterialKind::Crush
        )
    }
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Per-city labor and base rates.
///
/// `material_base_rate` and `equipment_rate` are carried for catalog
/// compatibility; current costing derives equipment cost from labor cost
/// and prices materials from the per-city rate sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRate {
    /// City name, the key used by `ProjectSpecification::location`
    pub name: String,

    /// Short city code (e.g. "KHI")
    pub code: String,

    /// Labor rate in PKR per sqft per floor
    pub labor_rate_per_sqft: f64,

    /// Composite material base rate in PKR per sqft (unused by costing)
    pub material_base_rate: f64,

    /// Equipment day rate in PKR (unused by costing)
    pub equipment_rate: f64,
}

/// Per-material rates for the three quality tiers.
///
/// Rates are quoted per the stated `unit`: cement per bag, steel per kg,
/// bricks per 1000 pcs, sand and crush per truck (~1000 cft).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRate {
    /// Material name, matched against `MaterialKind::catalog_name`
    pub name: String,

    /// Material category slug (e.g. "cement", "steel")
    pub category: String,

    /// Pricing unit (e.g. "bag", "kg", "1000 pcs", "truck")
    pub unit: String,

    /// Rate for standard quality
    pub standard_rate: f64,

    /// Rate for premium quality
    pub premium_rate: f64,

    /// Rate for luxury quality
    pub luxury_rate: f64,
}

impl MaterialRate {
    /// Get the rate for a quality tier
    pub fn rate_for(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::Standard => self.standard_rate,
            QualityTier::Premium => self.premium_rate,
            QualityTier::Luxury => self.luxury_rate,
        }
    }
}

/// The full rate catalog: cities plus per-city material rate sets.
///
/// Material lookups that miss a city's set fall back to the set of
/// `default_city`, never to zero. The catalog is read-only for the lifetime
/// of a calculation and may be shared across concurrent calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCatalog {
    /// City whose material rate set backs lookups for cities without one
    pub default_city: String,

    /// All cities with known labor rates
    pub cities: Vec<CityRate>,

    /// Material rate sets keyed by city name
    pub material_rates: HashMap<String, Vec<MaterialRate>>,
}

impl RateCatalog {
    /// The built-in 2024 catalog (Karachi, Hyderabad, Sukkur; Karachi default)
    pub fn builtin() -> &'static RateCatalog {
        static BUILTIN: Lazy<RateCatalog> = Lazy::new(builtin_2024);
        &BUILTIN
    }

    /// Look up a city by name (case-insensitive)
    pub fn city(&self, name: &str) -> Option<&CityRate> {
        self.cities
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Whether a location resolves in this catalog
    pub fn contains_city(&self, name: &str) -> bool {
        self.city(name).is_some()
    }

    /// Look up a material rate for a city, falling back to the default
    /// city's rate set when the city has no explicit override.
    pub fn material_rate(&self, city: &str, kind: MaterialKind) -> Option<&MaterialRate> {
        self.material_rate_in(city, kind)
            .or_else(|| self.material_rate_in(&self.default_city, kind))
    }

    fn material_rate_in(&self, city: &str, kind: MaterialKind) -> Option<&MaterialRate> {
        let rates = self
            .material_rates
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city.trim()))
            .map(|(_, rates)| rates)?;
        rates
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(kind.catalog_name()))
    }
}

fn material_set(rows: &[(&str, &str, &str, f64, f64, f64)]) -> Vec<MaterialRate> {
    rows.iter()
        .map(
            |&(name, category, unit, standard_rate, premium_rate, luxury_rate)| MaterialRate {
                name: name.to_string(),
                category: category.to_string(),
                unit: unit.to_string(),
                standard_rate,
                premium_rate,
                luxury_rate,
            },
        )
        .collect()
}

/// Build the 2024 seed catalog.
fn builtin_2024() -> RateCatalog {
    let cities = vec![
        CityRate {
            name: "Karachi".to_string(),
            code: "KHI".to_string(),
            labor_rate_per_sqft: 550.0,
            material_base_rate: 1800.0,
            equipment_rate: 250.0,
        },
        CityRate {
            name: "Hyderabad".to_string(),
            code: "HYD".to_string(),
            labor_rate_per_sqft: 450.0,
            material_base_rate: 1500.0,
            equipment_rate: 200.0,
        },
        CityRate {
            name: "Sukkur".to_string(),
            code: "SKR".to_string(),
            labor_rate_per_sqft: 400.0,
            material_base_rate: 1300.0,
            equipment_rate: 180.0,
        },
    ];

    let mut material_rates = HashMap::new();
    material_rates.insert(
        "Karachi".to_string(),
        material_set(&[
            ("Cement", "cement", "bag", 1250.0, 1400.0, 1600.0),
            ("Steel Bars", "steel", "kg", 280.0, 350.0, 450.0),
            ("Bricks", "brick", "1000 pcs", 14000.0, 18000.0, 22000.0),
            ("Sand", "sand", "truck", 30000.0, 35000.0, 40000.0),
            ("Crush", "crush", "truck", 35000.0, 40000.0, 45000.0),
        ]),
    );
    material_rates.insert(
        "Hyderabad".to_string(),
        material_set(&[
            ("Cement", "cement", "bag", 1150.0, 1300.0, 1480.0),
            ("Steel Bars", "steel", "kg", 260.0, 325.0, 420.0),
            ("Bricks", "brick", "1000 pcs", 12000.0, 15500.0, 19000.0),
            ("Sand", "sand", "truck", 26000.0, 30500.0, 35000.0),
            ("Crush", "crush", "truck", 31000.0, 35500.0, 40000.0),
        ]),
    );
    material_rates.insert(
        "Sukkur".to_string(),
        material_set(&[
            ("Cement", "cement", "bag", 1100.0, 1240.0, 1420.0),
            ("Steel Bars", "steel", "kg", 250.0, 315.0, 400.0),
            ("Bricks", "brick", "1000 pcs", 11000.0, 14200.0, 17400.0),
            ("Sand", "sand", "truck", 25000.0, 29000.0, 33500.0),
            ("Crush", "crush", "truck", 30000.0, 34500.0, 38500.0),
        ]),
    );

    RateCatalog {
        default_city: "Karachi".to_string(),
        cities,
        material_rates,
    }
}
