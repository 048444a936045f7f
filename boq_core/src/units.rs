//! # Unit Types
//!
//! Lightweight wrappers for the engine's units of account. A single newtype
//! covers currency; physical quantities (sqft, cft, bags, kg) stay plain
//! `f64` since they never cross a conversion boundary inside the engine.
//!
//! ## Design Philosophy
//!
//! We use a simple newtype rather than a money library because:
//! - The engine works in one currency (whole-unit PKR at the boundary)
//! - JSON serialization must stay a plain number
//! - Display formatting (digit grouping) is the only behavior needed
//!
//! ## Example
//!
//! ```rust
//! use boq_core::units::Pkr;
//!
//! let total = Pkr(2_585_520.0);
//! assert_eq!(total.to_string(), "PKR 2,585,520");
//! ```

use serde::{Deserialize, Serialize};

/// An amount in Pakistani Rupees.
///
/// Serializes as a bare number. Display rounds to the nearest whole rupee
/// and groups digits in thousands.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pkr(pub f64);

impl Pkr {
    /// Round to the nearest whole rupee
    pub fn rounded(self) -> Pkr {
        Pkr(self.0.round())
    }
}

impl From<f64> for Pkr {
    fn from(amount: f64) -> Self {
        Pkr(amount)
    }
}

impl std::fmt::Display for Pkr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PKR {}", group_thousands(self.0))
    }
}

/// Format a number with comma-separated thousands, rounded to a whole unit.
///
/// Negative amounts keep their sign ("-1,250").
pub fn group_thousands(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
