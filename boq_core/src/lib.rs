//! # boq_core - Construction Cost Estimation Engine
//!
//! `boq_core` turns a small project specification (area, rooms, location,
//! material and finish quality, floor count) into a fully itemized Bill of
//! Quantities with category subtotals and a final total cost. All inputs and
//! outputs are JSON-serializable, making it easy to sit behind any API or
//! UI layer.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **One source of truth**: The same modules produce the authoritative
//!   totals and the display breakdown, so they cannot drift apart
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use boq_core::catalog::RateCatalog;
//! use boq_core::estimate::estimate;
//! use boq_core::project::ProjectSpecification;
//!
//! let spec = ProjectSpecification::new("Gulshan Villa", 1000.0, "Karachi")
//!     .with_rooms(4, 10.0, 20.0)
//!     .with_quality("standard");
//!
//! let result = estimate(&spec, RateCatalog::builtin()).unwrap();
//! println!("Total: PKR {}", result.total_cost);
//! ```
//!
//! ## Modules
//!
//! - [`project`] - The project specification input and its validation
//! - [`catalog`] - City and material rate tables, quality tiers
//! - [`takeoff`] - Material quantity takeoff
//! - [`costing`] - Category cost aggregation
//! - [`breakdown`] - Itemized BOQ breakdown
//! - [`estimate`] - The full pipeline and its result type
//! - [`units`] - Currency display helpers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Document and catalog persistence with atomic saves

pub mod breakdown;
pub mod catalog;
pub mod costing;
pub mod errors;
pub mod estimate;
pub mod file_io;
pub mod project;
pub mod takeoff;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use breakdown::{build_breakdown, Breakdown, CostCategory, LineItem, LineRole};
pub use catalog::{MaterialKind, QualityTier, RateCatalog};
pub use costing::{aggregate, CostTotals};
pub use errors::{BoqResult, EstimateError};
pub use estimate::{estimate, EstimateResult};
pub use file_io::{load_estimate, save_estimate, EstimateDocument, FileLock};
pub use project::ProjectSpecification;
pub use takeoff::{takeoff, Quantities};
