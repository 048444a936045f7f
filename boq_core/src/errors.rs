//! # Error Types
//!
//! Structured error types for boq_core. Every failure is a rejection of a
//! specific input, carried back to the caller as data - the engine never
//! panics past its boundary and holds no state that could be corrupted.
//!
//! ## Example
//!
//! ```rust
//! use boq_core::errors::{EstimateError, BoqResult};
//!
//! fn validate_area(area_sqft: f64) -> BoqResult<()> {
//!     if area_sqft <= 0.0 {
//!         return Err(EstimateError::invalid_value(
//!             "total_area_sqft",
//!             area_sqft.to_string(),
//!             "Area must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for boq_core operations
pub type BoqResult<T> = Result<T, EstimateError>;

/// Structured error type for estimation operations.
///
/// Each variant provides specific context about what went wrong (field name,
/// offending value, expected constraint) so the caller can render a
/// user-facing message without string parsing.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// A required field is missing or empty
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An input value is invalid (non-positive, out of range, etc.)
    #[error("Invalid value for '{field}': {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Location does not resolve in the supplied rate catalog
    #[error("Unknown location: '{location}' is not in the rate catalog")]
    UnknownLocation { location: String },

    /// Total room area exceeds the project area - hard rejection.
    ///
    /// An estimate built from a physically impossible room layout is
    /// meaningless, so no computation runs for such a spec.
    #[error(
        "Room area {room_area_sqft} sq.ft exceeds project area {project_area_sqft} sq.ft"
    )]
    RoomAreaExceedsProjectArea {
        room_area_sqft: f64,
        project_area_sqft: f64,
    },

    /// No rate found for a material, even at the catalog's default city
    #[error("No rate for material '{material}' in city '{city}' or the default city")]
    MissingRate { material: String, city: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl EstimateError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        EstimateError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownLocation error
    pub fn unknown_location(location: impl Into<String>) -> Self {
        EstimateError::UnknownLocation {
            location: location.into(),
        }
    }

    /// Create a RoomAreaExceedsProjectArea error
    pub fn room_area_exceeds(room_area_sqft: f64, project_area_sqft: f64) -> Self {
        EstimateError::RoomAreaExceedsProjectArea {
            room_area_sqft,
            project_area_sqft,
        }
    }

    /// Create a MissingRate error
    pub fn missing_rate(material: impl Into<String>, city: impl Into<String>) -> Self {
        EstimateError::MissingRate {
            material: material.into(),
            city: city.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EstimateError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this error is a validation rejection of the input spec
    /// (as opposed to a catalog or file problem)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EstimateError::MissingField { .. }
                | EstimateError::InvalidValue { .. }
                | EstimateError::UnknownLocation { .. }
                | EstimateError::RoomAreaExceedsProjectArea { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::MissingField { .. } => "MISSING_FIELD",
            EstimateError::InvalidValue { .. } => "INVALID_VALUE",
            EstimateError::UnknownLocation { .. } => "UNKNOWN_LOCATION",
            EstimateError::RoomAreaExceedsProjectArea { .. } => "ROOM_AREA_EXCEEDS_PROJECT_AREA",
            EstimateError::MissingRate { .. } => "MISSING_RATE",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::FileLocked { .. } => "FILE_LOCKED",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_value("room_count", "0", "Room count must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EstimateError::missing_field("location").error_code(),
            "MISSING_FIELD"
        );
        assert_eq!(
            EstimateError::unknown_location("Atlantis").error_code(),
            "UNKNOWN_LOCATION"
        );
        assert_eq!(
            EstimateError::room_area_exceeds(1125.0, 1000.0).error_code(),
            "ROOM_AREA_EXCEEDS_PROJECT_AREA"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(EstimateError::room_area_exceeds(1125.0, 1000.0).is_validation());
        assert!(EstimateError::missing_field("project_name").is_validation());
        assert!(!EstimateError::missing_rate("Cement", "Quetta").is_validation());
        assert!(!EstimateError::SerializationError {
            reason: "bad json".to_string()
        }
        .is_validation());
    }

    #[test]
    fn test_room_area_message_names_both_areas() {
        let error = EstimateError::room_area_exceeds(1125.0, 1000.0);
        let msg = error.to_string();
        assert!(msg.contains("1125"));
        assert!(msg.contains("1000"));
    }
}
