//! Error handling for Slidemark
//!
//! A single taxonomy covers every failure the annotation layer can report:
//! - Lifecycle errors (querying a shape that was never materialized)
//! - Registry errors (duplicate or unknown identifiers)
//! - Input errors (colors, transforms, shape JSON)
//! - Integration errors (tools configured without a mandatory binding)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Annotation error type
///
/// Most variants are logged and swallowed by the caller; only
/// `MissingRequiredBinding` is meant to reach the integrating code.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// Geometric query on a shape without a rendered primitive
    #[error("Shape {shape_id} not initialized")]
    NotInitialized {
        /// The shape that was queried.
        shape_id: String,
    },

    /// Registry already holds a shape with this identifier
    #[error("A shape with ID {shape_id} already exists")]
    DuplicateId {
        /// The colliding identifier.
        shape_id: String,
    },

    /// Operation referenced an identifier the registry does not hold
    #[error("There is no shape with ID {shape_id}")]
    UnknownId {
        /// The missing identifier.
        shape_id: String,
    },

    /// Point removal on a path without segments
    #[error("Path {shape_id} has no points to remove")]
    EmptyPath {
        /// The empty path.
        shape_id: String,
    },

    /// Malformed hex color string
    #[error("{value} is not a valid HEX color string")]
    InvalidColor {
        /// The rejected color string.
        value: String,
    },

    /// Shape JSON carrying an unrecognized `type`
    #[error("Unknown shape type {shape_type}")]
    UnknownShapeType {
        /// The rejected type tag.
        shape_type: String,
    },

    /// Tool configured without a mandatory output target
    #[error("Tool {tool}: missing mandatory {binding} element")]
    MissingRequiredBinding {
        /// Tool label.
        tool: String,
        /// Name of the missing binding.
        binding: String,
    },

    /// Transform string in a form that cannot be parsed
    #[error("Unable to parse transform {spec}")]
    InvalidTransform {
        /// The rejected transform string.
        spec: String,
    },

    /// JSON (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnnotationError {
    /// Check if this error is a soft failure that callers log and skip
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AnnotationError::MissingRequiredBinding { .. })
    }
}

/// Result type for annotation operations
pub type Result<T> = std::result::Result<T, AnnotationError>;
