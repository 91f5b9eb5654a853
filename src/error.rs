//! Error types for scene graph construction and mutation.

use thiserror::Error;

/// Errors raised by the scene graph.
///
/// Every error is raised synchronously at the point of detection and names the
/// offending value. Nothing is retried or silently defaulted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Malformed construction arguments (camera frustum, primitive size, angles).
    #[error("invalid parameter {value}: {reason}")]
    InvalidParameter { value: String, reason: String },

    /// A value could not be coerced to the expected vector/quaternion shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Structural violations of the graph, such as cycles or removing a non-child.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A node kind the scene does not know how to classify.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl SceneError {
    pub(crate) fn invalid_parameter(value: impl std::fmt::Debug, reason: impl Into<String>) -> Self {
        SceneError::InvalidParameter {
            value: format!("{:?}", value),
            reason: reason.into(),
        }
    }
}

/// Result type alias using the scene graph's error type.
pub type Result<T> = std::result::Result<T, SceneError>;
