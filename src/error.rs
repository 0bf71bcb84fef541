//! # Error Taxonomy
//!
//! Every failure in this crate is detected synchronously at the call that
//! triggers it and is deterministic: inputs are either valid or invalid,
//! there is no transient failure mode and nothing is retried.

use thiserror::Error;

use crate::layout::Axis;

/// Errors raised by layout construction, indexing, packing and broadcasting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Malformed layout extents or a backing buffer whose length does not
    /// match the layout. Fatal to the construction call; never partially
    /// constructs a container.
    #[error("invalid construction: {reason}")]
    Construction {
        /// Human-readable description of the inconsistency.
        reason: String,
    },

    /// An element type was used where a structurally different one was
    /// expected. Same lane count is not enough: field names and nesting
    /// must match exactly.
    #[error("element type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Structural shape the operation expected.
        expected: String,
        /// Structural shape it was given.
        actual: String,
    },

    /// A bounds-checked coordinate fell outside `[0, extent)`. Local and
    /// recoverable; no state is corrupted.
    #[error("index {index} out of range for {axis} axis with extent {extent}")]
    IndexOutOfRange {
        /// The axis the coordinate addressed.
        axis: Axis,
        /// The offending coordinate.
        index: usize,
        /// The axis extent it was checked against.
        extent: usize,
    },

    /// Broadcast operands or a materialization destination disagree on
    /// their non-lane extents. Local and recoverable.
    #[error("shape mismatch: {left} vs {right}")]
    ShapeMismatch {
        /// Extents of the first operand.
        left: String,
        /// Extents of the second operand.
        right: String,
    },
}

/// Result alias used throughout the crate.
pub type LayoutResult<T> = Result<T, LayoutError>;

impl LayoutError {
    /// Shorthand for a [`LayoutError::Construction`] with a formatted reason.
    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        LayoutError::Construction {
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`LayoutError::ShapeMismatch`] from two debug-printable
    /// extent descriptions.
    pub(crate) fn shape_mismatch(left: impl core::fmt::Debug, right: impl core::fmt::Debug) -> Self {
        LayoutError::ShapeMismatch {
            left: format!("{left:?}"),
            right: format!("{right:?}"),
        }
    }
}
