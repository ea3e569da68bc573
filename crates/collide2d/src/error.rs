//! Error types for collider construction and configuration

use thiserror::Error;

/// Errors raised when constructing colliders or spatial hashes with
/// invalid arguments.
///
/// These are synchronous precondition failures: they are reported at the
/// call that violates the contract, never deferred or retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColliderError {
    /// A polygon needs at least three vertices to enclose an area
    #[error("polygon requires at least 3 points, got {count}")]
    TooFewPoints {
        /// Number of points supplied by the caller
        count: usize,
    },

    /// Box dimensions must be strictly positive
    #[error("box size must be positive, got {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// Spatial hash cells must have a strictly positive edge length
    #[error("spatial hash cell size must be positive, got {cell_size}")]
    InvalidCellSize {
        /// Requested cell size
        cell_size: f32,
    },
}
