//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Number of ordinates does not match the dimension of the coordinate reference system.
    #[error("expected {expected} ordinates, got {actual}")]
    DimensionMismatch {
        /// Dimension required by the coordinate reference system.
        expected: usize,
        /// Dimension that was supplied.
        actual: usize,
    },
    /// Ordinate index is not less than the dimension of the position.
    #[error("ordinate index {index} is out of range for dimension {dimension}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Dimension of the position.
        dimension: usize,
    },
    /// Operation is not defined for an empty, zero-length or zero-area geometry.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// Two geometries are referenced to different coordinate reference systems.
    #[error("coordinate reference systems do not match: {0} and {1}")]
    CrsMismatch(String, String),
    /// Input cannot be parsed or violates a construction invariant.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// Operation is not implemented for the given kinds of geometries or reference systems.
    #[error("unsupported combination: {0}")]
    UnsupportedCombination(String),
    /// Coordinate reference system code is not known to the authority.
    #[error("unknown coordinate reference system: {0}")]
    UnknownCrs(String),
    /// Coordinate transformation failed for a position.
    #[error("coordinate transform failed: {0}")]
    Transform(String),
    /// Curve parameter is outside of the parametrisation range.
    #[error("parameter {0} is outside of the curve parametrisation range")]
    ParameterOutOfRange(f64),
    /// Geometry id does not belong to the arena.
    #[error("geometry id {0} is not in the arena")]
    UnknownGeometryId(usize),
}
