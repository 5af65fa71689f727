use crate::cartesian::CartesianPoint2d;
use crate::crs::{CoordinateTransform, CrsRef};
use crate::error::GeometryError;
use approx::AbsDiffEq;
use std::sync::Arc;

/// Direct position: ordinates of a point in a coordinate reference system.
///
/// The number of ordinates always equals the dimension of the reference system. Positions compare by exact
/// ordinate equality, tolerance is only applied by the geometric operators.
#[derive(Debug, Clone)]
pub struct Position {
    ordinates: Vec<f64>,
    crs: CrsRef,
}

impl Position {
    /// Creates a new position.
    pub fn new(ordinates: Vec<f64>, crs: CrsRef) -> Result<Self, GeometryError> {
        if ordinates.len() != crs.dimension() {
            return Err(GeometryError::DimensionMismatch {
                expected: crs.dimension(),
                actual: ordinates.len(),
            });
        }

        Ok(Self { ordinates, crs })
    }

    /// Creates a new position from a slice of ordinates.
    pub fn from_slice(ordinates: &[f64], crs: &CrsRef) -> Result<Self, GeometryError> {
        Self::new(ordinates.to_vec(), crs.clone())
    }

    /// Returns the ordinate with the given index.
    pub fn ordinate(&self, index: usize) -> Result<f64, GeometryError> {
        self.ordinates
            .get(index)
            .copied()
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                dimension: self.dimension(),
            })
    }

    /// All ordinates of the position.
    pub fn ordinates(&self) -> &[f64] {
        &self.ordinates
    }

    /// Number of ordinates.
    pub fn dimension(&self) -> usize {
        self.ordinates.len()
    }

    /// Reference system of the position.
    pub fn crs(&self) -> &CrsRef {
        &self.crs
    }

    /// Returns true if both positions reference the same system instance or equal systems.
    pub fn same_crs(&self, other: &Position) -> bool {
        Arc::ptr_eq(&self.crs, &other.crs) || *self.crs == *other.crs
    }

    /// Euclidean distance over all ordinates.
    pub fn distance(&self, other: &Position) -> f64 {
        self.ordinates
            .iter()
            .zip(&other.ordinates)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Position on the straight line between `self` (`t = 0`) and `other` (`t = 1`).
    pub fn interpolate(&self, other: &Position, t: f64) -> Position {
        Position {
            ordinates: self
                .ordinates
                .iter()
                .zip(&other.ordinates)
                .map(|(a, b)| a + (b - a) * t)
                .collect(),
            crs: self.crs.clone(),
        }
    }

    /// Same ordinates bound to another reference system of the same dimension.
    pub fn with_crs(&self, crs: &CrsRef) -> Result<Position, GeometryError> {
        Self::new(self.ordinates.clone(), crs.clone())
    }

    /// Transforms the position into the `target` system.
    pub fn transform(
        &self,
        transform: &dyn CoordinateTransform,
        target: &CrsRef,
    ) -> Result<Position, GeometryError> {
        if transform.source_dimension() != self.dimension() {
            return Err(GeometryError::DimensionMismatch {
                expected: transform.source_dimension(),
                actual: self.dimension(),
            });
        }

        Self::new(transform.apply(&self.ordinates)?, target.clone())
    }

    pub(crate) fn from_parts_unchecked(ordinates: Vec<f64>, crs: CrsRef) -> Self {
        debug_assert_eq!(ordinates.len(), crs.dimension());
        Self { ordinates, crs }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.ordinates == other.ordinates && self.same_crs(other)
    }
}

impl CartesianPoint2d for Position {
    type Num = f64;

    fn x(&self) -> f64 {
        self.ordinates.first().copied().unwrap_or_default()
    }

    fn y(&self) -> f64 {
        self.ordinates.get(1).copied().unwrap_or_default()
    }
}

impl AbsDiffEq for Position {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.same_crs(other)
            && self.ordinates.len() == other.ordinates.len()
            && self
                .ordinates
                .iter()
                .zip(&other.ordinates)
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{AffineTransform, Crs};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn create() {
        let crs = Crs::local_2d();
        assert_matches!(
            Position::new(vec![1.0, 2.0, 3.0], crs.clone()),
            Err(GeometryError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );

        let position = Position::new(vec![1.0, 2.0], crs).unwrap();
        assert_eq!(position.ordinate(1), Ok(2.0));
        assert_matches!(
            position.ordinate(2),
            Err(GeometryError::IndexOutOfRange {
                index: 2,
                dimension: 2
            })
        );
    }

    #[test]
    fn equality() {
        let a = Position::new(vec![1.0, 2.0], Crs::local_2d()).unwrap();
        let b = Position::new(vec![1.0, 2.0], Crs::local_2d()).unwrap();
        let c = Position::new(vec![1.0, 2.0], Crs::wgs84()).unwrap();
        let d = Position::new(vec![1.0, 2.0 + 1e-12], Crs::local_2d()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_abs_diff_eq!(a, d, epsilon = 1e-9);
    }

    #[test]
    fn distance_and_interpolation() {
        let crs = Crs::local_3d();
        let a = Position::new(vec![0.0, 0.0, 0.0], crs.clone()).unwrap();
        let b = Position::new(vec![2.0, 3.0, 6.0], crs).unwrap();
        assert_eq!(a.distance(&b), 7.0);
        assert_eq!(a.interpolate(&b, 0.5).ordinates(), &[1.0, 1.5, 3.0]);
    }

    #[test]
    fn transform() {
        let crs = Crs::local_2d();
        let a = Position::new(vec![1.0, 2.0], crs.clone()).unwrap();
        let moved = a
            .transform(&AffineTransform::translation(1.0, 1.0), &crs)
            .unwrap();
        assert_eq!(moved.ordinates(), &[2.0, 3.0]);

        assert_matches!(
            a.transform(&AffineTransform::translation(1.0, 1.0), &Crs::local_3d()),
            Err(GeometryError::DimensionMismatch { .. })
        );
    }
}
