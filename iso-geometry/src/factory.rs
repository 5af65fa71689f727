//! Convenience constructors bound to one reference system and precision.

use crate::aggregate::MultiPoint;
use crate::crs::CrsRef;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::precision::Precision;
use crate::primitive::{Curve, Point, Ring, Surface, SurfaceBoundary};
use crate::wkt::parse_wkt_with;

/// Creates geometries in one reference system.
///
/// ```
/// use iso_geometry::{Crs, GeometryFactory};
///
/// let factory = GeometryFactory::new(Crs::local_2d());
/// let surface = factory
///     .surface(
///         [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]],
///         [[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0]]],
///     )
///     .unwrap();
/// assert_eq!(surface.area(), 15.5);
/// ```
#[derive(Debug, Clone)]
pub struct GeometryFactory {
    crs: CrsRef,
    precision: Precision,
}

impl GeometryFactory {
    /// Creates a factory with the default precision.
    pub fn new(crs: CrsRef) -> Self {
        Self {
            crs,
            precision: Precision::default(),
        }
    }

    /// Sets the precision used to validate surfaces.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Reference system of the created geometries.
    pub fn crs(&self) -> &CrsRef {
        &self.crs
    }

    /// Precision used to validate surfaces.
    pub fn precision(&self) -> &Precision {
        &self.precision
    }

    /// Creates a position.
    pub fn position(&self, ordinates: &[f64]) -> Result<Position, GeometryError> {
        Position::from_slice(ordinates, &self.crs)
    }

    fn positions<C: AsRef<[f64]>>(
        &self,
        coordinates: impl IntoIterator<Item = C>,
    ) -> Result<Vec<Position>, GeometryError> {
        coordinates
            .into_iter()
            .map(|c| self.position(c.as_ref()))
            .collect()
    }

    /// Creates a point.
    pub fn point(&self, ordinates: &[f64]) -> Result<Point, GeometryError> {
        Ok(Point::new(self.position(ordinates)?))
    }

    /// Creates a curve through the given positions.
    pub fn curve<C: AsRef<[f64]>>(
        &self,
        coordinates: impl IntoIterator<Item = C>,
    ) -> Result<Curve, GeometryError> {
        Curve::from_positions(self.positions(coordinates)?)
    }

    /// Creates a ring through the given positions, closing it if needed.
    pub fn ring<C: AsRef<[f64]>>(
        &self,
        coordinates: impl IntoIterator<Item = C>,
    ) -> Result<Ring, GeometryError> {
        Ring::from_positions(self.positions(coordinates)?)
    }

    /// Creates a surface from the exterior ring and the holes.
    pub fn surface<C: AsRef<[f64]>, H: IntoIterator<Item = C>>(
        &self,
        exterior: impl IntoIterator<Item = C>,
        interiors: impl IntoIterator<Item = H>,
    ) -> Result<Surface, GeometryError> {
        let exterior = self.ring(exterior)?;
        let interiors = interiors
            .into_iter()
            .map(|ring| self.ring(ring))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Surface::new(SurfaceBoundary::new_with(
            exterior,
            interiors,
            &self.precision,
        )?))
    }

    /// Creates a multi point.
    pub fn multi_point<C: AsRef<[f64]>>(
        &self,
        coordinates: impl IntoIterator<Item = C>,
    ) -> Result<MultiPoint, GeometryError> {
        let points = self
            .positions(coordinates)?
            .into_iter()
            .map(Point::new)
            .collect();
        MultiPoint::new(self.crs.clone(), points)
    }

    /// Parses a geometry written in the text format of [`wkt`](crate::wkt).
    pub fn parse(&self, text: &str) -> Result<Geometry, GeometryError> {
        parse_wkt_with(text, &self.crs, &self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use assert_matches::assert_matches;

    #[test]
    fn builds_geometries() {
        let factory = GeometryFactory::new(Crs::local_2d()).with_precision(Precision::new(1e-6));
        assert_eq!(factory.precision().epsilon(), 1e-6);

        let curve = factory.curve([[0.0, 0.0], [3.0, 4.0]]).unwrap();
        assert_eq!(curve.length(), 5.0);

        let surface = factory
            .surface(
                [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
                [vec![[2.0, 2.0], [2.0, 4.0], [4.0, 4.0], [4.0, 2.0]]],
            )
            .unwrap();
        assert_eq!(surface.area(), 96.0);

        let points = factory.multi_point([[0.0, 0.0], [1.0, 1.0]]).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn checks_dimension() {
        let factory = GeometryFactory::new(Crs::local_3d());
        assert_matches!(
            factory.point(&[1.0, 2.0]),
            Err(GeometryError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(factory.parse("POINT(1 2 3)").is_ok());
    }
}
