use crate::boundary::Boundary;
use crate::cartesian::{CartesianPoint2d, ClosedContour, Point2};
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;
use crate::primitive::{Curve, Point};

/// Closed curve used as a component of a surface boundary.
///
/// A ring must be closed and have at least three distinct positions. Simplicity is not enforced on construction,
/// use [`Ring::is_simple`] to check it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    curve: Curve,
}

impl Ring {
    /// Creates a ring from a closed curve.
    pub fn new(curve: Curve) -> Result<Self, GeometryError> {
        if !curve.is_closed() {
            return Err(GeometryError::MalformedInput(
                "ring must end at its start position".into(),
            ));
        }

        let mut distinct: Vec<&Position> = Vec::with_capacity(3);
        for position in curve.positions() {
            if !distinct.contains(&position) {
                distinct.push(position);
                if distinct.len() == 3 {
                    break;
                }
            }
        }

        if distinct.len() < 3 {
            return Err(GeometryError::DegenerateGeometry(
                "ring needs at least 3 distinct positions".into(),
            ));
        }

        Ok(Self { curve })
    }

    /// Creates a ring from positions. The ring is closed automatically if the last position is not equal to the
    /// first one.
    pub fn from_positions(mut positions: Vec<Position>) -> Result<Self, GeometryError> {
        if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
            if first != last {
                positions.push(first.clone());
            }
        }

        Self::new(Curve::from_positions(positions)?)
    }

    /// Ring as a curve.
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Consumes the ring and returns the underlying curve.
    pub fn into_curve(self) -> Curve {
        self.curve
    }

    /// Positions of the ring, the first position is repeated at the end.
    pub fn positions(&self) -> impl Iterator<Item = &Position> + Clone + '_ {
        self.curve.positions()
    }

    /// A ring is a cycle: its boundary is empty.
    pub fn boundary(&self) -> Boundary {
        Boundary::Empty(self.crs().clone())
    }

    /// Length of the ring.
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    /// Length weighted centroid of the ring as a curve.
    pub fn centroid(&self) -> Result<Point, GeometryError> {
        self.curve.centroid()
    }

    /// Signed area of the horizontal projection, positive for counterclockwise rings.
    pub fn signed_area(&self) -> f64 {
        self.contour().area_signed()
    }

    /// Area enclosed by the horizontal projection of the ring.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area moments of the horizontal projection: signed area, and the first moments `Σ x·A`, `Σ y·A`.
    pub(crate) fn moments(&self) -> (f64, f64, f64) {
        let points: Vec<Point2> = self.positions().map(|p| p.to_point2()).collect();
        let mut area = 0.0;
        let mut mx = 0.0;
        let mut my = 0.0;
        for pair in points.windows(2) {
            let cross = pair[0].x() * pair[1].y() - pair[1].x() * pair[0].y();
            area += cross;
            mx += (pair[0].x() + pair[1].x()) * cross;
            my += (pair[0].y() + pair[1].y()) * cross;
        }

        (area / 2.0, mx / 6.0, my / 6.0)
    }

    /// Horizontal projection of the ring without the closing position.
    pub(crate) fn contour(&self) -> ClosedContour<Point2> {
        let mut points: Vec<Point2> = self.positions().map(|p| p.to_point2()).collect();
        points.pop();
        ClosedContour::new(points)
    }
}

impl GeometryElement for Ring {
    fn crs(&self) -> &CrsRef {
        self.curve.crs()
    }

    fn dimension(&self) -> Dimension {
        Dimension::Curve
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        self.curve.positions()
    }

    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        Self::new(self.curve.try_map_positions(crs, f)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use assert_matches::assert_matches;

    fn positions(coords: &[[f64; 2]]) -> Vec<Position> {
        coords
            .iter()
            .map(|c| Position::from_slice(c, &Crs::local_2d()).unwrap())
            .collect()
    }

    #[test]
    fn construction() {
        let ring = Ring::from_positions(positions(&[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0]])).unwrap();
        assert_eq!(ring.positions().count(), 4);
        assert!(ring.curve().is_closed());
        assert!(ring.boundary().is_empty());
        assert_eq!(ring.signed_area(), 6.0);
        assert_eq!(ring.length(), 12.0);

        assert_matches!(
            Ring::from_positions(positions(&[[0.0, 0.0], [4.0, 0.0], [0.0, 0.0]])),
            Err(GeometryError::DegenerateGeometry(_))
        );
        assert_matches!(
            Ring::new(Curve::from_positions(positions(&[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0]])).unwrap()),
            Err(GeometryError::MalformedInput(_))
        );
    }

    #[test]
    fn repeated_positions_before_third_distinct() {
        let ring = Ring::from_positions(positions(&[
            [0.0, 0.0],
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 0.0],
            [4.0, 3.0],
            [0.0, 0.0],
        ]))
        .unwrap();
        assert_eq!(ring.positions().count(), 6);
        assert_eq!(ring.area(), 6.0);

        assert_matches!(
            Ring::from_positions(positions(&[[0.0, 0.0], [0.0, 0.0], [4.0, 0.0], [0.0, 0.0]])),
            Err(GeometryError::DegenerateGeometry(_))
        );
    }

    #[test]
    fn clockwise_area() {
        let ring = Ring::from_positions(positions(&[
            [0.0, 0.0],
            [0.0, 2.0],
            [2.0, 2.0],
            [2.0, 0.0],
            [0.0, 0.0],
        ]))
        .unwrap();
        assert_eq!(ring.signed_area(), -4.0);
        assert_eq!(ring.area(), 4.0);
        assert_eq!(ring.contour().points.len(), 4);
    }
}
