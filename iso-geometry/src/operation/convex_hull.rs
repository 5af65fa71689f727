//! Convex hull of the horizontal projection.

use crate::cartesian::{CartesianPoint2d, Orientation};
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::precision::Precision;
use crate::primitive::{Curve, Point, Ring, Surface};

impl Geometry {
    /// Smallest convex geometry containing this one, computed with the default precision.
    pub fn convex_hull(&self) -> Result<Geometry, GeometryError> {
        self.convex_hull_with(&Precision::default())
    }

    /// Smallest convex geometry containing this one.
    ///
    /// The hull is a point if all positions coincide, a curve between the extreme positions if they are
    /// collinear, and a surface otherwise. Hull vertices are original positions of the geometry. The exterior
    /// ring of a surface hull is clockwise, starts at the lowest vertex (leftmost among equal) and has no
    /// collinear vertices.
    pub fn convex_hull_with(&self, precision: &Precision) -> Result<Geometry, GeometryError> {
        let mut positions: Vec<&Position> = self.positions().collect();
        positions.sort_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())));
        positions.dedup_by(|a, b| a.distance_sq(*b) <= precision.epsilon_sq());

        let (Some(first), Some(last)) = (positions.first(), positions.last()) else {
            return Err(GeometryError::DegenerateGeometry(
                "convex hull of an empty geometry".into(),
            ));
        };

        if positions.len() == 1 || first.distance_sq(*last) <= precision.epsilon_sq() {
            return Ok(Point::new((*first).clone()).into());
        }

        let mut hull = half_hull(positions.iter().copied());
        hull.pop();
        let mut upper = half_hull(positions.iter().rev().copied());
        upper.pop();
        hull.extend(upper);

        if hull.len() < 3 {
            return Ok(
                Curve::from_positions(vec![(*first).clone(), (*last).clone()])?.into(),
            );
        }

        hull.reverse();
        let start = hull
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.y().total_cmp(&b.y()).then(a.x().total_cmp(&b.x())))
            .map(|(index, _)| index)
            .unwrap_or_default();
        hull.rotate_left(start);

        let ring = Ring::from_positions(hull.into_iter().cloned().collect())?;
        Ok(Surface::from_rings(ring, vec![])?.into())
    }
}

/// One half of the monotone chain hull, turning counterclockwise. Collinear positions are dropped.
fn half_hull<'a>(positions: impl Iterator<Item = &'a Position>) -> Vec<&'a Position> {
    let mut hull: Vec<&Position> = vec![];
    for position in positions {
        while hull.len() >= 2
            && Orientation::triplet(hull[hull.len() - 2], hull[hull.len() - 1], position)
                != Orientation::Counterclockwise
        {
            hull.pop();
        }
        hull.push(position);
    }

    hull
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::geometry::GeometryKind;
    use crate::wkt::parse_wkt;
    use assert_matches::assert_matches;

    fn hull(wkt: &str) -> Geometry {
        parse_wkt(wkt, &Crs::local_2d())
            .unwrap()
            .convex_hull()
            .unwrap()
    }

    fn coords(geometry: &Geometry) -> Vec<[f64; 2]> {
        geometry.positions().map(|p| [p.x(), p.y()]).collect()
    }

    #[test]
    fn hull_of_points() {
        let result = hull("MULTIPOINT((30 50), (100 120), (70 20), (70 10), (170 10))");
        assert_eq!(result.kind(), GeometryKind::Surface);
        assert_eq!(
            coords(&result),
            vec![[70.0, 10.0], [30.0, 50.0], [100.0, 120.0], [170.0, 10.0], [70.0, 10.0]]
        );
    }

    #[test]
    fn hull_of_collinear_points() {
        let result = hull("MULTIPOINT((2 2), (0 0), (1 1), (3 3))");
        assert_eq!(result.kind(), GeometryKind::Curve);
        assert_eq!(coords(&result), vec![[0.0, 0.0], [3.0, 3.0]]);
    }

    #[test]
    fn hull_of_single_point() {
        let result = hull("MULTIPOINT((2 2), (2 2))");
        assert_eq!(result.kind(), GeometryKind::Point);
    }

    #[test]
    fn hull_of_empty_geometry() {
        let empty = parse_wkt("MULTIPOINT EMPTY", &Crs::local_2d()).unwrap();
        assert_matches!(
            empty.convex_hull(),
            Err(GeometryError::DegenerateGeometry(_))
        );
    }

    #[test]
    fn hull_of_concave_surface() {
        let result = hull("SURFACE((0 0, 4 0, 4 4, 2 1, 0 4, 0 0))");
        assert_eq!(
            coords(&result),
            vec![[0.0, 0.0], [0.0, 4.0], [4.0, 4.0], [4.0, 0.0], [0.0, 0.0]]
        );
    }
}
