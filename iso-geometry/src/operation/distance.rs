use crate::cartesian::CartesianPoint2d;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::operation::components::Components;
use crate::operation::relate::{check_same_crs, relate_components};
use crate::precision::Precision;

impl Geometry {
    /// Shortest horizontal distance between the geometries, using the default precision.
    pub fn distance(&self, other: &Geometry) -> Result<f64, GeometryError> {
        self.distance_with(other, &Precision::default())
    }

    /// Shortest horizontal distance between the geometries. Intersecting geometries, including a geometry lying
    /// inside a surface, are at zero distance.
    pub fn distance_with(&self, other: &Geometry, precision: &Precision) -> Result<f64, GeometryError> {
        check_same_crs(self, other)?;
        let a = Components::new(self);
        let b = Components::new(other);
        if a.is_empty() || b.is_empty() {
            return Err(GeometryError::DegenerateGeometry(
                "distance to an empty geometry".into(),
            ));
        }

        if relate_components(&a, &b, precision).is_intersects() {
            return Ok(0.0);
        }

        let mut min_sq = f64::INFINITY;
        for p in &a.points {
            for q in &b.points {
                min_sq = min_sq.min(p.distance_sq(q));
            }
            for segment in b.segments() {
                min_sq = min_sq.min(segment.distance_to_point_sq(p));
            }
        }

        for segment in a.segments() {
            for q in &b.points {
                min_sq = min_sq.min(segment.distance_to_point_sq(q));
            }
            for other in b.segments() {
                let d = segment.distance_to_segment(&other, precision);
                min_sq = min_sq.min(d * d);
            }
        }

        Ok(min_sq.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::wkt::parse_wkt;
    use approx::assert_relative_eq;

    fn distance(a: &str, b: &str) -> f64 {
        let crs = Crs::local_2d();
        parse_wkt(a, &crs)
            .unwrap()
            .distance(&parse_wkt(b, &crs).unwrap())
            .unwrap()
    }

    #[test]
    fn point_distances() {
        assert_relative_eq!(distance("POINT(0 0)", "POINT(3 4)"), 5.0);
        assert_relative_eq!(distance("POINT(1 5)", "CURVE(0 0, 2 0)"), 5.0);
        assert_relative_eq!(distance("POINT(5 5)", "SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))"), 18f64.sqrt());
    }

    #[test]
    fn intersecting_geometries() {
        assert_eq!(distance("POINT(1 1)", "SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))"), 0.0);
        assert_eq!(distance("CURVE(0 0, 2 2)", "CURVE(0 2, 2 0)"), 0.0);
    }

    #[test]
    fn segment_distances() {
        assert_relative_eq!(distance("CURVE(0 0, 2 0)", "CURVE(0 3, 2 3)"), 3.0);
    }
}
