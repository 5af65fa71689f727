//! Centroids of geometries of any kind.

use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::primitive::{Curve, Point, Primitive, Surface};

impl Geometry {
    /// Center of mass of the geometry, assuming uniform density over its highest-dimension parts.
    ///
    /// Points are averaged, curves weighted by length and surfaces by area. For a multi primitive only the
    /// members of the highest dimension contribute. Fails with [`GeometryError::DegenerateGeometry`] for empty
    /// geometries and geometries with zero measure.
    pub fn centroid(&self) -> Result<Point, GeometryError> {
        match self {
            Geometry::Point(v) => Ok(v.centroid()),
            Geometry::Curve(v) => v.centroid(),
            Geometry::Surface(v) => v.centroid(),
            Geometry::MultiPoint(v) => points_centroid(v.iter(), v.crs()),
            Geometry::MultiCurve(v) => curves_centroid(v.iter(), v.crs()),
            Geometry::MultiSurface(v) => surfaces_centroid(v.iter(), v.crs()),
            Geometry::MultiPrimitive(v) => match v.dimension() {
                Dimension::Empty => Err(empty_centroid()),
                Dimension::Point => points_centroid(
                    v.iter().filter_map(|p| match p {
                        Primitive::Point(point) => Some(point),
                        _ => None,
                    }),
                    v.crs(),
                ),
                Dimension::Curve => curves_centroid(
                    v.iter().filter_map(|p| match p {
                        Primitive::Curve(curve) => Some(curve),
                        _ => None,
                    }),
                    v.crs(),
                ),
                Dimension::Surface => surfaces_centroid(
                    v.iter().filter_map(|p| match p {
                        Primitive::Surface(surface) => Some(surface),
                        _ => None,
                    }),
                    v.crs(),
                ),
            },
            Geometry::CompositePoint(v) => Ok(v.point().centroid()),
            Geometry::CompositeCurve(v) => curves_centroid(v.members().iter(), v.crs()),
            Geometry::CompositeSurface(v) => surfaces_centroid(v.members().iter(), v.crs()),
        }
    }
}

fn empty_centroid() -> GeometryError {
    GeometryError::DegenerateGeometry("centroid of an empty geometry".into())
}

fn weighted_point(sums: Vec<f64>, weight: f64, crs: &CrsRef) -> Result<Point, GeometryError> {
    if weight <= 0.0 || weight.is_nan() {
        return Err(GeometryError::DegenerateGeometry(
            "centroid of a geometry with zero measure".into(),
        ));
    }

    Ok(Point::new(Position::from_parts_unchecked(
        sums.into_iter().map(|v| v / weight).collect(),
        crs.clone(),
    )))
}

fn points_centroid<'a>(
    points: impl Iterator<Item = &'a Point>,
    crs: &CrsRef,
) -> Result<Point, GeometryError> {
    let mut sums = vec![0.0; crs.dimension()];
    let mut count = 0usize;
    for point in points {
        for (sum, v) in sums.iter_mut().zip(point.position().ordinates()) {
            *sum += v;
        }
        count += 1;
    }

    if count == 0 {
        return Err(empty_centroid());
    }

    weighted_point(sums, count as f64, crs)
}

fn curves_centroid<'a>(
    curves: impl Iterator<Item = &'a Curve>,
    crs: &CrsRef,
) -> Result<Point, GeometryError> {
    let mut sums = vec![0.0; crs.dimension()];
    let mut total = 0.0;
    let mut count = 0usize;
    for curve in curves {
        let (moments, length) = curve.centroid_moments();
        for (sum, v) in sums.iter_mut().zip(moments) {
            *sum += v;
        }
        total += length;
        count += 1;
    }

    if count == 0 {
        return Err(empty_centroid());
    }

    weighted_point(sums, total, crs)
}

fn surfaces_centroid<'a>(
    surfaces: impl Iterator<Item = &'a Surface>,
    crs: &CrsRef,
) -> Result<Point, GeometryError> {
    let mut sums = vec![0.0; crs.dimension()];
    let mut total = 0.0;
    let mut count = 0usize;
    for surface in surfaces {
        count += 1;
        let area = surface.area();
        let centroid = match surface.centroid() {
            Ok(centroid) => centroid,
            // Zero-area members carry no weight.
            Err(GeometryError::DegenerateGeometry(_)) if area.is_finite() => continue,
            Err(err) => return Err(err),
        };

        for (sum, v) in sums.iter_mut().zip(centroid.position().ordinates()) {
            *sum += v * area;
        }
        total += area;
    }

    if count == 0 {
        return Err(empty_centroid());
    }

    weighted_point(sums, total, crs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::wkt::parse_wkt;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    fn centroid(wkt: &str) -> Result<Vec<f64>, GeometryError> {
        let geometry = parse_wkt(wkt, &Crs::local_2d())?;
        Ok(geometry.centroid()?.position().ordinates().to_vec())
    }

    #[test]
    fn multi_point_average() {
        assert_eq!(
            centroid("MULTIPOINT((0 0), (2 0), (2 2), (0 2))").unwrap(),
            vec![1.0, 1.0]
        );
    }

    #[test]
    fn multi_curve_weighted_by_length() {
        let c = centroid("MULTICURVE((0 0, 4 0), (0 2, 0 3))").unwrap();
        assert_relative_eq!(c[0], 1.6);
        assert_relative_eq!(c[1], 0.5);
    }

    #[test]
    fn multi_surface_weighted_by_area() {
        let c = centroid("MULTISURFACE(((0 0, 2 0, 2 2, 0 2, 0 0)), ((10 0, 11 0, 11 1, 10 1, 10 0)))")
            .unwrap();
        assert_relative_eq!(c[0], (4.0 * 1.0 + 1.0 * 10.5) / 5.0);
        assert_relative_eq!(c[1], (4.0 * 1.0 + 1.0 * 0.5) / 5.0);
    }

    #[test]
    fn zero_area_members_are_skipped() {
        let c = centroid("MULTISURFACE(((0 0, 1 0, 2 0, 0 0)), ((4 0, 6 0, 6 2, 4 2, 4 0)))").unwrap();
        assert_relative_eq!(c[0], 5.0);
        assert_relative_eq!(c[1], 1.0);

        assert_matches!(
            centroid("MULTISURFACE(((0 0, 1 0, 2 0, 0 0)))"),
            Err(GeometryError::DegenerateGeometry(_))
        );
    }

    #[test]
    fn overflowing_members_are_not_skipped() {
        assert_matches!(
            centroid("MULTISURFACE(((0 0, 1e200 0, 1e200 1e200, 0 1e200, 0 0)), ((0 0, 2 0, 2 2, 0 2, 0 0)))"),
            Err(GeometryError::DegenerateGeometry(_))
        );
    }

    #[test]
    fn multi_primitive_uses_highest_dimension() {
        let c = centroid("MULTIPRIMITIVE(POINT(100 100), CURVE(0 0, 2 0))").unwrap();
        assert_eq!(c, vec![1.0, 0.0]);
    }

    #[test]
    fn empty_geometry_has_no_centroid() {
        assert_matches!(
            centroid("MULTIPOINT EMPTY"),
            Err(GeometryError::DegenerateGeometry(_))
        );
        assert_matches!(
            centroid("MULTIPRIMITIVE EMPTY"),
            Err(GeometryError::DegenerateGeometry(_))
        );
    }
}
