//! Simplicity tests: absence of self-intersections in the horizontal projection.

use crate::cartesian::{CartesianPoint2d, Point2, Segment, SegmentIntersection};
use crate::geometry::Geometry;
use crate::precision::Precision;
use crate::primitive::{Curve, Primitive, Ring, Surface};

impl Geometry {
    /// Returns true if the geometry has no anomalous self-intersections, using the default precision.
    pub fn is_simple(&self) -> bool {
        self.is_simple_with(&Precision::default())
    }

    /// Returns true if the geometry has no anomalous self-intersections.
    ///
    /// * curves must not cross or touch themselves, except that a closed curve ends where it starts;
    /// * surfaces must have simple rings, holes must not touch the exterior ring or each other;
    /// * multi points must not repeat a point;
    /// * members of a multi curve may only meet at their endpoints.
    pub fn is_simple_with(&self, precision: &Precision) -> bool {
        match self {
            Geometry::Point(_) | Geometry::CompositePoint(_) => true,
            Geometry::Curve(v) => v.is_simple_with(precision),
            Geometry::Surface(v) => v.is_simple_with(precision),
            Geometry::MultiPoint(v) => {
                let points: Vec<Point2> = v.iter().map(|p| p.position().to_point2()).collect();
                points.iter().enumerate().all(|(index, p)| {
                    points[index + 1..]
                        .iter()
                        .all(|q| p.distance_sq(q) > precision.epsilon_sq())
                })
            }
            Geometry::MultiCurve(v) => curves_are_simple(v.members(), precision),
            Geometry::MultiSurface(v) => v.iter().all(|s| s.is_simple_with(precision)),
            Geometry::MultiPrimitive(v) => v.iter().all(|member| match member {
                Primitive::Point(_) => true,
                Primitive::Curve(curve) => curve.is_simple_with(precision),
                Primitive::Surface(surface) => surface.is_simple_with(precision),
            }),
            Geometry::CompositeCurve(v) => v
                .as_curve()
                .map(|curve| curve.is_simple_with(precision))
                .unwrap_or(false),
            Geometry::CompositeSurface(v) => v.members().iter().all(|s| s.is_simple_with(precision)),
        }
    }
}

impl Curve {
    /// Returns true if the curve does not cross or touch itself, using the default precision.
    pub fn is_simple(&self) -> bool {
        self.is_simple_with(&Precision::default())
    }

    /// Returns true if the curve does not cross or touch itself. A closed curve may only meet itself at the
    /// start position.
    pub fn is_simple_with(&self, precision: &Precision) -> bool {
        chain_is_simple(&planar_points(self), precision)
    }
}

impl Ring {
    /// Returns true if the ring does not cross or touch itself.
    pub fn is_simple(&self) -> bool {
        self.curve().is_simple()
    }
}

impl Surface {
    /// Returns true if all rings are simple and the holes touch neither the exterior ring nor each other.
    pub fn is_simple(&self) -> bool {
        self.is_simple_with(&Precision::default())
    }

    /// Returns true if all rings are simple and the holes touch neither the exterior ring nor each other.
    pub fn is_simple_with(&self, precision: &Precision) -> bool {
        let rings: Vec<Vec<Point2>> = self
            .boundary()
            .rings()
            .map(|ring| planar_points(ring.curve()))
            .collect();

        if !rings.iter().all(|ring| chain_is_simple(ring, precision)) {
            return false;
        }

        for (index, ring) in rings.iter().enumerate() {
            for other in &rings[index + 1..] {
                if chains_meet(ring, other, precision) {
                    log::debug!("Surface is not simple: ring {index} touches another ring");
                    return false;
                }
            }
        }

        true
    }
}

fn planar_points(curve: &Curve) -> Vec<Point2> {
    let mut points: Vec<Point2> = curve.positions().map(|p| p.to_point2()).collect();
    points.dedup();
    points
}

fn segments(points: &[Point2]) -> impl Iterator<Item = Segment<'_, Point2>> {
    points.windows(2).map(|pair| Segment(&pair[0], &pair[1]))
}

fn chain_is_simple(points: &[Point2], precision: &Precision) -> bool {
    let pieces: Vec<Segment<'_, Point2>> = segments(points).collect();
    let count = pieces.len();
    let closed = count > 1 && points.first() == points.last();

    for i in 0..count {
        for j in (i + 1)..count {
            let shared = if j == i + 1 {
                Some(pieces[i].1)
            } else if closed && i == 0 && j == count - 1 {
                Some(pieces[i].0)
            } else {
                None
            };

            match (pieces[i].intersection(&pieces[j], precision), shared) {
                (SegmentIntersection::None, _) => {}
                (SegmentIntersection::Point(p), Some(shared))
                    if p.distance_sq(shared) <= precision.epsilon_sq() => {}
                _ => return false,
            }
        }
    }

    true
}

fn chains_meet(a: &[Point2], b: &[Point2], precision: &Precision) -> bool {
    segments(a).any(|s| segments(b).any(|t| s.intersects(&t, precision)))
}

/// Members of a multi curve must be simple and may only meet at points that are endpoints of both members.
fn curves_are_simple(curves: &[Curve], precision: &Precision) -> bool {
    let chains: Vec<Vec<Point2>> = curves.iter().map(planar_points).collect();
    if !chains.iter().all(|chain| chain_is_simple(chain, precision)) {
        return false;
    }

    let is_endpoint = |chain: &[Point2], p: &Point2| {
        let closed = chain.first() == chain.last();
        !closed
            && [chain.first(), chain.last()]
                .into_iter()
                .flatten()
                .any(|end| end.distance_sq(p) <= precision.epsilon_sq())
    };

    for (index, a) in chains.iter().enumerate() {
        for b in &chains[index + 1..] {
            for s in segments(a) {
                for t in segments(b) {
                    match s.intersection(&t, precision) {
                        SegmentIntersection::None => {}
                        SegmentIntersection::Point(p) if is_endpoint(a.as_slice(), &p) && is_endpoint(b.as_slice(), &p) => {}
                        _ => return false,
                    }
                }
            }
        }
    }

    true
}
