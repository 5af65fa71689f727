use crate::cartesian::{CartesianPoint2d, Point2};
use crate::precision::Precision;

/// A straight line segment between two points.
#[derive(Debug, PartialEq)]
pub struct Segment<'a, Point>(pub &'a Point, pub &'a Point);

/// Result of intersecting two segments.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SegmentIntersection {
    /// Segments have no common points.
    None,
    /// Segments cross or touch at a single point.
    Point(Point2),
    /// Segments are collinear and share the sub-segment between the two points.
    Overlap(Point2, Point2),
}

impl<P: CartesianPoint2d<Num = f64>> Segment<'_, P> {
    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.0.distance(self.1)
    }

    /// Middle point of the segment.
    pub fn midpoint(&self) -> Point2 {
        Point2::new((self.0.x() + self.1.x()) / 2.0, (self.0.y() + self.1.y()) / 2.0)
    }

    /// Shortest euclidian distance (squared) between a point and the segment:
    ///
    /// * if the normal from the point to the segment ends inside the segment, the returned value is the squared length
    ///   of the normal
    /// * if the normal from the point to the segment ends outside of the segment, the returned value is the smaller one
    ///   of the distances between the point and the segment's endpoints
    pub fn distance_to_point_sq<Point: CartesianPoint2d<Num = f64>>(&self, point: &Point) -> f64 {
        if self.0.equal(self.1) {
            return self.0.distance_sq(point);
        }

        let ds = self.1.sub(self.0);
        let dp = point.sub(self.0);
        let ds_len = ds.magnitude_sq();

        let r = dp.dot(&ds) / ds_len;
        if r <= 0.0 {
            self.0.distance_sq(point)
        } else if r >= 1.0 {
            self.1.distance_sq(point)
        } else {
            let s = (dp.dy() * ds.dx() - dp.dx() * ds.dy()) / ds_len;
            (s * s) * ds_len
        }
    }

    /// Returns true if the point lies on the segment within the tolerance.
    pub fn contains_point<Point: CartesianPoint2d<Num = f64>>(
        &self,
        point: &Point,
        precision: &Precision,
    ) -> bool {
        self.distance_to_point_sq(point) <= precision.epsilon_sq()
    }

    /// Position of the projection of the point onto the segment line, `0.0` at the start and `1.0` at the end.
    pub fn parameter<Point: CartesianPoint2d<Num = f64>>(&self, point: &Point) -> f64 {
        let ds = self.1.sub(self.0);
        let len_sq = ds.magnitude_sq();
        if len_sq == 0.0 {
            return 0.0;
        }

        point.sub(self.0).dot(&ds) / len_sq
    }

    /// Computes the common part of the two segments.
    ///
    /// Endpoints lying within the tolerance from the other segment are reported as touching points, so
    /// nearly-collinear overlapping segments are reported as [`SegmentIntersection::Overlap`].
    pub fn intersection<Q: CartesianPoint2d<Num = f64>>(
        &self,
        other: &Segment<'_, Q>,
        precision: &Precision,
    ) -> SegmentIntersection {
        let a0 = self.0.to_point2();
        let a1 = self.1.to_point2();
        let b0 = other.0.to_point2();
        let b1 = other.1.to_point2();
        let this = Segment(&a0, &a1);
        let that = Segment(&b0, &b1);

        let mut touches: Vec<Point2> = Vec::with_capacity(4);
        for p in [a0, a1] {
            if that.contains_point(&p, precision) {
                push_distinct(&mut touches, p, precision);
            }
        }
        for p in [b0, b1] {
            if this.contains_point(&p, precision) {
                push_distinct(&mut touches, p, precision);
            }
        }

        match touches.len() {
            0 => {}
            1 => return SegmentIntersection::Point(touches[0]),
            _ => {
                let mut best = (touches[0], touches[1]);
                let mut best_distance = best.0.distance_sq(&best.1);
                for i in 0..touches.len() {
                    for j in (i + 1)..touches.len() {
                        let distance = touches[i].distance_sq(&touches[j]);
                        if distance > best_distance {
                            best = (touches[i], touches[j]);
                            best_distance = distance;
                        }
                    }
                }

                if this.parameter(&best.0) > this.parameter(&best.1) {
                    best = (best.1, best.0);
                }
                return SegmentIntersection::Overlap(best.0, best.1);
            }
        }

        let r = a1 - a0;
        let s = b1 - b0;
        let denom = r.cross(&s);
        if denom == 0.0 {
            return SegmentIntersection::None;
        }

        let qp = b0 - a0;
        let t = qp.cross(&s) / denom;
        let u = qp.cross(&r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            SegmentIntersection::Point(a0 + r * t)
        } else {
            SegmentIntersection::None
        }
    }

    /// Returns true, if the segment has at least one common point with the `other` segment.
    pub fn intersects<Q: CartesianPoint2d<Num = f64>>(
        &self,
        other: &Segment<'_, Q>,
        precision: &Precision,
    ) -> bool {
        self.intersection(other, precision) != SegmentIntersection::None
    }

    /// Shortest distance between two segments.
    pub fn distance_to_segment<Q: CartesianPoint2d<Num = f64>>(
        &self,
        other: &Segment<'_, Q>,
        precision: &Precision,
    ) -> f64 {
        if self.intersects(other, precision) {
            return 0.0;
        }

        self.distance_to_point_sq(other.0)
            .min(self.distance_to_point_sq(other.1))
            .min(other.distance_to_point_sq(self.0))
            .min(other.distance_to_point_sq(self.1))
            .sqrt()
    }
}

fn push_distinct(points: &mut Vec<Point2>, point: Point2, precision: &Precision) {
    if !points
        .iter()
        .any(|p| p.distance_sq(&point) <= precision.epsilon_sq())
    {
        points.push(point);
    }
}
