//! Contour is a sequence of points.
//!
//! The planar algorithms work on contours that do not duplicate their first point at the end: a closed contour
//! has an implicit segment between the last and the first points. Positions in the public geometry types follow
//! the ISO convention instead (a closed curve repeats its first position), and are converted when a geometry is
//! decomposed for planar processing.

use crate::cartesian::{CartesianPoint2d, Point2, Segment};
use crate::precision::Precision;

/// Sequence of points. See module level documentation for details.
pub trait Contour {
    /// Type of the points the contour is consisted of.
    type Point;

    /// Whether the contour is closed.
    ///
    /// A closed contour has a segment connecting the last and the first points.
    fn is_closed(&self) -> bool;

    /// Iterate over the points of the contour.
    ///
    /// Note, that the last point shall not be the same as the first one even for the closed contours. If you want to
    /// include the first point at the end of iterator for closed contours, use [`Contour::iter_points_closing`]
    /// instead.
    fn iter_points(&self) -> impl Iterator<Item = &'_ Self::Point>;

    /// Same as [`Contour::iter_points`] but for closed contours repeats the first point again at the end of the iterator.
    fn iter_points_closing(&self) -> impl Iterator<Item = &Self::Point> {
        ContourPointsIterator::new(self.iter_points(), self.is_closed())
    }

    /// Iterates over segments of the contour. For closed contours this includes the segment between the last and the
    /// first points of the contour.
    fn iter_segments(&self) -> impl Iterator<Item = Segment<'_, Self::Point>> {
        ContourSegmentIterator::new(ContourPointsIterator::new(
            self.iter_points(),
            self.is_closed(),
        ))
    }
}

/// Iterator of contour points.
#[derive(Debug, Clone)]
pub struct ContourPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    points_iter: Iter,
    is_closed: bool,
    first_point: Option<&'a P>,
}

impl<'a, P: 'a, Iter> ContourPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    fn new(points_iter: Iter, is_closed: bool) -> Self {
        Self {
            points_iter,
            is_closed,
            first_point: None,
        }
    }
}

impl<'a, P, Iter> Iterator for ContourPointsIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.points_iter.next();
        if self.is_closed && self.first_point.is_none() {
            self.first_point = next;
        }

        if next.is_none() {
            self.first_point.take()
        } else {
            next
        }
    }
}

/// Iterator of contour segments.
#[derive(Debug, Clone)]
pub struct ContourSegmentIterator<'a, P: 'a, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    points_iter: ContourPointsIterator<'a, P, Iter>,
    prev_point: Option<&'a P>,
}

impl<'a, P, Iter> ContourSegmentIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    fn new(points_iter: ContourPointsIterator<'a, P, Iter>) -> Self {
        Self {
            points_iter,
            prev_point: None,
        }
    }
}

impl<'a, P, Iter> Iterator for ContourSegmentIterator<'a, P, Iter>
where
    Iter: Iterator<Item = &'a P>,
{
    type Item = Segment<'a, P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next_point = self.points_iter.next()?;
            if let Some(prev) = self.prev_point.replace(next_point) {
                return Some(Segment(prev, next_point));
            }
        }
    }
}

/// Open sequence of points, e.g. a curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenContour<P> {
    /// Points of the contour.
    pub points: Vec<P>,
}

impl<P> OpenContour<P> {
    /// Creates a new open contour.
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }
}

impl<P> Contour for OpenContour<P> {
    type Point = P;

    fn is_closed(&self) -> bool {
        false
    }

    fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.points.iter()
    }
}

/// Closed contour. The first point is not repeated at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosedContour<P> {
    /// Points of the contour.
    pub points: Vec<P>,
}

impl<P> ClosedContour<P> {
    /// Creates a new closed contour.
    pub fn new(points: Vec<P>) -> Self {
        Self { points }
    }
}

impl<P> Contour for ClosedContour<P> {
    type Point = P;

    fn is_closed(&self) -> bool {
        true
    }

    fn iter_points(&self) -> impl Iterator<Item = &'_ P> {
        self.points.iter()
    }
}

/// Direction in which a closed contour is traversed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    /// Clockwise.
    Clockwise,
    /// Counterclockwise.
    CounterClockwise,
}

impl<P: CartesianPoint2d<Num = f64>> ClosedContour<P> {
    /// Signed area of the contour, positive for counterclockwise contours.
    pub fn area_signed(&self) -> f64 {
        let mut iter = self.iter_points_closing();
        let Some(mut prev) = iter.next() else {
            return 0.0;
        };

        let mut aggr = 0.0;
        for p in iter {
            aggr += prev.x() * p.y() - p.x() * prev.y();
            prev = p;
        }

        aggr / 2.0
    }

    /// Winding of the contour.
    pub fn winding(&self) -> Winding {
        if self.area_signed() <= 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// Returns true if the point lies on one of the contour segments.
    pub fn is_on_border(&self, point: &impl CartesianPoint2d<Num = f64>, precision: &Precision) -> bool {
        self.iter_segments()
            .any(|segment| segment.contains_point(point, precision))
    }

    /// Winding number of the contour around the point. Points on the border give unspecified results.
    pub fn winding_number(&self, point: &impl CartesianPoint2d<Num = f64>) -> i64 {
        let mut wn = 0i64;
        let x = point.x();
        let y = point.y();

        for segment in self.iter_segments() {
            let (a, b) = (segment.0, segment.1);
            if a.y() <= y {
                if b.y() > y && is_left(a, b, x, y) > 0.0 {
                    wn += 1;
                }
            } else if b.y() <= y && is_left(a, b, x, y) < 0.0 {
                wn -= 1;
            }
        }

        wn
    }
}

impl ClosedContour<Point2> {
    /// Reverses direction of the contour if it does not match the required winding.
    pub fn with_winding(mut self, winding: Winding) -> Self {
        if self.winding() != winding {
            self.points.reverse();
        }
        self
    }
}

fn is_left(
    a: &impl CartesianPoint2d<Num = f64>,
    b: &impl CartesianPoint2d<Num = f64>,
    x: f64,
    y: f64,
) -> f64 {
    (b.x() - a.x()) * (y - a.y()) - (x - a.x()) * (b.y() - a.y())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_points_closing() {
        let contour = OpenContour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(contour.iter_points_closing().count(), 2);

        let contour = ClosedContour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(contour.iter_points_closing().count(), 3);
        assert_eq!(
            *contour.iter_points_closing().last().unwrap(),
            Point2::new(0.0, 0.0)
        );
    }

    #[test]
    fn iter_segments() {
        let contour = OpenContour::new(vec![Point2::new(0.0, 0.0)]);
        assert_eq!(contour.iter_segments().count(), 0);

        let contour = ClosedContour::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]);
        assert_eq!(contour.iter_segments().count(), 2);
        assert_eq!(
            contour.iter_segments().last().unwrap(),
            Segment(&Point2::new(1.0, 1.0), &Point2::new(0.0, 0.0))
        );
    }

    #[test]
    fn area_and_winding() {
        let contour = ClosedContour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        assert_eq!(contour.area_signed(), -0.5);
        assert_eq!(contour.winding(), Winding::Clockwise);

        let contour = contour.with_winding(Winding::CounterClockwise);
        assert_eq!(contour.area_signed(), 0.5);
    }

    #[test]
    fn winding_number() {
        let square = ClosedContour::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        assert_eq!(square.winding_number(&Point2::new(1.0, 1.0)), 1);
        assert_eq!(square.winding_number(&Point2::new(3.0, 1.0)), 0);
        assert!(square.is_on_border(&Point2::new(2.0, 1.0), &Precision::default()));

        let reversed = square.clone().with_winding(Winding::Clockwise);
        assert_eq!(reversed.winding_number(&Point2::new(1.0, 1.0)), -1);
    }
}
