use crate::cartesian::CartesianPoint2d;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// Non-finite input is reported as collinear.
    pub fn triplet<Num: Float>(
        p: &impl CartesianPoint2d<Num = Num>,
        q: &impl CartesianPoint2d<Num = Num>,
        r: &impl CartesianPoint2d<Num = Num>,
    ) -> Self {
        match (q.y() - p.y()) * (r.x() - q.x()) - (q.x() - p.x()) * (r.y() - q.y()) {
            v if v > Num::zero() => Self::Clockwise,
            v if v < Num::zero() => Self::Counterclockwise,
            _ => Self::Collinear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian::Point2;

    #[test]
    fn triplet() {
        let p = Point2::new(0.0, 0.0);
        let q = Point2::new(1.0, 0.0);
        assert_eq!(
            Orientation::triplet(&p, &q, &Point2::new(1.0, 1.0)),
            Orientation::Counterclockwise
        );
        assert_eq!(
            Orientation::triplet(&p, &q, &Point2::new(1.0, -1.0)),
            Orientation::Clockwise
        );
        assert_eq!(
            Orientation::triplet(&p, &q, &Point2::new(3.0, 0.0)),
            Orientation::Collinear
        );
        assert_eq!(
            Orientation::triplet(&p, &q, &Point2::new(f64::NAN, 0.0)),
            Orientation::Collinear
        );
    }
}
