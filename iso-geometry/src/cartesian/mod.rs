//! Types and functions on geometries in 2d cartesian coordinates.
//!
//! All planar algorithms of the crate (overlay, relate, convex hull, simplicity) run on the horizontal
//! projection of positions, expressed with the types of this module.

mod contour;
mod orient;
mod point;
mod rect;
mod segment;

pub use contour::{ClosedContour, Contour, OpenContour, Winding};
pub use orient::Orientation;
pub use point::{CartesianPoint2d, Point2, Vector2};
pub use rect::Rect;
pub use segment::{Segment, SegmentIntersection};
