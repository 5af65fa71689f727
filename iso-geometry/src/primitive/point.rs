use crate::boundary::Boundary;
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;

/// Zero-dimensional primitive wrapping exactly one position.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    position: Position,
}

impl Point {
    /// Creates a new point.
    pub fn new(position: Position) -> Self {
        Self { position }
    }

    /// Position of the point.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Consumes the point and returns its position.
    pub fn into_position(self) -> Position {
        self.position
    }

    /// Centroid of a point is the point itself.
    pub fn centroid(&self) -> Point {
        self.clone()
    }

    /// A point has an empty boundary.
    pub fn boundary(&self) -> Boundary {
        Boundary::Empty(self.crs().clone())
    }

    /// Convex hull of a point is the point itself.
    pub fn convex_hull(&self) -> Point {
        self.clone()
    }
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Self::new(position)
    }
}

impl GeometryElement for Point {
    fn crs(&self) -> &CrsRef {
        self.position.crs()
    }

    fn dimension(&self) -> Dimension {
        Dimension::Point
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        std::iter::once(&self.position)
    }

    fn try_map_positions<F>(&self, _crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        Ok(Self::new(f(&self.position)?))
    }
}
