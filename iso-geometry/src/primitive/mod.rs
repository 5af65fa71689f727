//! Geometric primitives: points, curves, rings and surfaces.

mod curve;
mod point;
mod ring;
mod surface;

pub use curve::{Curve, LineString};
pub use point::Point;
pub use ring::Ring;
pub use surface::{Surface, SurfaceBoundary};

use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;

/// Any primitive. Used as the member type of heterogeneous aggregates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Point.
    Point(Point),
    /// Curve.
    Curve(Curve),
    /// Surface.
    Surface(Surface),
}

impl GeometryElement for Primitive {
    fn crs(&self) -> &CrsRef {
        match self {
            Primitive::Point(v) => v.crs(),
            Primitive::Curve(v) => v.crs(),
            Primitive::Surface(v) => v.crs(),
        }
    }

    fn dimension(&self) -> Dimension {
        match self {
            Primitive::Point(_) => Dimension::Point,
            Primitive::Curve(_) => Dimension::Curve,
            Primitive::Surface(_) => Dimension::Surface,
        }
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        let boxed: Box<dyn Iterator<Item = &Position> + '_> = match self {
            Primitive::Point(v) => Box::new(GeometryElement::positions(v)),
            Primitive::Curve(v) => Box::new(v.positions()),
            Primitive::Surface(v) => Box::new(GeometryElement::positions(v)),
        };
        boxed
    }

    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        Ok(match self {
            Primitive::Point(v) => Primitive::Point(v.try_map_positions(crs, f)?),
            Primitive::Curve(v) => Primitive::Curve(v.try_map_positions(crs, f)?),
            Primitive::Surface(v) => Primitive::Surface(v.try_map_positions(crs, f)?),
        })
    }
}

impl From<Point> for Primitive {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<Curve> for Primitive {
    fn from(value: Curve) -> Self {
        Self::Curve(value)
    }
}

impl From<Surface> for Primitive {
    fn from(value: Surface) -> Self {
        Self::Surface(value)
    }
}
