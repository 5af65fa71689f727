//! Boundary operator results.

use crate::aggregate::{MultiCurve, MultiPoint, MultiPrimitive};
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::position::Position;
use crate::primitive::{Point, Ring, SurfaceBoundary};

/// Boundary of an open curve: its start and end points.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveBoundary {
    start: Point,
    end: Point,
}

impl CurveBoundary {
    /// Creates a new curve boundary.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Start point of the curve.
    pub fn start(&self) -> &Point {
        &self.start
    }

    /// End point of the curve.
    pub fn end(&self) -> &Point {
        &self.end
    }

    /// Middle point between the start and the end.
    pub fn centroid(&self) -> Point {
        Point::new(self.start.position().interpolate(self.end.position(), 0.5))
    }
}

/// Boundary of a geometry.
///
/// A boundary is a closed complex, its own boundary is empty and its closure is itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Boundary of points, closed curves and rings.
    Empty(CrsRef),
    /// Endpoints of an open curve or an open curve chain.
    Curve(CurveBoundary),
    /// Points that are endpoints of an odd number of curves of a multi curve.
    Points(MultiPoint),
    /// Boundary of a surface.
    Surface(SurfaceBoundary),
    /// Rings bounding a set of surfaces.
    Rings(Vec<Ring>),
    /// Boundaries of the members of a heterogeneous aggregate.
    Mixed(Vec<Boundary>),
}

impl Boundary {
    /// Returns true if the boundary contains no points.
    pub fn is_empty(&self) -> bool {
        match self {
            Boundary::Empty(_) => true,
            Boundary::Points(points) => points.is_empty(),
            Boundary::Rings(rings) => rings.is_empty(),
            Boundary::Mixed(parts) => parts.iter().all(Boundary::is_empty),
            Boundary::Curve(_) | Boundary::Surface(_) => false,
        }
    }

    /// Topological dimension of the boundary.
    pub fn dimension(&self) -> Dimension {
        match self {
            Boundary::Empty(_) => Dimension::Empty,
            Boundary::Curve(_) => Dimension::Point,
            Boundary::Points(points) => points.dimension(),
            Boundary::Surface(_) => Dimension::Curve,
            Boundary::Rings(rings) if rings.is_empty() => Dimension::Empty,
            Boundary::Rings(_) => Dimension::Curve,
            Boundary::Mixed(parts) => parts
                .iter()
                .map(Boundary::dimension)
                .max()
                .unwrap_or_default(),
        }
    }

    /// A boundary is closed, so its closure is the boundary itself.
    pub fn closure(&self) -> &Self {
        self
    }

    /// Centroid of the boundary: the middle of the curve endpoints, the average of boundary points or the length
    /// weighted centroid of boundary rings.
    pub fn centroid(&self) -> Result<Point, GeometryError> {
        match self {
            Boundary::Curve(boundary) => Ok(boundary.centroid()),
            Boundary::Surface(boundary) => boundary.centroid(),
            _ => self.to_geometry()?.centroid(),
        }
    }

    /// Boundary as a geometry: points become a multi point, rings a multi curve.
    pub fn to_geometry(&self) -> Result<Geometry, GeometryError> {
        Ok(match self {
            Boundary::Empty(crs) => Geometry::MultiPrimitive(MultiPrimitive::empty(crs.clone())),
            Boundary::Curve(boundary) => Geometry::MultiPoint(MultiPoint::new(
                boundary.start.crs().clone(),
                vec![boundary.start.clone(), boundary.end.clone()],
            )?),
            Boundary::Points(points) => Geometry::MultiPoint(points.clone()),
            Boundary::Surface(boundary) => Geometry::MultiCurve(rings_to_curves(
                boundary.crs(),
                boundary.rings(),
            )?),
            Boundary::Rings(rings) => match rings.first() {
                Some(first) => Geometry::MultiCurve(rings_to_curves(first.crs(), rings.iter())?),
                None => {
                    return Err(GeometryError::DegenerateGeometry(
                        "boundary has no rings".into(),
                    ))
                }
            },
            Boundary::Mixed(parts) => {
                let mut members = vec![];
                let mut crs = None;
                for part in parts {
                    let geometry = part.to_geometry()?;
                    crs.get_or_insert_with(|| geometry.crs().clone());
                    members.extend(geometry.into_primitives());
                }
                let Some(crs) = crs else {
                    return Err(GeometryError::DegenerateGeometry(
                        "mixed boundary has no parts".into(),
                    ));
                };
                Geometry::MultiPrimitive(MultiPrimitive::new(crs, members)?)
            }
        })
    }

    /// Iterates over all positions of the boundary.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Boundary::Empty(_) => Box::new(std::iter::empty()),
            Boundary::Curve(boundary) => Box::new(
                std::iter::once(boundary.start.position())
                    .chain(std::iter::once(boundary.end.position())),
            ),
            Boundary::Points(points) => Box::new(points.positions()),
            Boundary::Surface(boundary) => Box::new(boundary.positions()),
            Boundary::Rings(rings) => Box::new(rings.iter().flat_map(|ring| ring.positions())),
            Boundary::Mixed(parts) => Box::new(parts.iter().flat_map(Boundary::positions)),
        }
    }
}

fn rings_to_curves<'a>(
    crs: &CrsRef,
    rings: impl Iterator<Item = &'a Ring>,
) -> Result<MultiCurve, GeometryError> {
    MultiCurve::new(crs.clone(), rings.map(|ring| ring.curve().clone()).collect())
}
