//! Planar geometry after the ISO 19107 spatial schema.
//!
//! The crate models primitives ([`Point`], [`Curve`], [`Ring`], [`Surface`]), aggregates ([`MultiPoint`],
//! [`MultiCurve`], [`MultiSurface`], [`MultiPrimitive`]) and composites ([`CompositePoint`], [`CompositeCurve`],
//! [`CompositeSurface`]), all referenced to a coordinate reference system ([`Crs`]). The closed [`Geometry`] enum
//! dispatches the operators over all kinds:
//!
//! * boundary, closure and centroid,
//! * DE-9IM [`relate`](Geometry::relate) and the named predicates,
//! * overlay [`intersection`](Geometry::intersection), [`union`](Geometry::union),
//!   [`difference`](Geometry::difference) and [`symmetric difference`](Geometry::symmetric_difference),
//! * convex hull, simplicity and distance,
//! * coordinate transforms between reference systems.
//!
//! ```
//! use iso_geometry::{Crs, GeometryFactory};
//!
//! let factory = GeometryFactory::new(Crs::local_2d());
//! let a = factory.parse("SURFACE((0 0, 2 0, 2 2, 0 2))").unwrap();
//! let b = factory.parse("SURFACE((1 1, 3 1, 3 3, 1 3))").unwrap();
//!
//! assert_eq!(a.relate(&b).unwrap().to_string(), "212101212");
//! assert!(a.overlaps(&b).unwrap());
//! ```

pub mod cartesian;
pub mod crs;
pub mod operation;
pub mod primitive;
pub mod wkt;

mod aggregate;
mod arena;
mod boundary;
mod composite;
mod dimension;
mod element;
mod error;
mod factory;
mod geometry;
mod position;
mod precision;

pub use aggregate::{Aggregate, MultiCurve, MultiPoint, MultiPrimitive, MultiSurface};
pub use arena::{GeometryArena, GeometryId};
pub use boundary::{Boundary, CurveBoundary};
pub use composite::{Composite, CompositeCurve, CompositeMember, CompositePoint, CompositeSurface};
pub use crs::{Crs, CrsAuthority, CrsRef, DefaultAuthority};
pub use dimension::Dimension;
pub use element::GeometryElement;
pub use error::GeometryError;
pub use factory::GeometryFactory;
pub use geometry::{Geometry, GeometryKind};
pub use operation::{IntersectionMatrix, Location, SetOperation};
pub use position::Position;
pub use precision::{Precision, DEFAULT_EPSILON};
pub use primitive::{Curve, LineString, Point, Primitive, Ring, Surface, SurfaceBoundary};
pub use wkt::parse_wkt;
