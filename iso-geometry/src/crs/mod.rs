//! Coordinate reference systems and coordinate transforms consumed by the geometry core.

mod authority;
mod datum;
mod system;
mod transform;
mod web_mercator;

pub use authority::{CrsAuthority, DefaultAuthority};
pub use datum::Datum;
pub use system::{Crs, CrsKind, CrsRef, ProjectionType};
pub use transform::{
    AddDimensionTransform, AffineTransform, ChainTransform, CoordinateTransform,
    IdentityTransform, InverseTransform,
};
pub use web_mercator::WebMercator;

#[cfg(feature = "geodesy")]
mod geodesy;
#[cfg(feature = "geodesy")]
pub use geodesy::GeodesyTransform;
