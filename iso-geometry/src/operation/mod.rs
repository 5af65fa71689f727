//! Planar operators on geometries: topological relations, set operations, centroids, convex hulls, simplicity
//! and distance.
//!
//! All operators work on the horizontal projection of the positions. Coordinates closer than the
//! [`Precision`](crate::precision::Precision) tolerance are treated as one point.

mod centroid;
mod components;
mod convex_hull;
mod distance;
mod overlay;
mod relate;
mod set_ops;
mod simplicity;

pub use relate::{IntersectionMatrix, Location};
pub use set_ops::SetOperation;
