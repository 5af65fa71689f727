//! Shared storage of geometries with memoized derived data.
//!
//! Geometries are immutable, so everything derived from them can be computed once and reused. The arena owns
//! the geometries, hands out [`GeometryId`]s and caches boundaries, closures and intersection matrices per id.
//! All methods take `&self` and the arena can be shared between threads.

use crate::boundary::Boundary;
use crate::composite::{CompositeCurve, CompositePoint, CompositeSurface};
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::operation::IntersectionMatrix;
use crate::precision::Precision;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Identifier of a geometry stored in a [`GeometryArena`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(usize);

impl GeometryId {
    /// Index of the geometry in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Slot {
    geometry: Arc<Geometry>,
    boundary: OnceLock<Arc<Boundary>>,
    closure: OnceLock<GeometryId>,
}

impl Slot {
    fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Arc::new(geometry),
            boundary: OnceLock::new(),
            closure: OnceLock::new(),
        }
    }
}

/// Append-only store of geometries.
#[derive(Debug, Default)]
pub struct GeometryArena {
    slots: RwLock<Vec<Arc<Slot>>>,
    relate_cache: RwLock<AHashMap<(GeometryId, GeometryId), IntersectionMatrix>>,
    precision: Precision,
}

impl GeometryArena {
    /// Creates an empty arena that uses the default precision for relate computations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the precision used for relate computations.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Stores the geometry and returns its id.
    pub fn insert(&self, geometry: Geometry) -> GeometryId {
        let mut slots = self.slots.write();
        let id = GeometryId(slots.len());
        slots.push(Arc::new(Slot::new(geometry)));
        id
    }

    /// Number of stored geometries.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// Returns true if the arena stores no geometries.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    fn slot(&self, id: GeometryId) -> Result<Arc<Slot>, GeometryError> {
        self.slots
            .read()
            .get(id.0)
            .cloned()
            .ok_or(GeometryError::UnknownGeometryId(id.0))
    }

    /// Geometry with the given id.
    pub fn get(&self, id: GeometryId) -> Result<Arc<Geometry>, GeometryError> {
        Ok(self.slot(id)?.geometry.clone())
    }

    /// Boundary of the geometry, computed on the first request.
    pub fn boundary(&self, id: GeometryId) -> Result<Arc<Boundary>, GeometryError> {
        let slot = self.slot(id)?;
        if let Some(boundary) = slot.boundary.get() {
            return Ok(boundary.clone());
        }

        let boundary = Arc::new(slot.geometry.boundary()?);
        // Another thread may have published its value first, that one wins.
        let _ = slot.boundary.set(boundary.clone());
        Ok(slot.boundary.get().cloned().unwrap_or(boundary))
    }

    /// Composite that defines the topology of the geometry.
    ///
    /// A composite is its own closure. A point, curve or surface is wrapped into a composite of one member that
    /// is stored in the arena on the first request; later requests return the same id. The closure of the
    /// closure is the closure itself. Aggregates have no closure.
    pub fn closure(&self, id: GeometryId) -> Result<GeometryId, GeometryError> {
        let slot = self.slot(id)?;
        if let Some(closure) = slot.closure.get() {
            return Ok(*closure);
        }

        let composite: Option<Geometry> = match slot.geometry.as_ref() {
            Geometry::CompositePoint(_)
            | Geometry::CompositeCurve(_)
            | Geometry::CompositeSurface(_) => None,
            Geometry::Point(v) => Some(CompositePoint::from(v.clone()).into()),
            Geometry::Curve(v) => Some(CompositeCurve::from(v.clone()).into()),
            Geometry::Surface(v) => Some(CompositeSurface::from(v.clone()).into()),
            other => {
                return Err(GeometryError::UnsupportedCombination(format!(
                    "{:?} is not a complex and has no closure",
                    other.kind()
                )))
            }
        };

        let mut slots = self.slots.write();
        if let Some(closure) = slot.closure.get() {
            return Ok(*closure);
        }

        let closure = match composite {
            None => id,
            Some(composite) => {
                let closure = GeometryId(slots.len());
                let closure_slot = Slot::new(composite);
                let _ = closure_slot.closure.set(closure);
                slots.push(Arc::new(closure_slot));
                log::trace!("Closure of geometry {} is stored as {}", id.0, closure.0);
                closure
            }
        };

        let _ = slot.closure.set(closure);
        Ok(closure)
    }

    /// Intersection matrix of the two geometries, computed on the first request for the pair in either order.
    pub fn relate(&self, a: GeometryId, b: GeometryId) -> Result<IntersectionMatrix, GeometryError> {
        {
            let cache = self.relate_cache.read();
            if let Some(matrix) = cache.get(&(a, b)) {
                return Ok(*matrix);
            }
            if let Some(matrix) = cache.get(&(b, a)) {
                return Ok(matrix.transpose());
            }
        }

        let matrix = self.get(a)?.relate_with(&*self.get(b)?, &self.precision)?;
        self.relate_cache.write().insert((a, b), matrix);
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::geometry::GeometryKind;
    use crate::wkt::parse_wkt;
    use assert_matches::assert_matches;

    fn insert(arena: &GeometryArena, wkt: &str) -> GeometryId {
        arena.insert(parse_wkt(wkt, &Crs::local_2d()).unwrap())
    }

    #[test]
    fn closure_is_stable() {
        let arena = GeometryArena::new();
        let curve = insert(&arena, "CURVE(0 0, 1 1)");

        let closure = arena.closure(curve).unwrap();
        assert_ne!(closure, curve);
        assert_eq!(arena.get(closure).unwrap().kind(), GeometryKind::CompositeCurve);
        assert_eq!(arena.closure(curve).unwrap(), closure);
        assert_eq!(arena.closure(closure).unwrap(), closure);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn aggregates_have_no_closure() {
        let arena = GeometryArena::new();
        let points = insert(&arena, "MULTIPOINT((0 0), (1 1))");
        assert_matches!(
            arena.closure(points),
            Err(GeometryError::UnsupportedCombination(_))
        );
    }

    #[test]
    fn boundary_is_shared() {
        let arena = GeometryArena::new();
        let curve = insert(&arena, "CURVE(0 0, 1 1)");
        let first = arena.boundary(curve).unwrap();
        let second = arena.boundary(curve).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.dimension(), crate::dimension::Dimension::Point);
    }

    #[test]
    fn relate_is_cached_both_ways() {
        let arena = GeometryArena::new();
        let point = insert(&arena, "POINT(1 1)");
        let square = insert(&arena, "SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))");

        let matrix = arena.relate(point, square).unwrap();
        assert!(matrix.is_within());
        assert_eq!(arena.relate(square, point).unwrap(), matrix.transpose());
        assert!(arena.relate(square, point).unwrap().is_contains());
    }

    #[test]
    fn unknown_id() {
        let arena = GeometryArena::new();
        assert_matches!(
            arena.get(GeometryId(3)),
            Err(GeometryError::UnknownGeometryId(3))
        );
    }
}
