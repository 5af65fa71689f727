//! Aggregates: unordered collections of primitives with no implied connectivity.

use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;
use crate::primitive::{Curve, Point, Primitive, Surface};

/// Collection of geometries of one type. Members may overlap or be disjoint.
///
/// Unlike primitives, an aggregate can be empty, so it carries its own reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<T> {
    crs: CrsRef,
    members: Vec<T>,
}

/// Set of points.
pub type MultiPoint = Aggregate<Point>;
/// Set of curves.
pub type MultiCurve = Aggregate<Curve>;
/// Set of surfaces.
pub type MultiSurface = Aggregate<Surface>;
/// Set of primitives of any dimension.
pub type MultiPrimitive = Aggregate<Primitive>;

impl<T: GeometryElement> Aggregate<T> {
    /// Creates a new aggregate. All members must be in the given reference system.
    pub fn new(crs: CrsRef, members: Vec<T>) -> Result<Self, GeometryError> {
        if let Some(member) = members.iter().find(|m| **m.crs() != *crs) {
            return Err(GeometryError::CrsMismatch(
                crs.code().to_string(),
                member.crs().code().to_string(),
            ));
        }

        Ok(Self { crs, members })
    }

    /// Creates an aggregate with no members.
    pub fn empty(crs: CrsRef) -> Self {
        Self {
            crs,
            members: vec![],
        }
    }

    /// Members of the aggregate.
    pub fn members(&self) -> &[T] {
        &self.members
    }

    /// Consumes the aggregate and returns its members.
    pub fn into_members(self) -> Vec<T> {
        self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the aggregate has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }
}

impl<T: GeometryElement> GeometryElement for Aggregate<T> {
    fn crs(&self) -> &CrsRef {
        &self.crs
    }

    fn dimension(&self) -> Dimension {
        self.members
            .iter()
            .map(GeometryElement::dimension)
            .max()
            .unwrap_or_default()
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        self.members.iter().flat_map(|m| m.positions())
    }

    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        let members = self
            .members
            .iter()
            .map(|m| m.try_map_positions(crs, f))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(crs.clone(), members)
    }
}

impl<'a, T> IntoIterator for &'a Aggregate<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use assert_matches::assert_matches;

    fn point(x: f64, y: f64, crs: &CrsRef) -> Point {
        Point::new(Position::from_slice(&[x, y], crs).unwrap())
    }

    #[test]
    fn crs_must_match() {
        let crs = Crs::local_2d();
        let multi = MultiPoint::new(crs.clone(), vec![point(0.0, 0.0, &crs), point(1.0, 1.0, &crs)]).unwrap();
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.dimension(), Dimension::Point);
        assert_eq!(multi.envelope().unwrap().width(), 1.0);

        assert_matches!(
            MultiPoint::new(crs, vec![point(0.0, 0.0, &Crs::wgs84())]),
            Err(GeometryError::CrsMismatch(_, _))
        );
    }

    #[test]
    fn empty_aggregate() {
        let multi = MultiPrimitive::empty(Crs::local_2d());
        assert!(multi.is_empty());
        assert_eq!(multi.dimension(), Dimension::Empty);
        assert!(multi.envelope().is_none());
    }
}
