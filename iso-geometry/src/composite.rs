//! Composites: ordered, non-empty chains of primitives that form one connected complex.

use crate::boundary::{Boundary, CurveBoundary};
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;
use crate::primitive::{Curve, Point, Ring, Surface};
use ahash::AHashMap;

/// Primitive type that can be a member of a [`Composite`].
pub trait CompositeMember: GeometryElement {
    /// Checks that the members form a valid complex.
    fn check_composite(members: &[Self]) -> Result<(), GeometryError>;
}

/// Ordered, non-empty list of primitives of one kind interpreted as a single complex.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite<T> {
    members: Vec<T>,
}

/// Composite of exactly one point.
pub type CompositePoint = Composite<Point>;
/// Chain of curves, each starting where the previous one ends.
pub type CompositeCurve = Composite<Curve>;
/// Set of surfaces forming one complex. Adjacent members share whole boundary edges.
pub type CompositeSurface = Composite<Surface>;

impl<T: CompositeMember> Composite<T> {
    /// Creates a new composite.
    pub fn new(members: Vec<T>) -> Result<Self, GeometryError> {
        let Some(first) = members.first() else {
            return Err(GeometryError::MalformedInput(
                "composite must have at least one member".into(),
            ));
        };

        if let Some(member) = members.iter().find(|m| **m.crs() != **first.crs()) {
            return Err(GeometryError::CrsMismatch(
                first.crs().code().to_string(),
                member.crs().code().to_string(),
            ));
        }

        T::check_composite(&members)?;
        Ok(Self { members })
    }

    /// Members of the composite, in order.
    pub fn members(&self) -> &[T] {
        &self.members
    }

    /// Consumes the composite and returns its members.
    pub fn into_members(self) -> Vec<T> {
        self.members
    }

    /// A composite is its own closure.
    pub fn closure(&self) -> &Self {
        self
    }
}

impl<T: CompositeMember> GeometryElement for Composite<T> {
    fn crs(&self) -> &CrsRef {
        self.members[0].crs()
    }

    fn dimension(&self) -> Dimension {
        self.members[0].dimension()
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
        Self::new(members)
    }
}

impl CompositeMember for Point {
    fn check_composite(members: &[Self]) -> Result<(), GeometryError> {
        if members.len() != 1 {
            return Err(GeometryError::MalformedInput(format!(
                "composite point must have exactly one point, got {}",
                members.len()
            )));
        }

        Ok(())
    }
}

impl CompositeMember for Curve {
    fn check_composite(members: &[Self]) -> Result<(), GeometryError> {
        for (index, pair) in members.windows(2).enumerate() {
            if pair[0].end() != pair[1].start() {
                return Err(GeometryError::MalformedInput(format!(
                    "composite curve member {} does not start at the end of member {index}",
                    index + 1
                )));
            }
        }

        Ok(())
    }
}

impl CompositeMember for Surface {
    fn check_composite(_members: &[Self]) -> Result<(), GeometryError> {
        Ok(())
    }
}

impl Composite<Point> {
    /// The only point of the composite.
    pub fn point(&self) -> &Point {
        &self.members[0]
    }

    /// A composite point has an empty boundary.
    pub fn boundary(&self) -> Boundary {
        Boundary::Empty(self.crs().clone())
    }
}

impl From<Point> for CompositePoint {
    fn from(point: Point) -> Self {
        Self {
            members: vec![point],
        }
    }
}

impl Composite<Curve> {
    /// Start of the first member.
    pub fn start(&self) -> &Position {
        self.members[0].start()
    }

    /// End of the last member.
    pub fn end(&self) -> &Position {
        self.members[self.members.len() - 1].end()
    }

    /// Returns true if the chain ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.start() == self.end()
    }

    /// Endpoints of the chain, or an empty boundary if the chain is closed.
    pub fn boundary(&self) -> Boundary {
        if self.is_closed() {
            Boundary::Empty(self.crs().clone())
        } else {
            Boundary::Curve(CurveBoundary::new(
                Point::new(self.start().clone()),
                Point::new(self.end().clone()),
            ))
        }
    }

    /// Merges the chain into a single curve.
    pub fn as_curve(&self) -> Result<Curve, GeometryError> {
        let mut members = self.members.iter();
        let Some(first) = members.next() else {
            return Err(GeometryError::DegenerateGeometry("empty composite".into()));
        };

        members.try_fold(first.clone(), |curve, next| curve.concat(next))
    }

    /// Total length of the chain.
    pub fn length(&self) -> f64 {
        self.members.iter().map(Curve::length).sum()
    }
}

impl From<Curve> for CompositeCurve {
    fn from(curve: Curve) -> Self {
        Self {
            members: vec![curve],
        }
    }
}

impl Composite<Surface> {
    /// Total area of the members.
    pub fn area(&self) -> f64 {
        self.members.iter().map(Surface::area).sum()
    }

    /// Outer boundary of the complex.
    ///
    /// Edges shared by two members in opposite directions are interior to the complex and are removed, the
    /// remaining edges are linked into rings.
    pub fn boundary(&self) -> Result<Boundary, GeometryError> {
        let mut edges: Vec<(Position, Position)> = vec![];
        for surface in &self.members {
            for (index, ring) in surface.boundary().rings().enumerate() {
                let mut positions: Vec<Position> = ring.positions().cloned().collect();
                // Exterior counterclockwise and holes clockwise put the member interior on the left of every edge.
                let counterclockwise = ring.signed_area() > 0.0;
                if counterclockwise != (index == 0) {
                    positions.reverse();
                }
                edges.extend(
                    positions
                        .windows(2)
                        .filter(|pair| pair[0] != pair[1])
                        .map(|pair| (pair[0].clone(), pair[1].clone())),
                );
            }
        }

        let mut removed = vec![false; edges.len()];
        let mut by_start: AHashMap<Vec<u64>, Vec<usize>> = AHashMap::new();
        for (index, edge) in edges.iter().enumerate() {
            by_start.entry(key(&edge.0)).or_default().push(index);
        }

        for (index, edge) in edges.iter().enumerate() {
            if removed[index] {
                continue;
            }
            let twin = by_start.get(&key(&edge.1)).and_then(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .find(|&other| !removed[other] && other != index && edges[other].1 == edge.0)
            });
            if let Some(twin) = twin {
                removed[index] = true;
                removed[twin] = true;
            }
        }

        let mut rings = vec![];
        let mut used = removed;
        for start in 0..edges.len() {
            if used[start] {
                continue;
            }

            used[start] = true;
            let mut positions = vec![edges[start].0.clone(), edges[start].1.clone()];
            let mut current = start;
            while edges[current].1 != edges[start].0 {
                let next = by_start.get(&key(&edges[current].1)).and_then(|candidates| {
                    candidates.iter().copied().find(|&other| !used[other])
                });
                let Some(next) = next else {
                    return Err(GeometryError::MalformedInput(
                        "composite surface boundary does not close".into(),
                    ));
                };
                used[next] = true;
                positions.push(edges[next].1.clone());
                current = next;
            }

            rings.push(Ring::from_positions(positions)?);
        }

        log::trace!(
            "Composite surface of {} members has {} boundary rings",
            self.members.len(),
            rings.len()
        );

        Ok(Boundary::Rings(rings))
    }
}

impl From<Surface> for CompositeSurface {
    fn from(surface: Surface) -> Self {
        Self {
            members: vec![surface],
        }
    }
}

fn key(position: &Position) -> Vec<u64> {
    position.ordinates().iter().map(|v| v.to_bits()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use assert_matches::assert_matches;

    fn positions(coords: &[[f64; 2]]) -> Vec<Position> {
        coords
            .iter()
            .map(|c| Position::from_slice(c, &Crs::local_2d()).unwrap())
            .collect()
    }

    fn square(x: f64, y: f64) -> Surface {
        Surface::from_rings(
            Ring::from_positions(positions(&[
                [x, y],
                [x + 1.0, y],
                [x + 1.0, y + 1.0],
                [x, y + 1.0],
            ]))
            .unwrap(),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn composite_curve_chain() {
        let a = Curve::from_positions(positions(&[[0.0, 0.0], [1.0, 0.0]])).unwrap();
        let b = Curve::from_positions(positions(&[[1.0, 0.0], [1.0, 1.0]])).unwrap();
        let composite = CompositeCurve::new(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(composite.as_curve().unwrap().num_positions(), 3);
        assert_eq!(composite.length(), 2.0);

        let Boundary::Curve(boundary) = composite.boundary() else {
            panic!("open chain must have endpoints");
        };
        assert_eq!(boundary.end().position().ordinates(), &[1.0, 1.0]);

        assert_matches!(
            CompositeCurve::new(vec![b, a]),
            Err(GeometryError::MalformedInput(_))
        );
        assert_matches!(
            CompositeCurve::new(vec![]),
            Err(GeometryError::MalformedInput(_))
        );
    }

    #[test]
    fn composite_point_has_one_member() {
        let p = Point::new(Position::from_slice(&[1.0, 1.0], &Crs::local_2d()).unwrap());
        assert!(CompositePoint::new(vec![p.clone()]).is_ok());
        assert_matches!(
            CompositePoint::new(vec![p.clone(), p]),
            Err(GeometryError::MalformedInput(_))
        );
    }

    #[test]
    fn composite_surface_dissolves_shared_edges() {
        let composite = CompositeSurface::new(vec![square(0.0, 0.0), square(1.0, 0.0)]).unwrap();
        assert_eq!(composite.area(), 2.0);
        let Boundary::Rings(rings) = composite.boundary().unwrap() else {
            panic!("composite surface boundary must be rings");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].length(), 6.0);
        assert_eq!(rings[0].area(), 2.0);
    }
}
