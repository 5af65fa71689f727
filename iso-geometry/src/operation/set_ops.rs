//! Boolean set operations on the planar arrangement of two geometries.

use crate::cartesian::{CartesianPoint2d, ClosedContour, Point2};
use crate::crs::CrsRef;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::operation::components::Components;
use crate::operation::overlay::Arrangement;
use crate::operation::relate::{check_same_crs, Location};
use crate::position::Position;
use crate::precision::Precision;
use crate::primitive::{Curve, Point, Primitive, Ring, Surface, SurfaceBoundary};
use std::f64::consts::TAU;

/// Boolean operation on two point sets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SetOperation {
    /// Points in both sets.
    Intersection,
    /// Points in either set.
    Union,
    /// Points in the first set, but not in the second one.
    Difference,
    /// Points in exactly one of the sets.
    SymmetricDifference,
}

impl SetOperation {
    /// Whether a point with the given membership in the two sets belongs to the result.
    pub fn select(self, in_a: bool, in_b: bool) -> bool {
        match self {
            SetOperation::Intersection => in_a && in_b,
            SetOperation::Union => in_a || in_b,
            SetOperation::Difference => in_a && !in_b,
            SetOperation::SymmetricDifference => in_a != in_b,
        }
    }
}

impl Geometry {
    /// Points common to both geometries.
    pub fn intersection(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        self.overlay_with(other, SetOperation::Intersection, &Precision::default())
    }

    /// Points of either geometry.
    pub fn union(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        self.overlay_with(other, SetOperation::Union, &Precision::default())
    }

    /// Points of this geometry that are not in the other one.
    pub fn difference(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        self.overlay_with(other, SetOperation::Difference, &Precision::default())
    }

    /// Points that are in exactly one of the geometries.
    pub fn symmetric_difference(&self, other: &Geometry) -> Result<Geometry, GeometryError> {
        self.overlay_with(other, SetOperation::SymmetricDifference, &Precision::default())
    }

    /// Computes the set operation on the two geometries.
    ///
    /// The result is the simplest geometry holding it: a single primitive, a homogeneous aggregate or a
    /// multi primitive when parts of different dimensions remain. Surfaces of the result have no collinear
    /// vertices; an empty result is an empty multi primitive.
    ///
    /// Set operations are defined for 2-dimensional reference systems only.
    pub fn overlay_with(
        &self,
        other: &Geometry,
        operation: SetOperation,
        precision: &Precision,
    ) -> Result<Geometry, GeometryError> {
        check_same_crs(self, other)?;
        let crs = self.crs();
        if crs.dimension() != 2 {
            return Err(GeometryError::UnsupportedCombination(format!(
                "set operations require a 2-dimensional reference system, {crs} has {} dimensions",
                crs.dimension()
            )));
        }

        let a = Components::new(self);
        let b = Components::new(other);
        let arrangement = Arrangement::build(&a, &b, precision);
        let primitives = Assembler {
            arrangement: &arrangement,
            a: &a,
            b: &b,
            operation,
            precision,
            crs,
        }
        .assemble()?;

        log::debug!(
            "{operation:?} of {:?} and {:?} has {} primitives",
            self.kind(),
            other.kind(),
            primitives.len()
        );

        Geometry::from_primitives(crs, primitives)
    }
}

struct Assembler<'a> {
    arrangement: &'a Arrangement,
    a: &'a Components,
    b: &'a Components,
    operation: SetOperation,
    precision: &'a Precision,
    crs: &'a CrsRef,
}

impl Assembler<'_> {
    fn assemble(&self) -> Result<Vec<Primitive>, GeometryError> {
        let nodes = &self.arrangement.nodes;
        let inside = |location: Location| location != Location::Exterior;

        let mut area_edges = vec![];
        let mut line_edges = vec![];
        let mut covered = vec![false; nodes.len()];
        for edge in &self.arrangement.edges {
            let left = self.operation.select(edge.left[0], edge.left[1]);
            let right = self.operation.select(edge.right[0], edge.right[1]);
            if left != right {
                area_edges.push(if left {
                    (edge.from, edge.to)
                } else {
                    (edge.to, edge.from)
                });
            } else if !left
                && self
                    .operation
                    .select(inside(edge.location[0]), inside(edge.location[1]))
            {
                line_edges.push((edge.from, edge.to));
            } else if !left {
                continue;
            }

            covered[edge.from] = true;
            covered[edge.to] = true;
        }

        let mut primitives: Vec<Primitive> = self.surfaces(&area_edges)?;
        primitives.extend(self.lines(&line_edges)?);

        for (id, node) in nodes.iter().enumerate() {
            if covered[id]
                || !self
                    .operation
                    .select(inside(node.location[0]), inside(node.location[1]))
            {
                continue;
            }

            let in_area = self.operation.select(
                inside(self.a.locate_area(&node.point, self.precision)),
                inside(self.b.locate_area(&node.point, self.precision)),
            );
            if !in_area {
                primitives.push(Point::new(self.position(&node.point)).into());
            }
        }

        Ok(primitives)
    }

    fn position(&self, point: &Point2) -> Position {
        Position::from_parts_unchecked(vec![point.x(), point.y()], self.crs.clone())
    }

    fn surfaces(&self, edges: &[(usize, usize)]) -> Result<Vec<Primitive>, GeometryError> {
        let nodes = &self.arrangement.nodes;
        let mut outgoing: Vec<Vec<usize>> = vec![vec![]; nodes.len()];
        for (index, (from, _)) in edges.iter().enumerate() {
            outgoing[*from].push(index);
        }

        let angle = |from: usize, to: usize| {
            let d = nodes[to].point - nodes[from].point;
            d.dy().atan2(d.dx())
        };

        let mut used = vec![false; edges.len()];
        let mut shells: Vec<ClosedContour<Point2>> = vec![];
        let mut holes: Vec<ClosedContour<Point2>> = vec![];
        for start in 0..edges.len() {
            if used[start] {
                continue;
            }

            let mut ids = vec![];
            let mut current = start;
            let closed = loop {
                used[current] = true;
                let (from, to) = edges[current];
                ids.push(from);

                // The next edge is the first one clockwise from the reversed incoming edge, which keeps the
                // traversed face on the left.
                let back = angle(to, from);
                let next = outgoing[to].iter().copied().min_by(|x, y| {
                    let turn_x = clockwise_turn(back, angle(to, edges[*x].1));
                    let turn_y = clockwise_turn(back, angle(to, edges[*y].1));
                    turn_x.total_cmp(&turn_y)
                });
                match next {
                    Some(next) if next == start => break true,
                    Some(next) if !used[next] => current = next,
                    _ => break false,
                }
            };

            if !closed {
                log::warn!("Overlay result ring starting at node {} does not close", edges[start].0);
                continue;
            }

            for ring in split_at_repeated_nodes(ids) {
                let points = ring.into_iter().map(|id| nodes[id].point).collect();
                let contour = ClosedContour::new(remove_collinear(points, self.precision));
                if contour.points.len() < 3 {
                    continue;
                }

                let area = contour.area_signed();
                if area > 0.0 {
                    shells.push(contour);
                } else if area < 0.0 {
                    holes.push(contour);
                }
            }
        }

        let mut assigned: Vec<Vec<ClosedContour<Point2>>> = vec![vec![]; shells.len()];
        for hole in holes {
            let probe = Point2::new(
                (hole.points[0].x() + hole.points[1].x()) / 2.0,
                (hole.points[0].y() + hole.points[1].y()) / 2.0,
            );
            let owner = shells
                .iter()
                .enumerate()
                .filter(|(_, shell)| shell.winding_number(&probe) != 0)
                .min_by(|(_, x), (_, y)| x.area_signed().total_cmp(&y.area_signed()))
                .map(|(index, _)| index);
            match owner {
                Some(index) => assigned[index].push(hole),
                None => log::warn!("Overlay result hole is not inside any shell, it is dropped"),
            }
        }

        shells
            .into_iter()
            .zip(assigned)
            .map(|(shell, holes)| {
                let exterior = self.ring(&shell)?;
                let interiors = holes
                    .iter()
                    .map(|hole| self.ring(hole))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Surface::new(SurfaceBoundary::new_with(
                    exterior,
                    interiors,
                    self.precision,
                )?)
                .into())
            })
            .collect()
    }

    fn ring(&self, contour: &ClosedContour<Point2>) -> Result<Ring, GeometryError> {
        Ring::from_positions(contour.points.iter().map(|p| self.position(p)).collect())
    }

    fn lines(&self, edges: &[(usize, usize)]) -> Result<Vec<Primitive>, GeometryError> {
        let nodes = &self.arrangement.nodes;
        let mut incident: Vec<Vec<usize>> = vec![vec![]; nodes.len()];
        for (index, (from, to)) in edges.iter().enumerate() {
            incident[*from].push(index);
            incident[*to].push(index);
        }

        let mut used = vec![false; edges.len()];
        let mut paths: Vec<Vec<usize>> = vec![];
        let walk = |start_node: usize, first: usize, used: &mut Vec<bool>| {
            let mut path = vec![start_node];
            let mut node = start_node;
            let mut edge = first;
            loop {
                used[edge] = true;
                let (from, to) = edges[edge];
                node = if from == node { to } else { from };
                path.push(node);
                if incident[node].len() != 2 {
                    break;
                }
                match incident[node].iter().copied().find(|e| !used[*e]) {
                    Some(next) => edge = next,
                    None => break,
                }
            }
            path
        };

        for node in 0..nodes.len() {
            if incident[node].len() == 2 {
                continue;
            }
            for index in 0..incident[node].len() {
                let edge = incident[node][index];
                if !used[edge] {
                    paths.push(walk(node, edge, &mut used));
                }
            }
        }

        for edge in 0..edges.len() {
            if !used[edge] {
                paths.push(walk(edges[edge].0, edge, &mut used));
            }
        }

        paths
            .into_iter()
            .map(|path| {
                let positions = path.iter().map(|id| self.position(&nodes[*id].point)).collect();
                Ok(Curve::from_positions(positions)?.into())
            })
            .collect()
    }
}

/// Clockwise angle from `from` to `to` in `(0, TAU]`.
fn clockwise_turn(from: f64, to: f64) -> f64 {
    let turn = (from - to).rem_euclid(TAU);
    if turn <= 0.0 {
        TAU
    } else {
        turn
    }
}

/// Splits a closed walk that passes through some node more than once into simple loops. A hole touching its
/// shell at a single node is traced as one pinched walk.
fn split_at_repeated_nodes(ids: Vec<usize>) -> Vec<Vec<usize>> {
    let mut rings = vec![];
    let mut stack: Vec<usize> = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(index) = stack.iter().position(|&v| v == id) {
            rings.push(stack.split_off(index));
        }
        stack.push(id);
    }

    if !stack.is_empty() {
        rings.push(stack);
    }

    rings
}

fn remove_collinear(mut points: Vec<Point2>, precision: &Precision) -> Vec<Point2> {
    let mut index = 0;
    while points.len() > 3 && index < points.len() {
        let n = points.len();
        let prev = points[(index + n - 1) % n];
        let current = points[index];
        let next = points[(index + 1) % n];
        let base = next - prev;
        let offset = current - prev;
        let deviation = base.cross(&offset).abs();
        if deviation <= precision.epsilon() * base.magnitude() && offset.dot(&base) > 0.0 {
            points.remove(index);
            index = index.saturating_sub(1);
        } else {
            index += 1;
        }
    }

    points
}
