//! Planar arrangement of two geometries.
//!
//! Both geometries are noded together: all segments are split at their mutual intersections and at isolated
//! points, vertices closer than the tolerance are snapped to one node. Every node and edge of the resulting
//! arrangement is then labelled with its location relative to both inputs, and every edge additionally with
//! the membership of the areas on its left and right side.

use crate::cartesian::{CartesianPoint2d, Point2, Rect, Segment, SegmentIntersection};
use crate::operation::components::Components;
use crate::operation::relate::Location;
use crate::precision::Precision;
use ahash::{AHashMap, AHashSet};

/// Node of the arrangement.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub point: Point2,
    pub location: [Location; 2],
}

/// Edge of the arrangement between two nodes.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub from: usize,
    pub to: usize,
    pub location: [Location; 2],
    /// Whether the area of each input geometry is on the left of the edge.
    pub left: [bool; 2],
    /// Whether the area of each input geometry is on the right of the edge.
    pub right: [bool; 2],
}

#[derive(Debug, Default)]
pub(crate) struct Arrangement {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Vertex storage merging points that are within the tolerance from each other.
struct VertexPool {
    points: Vec<Point2>,
    grid: AHashMap<(i64, i64), Vec<usize>>,
    cell: f64,
    precision: Precision,
}

impl VertexPool {
    fn new(precision: &Precision) -> Self {
        let cell = if precision.epsilon() > 0.0 {
            precision.epsilon()
        } else {
            1.0
        };

        Self {
            points: vec![],
            grid: AHashMap::new(),
            cell,
            precision: *precision,
        }
    }

    fn key(&self, point: &Point2) -> (i64, i64) {
        (
            (point.x() / self.cell).floor() as i64,
            (point.y() / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, point: Point2) -> usize {
        let (kx, ky) = self.key(&point);
        let mut nearest: Option<(usize, f64)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(ids) = self
                    .grid
                    .get(&(kx.saturating_add(dx), ky.saturating_add(dy)))
                else {
                    continue;
                };

                for &id in ids {
                    let distance = self.points[id].distance_sq(&point);
                    if distance <= self.precision.epsilon_sq()
                        && nearest.map_or(true, |(_, d)| distance < d)
                    {
                        nearest = Some((id, distance));
                    }
                }
            }
        }

        if let Some((id, _)) = nearest {
            return id;
        }

        let id = self.points.len();
        self.points.push(point);
        self.grid.entry((kx, ky)).or_default().push(id);
        id
    }
}

impl Arrangement {
    pub fn build(a: &Components, b: &Components, precision: &Precision) -> Self {
        let mut pool = VertexPool::new(precision);
        let mut segments: Vec<(usize, usize)> = vec![];
        let mut isolated: Vec<usize> = vec![];
        let mut seen_segments = AHashSet::new();

        for components in [a, b] {
            for point in &components.points {
                isolated.push(pool.insert(*point));
            }

            for segment in components.segments() {
                let from = pool.insert(*segment.0);
                let to = pool.insert(*segment.1);
                if from != to && seen_segments.insert((from.min(to), from.max(to))) {
                    segments.push((from, to));
                }
            }
        }

        let envelopes: Vec<Rect> = segments
            .iter()
            .map(|&(from, to)| {
                Rect::from_point(&pool.points[from])
                    .merge(Rect::from_point(&pool.points[to]))
                    .expand(precision.epsilon())
            })
            .collect();

        let mut splits: Vec<Vec<usize>> = vec![vec![]; segments.len()];
        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                if !envelopes[i].intersects(&envelopes[j]) {
                    continue;
                }

                let (a0, a1) = (pool.points[segments[i].0], pool.points[segments[i].1]);
                let (b0, b1) = (pool.points[segments[j].0], pool.points[segments[j].1]);
                let crossing = match Segment(&a0, &a1).intersection(&Segment(&b0, &b1), precision) {
                    SegmentIntersection::None => continue,
                    SegmentIntersection::Point(p) => vec![p],
                    SegmentIntersection::Overlap(p, q) => vec![p, q],
                };

                for point in crossing {
                    let id = pool.insert(point);
                    splits[i].push(id);
                    splits[j].push(id);
                }
            }
        }

        for &id in &isolated {
            let point = pool.points[id];
            for (index, &(from, to)) in segments.iter().enumerate() {
                if envelopes[index].contains(&point)
                    && Segment(&pool.points[from], &pool.points[to]).contains_point(&point, precision)
                {
                    splits[index].push(id);
                }
            }
        }

        let mut edge_ends: Vec<(usize, usize)> = vec![];
        let mut seen_edges = AHashSet::new();
        for (index, &(from, to)) in segments.iter().enumerate() {
            let segment = Segment(&pool.points[from], &pool.points[to]);
            let mut inner: Vec<(f64, usize)> = splits[index]
                .iter()
                .filter(|&&id| id != from && id != to)
                .map(|&id| (segment.parameter(&pool.points[id]), id))
                .collect();
            inner.sort_by(|x, y| x.0.total_cmp(&y.0));
            inner.dedup_by_key(|v| v.1);

            let chain: Vec<usize> = std::iter::once(from)
                .chain(inner.into_iter().map(|(_, id)| id))
                .chain(std::iter::once(to))
                .collect();
            for pair in chain.windows(2) {
                let (s, e) = (pair[0], pair[1]);
                if s != e && seen_edges.insert((s.min(e), s.max(e))) {
                    edge_ends.push((s, e));
                }
            }
        }

        log::trace!(
            "Arrangement of {} segments has {} nodes and {} edges",
            segments.len(),
            pool.points.len(),
            edge_ends.len()
        );

        let mut arrangement = Self {
            nodes: pool
                .points
                .iter()
                .map(|p| Node {
                    point: *p,
                    location: [a.locate(p, precision), b.locate(p, precision)],
                })
                .collect(),
            edges: edge_ends
                .into_iter()
                .map(|(from, to)| {
                    let (p, q) = (&pool.points[from], &pool.points[to]);
                    let midpoint = Segment(p, q).midpoint();
                    let sides = [a.sides(p, q, precision), b.sides(p, q, precision)];
                    let mut location = [a.locate(&midpoint, precision), b.locate(&midpoint, precision)];
                    for (index, (left, right)) in sides.iter().enumerate() {
                        if *left && *right {
                            location[index] = Location::Interior;
                        }
                    }

                    Edge {
                        from,
                        to,
                        location,
                        left: [sides[0].0, sides[1].0],
                        right: [sides[0].1, sides[1].1],
                    }
                })
                .collect(),
        };

        arrangement.dissolve_inner_nodes();
        arrangement
    }

    /// Boundary nodes surrounded by the area of the same geometry on all sides lie in its interior. This happens
    /// where members of an aggregate or composite touch.
    fn dissolve_inner_nodes(&mut self) {
        let mut surrounded = vec![[true; 2]; self.nodes.len()];
        let mut has_edges = vec![false; self.nodes.len()];
        for edge in &self.edges {
            for node in [edge.from, edge.to] {
                has_edges[node] = true;
                for index in 0..2 {
                    surrounded[node][index] &= edge.left[index] && edge.right[index];
                }
            }
        }

        for (id, node) in self.nodes.iter_mut().enumerate() {
            for index in 0..2 {
                if has_edges[id] && surrounded[id][index] && node.location[index] == Location::Boundary {
                    node.location[index] = Location::Interior;
                }
            }
        }
    }
}
