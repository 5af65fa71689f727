//! The closed set of geometry kinds and the operations that dispatch over them.

use crate::aggregate::{Aggregate, MultiCurve, MultiPoint, MultiPrimitive, MultiSurface};
use crate::boundary::Boundary;
use crate::cartesian::{CartesianPoint2d, Rect};
use crate::composite::{CompositeCurve, CompositePoint, CompositeSurface};
use crate::crs::{CoordinateTransform, CrsAuthority, CrsRef};
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;
use crate::primitive::{Curve, Point, Primitive, Ring, Surface};
use ahash::AHashMap;

/// Any geometry of the crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Point.
    Point(Point),
    /// Curve.
    Curve(Curve),
    /// Surface.
    Surface(Surface),
    /// Set of points.
    MultiPoint(MultiPoint),
    /// Set of curves.
    MultiCurve(MultiCurve),
    /// Set of surfaces.
    MultiSurface(MultiSurface),
    /// Set of primitives of different dimensions.
    MultiPrimitive(MultiPrimitive),
    /// Composite point.
    CompositePoint(CompositePoint),
    /// Chain of curves.
    CompositeCurve(CompositeCurve),
    /// Complex of surfaces.
    CompositeSurface(CompositeSurface),
}

/// Kind of a [`Geometry`] without its data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Point.
    Point,
    /// Curve.
    Curve,
    /// Surface.
    Surface,
    /// Set of points.
    MultiPoint,
    /// Set of curves.
    MultiCurve,
    /// Set of surfaces.
    MultiSurface,
    /// Set of primitives of different dimensions.
    MultiPrimitive,
    /// Composite point.
    CompositePoint,
    /// Chain of curves.
    CompositeCurve,
    /// Complex of surfaces.
    CompositeSurface,
}

macro_rules! dispatch {
    ($value:expr, $bind:ident => $body:expr) => {
        match $value {
            Geometry::Point($bind) => $body,
            Geometry::Curve($bind) => $body,
            Geometry::Surface($bind) => $body,
            Geometry::MultiPoint($bind) => $body,
            Geometry::MultiCurve($bind) => $body,
            Geometry::MultiSurface($bind) => $body,
            Geometry::MultiPrimitive($bind) => $body,
            Geometry::CompositePoint($bind) => $body,
            Geometry::CompositeCurve($bind) => $body,
            Geometry::CompositeSurface($bind) => $body,
        }
    };
}

impl Geometry {
    /// Kind of the geometry.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::Curve(_) => GeometryKind::Curve,
            Geometry::Surface(_) => GeometryKind::Surface,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiCurve(_) => GeometryKind::MultiCurve,
            Geometry::MultiSurface(_) => GeometryKind::MultiSurface,
            Geometry::MultiPrimitive(_) => GeometryKind::MultiPrimitive,
            Geometry::CompositePoint(_) => GeometryKind::CompositePoint,
            Geometry::CompositeCurve(_) => GeometryKind::CompositeCurve,
            Geometry::CompositeSurface(_) => GeometryKind::CompositeSurface,
        }
    }

    /// Returns true if the geometry contains no points. Only aggregates can be empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::MultiPoint(v) => v.is_empty(),
            Geometry::MultiCurve(v) => v.is_empty(),
            Geometry::MultiSurface(v) => v.is_empty(),
            Geometry::MultiPrimitive(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Number of ordinates of the positions.
    pub fn coordinate_dimension(&self) -> usize {
        self.crs().dimension()
    }

    /// Bounding rectangle of the horizontal projection.
    pub fn envelope(&self) -> Result<Rect, GeometryError> {
        GeometryElement::envelope(self)
            .ok_or_else(|| GeometryError::DegenerateGeometry("envelope of an empty geometry".into()))
    }

    /// Minimum bounding region: the envelope as a surface. Requires a two-dimensional reference system.
    pub fn mb_region(&self) -> Result<Surface, GeometryError> {
        let crs = self.crs();
        if crs.dimension() != 2 {
            return Err(GeometryError::UnsupportedCombination(format!(
                "bounding region in {}-dimensional {crs}",
                crs.dimension()
            )));
        }

        let positions = self
            .envelope()?
            .into_quadrangle()
            .iter()
            .map(|p| Position::new(vec![p.x(), p.y()], crs.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Surface::from_rings(Ring::from_positions(positions)?, vec![])
    }

    /// Boundary of the geometry.
    ///
    /// Multi curves follow the mod-2 rule: a point is on the boundary if it is an endpoint of an odd number of
    /// member curves. The boundary of a multi surface consists of the rings of all the members.
    pub fn boundary(&self) -> Result<Boundary, GeometryError> {
        Ok(match self {
            Geometry::Point(v) => v.boundary(),
            Geometry::Curve(v) => v.boundary(),
            Geometry::Surface(v) => Boundary::Surface(v.boundary().clone()),
            Geometry::MultiPoint(v) => Boundary::Empty(v.crs().clone()),
            Geometry::MultiCurve(v) => mod2_boundary(v)?,
            Geometry::MultiSurface(v) => {
                let rings: Vec<Ring> = v
                    .iter()
                    .flat_map(|surface| surface.boundary().rings().cloned())
                    .collect();
                if rings.is_empty() {
                    Boundary::Empty(v.crs().clone())
                } else {
                    Boundary::Rings(rings)
                }
            }
            Geometry::MultiPrimitive(v) => {
                let mut parts = vec![];
                for member in v {
                    let boundary = Geometry::from(member.clone()).boundary()?;
                    if !boundary.is_empty() {
                        parts.push(boundary);
                    }
                }
                if parts.is_empty() {
                    Boundary::Empty(v.crs().clone())
                } else {
                    Boundary::Mixed(parts)
                }
            }
            Geometry::CompositePoint(v) => v.boundary(),
            Geometry::CompositeCurve(v) => v.boundary(),
            Geometry::CompositeSurface(v) => v.boundary()?,
        })
    }

    /// Returns true if the boundary of the geometry is empty.
    pub fn is_cycle(&self) -> Result<bool, GeometryError> {
        Ok(self.boundary()?.is_empty())
    }

    /// Point guaranteed to lie on the geometry.
    pub fn representative_point(&self) -> Result<Point, GeometryError> {
        match self {
            Geometry::Point(v) => Ok(v.clone()),
            Geometry::Curve(v) => v.representative_point(),
            Geometry::Surface(v) => v.representative_point(),
            Geometry::CompositePoint(v) => Ok(v.point().clone()),
            Geometry::CompositeCurve(v) => v.as_curve()?.representative_point(),
            _ => {
                let primitives = self.clone().into_primitives();
                let top = primitives
                    .iter()
                    .max_by_key(|p| p.dimension())
                    .ok_or_else(|| {
                        GeometryError::DegenerateGeometry(
                            "representative point of an empty geometry".into(),
                        )
                    })?;
                Geometry::from(top.clone()).representative_point()
            }
        }
    }

    /// Splits the geometry into its primitives. Composite curves are kept as separate member curves.
    pub fn into_primitives(self) -> Vec<Primitive> {
        match self {
            Geometry::Point(v) => vec![v.into()],
            Geometry::Curve(v) => vec![v.into()],
            Geometry::Surface(v) => vec![v.into()],
            Geometry::MultiPoint(v) => v.into_members().into_iter().map(Primitive::from).collect(),
            Geometry::MultiCurve(v) => v.into_members().into_iter().map(Primitive::from).collect(),
            Geometry::MultiSurface(v) => v.into_members().into_iter().map(Primitive::from).collect(),
            Geometry::MultiPrimitive(v) => v.into_members(),
            Geometry::CompositePoint(v) => v.into_members().into_iter().map(Primitive::from).collect(),
            Geometry::CompositeCurve(v) => v.into_members().into_iter().map(Primitive::from).collect(),
            Geometry::CompositeSurface(v) => v.into_members().into_iter().map(Primitive::from).collect(),
        }
    }

    /// Builds the simplest geometry holding the given primitives: a single primitive, a homogeneous aggregate or
    /// a [`MultiPrimitive`]. No primitives give an empty multi primitive.
    pub fn from_primitives(crs: &CrsRef, mut primitives: Vec<Primitive>) -> Result<Self, GeometryError> {
        if primitives.len() == 1 {
            if let Some(primitive) = primitives.pop() {
                return Ok(primitive.into());
            }
        }

        let dimensions: Vec<Dimension> = primitives.iter().map(|p| p.dimension()).collect();
        let homogeneous = dimensions.windows(2).all(|pair| pair[0] == pair[1]);
        if primitives.is_empty() || !homogeneous {
            return Ok(Geometry::MultiPrimitive(Aggregate::new(crs.clone(), primitives)?));
        }

        Ok(match dimensions[0] {
            Dimension::Point => Geometry::MultiPoint(Aggregate::new(
                crs.clone(),
                primitives
                    .into_iter()
                    .filter_map(|p| match p {
                        Primitive::Point(v) => Some(v),
                        _ => None,
                    })
                    .collect(),
            )?),
            Dimension::Curve => Geometry::MultiCurve(Aggregate::new(
                crs.clone(),
                primitives
                    .into_iter()
                    .filter_map(|p| match p {
                        Primitive::Curve(v) => Some(v),
                        _ => None,
                    })
                    .collect(),
            )?),
            _ => Geometry::MultiSurface(Aggregate::new(
                crs.clone(),
                primitives
                    .into_iter()
                    .filter_map(|p| match p {
                        Primitive::Surface(v) => Some(v),
                        _ => None,
                    })
                    .collect(),
            )?),
        })
    }

    /// Transforms the geometry into the `target` system using a transform found by the `authority`.
    pub fn transform(
        &self,
        target: &CrsRef,
        authority: &impl CrsAuthority,
    ) -> Result<Geometry, GeometryError> {
        let transform = authority.find_transform(self.crs(), target)?;
        self.transform_with(transform.as_ref(), target)
    }

    /// Applies the transform to every position of the geometry and rebuilds it in the `target` system.
    ///
    /// An identity transform between equal systems returns a copy of the geometry without visiting its positions.
    pub fn transform_with(
        &self,
        transform: &dyn CoordinateTransform,
        target: &CrsRef,
    ) -> Result<Geometry, GeometryError> {
        if transform.is_identity() && **self.crs() == **target {
            log::debug!(
                "Identity transform from {} to {target}, geometry is copied",
                self.crs()
            );
            return Ok(self.clone());
        }

        self.try_map_positions(target, &mut |p| p.transform(transform, target))
    }
}

fn mod2_boundary(curves: &MultiCurve) -> Result<Boundary, GeometryError> {
    let mut counts: AHashMap<Vec<u64>, (usize, Position)> = AHashMap::new();
    let mut order = vec![];
    for curve in curves {
        for endpoint in [curve.start(), curve.end()] {
            let key: Vec<u64> = endpoint.ordinates().iter().map(|v| v.to_bits()).collect();
            let entry = counts.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (0, endpoint.clone())
            });
            entry.0 += 1;
        }
    }

    let points: Vec<Point> = order
        .iter()
        .filter_map(|key| counts.get(key))
        .filter(|(count, _)| count % 2 == 1)
        .map(|(_, position)| Point::new(position.clone()))
        .collect();

    if points.is_empty() {
        Ok(Boundary::Empty(curves.crs().clone()))
    } else {
        Ok(Boundary::Points(MultiPoint::new(curves.crs().clone(), points)?))
    }
}

impl GeometryElement for Geometry {
    fn crs(&self) -> &CrsRef {
        dispatch!(self, v => v.crs())
    }

    fn dimension(&self) -> Dimension {
        dispatch!(self, v => v.dimension())
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        let boxed: Box<dyn Iterator<Item = &Position> + '_> =
            dispatch!(self, v => Box::new(GeometryElement::positions(v)));
        boxed
    }

    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        Ok(match self {
            Geometry::Point(v) => Geometry::Point(v.try_map_positions(crs, f)?),
            Geometry::Curve(v) => Geometry::Curve(v.try_map_positions(crs, f)?),
            Geometry::Surface(v) => Geometry::Surface(v.try_map_positions(crs, f)?),
            Geometry::MultiPoint(v) => Geometry::MultiPoint(v.try_map_positions(crs, f)?),
            Geometry::MultiCurve(v) => Geometry::MultiCurve(v.try_map_positions(crs, f)?),
            Geometry::MultiSurface(v) => Geometry::MultiSurface(v.try_map_positions(crs, f)?),
            Geometry::MultiPrimitive(v) => Geometry::MultiPrimitive(v.try_map_positions(crs, f)?),
            Geometry::CompositePoint(v) => Geometry::CompositePoint(v.try_map_positions(crs, f)?),
            Geometry::CompositeCurve(v) => Geometry::CompositeCurve(v.try_map_positions(crs, f)?),
            Geometry::CompositeSurface(v) => {
                Geometry::CompositeSurface(v.try_map_positions(crs, f)?)
            }
        })
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Geometry::$variant(value)
                }
            }
        )*
    };
}

impl_from!(
    Point,
    Curve,
    Surface,
    MultiPoint,
    MultiCurve,
    MultiSurface,
    MultiPrimitive,
    CompositePoint,
    CompositeCurve,
    CompositeSurface
);

impl From<Primitive> for Geometry {
    fn from(value: Primitive) -> Self {
        match value {
            Primitive::Point(v) => Geometry::Point(v),
            Primitive::Curve(v) => Geometry::Curve(v),
            Primitive::Surface(v) => Geometry::Surface(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{AffineTransform, Crs, DefaultAuthority};
    use assert_matches::assert_matches;

    fn curve(coords: &[[f64; 2]]) -> Curve {
        Curve::from_positions(
            coords
                .iter()
                .map(|c| Position::from_slice(c, &Crs::local_2d()).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn multi_curve_mod2_boundary() {
        let crs = Crs::local_2d();
        let multi = MultiCurve::new(
            crs,
            vec![
                curve(&[[0.0, 0.0], [1.0, 0.0]]),
                curve(&[[1.0, 0.0], [2.0, 0.0]]),
                curve(&[[1.0, 0.0], [1.0, 1.0]]),
            ],
        )
        .unwrap();

        let Boundary::Points(points) = Geometry::from(multi).boundary().unwrap() else {
            panic!("multi curve boundary must be points");
        };
        let coords: Vec<&[f64]> = points.iter().map(|p| p.position().ordinates()).collect();
        assert_eq!(
            coords,
            vec![&[0.0, 0.0][..], &[1.0, 0.0][..], &[2.0, 0.0][..], &[1.0, 1.0][..]]
        );
    }

    #[test]
    fn closed_curve_is_cycle() {
        let closed = Geometry::from(curve(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]));
        assert!(closed.is_cycle().unwrap());
        let open = Geometry::from(curve(&[[0.0, 0.0], [1.0, 0.0]]));
        assert!(!open.is_cycle().unwrap());
    }

    #[test]
    fn from_primitives() {
        let crs = Crs::local_2d();
        let a = curve(&[[0.0, 0.0], [1.0, 0.0]]);
        let b = curve(&[[0.0, 1.0], [1.0, 1.0]]);
        let p = Point::new(Position::from_slice(&[5.0, 5.0], &crs).unwrap());

        assert_eq!(
            Geometry::from_primitives(&crs, vec![a.clone().into()]).unwrap().kind(),
            GeometryKind::Curve
        );
        assert_eq!(
            Geometry::from_primitives(&crs, vec![a.clone().into(), b.into()]).unwrap().kind(),
            GeometryKind::MultiCurve
        );
        assert_eq!(
            Geometry::from_primitives(&crs, vec![a.into(), p.into()]).unwrap().kind(),
            GeometryKind::MultiPrimitive
        );
        assert!(Geometry::from_primitives(&crs, vec![]).unwrap().is_empty());
    }

    #[test]
    fn envelope_and_region() {
        let g = Geometry::from(curve(&[[0.0, 0.0], [3.0, 1.0], [1.0, 2.0]]));
        let envelope = g.envelope().unwrap();
        assert_eq!(envelope, Rect::new(0.0, 0.0, 3.0, 2.0));
        assert_eq!(g.mb_region().unwrap().area(), 6.0);

        let empty = Geometry::from(MultiPoint::empty(Crs::local_2d()));
        assert_matches!(empty.envelope(), Err(GeometryError::DegenerateGeometry(_)));
    }

    #[test]
    fn transform_with_identity_keeps_value() {
        let g = Geometry::from(curve(&[[0.0, 0.0], [3.0, 1.0]]));
        let authority = DefaultAuthority::new();
        let target = authority.register(Crs::engineering("LOCAL:OTHER", 2));
        let same = g.transform(&target, &authority).unwrap();
        assert_eq!(same, g);

        let moved = g
            .transform_with(&AffineTransform::translation(1.0, 1.0), &target)
            .unwrap();
        assert_ne!(moved, g);
        assert_eq!(moved.envelope().unwrap(), Rect::new(1.0, 1.0, 4.0, 2.0));
    }
}
