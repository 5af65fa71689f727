//! Dimensionally extended nine-intersection model.

use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::operation::components::Components;
use crate::operation::overlay::Arrangement;
use crate::precision::Precision;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Topological location of a point relative to a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Interior of the geometry.
    Interior,
    /// Boundary of the geometry.
    Boundary,
    /// Everything outside the closure of the geometry.
    Exterior,
}

impl Location {
    const ALL: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

    fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }
}

/// 3x3 matrix of intersection dimensions between the interior, boundary and exterior of two geometries.
///
/// Rows correspond to the first geometry, columns to the second.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntersectionMatrix {
    cells: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    /// Matrix with all cells empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimension of the intersection of the given parts of the two geometries.
    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.cells[a.index()][b.index()]
    }

    /// Sets the dimension of a cell.
    pub fn set(&mut self, a: Location, b: Location, dimension: Dimension) {
        self.cells[a.index()][b.index()] = dimension;
    }

    /// Raises the dimension of a cell if the given dimension is higher than the current one.
    pub fn set_at_least(&mut self, a: Location, b: Location, dimension: Dimension) {
        let cell = &mut self.cells[a.index()][b.index()];
        if dimension > *cell {
            *cell = dimension;
        }
    }

    /// Matrix of the relation with the geometries swapped.
    pub fn transpose(&self) -> Self {
        let mut transposed = Self::new();
        for a in Location::ALL {
            for b in Location::ALL {
                transposed.set(b, a, self.get(a, b));
            }
        }

        transposed
    }

    /// Checks the matrix against a 9-character pattern.
    ///
    /// Pattern characters are `T` (non-empty), `F` (empty), `*` (anything) or an exact dimension `0`, `1`, `2`.
    pub fn matches(&self, pattern: &str) -> Result<bool, GeometryError> {
        let symbols: Vec<char> = pattern.chars().collect();
        if symbols.len() != 9 {
            return Err(GeometryError::MalformedInput(format!(
                "intersection pattern must have 9 characters, got '{pattern}'"
            )));
        }

        let mut result = true;
        for (index, symbol) in symbols.into_iter().enumerate() {
            let actual = self.cells[index / 3][index % 3];
            let matches = match symbol.to_ascii_uppercase() {
                '*' => true,
                'T' => actual != Dimension::Empty,
                'F' => actual == Dimension::Empty,
                '0' => actual == Dimension::Point,
                '1' => actual == Dimension::Curve,
                '2' => actual == Dimension::Surface,
                other => {
                    return Err(GeometryError::MalformedInput(format!(
                        "invalid intersection pattern symbol '{other}'"
                    )))
                }
            };
            result &= matches;
        }

        Ok(result)
    }

    fn is(&self, pattern: &str) -> bool {
        self.matches(pattern).unwrap_or(false)
    }

    /// The geometries are topologically equal.
    pub fn is_equals(&self) -> bool {
        self.is("T*F**FFF*")
    }

    /// The geometries have no common points.
    pub fn is_disjoint(&self) -> bool {
        self.is("FF*FF****")
    }

    /// The geometries have at least one common point.
    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    /// The first geometry lies in the second one and their interiors intersect.
    pub fn is_within(&self) -> bool {
        self.is("T*F**F***")
    }

    /// The second geometry lies in the first one and their interiors intersect.
    pub fn is_contains(&self) -> bool {
        self.is("T*****FF*")
    }

    /// The geometries have common points, but their interiors do not intersect.
    pub fn is_touches(&self, a: Dimension, b: Dimension) -> bool {
        if a == Dimension::Point && b == Dimension::Point {
            return false;
        }

        self.is("FT*******") || self.is("F**T*****") || self.is("F***T****")
    }

    /// The geometries of the same dimension share some but not all interior points.
    pub fn is_overlaps(&self, a: Dimension, b: Dimension) -> bool {
        if a != b || a == Dimension::Empty {
            return false;
        }

        if a == Dimension::Curve {
            self.is("1*T***T**")
        } else {
            self.is("T*T***T**")
        }
    }

    /// The interiors intersect in a set of lower dimension than the higher of the two geometries.
    pub fn is_crosses(&self, a: Dimension, b: Dimension) -> bool {
        if a == Dimension::Empty || b == Dimension::Empty {
            return false;
        }

        if a < b {
            self.is("T*T******")
        } else if a > b {
            self.is("T*****T**")
        } else if a == Dimension::Curve {
            self.is("0********")
        } else {
            false
        }
    }
}

impl Display for IntersectionMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }

        Ok(())
    }
}

impl FromStr for IntersectionMatrix {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols: Vec<char> = s.trim().chars().collect();
        if symbols.len() != 9 {
            return Err(GeometryError::MalformedInput(format!(
                "intersection matrix must have 9 cells, got '{s}'"
            )));
        }

        let mut matrix = Self::new();
        for (index, symbol) in symbols.into_iter().enumerate() {
            let Some(dimension) = Dimension::from_symbol(symbol) else {
                return Err(GeometryError::MalformedInput(format!(
                    "invalid intersection matrix cell '{symbol}'"
                )));
            };
            matrix.cells[index / 3][index % 3] = dimension;
        }

        Ok(matrix)
    }
}

pub(crate) fn relate_components(
    a: &Components,
    b: &Components,
    precision: &Precision,
) -> IntersectionMatrix {
    let arrangement = Arrangement::build(a, b, precision);
    let mut matrix = IntersectionMatrix::new();
    matrix.set(Location::Exterior, Location::Exterior, Dimension::Surface);

    for node in &arrangement.nodes {
        matrix.set_at_least(node.location[0], node.location[1], Dimension::Point);
    }

    let area_location = |inside: bool| {
        if inside {
            Location::Interior
        } else {
            Location::Exterior
        }
    };
    for edge in &arrangement.edges {
        matrix.set_at_least(edge.location[0], edge.location[1], Dimension::Curve);
        for side in [edge.left, edge.right] {
            matrix.set_at_least(area_location(side[0]), area_location(side[1]), Dimension::Surface);
        }
    }

    matrix
}

pub(crate) fn check_same_crs(a: &Geometry, b: &Geometry) -> Result<(), GeometryError> {
    if **a.crs() != **b.crs() {
        return Err(GeometryError::CrsMismatch(
            a.crs().code().to_string(),
            b.crs().code().to_string(),
        ));
    }

    Ok(())
}

impl Geometry {
    /// Computes the intersection matrix of the two geometries with the default precision.
    pub fn relate(&self, other: &Geometry) -> Result<IntersectionMatrix, GeometryError> {
        self.relate_with(other, &Precision::default())
    }

    /// Computes the intersection matrix of the two geometries.
    ///
    /// Both geometries must be in the same reference system. Only the horizontal projection is considered.
    pub fn relate_with(
        &self,
        other: &Geometry,
        precision: &Precision,
    ) -> Result<IntersectionMatrix, GeometryError> {
        check_same_crs(self, other)?;
        let matrix = relate_components(&Components::new(self), &Components::new(other), precision);
        log::trace!("Relate {:?} to {:?}: {matrix}", self.kind(), other.kind());
        Ok(matrix)
    }

    /// Checks the relation of the geometries against an intersection pattern.
    pub fn relate_pattern(&self, other: &Geometry, pattern: &str) -> Result<bool, GeometryError> {
        self.relate(other)?.matches(pattern)
    }

    /// The geometries are topologically equal.
    pub fn equals(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self.relate(other)?.is_equals())
    }

    /// The geometries have no common points.
    pub fn disjoint(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self.relate(other)?.is_disjoint())
    }

    /// The geometries have at least one common point.
    pub fn intersects(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self.relate(other)?.is_intersects())
    }

    /// The geometries touch only at their boundaries.
    pub fn touches(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self
            .relate(other)?
            .is_touches(self.dimension(), other.dimension()))
    }

    /// The geometries of the same dimension share some interior points, but neither contains the other.
    pub fn overlaps(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self
            .relate(other)?
            .is_overlaps(self.dimension(), other.dimension()))
    }

    /// The other geometry lies in this one.
    pub fn contains(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self.relate(other)?.is_contains())
    }

    /// This geometry lies in the other one.
    pub fn within(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self.relate(other)?.is_within())
    }

    /// The geometries cross each other.
    pub fn crosses(&self, other: &Geometry) -> Result<bool, GeometryError> {
        Ok(self
            .relate(other)?
            .is_crosses(self.dimension(), other.dimension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::wkt::parse_wkt;
    use assert_matches::assert_matches;

    fn geometry(wkt: &str) -> Geometry {
        parse_wkt(wkt, &Crs::local_2d()).unwrap()
    }

    fn relate(a: &str, b: &str) -> String {
        geometry(a).relate(&geometry(b)).unwrap().to_string()
    }

    #[test]
    fn matrix_parsing() {
        let matrix: IntersectionMatrix = "212101212".parse().unwrap();
        assert_eq!(matrix.get(Location::Interior, Location::Boundary), Dimension::Curve);
        assert_eq!(matrix.get(Location::Boundary, Location::Boundary), Dimension::Point);
        assert_eq!(matrix.to_string(), "212101212");
        assert_eq!(
            "FF*FF****".parse::<IntersectionMatrix>().unwrap_err(),
            GeometryError::MalformedInput("invalid intersection matrix cell '*'".into())
        );
        assert!(matrix.matches("T*T***T**").unwrap());
        assert_matches!(matrix.matches("T*T"), Err(GeometryError::MalformedInput(_)));
        assert_matches!(matrix.matches("X********"), Err(GeometryError::MalformedInput(_)));
    }

    #[test]
    fn transpose() {
        let matrix: IntersectionMatrix = "101FF0212".parse().unwrap();
        assert_eq!(matrix.transpose().to_string(), "1F20F1102");
        assert_eq!(matrix.transpose().transpose(), matrix);
    }

    #[test]
    fn overlapping_polygons() {
        assert_eq!(
            relate(
                "SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))",
                "SURFACE((1 1, 3 1, 3 3, 1 3, 1 1))"
            ),
            "212101212"
        );
    }

    #[test]
    fn adjacent_polygons() {
        let a = geometry("SURFACE((0 0, 1 0, 1 1, 0 1, 0 0))");
        let b = geometry("SURFACE((1 0, 2 0, 2 1, 1 1, 1 0))");
        assert_eq!(a.relate(&b).unwrap().to_string(), "FF2F11212");
        assert!(a.touches(&b).unwrap());
        assert!(!a.overlaps(&b).unwrap());
        assert!(a.intersects(&b).unwrap());
    }

    #[test]
    fn point_in_polygon() {
        let polygon = geometry("SURFACE((0 0, 4 0, 4 4, 0 4, 0 0))");
        let inner = geometry("POINT(1 1)");
        let border = geometry("POINT(4 2)");
        let outer = geometry("POINT(5 5)");

        assert_eq!(inner.relate(&polygon).unwrap().to_string(), "0FFFFF212");
        assert!(inner.within(&polygon).unwrap());
        assert!(polygon.contains(&inner).unwrap());
        assert!(border.touches(&polygon).unwrap());
        assert!(!border.within(&polygon).unwrap());
        assert!(outer.disjoint(&polygon).unwrap());
    }

    #[test]
    fn crossing_lines() {
        let a = geometry("CURVE(0 0, 2 2)");
        let b = geometry("CURVE(0 2, 2 0)");
        assert_eq!(a.relate(&b).unwrap().to_string(), "0F1FF0102");
        assert!(a.crosses(&b).unwrap());
        assert!(!a.touches(&b).unwrap());
    }

    #[test]
    fn line_through_polygon() {
        let line = geometry("CURVE(-1 1, 3 1)");
        let polygon = geometry("SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))");
        assert_eq!(line.relate(&polygon).unwrap().to_string(), "101FF0212");
        assert!(line.crosses(&polygon).unwrap());
        assert!(polygon.crosses(&line).unwrap());
    }

    #[test]
    fn self_relation() {
        for wkt in [
            "POINT(1 2)",
            "CURVE(0 0, 1 1, 2 0)",
            "SURFACE((0 0, 2 0, 2 2, 0 2, 0 0))",
            "MULTIPOINT((0 0), (1 1))",
        ] {
            let g = geometry(wkt);
            assert!(g.equals(&g).unwrap(), "{wkt}");
            assert!(g.within(&g).unwrap(), "{wkt}");
            assert!(g.contains(&g).unwrap(), "{wkt}");
            assert!(g.intersects(&g).unwrap(), "{wkt}");
            assert!(!g.disjoint(&g).unwrap(), "{wkt}");
            assert!(!g.touches(&g).unwrap(), "{wkt}");
            assert!(!g.overlaps(&g).unwrap(), "{wkt}");
            assert!(!g.crosses(&g).unwrap(), "{wkt}");
        }
    }

    #[test]
    fn crs_mismatch() {
        let a = geometry("POINT(0 0)");
        let b = parse_wkt("POINT(0 0)", &Crs::wgs84()).unwrap();
        assert_matches!(a.relate(&b), Err(GeometryError::CrsMismatch(_, _)));
    }
}
