use crate::cartesian::{
    CartesianPoint2d, ClosedContour, Contour, OpenContour, Point2, Segment, Winding,
};
use crate::geometry::Geometry;
use crate::operation::relate::Location;
use crate::precision::Precision;
use crate::primitive::{Curve, Primitive, Ring, Surface};

/// Horizontal projection of a surface with the exterior ring counterclockwise and holes clockwise, so the
/// interior is on the left of every ring segment.
#[derive(Debug, Clone)]
pub(crate) struct PlanarPolygon {
    pub shell: ClosedContour<Point2>,
    pub holes: Vec<ClosedContour<Point2>>,
}

impl PlanarPolygon {
    pub fn from_surface(surface: &Surface) -> Self {
        Self {
            shell: ring_contour(surface.exterior()).with_winding(Winding::CounterClockwise),
            holes: surface
                .interiors()
                .iter()
                .map(|ring| ring_contour(ring).with_winding(Winding::Clockwise))
                .collect(),
        }
    }

    pub fn rings(&self) -> impl Iterator<Item = &ClosedContour<Point2>> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }

    pub fn locate(&self, point: &Point2, precision: &Precision) -> Location {
        if self.rings().any(|ring| ring.is_on_border(point, precision)) {
            return Location::Boundary;
        }

        if self.shell.winding_number(point) != 0
            && self.holes.iter().all(|hole| hole.winding_number(point) == 0)
        {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    /// Whether the polygon interior is on the left and on the right of the edge `from -> to`.
    pub fn sides(&self, from: &Point2, to: &Point2, precision: &Precision) -> (bool, bool) {
        let midpoint = Segment(from, to).midpoint();
        let direction = *to - *from;
        for ring in self.rings() {
            for segment in ring.iter_segments() {
                let ring_direction = *segment.1 - *segment.0;
                if ring_direction.magnitude_sq() > 0.0 && segment.contains_point(&midpoint, precision) {
                    return if ring_direction.dot(&direction) > 0.0 {
                        (true, false)
                    } else {
                        (false, true)
                    };
                }
            }
        }

        let inside = self.locate(&midpoint, precision) == Location::Interior;
        (inside, inside)
    }
}

fn ring_contour(ring: &Ring) -> ClosedContour<Point2> {
    let mut contour = ring.contour();
    contour.points.dedup();
    if contour.points.len() > 1 && contour.points.first() == contour.points.last() {
        contour.points.pop();
    }
    contour
}

/// Horizontal projection of a geometry split into isolated points, polylines and polygons.
#[derive(Debug, Clone, Default)]
pub(crate) struct Components {
    pub points: Vec<Point2>,
    pub lines: Vec<OpenContour<Point2>>,
    pub polygons: Vec<PlanarPolygon>,
}

impl Components {
    pub fn new(geometry: &Geometry) -> Self {
        let mut components = Self::default();
        for primitive in geometry.clone().into_primitives() {
            match primitive {
                Primitive::Point(point) => components.points.push(point.position().to_point2()),
                Primitive::Curve(curve) => components.add_curve(&curve),
                Primitive::Surface(surface) => {
                    components.polygons.push(PlanarPolygon::from_surface(&surface))
                }
            }
        }

        components
    }

    fn add_curve(&mut self, curve: &Curve) {
        let mut points: Vec<Point2> = curve.positions().map(|p| p.to_point2()).collect();
        points.dedup();
        match points.len() {
            0 => {}
            1 => self.points.push(points[0]),
            _ => self.lines.push(OpenContour::new(points)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.polygons.is_empty()
    }

    /// All segments of lines and polygon rings.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_, Point2>> {
        self.lines
            .iter()
            .flat_map(|line| line.iter_segments())
            .chain(
                self.polygons
                    .iter()
                    .flat_map(|polygon| polygon.rings())
                    .flat_map(|ring| ring.iter_segments()),
            )
    }

    /// Location of the point relative to the polygons only.
    pub fn locate_area(&self, point: &Point2, precision: &Precision) -> Location {
        let mut location = Location::Exterior;
        for polygon in &self.polygons {
            match polygon.locate(point, precision) {
                Location::Interior => return Location::Interior,
                Location::Boundary => location = Location::Boundary,
                Location::Exterior => {}
            }
        }

        location
    }

    /// Location of the point relative to the whole geometry.
    ///
    /// Polygon interiors take precedence over polygon boundaries. Curve endpoints follow the mod-2 rule.
    pub fn locate(&self, point: &Point2, precision: &Precision) -> Location {
        let area = self.locate_area(point, precision);
        if area != Location::Exterior {
            return area;
        }

        let endpoints = self
            .lines
            .iter()
            .flat_map(|line| [line.points.first(), line.points.last()])
            .flatten()
            .filter(|p| p.distance_sq(point) <= precision.epsilon_sq())
            .count();
        if endpoints % 2 == 1 {
            return Location::Boundary;
        }

        let on_line = self.lines.iter().any(|line| {
            line.iter_segments()
                .any(|segment| segment.contains_point(point, precision))
        });
        if on_line || endpoints > 0 {
            return Location::Interior;
        }

        if self
            .points
            .iter()
            .any(|p| p.distance_sq(point) <= precision.epsilon_sq())
        {
            return Location::Interior;
        }

        Location::Exterior
    }

    /// Whether the area of the geometry is on the left and on the right of the edge `from -> to`.
    pub fn sides(&self, from: &Point2, to: &Point2, precision: &Precision) -> (bool, bool) {
        self.polygons
            .iter()
            .map(|polygon| polygon.sides(from, to, precision))
            .fold((false, false), |acc, sides| (acc.0 || sides.0, acc.1 || sides.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::wkt::parse_wkt;

    fn components(wkt: &str) -> Components {
        Components::new(&parse_wkt(wkt, &Crs::local_2d()).unwrap())
    }

    #[test]
    fn locate_in_polygon_with_hole() {
        let precision = Precision::default();
        let c = components("SURFACE((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 4 6, 6 6, 6 4, 4 4))");
        assert_eq!(c.locate(&Point2::new(1.0, 1.0), &precision), Location::Interior);
        assert_eq!(c.locate(&Point2::new(5.0, 5.0), &precision), Location::Exterior);
        assert_eq!(c.locate(&Point2::new(4.0, 5.0), &precision), Location::Boundary);
        assert_eq!(c.locate(&Point2::new(10.0, 5.0), &precision), Location::Boundary);
        assert_eq!(c.locate(&Point2::new(11.0, 5.0), &precision), Location::Exterior);
    }

    #[test]
    fn edge_sides() {
        let precision = Precision::default();
        let c = components("SURFACE((0 0, 10 0, 10 10, 0 10, 0 0))");
        assert_eq!(
            c.sides(&Point2::new(0.0, 0.0), &Point2::new(5.0, 0.0), &precision),
            (true, false)
        );
        assert_eq!(
            c.sides(&Point2::new(5.0, 0.0), &Point2::new(0.0, 0.0), &precision),
            (false, true)
        );
        assert_eq!(
            c.sides(&Point2::new(1.0, 1.0), &Point2::new(2.0, 2.0), &precision),
            (true, true)
        );
    }

    #[test]
    fn locate_on_lines() {
        let precision = Precision::default();
        let c = components("MULTICURVE((0 0, 2 0), (2 0, 2 2), (5 5, 6 6, 5 5))");
        assert_eq!(c.locate(&Point2::new(0.0, 0.0), &precision), Location::Boundary);
        assert_eq!(c.locate(&Point2::new(2.0, 0.0), &precision), Location::Interior);
        assert_eq!(c.locate(&Point2::new(1.0, 0.0), &precision), Location::Interior);
        assert_eq!(c.locate(&Point2::new(5.0, 5.0), &precision), Location::Interior);
        assert_eq!(c.locate(&Point2::new(1.0, 1.0), &precision), Location::Exterior);
    }
}
