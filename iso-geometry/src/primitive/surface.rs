use crate::cartesian::{CartesianPoint2d, ClosedContour, Point2, Rect};
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;
use crate::precision::Precision;
use crate::primitive::{Point, Ring};

/// Boundary of a surface: one exterior ring and any number of interior rings (holes).
///
/// On construction every hole is checked to lie inside the exterior ring, and no hole may lie inside another
/// hole. Holes are allowed to touch the exterior ring or each other, such surfaces are reported as not simple.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBoundary {
    exterior: Ring,
    interiors: Vec<Ring>,
}

impl SurfaceBoundary {
    /// Creates a new surface boundary using the default precision for the containment checks.
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Result<Self, GeometryError> {
        Self::new_with(exterior, interiors, &Precision::default())
    }

    /// Creates a new surface boundary.
    pub fn new_with(
        exterior: Ring,
        interiors: Vec<Ring>,
        precision: &Precision,
    ) -> Result<Self, GeometryError> {
        for ring in &interiors {
            if !ring.curve().start().same_crs(exterior.curve().start()) {
                return Err(GeometryError::CrsMismatch(
                    exterior.crs().code().to_string(),
                    ring.crs().code().to_string(),
                ));
            }
        }

        let shell = exterior.contour();
        let holes: Vec<ClosedContour<Point2>> = interiors.iter().map(Ring::contour).collect();
        for (index, hole) in holes.iter().enumerate() {
            for point in &hole.points {
                if !shell.is_on_border(point, precision) && shell.winding_number(point) == 0 {
                    log::debug!("Rejecting surface: hole {index} vertex {point:?} is outside of the exterior ring");
                    return Err(GeometryError::MalformedInput(format!(
                        "interior ring {index} is not inside the exterior ring"
                    )));
                }

                for (other_index, other) in holes.iter().enumerate() {
                    if other_index != index
                        && !other.is_on_border(point, precision)
                        && other.winding_number(point) != 0
                    {
                        return Err(GeometryError::MalformedInput(format!(
                            "interior ring {index} overlaps interior ring {other_index}"
                        )));
                    }
                }
            }
        }

        Ok(Self {
            exterior,
            interiors,
        })
    }

    /// Exterior ring.
    pub fn exterior(&self) -> &Ring {
        &self.exterior
    }

    /// Interior rings.
    pub fn interiors(&self) -> &[Ring] {
        &self.interiors
    }

    /// Iterates over the exterior ring followed by the interior rings.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }

    /// A surface boundary is a closed complex, its closure is itself.
    pub fn closure(&self) -> &Self {
        self
    }

    /// Length weighted centroid of all the rings.
    pub fn centroid(&self) -> Result<Point, GeometryError> {
        let mut sums = vec![0.0; self.crs().dimension()];
        let mut total = 0.0;
        for ring in self.rings() {
            let (ring_sums, length) = ring.curve().centroid_moments();
            for (sum, v) in sums.iter_mut().zip(ring_sums) {
                *sum += v;
            }
            total += length;
        }

        if total <= 0.0 {
            return Err(GeometryError::DegenerateGeometry(
                "centroid of a zero-length boundary".into(),
            ));
        }

        Ok(Point::new(Position::from_parts_unchecked(
            sums.into_iter().map(|v| v / total).collect(),
            self.crs().clone(),
        )))
    }
}

impl GeometryElement for SurfaceBoundary {
    fn crs(&self) -> &CrsRef {
        self.exterior.crs()
    }

    fn dimension(&self) -> Dimension {
        Dimension::Curve
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        self.rings().flat_map(|ring| ring.positions())
    }

    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        let exterior = self.exterior.try_map_positions(crs, f)?;
        let interiors = self
            .interiors
            .iter()
            .map(|ring| ring.try_map_positions(crs, f))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(exterior, interiors)
    }
}

/// Two-dimensional primitive: a planar region bounded by rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    boundary: SurfaceBoundary,
}

impl Surface {
    /// Creates a surface with the given boundary.
    pub fn new(boundary: SurfaceBoundary) -> Self {
        Self { boundary }
    }

    /// Creates a surface from the exterior and interior rings.
    pub fn from_rings(exterior: Ring, interiors: Vec<Ring>) -> Result<Self, GeometryError> {
        Ok(Self::new(SurfaceBoundary::new(exterior, interiors)?))
    }

    /// Boundary of the surface.
    pub fn boundary(&self) -> &SurfaceBoundary {
        &self.boundary
    }

    /// Exterior ring.
    pub fn exterior(&self) -> &Ring {
        self.boundary.exterior()
    }

    /// Interior rings.
    pub fn interiors(&self) -> &[Ring] {
        self.boundary.interiors()
    }

    /// Area of the horizontal projection: the area of the exterior ring minus the areas of the holes.
    pub fn area(&self) -> f64 {
        self.exterior().area() - self.interiors().iter().map(Ring::area).sum::<f64>()
    }

    /// Total length of all the boundary rings.
    pub fn perimeter(&self) -> f64 {
        self.boundary.rings().map(Ring::length).sum()
    }

    /// Area weighted centroid.
    ///
    /// Horizontal ordinates are computed from the area moments of the exterior ring with the moments of the holes
    /// subtracted. Any further ordinates are averaged over the exterior ring vertices.
    pub fn centroid(&self) -> Result<Point, GeometryError> {
        let (area, mx, my) = self.oriented_moments();
        let perimeter = self.perimeter();
        if area.is_nan() || area <= 1e-12 * perimeter * perimeter {
            return Err(GeometryError::DegenerateGeometry(
                "centroid of a zero-area surface".into(),
            ));
        }

        Ok(Point::new(self.planar_position(mx / area, my / area)))
    }

    /// Signed area moments with the exterior counted positively and the holes negatively.
    pub(crate) fn oriented_moments(&self) -> (f64, f64, f64) {
        let (a, mx, my) = self.exterior().moments();
        let sign = if a < 0.0 { -1.0 } else { 1.0 };
        let (mut area, mut mx, mut my) = (a * sign, mx * sign, my * sign);

        for hole in self.interiors() {
            let (a, hx, hy) = hole.moments();
            let sign = if a < 0.0 { -1.0 } else { 1.0 };
            area -= a * sign;
            mx -= hx * sign;
            my -= hy * sign;
        }

        (area, mx, my)
    }

    /// Point guaranteed to lie in the interior of the surface.
    ///
    /// The widest interior interval of the horizontal line through the middle of the envelope is taken.
    pub fn representative_point(&self) -> Result<Point, GeometryError> {
        let Some(envelope) = self.envelope() else {
            return self.centroid();
        };

        let y = (envelope.y_min() + envelope.y_max()) / 2.0;
        let mut crossings = vec![];
        for ring in self.boundary.rings() {
            let points: Vec<Point2> = ring.positions().map(|p| p.to_point2()).collect();
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if (a.y() <= y && b.y() > y) || (b.y() <= y && a.y() > y) {
                    crossings.push(a.x() + (y - a.y()) / (b.y() - a.y()) * (b.x() - a.x()));
                }
            }
        }

        crossings.sort_by(f64::total_cmp);
        let best = crossings
            .chunks_exact(2)
            .max_by(|a, b| (a[1] - a[0]).total_cmp(&(b[1] - b[0])));

        match best {
            Some(interval) if interval[1] > interval[0] => Ok(Point::new(
                self.planar_position((interval[0] + interval[1]) / 2.0, y),
            )),
            _ => self.centroid(),
        }
    }

    fn planar_position(&self, x: f64, y: f64) -> Position {
        let crs = self.crs();
        let mut ordinates = vec![x, y];
        if crs.dimension() > 2 {
            let mut positions: Vec<&Position> = self.exterior().positions().collect();
            positions.pop();
            let count = positions.len() as f64;
            for index in 2..crs.dimension() {
                let sum: f64 = positions
                    .iter()
                    .map(|p| p.ordinates().get(index).copied().unwrap_or_default())
                    .sum();
                ordinates.push(sum / count);
            }
        }
        ordinates.truncate(crs.dimension());

        Position::from_parts_unchecked(ordinates, crs.clone())
    }
}

impl GeometryElement for Surface {
    fn crs(&self) -> &CrsRef {
        self.boundary.crs()
    }

    fn dimension(&self) -> Dimension {
        Dimension::Surface
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        self.boundary.positions()
    }

    fn envelope(&self) -> Option<Rect> {
        Rect::from_points(self.exterior().positions())
    }

    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        Ok(Self::new(self.boundary.try_map_positions(crs, f)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn ring(coords: &[[f64; 2]]) -> Ring {
        Ring::from_positions(
            coords
                .iter()
                .map(|c| Position::from_slice(c, &Crs::local_2d()).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn square(x: f64, y: f64, size: f64) -> Ring {
        ring(&[[x, y], [x + size, y], [x + size, y + size], [x, y + size]])
    }

    #[test]
    fn area_and_centroid_with_hole() {
        let surface = Surface::from_rings(square(0.0, 0.0, 4.0), vec![square(2.0, 2.0, 1.0)]).unwrap();
        assert_eq!(surface.area(), 15.0);
        assert_eq!(surface.perimeter(), 20.0);

        let centroid = surface.centroid().unwrap();
        let expected = (16.0 * 2.0 - 2.5) / 15.0;
        assert_abs_diff_eq!(centroid.position().ordinate(0).unwrap(), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.position().ordinate(1).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn hole_validation() {
        assert_matches!(
            Surface::from_rings(square(0.0, 0.0, 4.0), vec![square(3.0, 3.0, 2.0)]),
            Err(GeometryError::MalformedInput(_))
        );
        assert_matches!(
            Surface::from_rings(
                square(0.0, 0.0, 10.0),
                vec![square(1.0, 1.0, 4.0), square(2.0, 2.0, 1.0)]
            ),
            Err(GeometryError::MalformedInput(_))
        );

        // Touching the exterior ring is allowed.
        assert!(Surface::from_rings(square(0.0, 0.0, 4.0), vec![square(0.0, 1.0, 1.0)]).is_ok());
    }

    #[test]
    fn representative_point_avoids_holes() {
        let surface = Surface::from_rings(square(0.0, 0.0, 4.0), vec![square(1.0, 1.0, 2.0)]).unwrap();
        let point = surface.representative_point().unwrap();
        let (x, y) = (point.position().x(), point.position().y());
        assert_eq!(y, 2.0);
        assert!(x < 1.0 || x > 3.0);
        assert!(x > 0.0 && x < 4.0);
    }
}
