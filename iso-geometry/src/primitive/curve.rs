use crate::boundary::{Boundary, CurveBoundary};
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::element::GeometryElement;
use crate::error::GeometryError;
use crate::position::Position;
use crate::primitive::Point;

/// Curve segment interpolated linearly between its control positions.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    positions: Vec<Position>,
}

impl LineString {
    /// Creates a new line string. At least two positions in one reference system are required.
    pub fn new(positions: Vec<Position>) -> Result<Self, GeometryError> {
        if positions.len() < 2 {
            return Err(GeometryError::MalformedInput(format!(
                "line string needs at least 2 positions, got {}",
                positions.len()
            )));
        }

        check_same_crs(&positions)?;
        Ok(Self { positions })
    }

    /// Control positions of the segment.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// First position.
    pub fn start(&self) -> &Position {
        &self.positions[0]
    }

    /// Last position.
    pub fn end(&self) -> &Position {
        &self.positions[self.positions.len() - 1]
    }

    /// Length of the segment over all ordinates.
    pub fn length(&self) -> f64 {
        self.positions
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }

    fn reversed(&self) -> Self {
        let mut positions = self.positions.clone();
        positions.reverse();
        Self { positions }
    }
}

pub(crate) fn check_same_crs(positions: &[Position]) -> Result<(), GeometryError> {
    if let Some(first) = positions.first() {
        if let Some(other) = positions.iter().find(|p| !p.same_crs(first)) {
            return Err(GeometryError::CrsMismatch(
                first.crs().code().to_string(),
                other.crs().code().to_string(),
            ));
        }
    }

    Ok(())
}

/// One-dimensional primitive: a chain of curve segments.
///
/// Every segment starts where the previous one ends. The curve is closed if its start and end positions are
/// equal. Curves are not required to be simple.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    segments: Vec<LineString>,
}

impl Curve {
    /// Creates a new curve from a chain of segments.
    pub fn new(segments: Vec<LineString>) -> Result<Self, GeometryError> {
        if segments.is_empty() {
            return Err(GeometryError::MalformedInput(
                "curve needs at least one segment".into(),
            ));
        }

        for pair in segments.windows(2) {
            if !pair[0].start().same_crs(pair[1].start()) {
                return Err(GeometryError::CrsMismatch(
                    pair[0].start().crs().code().to_string(),
                    pair[1].start().crs().code().to_string(),
                ));
            }

            if pair[0].end() != pair[1].start() {
                return Err(GeometryError::MalformedInput(format!(
                    "curve segments are not connected: {:?} and {:?}",
                    pair[0].end().ordinates(),
                    pair[1].start().ordinates()
                )));
            }
        }

        Ok(Self { segments })
    }

    /// Creates a curve with a single line string segment.
    pub fn from_positions(positions: Vec<Position>) -> Result<Self, GeometryError> {
        Self::new(vec![LineString::new(positions)?])
    }

    /// Segments of the curve.
    pub fn segments(&self) -> &[LineString] {
        &self.segments
    }

    /// Iterates over the control positions of the whole chain. Positions shared by consecutive segments are
    /// yielded once.
    pub fn positions(&self) -> impl Iterator<Item = &Position> + Clone + '_ {
        self.segments.iter().enumerate().flat_map(|(index, segment)| {
            segment.positions.iter().skip(if index == 0 { 0 } else { 1 })
        })
    }

    /// Number of control positions in the chain.
    pub fn num_positions(&self) -> usize {
        self.positions().count()
    }

    /// First position of the curve.
    pub fn start(&self) -> &Position {
        self.segments[0].start()
    }

    /// Last position of the curve.
    pub fn end(&self) -> &Position {
        self.segments[self.segments.len() - 1].end()
    }

    /// First position of the curve as a point.
    pub fn start_point(&self) -> Point {
        Point::new(self.start().clone())
    }

    /// Last position of the curve as a point.
    pub fn end_point(&self) -> Point {
        Point::new(self.end().clone())
    }

    /// Returns true if the curve ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.start() == self.end()
    }

    /// Start and end points of the curve, or an empty boundary for closed curves.
    pub fn boundary(&self) -> Boundary {
        if self.is_closed() {
            Boundary::Empty(self.crs().clone())
        } else {
            Boundary::Curve(CurveBoundary::new(self.start_point(), self.end_point()))
        }
    }

    /// Length of the curve over all ordinates.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(LineString::length).sum()
    }

    /// Length weighted average of the midpoints of the straight pieces of the curve.
    pub fn centroid(&self) -> Result<Point, GeometryError> {
        let (sums, total) = self.centroid_moments();
        if total <= 0.0 {
            return Err(GeometryError::DegenerateGeometry(
                "centroid of a zero-length curve".into(),
            ));
        }

        Ok(Point::new(Position::from_parts_unchecked(
            sums.into_iter().map(|v| v / total).collect(),
            self.crs().clone(),
        )))
    }

    /// Sum of piece midpoints weighted by piece length, and the total length.
    pub(crate) fn centroid_moments(&self) -> (Vec<f64>, f64) {
        let mut sums = vec![0.0; self.crs().dimension()];
        let mut total = 0.0;
        for segment in &self.segments {
            for pair in segment.positions.windows(2) {
                let length = pair[0].distance(&pair[1]);
                for (sum, (a, b)) in sums
                    .iter_mut()
                    .zip(pair[0].ordinates().iter().zip(pair[1].ordinates()))
                {
                    *sum += length * (a + b) / 2.0;
                }
                total += length;
            }
        }

        (sums, total)
    }

    /// Position at the given arc length from the start of the curve.
    pub fn position_at(&self, distance: f64) -> Result<Position, GeometryError> {
        let length = self.length();
        if !(0.0..=length).contains(&distance) {
            return Err(GeometryError::ParameterOutOfRange(distance));
        }

        let mut remaining = distance;
        let positions: Vec<&Position> = self.positions().collect();
        for pair in positions.windows(2) {
            let piece = pair[0].distance(pair[1]);
            if remaining <= piece && piece > 0.0 {
                return Ok(pair[0].interpolate(pair[1], remaining / piece));
            }
            remaining -= piece;
        }

        Ok(self.end().clone())
    }

    /// Point at the half of the curve length. It always lies on the curve.
    pub fn representative_point(&self) -> Result<Point, GeometryError> {
        Ok(Point::new(self.position_at(self.length() / 2.0)?))
    }

    /// Curve with the same positions traversed in the opposite direction.
    pub fn reversed(&self) -> Curve {
        Curve {
            segments: self.segments.iter().rev().map(LineString::reversed).collect(),
        }
    }

    /// Appends the segments of `other` to the end of the curve.
    pub(crate) fn concat(mut self, other: &Curve) -> Result<Curve, GeometryError> {
        self.segments.extend(other.segments.iter().cloned());
        Self::new(self.segments)
    }
}

impl GeometryElement for Curve {
    fn crs(&self) -> &CrsRef {
        self.start().crs()
    }

    fn dimension(&self) -> Dimension {
        Dimension::Curve
    }

    fn positions(&self) -> impl Iterator<Item = &Position> {
        Curve::positions(self)
    }

    fn try_map_positions<F>(&self, _crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>,
    {
        let mut segments = Vec::with_capacity(self.segments.len());
        let mut joint: Option<(Position, Position)> = None;
        for segment in &self.segments {
            let mut positions = Vec::with_capacity(segment.positions.len());
            for (index, position) in segment.positions.iter().enumerate() {
                // Shared positions are mapped once, so the chain stays connected.
                match &joint {
                    Some((source, mapped)) if index == 0 && source == position => {
                        positions.push(mapped.clone())
                    }
                    _ => positions.push(f(position)?),
                }
            }
            joint = Some((
                segment.end().clone(),
                positions[positions.len() - 1].clone(),
            ));
            segments.push(LineString::new(positions)?);
        }

        Self::new(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn positions(coords: &[[f64; 2]]) -> Vec<Position> {
        coords
            .iter()
            .map(|c| Position::from_slice(c, &Crs::local_2d()).unwrap())
            .collect()
    }

    #[test]
    fn chain_must_be_connected() {
        let a = LineString::new(positions(&[[0.0, 0.0], [1.0, 0.0]])).unwrap();
        let b = LineString::new(positions(&[[1.0, 0.0], [1.0, 1.0]])).unwrap();
        let c = LineString::new(positions(&[[2.0, 0.0], [1.0, 1.0]])).unwrap();

        let curve = Curve::new(vec![a.clone(), b]).unwrap();
        assert_eq!(curve.num_positions(), 3);
        assert_eq!(curve.end().ordinates(), &[1.0, 1.0]);
        assert_matches!(
            Curve::new(vec![a, c]),
            Err(GeometryError::MalformedInput(_))
        );
        assert_matches!(
            LineString::new(positions(&[[0.0, 0.0]])),
            Err(GeometryError::MalformedInput(_))
        );
    }

    #[test]
    fn boundary() {
        let open = Curve::from_positions(positions(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]])).unwrap();
        assert!(!open.is_closed());
        let Boundary::Curve(boundary) = open.boundary() else {
            panic!("open curve must have two boundary points");
        };
        assert_eq!(boundary.start().position().ordinates(), &[0.0, 0.0]);
        assert_eq!(boundary.end().position().ordinates(), &[1.0, 1.0]);

        let closed =
            Curve::from_positions(positions(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]))
                .unwrap();
        assert!(closed.is_closed());
        assert!(closed.boundary().is_empty());
    }

    #[test]
    fn length_and_parametrisation() {
        let curve = Curve::from_positions(positions(&[[0.0, 0.0], [3.0, 4.0], [3.0, 10.0]])).unwrap();
        assert_eq!(curve.length(), 11.0);
        assert_eq!(curve.position_at(8.0).unwrap().ordinates(), &[3.0, 7.0]);
        assert_eq!(
            curve.representative_point().unwrap().position().ordinates(),
            &[3.0, 4.5]
        );
        assert_matches!(
            curve.position_at(12.0),
            Err(GeometryError::ParameterOutOfRange(v)) if v == 12.0
        );
        assert_eq!(curve.reversed().start().ordinates(), &[3.0, 10.0]);
    }

    #[test]
    fn centroid() {
        let curve = Curve::from_positions(positions(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]])).unwrap();
        let centroid = curve.centroid().unwrap();
        assert_abs_diff_eq!(centroid.position().ordinate(0).unwrap(), 1.5);
        assert_abs_diff_eq!(centroid.position().ordinate(1).unwrap(), 0.5);

        let degenerate = Curve::from_positions(positions(&[[1.0, 1.0], [1.0, 1.0]])).unwrap();
        assert_matches!(
            degenerate.centroid(),
            Err(GeometryError::DegenerateGeometry(_))
        );
    }
}
