use crate::crs::datum::Datum;
use crate::crs::transform::{check_dimension, check_finite, CoordinateTransform};
use crate::error::GeometryError;

/// Spherical Web Mercator projection of geographic coordinates (longitude, latitude in degrees).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a new projection on the sphere with the radius of the datum's semi-major axis.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            datum: Datum::WGS84,
        }
    }
}

impl CoordinateTransform for WebMercator {
    fn source_dimension(&self) -> usize {
        2
    }

    fn target_dimension(&self) -> usize {
        2
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 2)?;
        let lon = ordinates[0].to_radians();
        let lat = ordinates[1].to_radians();

        let x = self.datum.semimajor() * lon;
        let y = self.datum.semimajor()
            * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

        check_finite(vec![x, y])
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 2)?;
        let lon = ordinates[0] / self.datum.semimajor();
        let lat = 2.0 * (ordinates[1] / self.datum.semimajor()).exp().atan()
            - std::f64::consts::FRAC_PI_2;

        check_finite(vec![lon.to_degrees(), lat.to_degrees()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn project_and_back() {
        let projection = WebMercator::default();
        let projected = projection.apply(&[30.0, 60.0]).unwrap();
        assert_abs_diff_eq!(projected[0], 3339584.723798207, epsilon = 1e-6);
        assert_abs_diff_eq!(projected[1], 8399737.889818357, epsilon = 1e-6);

        let back = projection.apply_inverse(&projected).unwrap();
        assert_abs_diff_eq!(back[0], 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back[1], 60.0, epsilon = 1e-9);
    }

    #[test]
    fn invalid_input() {
        assert_matches!(
            WebMercator::default().apply(&[0.0, f64::NAN]),
            Err(GeometryError::Transform(_))
        );
    }
}
