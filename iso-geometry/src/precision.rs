//! Numeric tolerance shared by the planar algorithms.
//!
//! Every computation that decides whether two points are "the same" (overlay noding, relate, simplicity,
//! distance) takes its tolerance from one [`Precision`] value. Mixing tolerances inside one computation
//! produces inconsistent topology, so the operators never derive a second epsilon on their own.

use serde::{Deserialize, Serialize};

/// Tolerance used when no explicit [`Precision`] is given.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Absolute tolerance for "same point" and "point on segment" tests.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precision {
    epsilon: f64,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Precision {
    /// Creates a new precision model with the given absolute tolerance.
    ///
    /// Negative values are treated as their absolute value.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    /// Returns a copy of the precision with a different tolerance.
    pub fn with_epsilon(self, epsilon: f64) -> Self {
        Self::new(epsilon)
    }

    /// Absolute tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Squared tolerance, convenient for comparing against squared distances.
    pub fn epsilon_sq(&self) -> f64 {
        self.epsilon * self.epsilon
    }

    /// Returns true if `value` is within tolerance from zero.
    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_epsilon() {
        assert_eq!(Precision::default().epsilon(), DEFAULT_EPSILON);
        assert_eq!(Precision::new(-0.5).epsilon(), 0.5);
    }

    #[test]
    fn deserialize_partial_config() {
        let precision: Precision = serde_json::from_str("{}").unwrap();
        assert_eq!(precision, Precision::default());

        let precision: Precision = serde_json::from_str(r#"{"epsilon": 0.001}"#).unwrap();
        assert_eq!(precision.epsilon(), 0.001);
        assert!(precision.is_zero(0.0005));
        assert!(!precision.is_zero(0.002));
    }
}
