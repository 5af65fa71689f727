use crate::error::GeometryError;
use nalgebra::{Matrix3, Vector3};
use std::fmt::Debug;
use std::sync::Arc;

/// Coordinate operation between two coordinate reference systems.
///
/// Transforms work on raw ordinate slices. Use [`Position::transform`](crate::Position::transform) to transform a
/// position and rebind it to the target system.
pub trait CoordinateTransform: Debug {
    /// Number of ordinates the transform accepts.
    fn source_dimension(&self) -> usize;

    /// Number of ordinates the transform produces.
    fn target_dimension(&self) -> usize;

    /// Returns true if the transform does not change ordinate values.
    fn is_identity(&self) -> bool {
        false
    }

    /// Transforms ordinates from the source system into the target one.
    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError>;

    /// Transforms ordinates from the target system back into the source one.
    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError>;
}

pub(crate) fn check_dimension(ordinates: &[f64], expected: usize) -> Result<(), GeometryError> {
    if ordinates.len() != expected {
        return Err(GeometryError::DimensionMismatch {
            expected,
            actual: ordinates.len(),
        });
    }

    Ok(())
}

pub(crate) fn check_finite(ordinates: Vec<f64>) -> Result<Vec<f64>, GeometryError> {
    if ordinates.iter().all(|v| v.is_finite()) {
        Ok(ordinates)
    } else {
        Err(GeometryError::Transform(format!(
            "non-finite result {ordinates:?}"
        )))
    }
}

/// Transform that returns the ordinates unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityTransform {
    dimension: usize,
}

impl IdentityTransform {
    /// Creates an identity transform for positions of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl CoordinateTransform for IdentityTransform {
    fn source_dimension(&self) -> usize {
        self.dimension
    }

    fn target_dimension(&self) -> usize {
        self.dimension
    }

    fn is_identity(&self) -> bool {
        true
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, self.dimension)?;
        Ok(ordinates.to_vec())
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        self.apply(ordinates)
    }
}

/// Two-dimensional affine transform given by a homogeneous matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl AffineTransform {
    /// Creates a new transform. Fails if the matrix cannot be inverted.
    pub fn new(matrix: Matrix3<f64>) -> Result<Self, GeometryError> {
        let inverse = matrix.try_inverse().ok_or_else(|| {
            GeometryError::Transform("affine matrix is not invertible".to_string())
        })?;
        Ok(Self { matrix, inverse })
    }

    /// Translation by `(dx, dy)`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        let matrix = Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0);
        let inverse = Matrix3::new(1.0, 0.0, -dx, 0.0, 1.0, -dy, 0.0, 0.0, 1.0);
        Self { matrix, inverse }
    }

    /// Scaling around the origin followed by translation.
    pub fn scale_translate(sx: f64, sy: f64, dx: f64, dy: f64) -> Result<Self, GeometryError> {
        Self::new(Matrix3::new(sx, 0.0, dx, 0.0, sy, dy, 0.0, 0.0, 1.0))
    }

    /// Matrix of the transform.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    fn multiply(matrix: &Matrix3<f64>, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 2)?;
        let v = matrix * Vector3::new(ordinates[0], ordinates[1], 1.0);
        check_finite(vec![v.x / v.z, v.y / v.z])
    }
}

impl CoordinateTransform for AffineTransform {
    fn source_dimension(&self) -> usize {
        2
    }

    fn target_dimension(&self) -> usize {
        2
    }

    fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        Self::multiply(&self.matrix, ordinates)
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        Self::multiply(&self.inverse, ordinates)
    }
}

/// Transform that adds a constant third ordinate to a 2d position. The inverse drops it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddDimensionTransform {
    z: f64,
}

impl AddDimensionTransform {
    /// Creates a new instance, that will set the specified `z` value when transforming.
    pub fn new(z: f64) -> Self {
        Self { z }
    }
}

impl CoordinateTransform for AddDimensionTransform {
    fn source_dimension(&self) -> usize {
        2
    }

    fn target_dimension(&self) -> usize {
        3
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 2)?;
        Ok(vec![ordinates[0], ordinates[1], self.z])
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 3)?;
        Ok(vec![ordinates[0], ordinates[1]])
    }
}

/// Transform that runs the inner transform backwards.
#[derive(Debug, Clone)]
pub struct InverseTransform {
    inner: Arc<dyn CoordinateTransform>,
}

impl InverseTransform {
    /// Creates the inverse of the given transform.
    pub fn new(inner: Arc<dyn CoordinateTransform>) -> Self {
        Self { inner }
    }
}

impl CoordinateTransform for InverseTransform {
    fn source_dimension(&self) -> usize {
        self.inner.target_dimension()
    }

    fn target_dimension(&self) -> usize {
        self.inner.source_dimension()
    }

    fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        self.inner.apply_inverse(ordinates)
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        self.inner.apply(ordinates)
    }
}

/// Sequence of transforms applied one after another.
#[derive(Debug, Clone)]
pub struct ChainTransform {
    steps: Vec<Arc<dyn CoordinateTransform>>,
}

impl ChainTransform {
    /// Creates a new chain. Fails if dimensions of consecutive steps do not match or the chain is empty.
    pub fn new(steps: Vec<Arc<dyn CoordinateTransform>>) -> Result<Self, GeometryError> {
        if steps.is_empty() {
            return Err(GeometryError::Transform("empty transform chain".into()));
        }

        for pair in steps.windows(2) {
            if pair[0].target_dimension() != pair[1].source_dimension() {
                return Err(GeometryError::DimensionMismatch {
                    expected: pair[0].target_dimension(),
                    actual: pair[1].source_dimension(),
                });
            }
        }

        Ok(Self { steps })
    }

    /// Steps of the chain.
    pub fn steps(&self) -> &[Arc<dyn CoordinateTransform>] {
        &self.steps
    }
}

impl CoordinateTransform for ChainTransform {
    fn source_dimension(&self) -> usize {
        self.steps
            .first()
            .map(|step| step.source_dimension())
            .unwrap_or_default()
    }

    fn target_dimension(&self) -> usize {
        self.steps
            .last()
            .map(|step| step.target_dimension())
            .unwrap_or_default()
    }

    fn is_identity(&self) -> bool {
        self.steps.iter().all(|step| step.is_identity())
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        let mut current = ordinates.to_vec();
        for step in &self.steps {
            current = step.apply(&current)?;
        }

        Ok(current)
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        let mut current = ordinates.to_vec();
        for step in self.steps.iter().rev() {
            current = step.apply_inverse(&current)?;
        }

        Ok(current)
    }
}
