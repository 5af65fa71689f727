use crate::crs::transform::{check_dimension, check_finite, CoordinateTransform};
use crate::error::GeometryError;
use geodesy::prelude::*;
use std::fmt::{Debug, Formatter};

/// Projection of geographic coordinates evaluated by the `geodesy` crate.
pub struct GeodesyTransform {
    definition: String,
    context: Minimal,
    op: OpHandle,
}

impl GeodesyTransform {
    /// Creates a projection from a `geodesy` operator definition, e.g. `"laea lon_0=10 lat_0=52"`.
    pub fn new(definition: &str) -> Result<Self, GeometryError> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|err| GeometryError::Transform(format!("{definition}: {err}")))?;
        Ok(Self {
            definition: definition.to_string(),
            context,
            op,
        })
    }

    /// Operator definition of the projection.
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl Debug for GeodesyTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeodesyTransform")
            .field("definition", &self.definition)
            .finish()
    }
}

impl CoordinateTransform for GeodesyTransform {
    fn source_dimension(&self) -> usize {
        2
    }

    fn target_dimension(&self) -> usize {
        2
    }

    fn apply(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 2)?;
        let mut data = [Coor2D::geo(ordinates[1], ordinates[0])];
        self.context
            .apply(self.op, Fwd, &mut data)
            .map_err(|err| GeometryError::Transform(err.to_string()))?;

        check_finite(vec![data[0].0[0], data[0].0[1]])
    }

    fn apply_inverse(&self, ordinates: &[f64]) -> Result<Vec<f64>, GeometryError> {
        check_dimension(ordinates, 2)?;
        let mut data = [Coor2D([ordinates[0], ordinates[1]])];
        self.context
            .apply(self.op, Inv, &mut data)
            .map_err(|err| GeometryError::Transform(err.to_string()))?;

        check_finite(vec![data[0].0[0].to_degrees(), data[0].0[1].to_degrees()])
    }
}
