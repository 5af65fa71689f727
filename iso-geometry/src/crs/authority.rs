use crate::crs::system::{Crs, CrsKind, CrsRef, ProjectionType};
use crate::crs::transform::{
    AddDimensionTransform, ChainTransform, CoordinateTransform, IdentityTransform,
    InverseTransform,
};
use crate::crs::web_mercator::WebMercator;
use crate::error::GeometryError;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Service that resolves coordinate reference systems and the transforms between them.
pub trait CrsAuthority {
    /// Returns the system with the given code.
    fn decode(&self, code: &str) -> Result<CrsRef, GeometryError>;

    /// Returns a transform from `source` into `target`.
    fn find_transform(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> Result<Arc<dyn CoordinateTransform>, GeometryError>;
}

/// Authority that knows the built-in systems and any system registered at runtime.
///
/// The registry is guarded by a lock, so the authority can be shared between threads.
#[derive(Debug, Default)]
pub struct DefaultAuthority {
    registry: RwLock<AHashMap<String, CrsRef>>,
}

impl DefaultAuthority {
    /// Creates a new authority with only the built-in systems.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a system under its code, replacing a previously registered one with the same code.
    pub fn register(&self, crs: Crs) -> CrsRef {
        let crs = Arc::new(crs);
        log::debug!("Registering coordinate reference system {}", crs.code());
        self.registry
            .write()
            .insert(crs.code().to_ascii_uppercase(), crs.clone());
        crs
    }

    fn projection(source: &Crs, target: &Crs) -> Option<Result<Arc<dyn CoordinateTransform>, GeometryError>> {
        let CrsKind::Geographic { datum } = source.kind() else {
            return None;
        };
        let CrsKind::Projected {
            datum: projected_datum,
            projection,
        } = target.kind()
        else {
            return None;
        };

        if datum != projected_datum || source.dimension() != 2 || target.dimension() != 2 {
            return None;
        }

        match projection {
            ProjectionType::WebMercator => Some(Ok(Arc::new(WebMercator::new(*datum)))),
            #[cfg(feature = "geodesy")]
            ProjectionType::Other(definition) => Some(
                crate::crs::GeodesyTransform::new(definition)
                    .map(|t| Arc::new(t) as Arc<dyn CoordinateTransform>),
            ),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

impl CrsAuthority for DefaultAuthority {
    fn decode(&self, code: &str) -> Result<CrsRef, GeometryError> {
        if let Some(crs) = self.registry.read().get(&code.to_ascii_uppercase()) {
            return Ok(crs.clone());
        }

        Crs::find_builtin(code).ok_or_else(|| GeometryError::UnknownCrs(code.to_string()))
    }

    fn find_transform(
        &self,
        source: &Crs,
        target: &Crs,
    ) -> Result<Arc<dyn CoordinateTransform>, GeometryError> {
        if source == target {
            return Ok(Arc::new(IdentityTransform::new(source.dimension())));
        }

        if let Some(projection) = Self::projection(source, target) {
            return projection;
        }

        if let Some(projection) = Self::projection(target, source) {
            return Ok(Arc::new(InverseTransform::new(projection?)));
        }

        match (source.kind(), target.kind()) {
            (CrsKind::Engineering, CrsKind::Engineering)
                if source.dimension() == 2 && target.dimension() == 3 =>
            {
                Ok(Arc::new(AddDimensionTransform::new(0.0)))
            }
            (CrsKind::Engineering, CrsKind::Engineering)
                if source.dimension() == 3 && target.dimension() == 2 =>
            {
                Ok(Arc::new(InverseTransform::new(Arc::new(
                    AddDimensionTransform::new(0.0),
                ))))
            }
            (CrsKind::Projected { datum, .. }, CrsKind::Projected { .. })
                if source.datum() == target.datum() =>
            {
                let geographic = Crs::geographic("", *datum);
                let to_geographic = self.find_transform(source, &geographic)?;
                let to_target = self.find_transform(&geographic, target)?;
                Ok(Arc::new(ChainTransform::new(vec![to_geographic, to_target])?))
            }
            _ => Err(GeometryError::UnsupportedCombination(format!(
                "no transform from {source} to {target}"
            ))),
        }
    }
}
