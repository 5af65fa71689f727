use crate::crs::datum::Datum;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Shared handle to a coordinate reference system.
///
/// Many positions reference the same CRS, so it is never copied into them.
pub type CrsRef = Arc<Crs>;

/// Coordinate reference system.
///
/// Two systems are considered equal when they have the same dimension and kind. The `code` is only a label, so
/// `EPSG:3857` and `EPSG:900913` describe the same system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crs {
    code: String,
    dimension: usize,
    kind: CrsKind,
}

/// Kind of the coordinate reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CrsKind {
    /// Longitude and latitude in degrees (in this order), with an optional ellipsoidal height.
    Geographic {
        /// Datum of the coordinates.
        datum: Datum,
    },
    /// Projected planar coordinates.
    Projected {
        /// Datum of the projected geographic coordinates.
        datum: Datum,
        /// Projection used.
        projection: ProjectionType,
    },
    /// Local cartesian coordinates with no relation to the Earth.
    Engineering,
}

/// Projection of a projected coordinate reference system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ProjectionType {
    /// Spherical Web Mercator.
    WebMercator,
    /// Projection given by a `geodesy` operator definition, e.g. `"laea lon_0=10 lat_0=52"`.
    Other(String),
}

lazy_static! {
    static ref BUILTIN: Vec<CrsRef> = vec![
        Arc::new(Crs::geographic("EPSG:4326", Datum::WGS84)),
        Arc::new(Crs::geographic("CRS:84", Datum::WGS84)),
        Arc::new(Crs::web_mercator("EPSG:3857")),
        Arc::new(Crs::web_mercator("EPSG:900913")),
        Arc::new(Crs::engineering("LOCAL:2D", 2)),
        Arc::new(Crs::engineering("LOCAL:3D", 3)),
    ];
}

impl Crs {
    /// Creates a new coordinate reference system.
    pub fn new(code: impl Into<String>, dimension: usize, kind: CrsKind) -> Self {
        Self {
            code: code.into(),
            dimension,
            kind,
        }
    }

    /// Two-dimensional geographic system.
    pub fn geographic(code: impl Into<String>, datum: Datum) -> Self {
        Self::new(code, 2, CrsKind::Geographic { datum })
    }

    /// Two-dimensional spherical Web Mercator system on WGS84.
    pub fn web_mercator(code: impl Into<String>) -> Self {
        Self::new(
            code,
            2,
            CrsKind::Projected {
                datum: Datum::WGS84,
                projection: ProjectionType::WebMercator,
            },
        )
    }

    /// Local cartesian system of the given dimension.
    pub fn engineering(code: impl Into<String>, dimension: usize) -> Self {
        Self::new(code, dimension, CrsKind::Engineering)
    }

    /// Code (label) of the system.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Number of ordinates of every position in this system.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Kind of the system.
    pub fn kind(&self) -> &CrsKind {
        &self.kind
    }

    /// Datum of the system, if it is bound to the Earth.
    pub fn datum(&self) -> Option<Datum> {
        match &self.kind {
            CrsKind::Geographic { datum } | CrsKind::Projected { datum, .. } => Some(*datum),
            CrsKind::Engineering => None,
        }
    }

    /// Built-in systems known to every authority.
    pub fn builtin() -> &'static [CrsRef] {
        &BUILTIN
    }

    /// Finds a built-in system by its code (case insensitive).
    pub fn find_builtin(code: &str) -> Option<CrsRef> {
        BUILTIN
            .iter()
            .find(|crs| crs.code.eq_ignore_ascii_case(code))
            .cloned()
    }

    /// `EPSG:4326`, geographic WGS84 coordinates.
    pub fn wgs84() -> CrsRef {
        BUILTIN[0].clone()
    }

    /// `EPSG:3857`, Web Mercator coordinates.
    pub fn epsg3857() -> CrsRef {
        BUILTIN[2].clone()
    }

    /// `LOCAL:2D`, two-dimensional cartesian coordinates.
    pub fn local_2d() -> CrsRef {
        BUILTIN[4].clone()
    }

    /// `LOCAL:3D`, three-dimensional cartesian coordinates.
    pub fn local_3d() -> CrsRef {
        BUILTIN[5].clone()
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension && self.kind == other.kind
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup() {
        let crs = Crs::find_builtin("epsg:900913").unwrap();
        assert_eq!(crs.code(), "EPSG:900913");
        assert_eq!(*crs, *Crs::epsg3857());
        assert_eq!(*Crs::find_builtin("CRS:84").unwrap(), *Crs::wgs84());
        assert_ne!(*Crs::local_2d(), *Crs::local_3d());
        assert_ne!(*Crs::local_2d(), *Crs::wgs84());
        assert!(Crs::find_builtin("EPSG:1").is_none());
    }

    #[test]
    fn serialize_roundtrip() {
        let crs = Crs::new(
            "EPSG:3035",
            2,
            CrsKind::Projected {
                datum: Datum::WGS84,
                projection: ProjectionType::Other(
                    "laea lon_0=10 lat_0=52 x_0=4321000 y_0=3210000".into(),
                ),
            },
        );
        let json = serde_json::to_string(&crs).unwrap();
        let restored: Crs = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, crs);
        assert_eq!(restored.code(), "EPSG:3035");
    }
}
