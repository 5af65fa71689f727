use crate::cartesian::Rect;
use crate::crs::CrsRef;
use crate::dimension::Dimension;
use crate::error::GeometryError;
use crate::position::Position;

/// Capabilities shared by every geometry type of the crate.
pub trait GeometryElement: Sized {
    /// Reference system of all positions of the geometry.
    fn crs(&self) -> &CrsRef;

    /// Topological dimension of the geometry.
    fn dimension(&self) -> Dimension;

    /// Iterates over all positions of the geometry. Closing positions of rings are included.
    fn positions(&self) -> impl Iterator<Item = &Position>;

    /// Bounding rectangle of the horizontal projection. `None` for empty geometries.
    fn envelope(&self) -> Option<Rect> {
        Rect::from_points(self.positions())
    }

    /// Rebuilds the geometry with every position replaced by the output of `f`, bottom-up.
    ///
    /// The rebuilt geometry is validated again and bound to `crs`.
    fn try_map_positions<F>(&self, crs: &CrsRef, f: &mut F) -> Result<Self, GeometryError>
    where
        F: FnMut(&Position) -> Result<Position, GeometryError>;
}
