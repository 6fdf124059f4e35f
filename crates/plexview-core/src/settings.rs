//! Run-level settings read once per source.

use crate::id::GridIndex;
use crate::sample::Vec3;

/// Run-level constants describing the simulation domain.
///
/// Read from the source's `settings/environment` group at ingestion and
/// held by the trajectory store for the presentation layer (axis ranges,
/// aspect ratios). `cell_size` is also the scaling factor applied to raw
/// particle coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    /// Number of cells along each axis.
    pub grid_shape: [u64; 3],
    /// Physical extent of one cell along each axis.
    pub cell_size: Vec3,
}

impl Environment {
    /// Physical extent of the whole domain: `grid_shape * cell_size`.
    pub fn domain_size(&self) -> Vec3 {
        [
            self.grid_shape[0] as f64 * self.cell_size[0],
            self.grid_shape[1] as f64 * self.cell_size[1],
            self.grid_shape[2] as f64 * self.cell_size[2],
        ]
    }
}

/// A named particle group scoped to one source grid.
///
/// The species *name* is the canonical identity; the grid index is the
/// store's raw addressing detail and is kept only for reading the
/// per-grid subtrees and for re-mapping per-grid statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesInfo {
    /// The store's raw grid index for this species.
    pub grid: GridIndex,
    /// Species name (e.g. `"electron"`).
    pub name: String,
    /// Whether the source flags this species for longitudinal tracking.
    /// Untracked species carry no per-particle sample arrays.
    pub tracked: bool,
}
