//! Per-cycle particle observations.

/// A 3-component vector of physical coordinates or momenta.
pub type Vec3 = [f64; 3];

/// One particle's observation in one cycle: position and momentum.
///
/// The position is in physical units: raw stored coordinates are scaled
/// by the environment's cell size, elementwise, exactly once, at
/// ingestion. Nothing downstream of the trajectory store rescales.
///
/// # Examples
///
/// ```
/// use plexview_core::Sample;
///
/// let s = Sample::from_raw([2.0, 3.0, 4.0], [0.0, 0.1, 0.0], [0.5, 1.0, 2.0]);
/// assert_eq!(s.position, [1.0, 3.0, 8.0]);
/// assert_eq!(s.momentum, [0.0, 0.1, 0.0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Position in physical units (already cell-size scaled).
    pub position: Vec3,
    /// Momentum, stored as read.
    pub momentum: Vec3,
}

impl Sample {
    /// Build a sample from raw stored coordinates and a cell size.
    ///
    /// Applies the elementwise `raw * cell_size` scaling that converts
    /// grid-relative coordinates into physical positions.
    pub fn from_raw(raw_position: Vec3, momentum: Vec3, cell_size: Vec3) -> Self {
        Self {
            position: [
                raw_position[0] * cell_size[0],
                raw_position[1] * cell_size[1],
                raw_position[2] * cell_size[2],
            ],
            momentum,
        }
    }
}
