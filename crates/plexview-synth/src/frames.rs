//! Frame synthesis: one index-aligned snapshot per cycle.
//!
//! An animation layer maps slot indices to visual series statically, so
//! every frame must present the same slots in the same order. The slot
//! order is each species' finalized ascending id list; a particle
//! absent from a cycle keeps its slot with an explicit absent marker,
//! since omitting the slot would shift every later index.

use plexview_core::{Cycle, GridIndex, ParticleId, Sample};
use plexview_ingest::{CycleStats, TrajectoryStore};

/// One particle's slot in a frame.
///
/// `sample` is `None` when the particle was not observed in the
/// frame's cycle. The absent marker is never a zero-valued sample: a
/// particle sitting at the origin and a particle that vanished are
/// different things.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSlot {
    /// The particle this slot belongs to, in every frame.
    pub particle: ParticleId,
    /// The observation, or `None` if absent this cycle.
    pub sample: Option<Sample>,
}

/// One species' slots within a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGroup {
    /// Canonical species name.
    pub species: String,
    /// The store's raw grid index, kept for legend grouping.
    pub grid: GridIndex,
    /// One slot per id in the species' finalized id list, in that order.
    pub slots: Vec<FrameSlot>,
}

/// One cycle's complete, index-aligned snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// The cycle this frame shows.
    pub cycle: Cycle,
    /// Human-readable cycle label (`"Cycle 42"`).
    pub label: String,
    /// Caption derived from the cycle's statistics, when available.
    pub caption: Option<String>,
    /// One group per species, in store species order.
    pub groups: Vec<FrameGroup>,
}

/// Build the caption from a cycle's statistics.
fn caption_for(stats: &CycleStats) -> Option<String> {
    let n_particles = stats.scalar("n_particles")?;
    let total_e = stats.scalar("total_E")?;
    Some(format!("Particles: {n_particles} / Energy {total_e} [J]"))
}

/// Produce one frame per store cycle, ascending.
///
/// Pure function of the store: the same store yields identical frames
/// on every call.
pub fn synthesize_frames(store: &TrajectoryStore) -> Vec<Frame> {
    store
        .cycles()
        .iter()
        .map(|&cycle| {
            let groups = store
                .species()
                .map(|(name, series)| FrameGroup {
                    species: name.to_string(),
                    grid: series.grid(),
                    slots: series
                        .ids()
                        .iter()
                        .map(|&id| FrameSlot {
                            particle: id,
                            sample: series.sample(cycle, id).copied(),
                        })
                        .collect(),
                })
                .collect();
            Frame {
                cycle,
                label: format!("Cycle {cycle}"),
                caption: store.stats(cycle).and_then(caption_for),
                groups,
            }
        })
        .collect()
}
