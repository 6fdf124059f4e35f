//! Trace synthesis: one sparse lifetime polyline per particle.
//!
//! The opposite time-alignment from frames: instead of one snapshot per
//! cycle padded with absent markers, each trace holds only the cycles
//! its particle was actually observed in. Consumers must tolerate empty
//! traces.

use plexview_core::{Cycle, GridIndex, ParticleId, Vec3};
use plexview_ingest::TrajectoryStore;

/// One particle's lifetime trajectory.
///
/// `cycles`, `positions`, and `momenta` are parallel lists in
/// cycle-ascending order, restricted to observed cycles: sparse by
/// construction, with no padding.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    /// Canonical species name.
    pub species: String,
    /// The store's raw grid index, kept for legend grouping.
    pub grid: GridIndex,
    /// The particle this trace follows.
    pub particle: ParticleId,
    /// Cycles the particle was observed in, ascending.
    pub cycles: Vec<Cycle>,
    /// Physical positions, parallel to `cycles`.
    pub positions: Vec<Vec3>,
    /// Momenta, parallel to `cycles`.
    pub momenta: Vec<Vec3>,
}

impl Trace {
    /// Number of observed cycles.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Whether the particle was never observed.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Produce one trace per `(species, particle id)` pair.
///
/// Traces are grouped by species in store species order, ids ascending
/// within a species; no ordering is promised between species beyond
/// that. Pure function of the store.
pub fn synthesize_traces(store: &TrajectoryStore) -> Vec<Trace> {
    let mut traces = Vec::new();
    for (name, series) in store.species() {
        for &id in series.ids() {
            let mut cycles = Vec::new();
            let mut positions = Vec::new();
            let mut momenta = Vec::new();
            for (cycle, sample) in series.samples_of(id) {
                cycles.push(cycle);
                positions.push(sample.position);
                momenta.push(sample.momentum);
            }
            traces.push(Trace {
                species: name.to_string(),
                grid: series.grid(),
                particle: id,
                cycles,
                positions,
                momenta,
            });
        }
    }
    traces
}
