//! The trajectory store: the entity graph both synthesizers read.
//!
//! [`StoreBuilder`] accumulates per-cycle reader output; `finish()`
//! fixes the deterministic orderings (ascending cycles, ascending
//! particle ids per species) and produces the immutable
//! [`TrajectoryStore`]. Construction is atomic: any error drops the
//! builder, so no partially-usable store is ever observable.

use indexmap::{IndexMap, IndexSet};

use plexview_core::{Cycle, Environment, GridIndex, ParticleId, Sample, SpeciesInfo, StoreProvider};

use crate::error::IngestError;
use crate::layout::{CycleSource, IngestOptions};
use crate::reader::SourceReader;

/// One cycle's scalar statistics.
///
/// Global scalars are keyed by statistic name; per-species scalars are
/// keyed by the store's raw grid index and re-mapped to species names
/// only by the stats aggregator. A grid index that never resolves to a
/// species is that aggregator's error, not the store's.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CycleStats {
    /// Global scalar statistics (`n_particles`, `total_E`, field
    /// energies, …).
    pub scalars: IndexMap<String, f64>,
    /// Per-grid scalar statistics (`kinetic_E`, `n_particles`, …).
    pub by_grid: IndexMap<GridIndex, IndexMap<String, f64>>,
}

impl CycleStats {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// A global scalar by name.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    /// Whether the cycle recorded no statistics at all.
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.by_grid.is_empty()
    }
}

/// One species' cycle-keyed samples plus its finalized id set.
#[derive(Clone, Debug)]
pub struct SpeciesSeries {
    grid: GridIndex,
    /// cycle → particle id → sample; keys ascend after `finish()`.
    samples: IndexMap<Cycle, IndexMap<ParticleId, Sample>>,
    /// Every id ever observed for this species, ascending.
    ids: Vec<ParticleId>,
}

impl SpeciesSeries {
    /// The store's raw grid index for this species.
    pub fn grid(&self) -> GridIndex {
        self.grid
    }

    /// All particle ids ever observed for this species, ascending.
    ///
    /// This is the frame synthesizer's slot order: the position of an
    /// id in this slice is its slot index in every frame.
    pub fn ids(&self) -> &[ParticleId] {
        &self.ids
    }

    /// The sample for one particle in one cycle, if observed.
    pub fn sample(&self, cycle: Cycle, id: ParticleId) -> Option<&Sample> {
        self.samples.get(&cycle).and_then(|m| m.get(&id))
    }

    /// All samples for one cycle (empty map if no particle was observed).
    pub fn cycle_samples(&self, cycle: Cycle) -> Option<&IndexMap<ParticleId, Sample>> {
        self.samples.get(&cycle)
    }

    /// One particle's observations in cycle-ascending order.
    ///
    /// Sparse: cycles where the particle is absent are skipped, so an
    /// unobserved id yields an empty iterator.
    pub fn samples_of(&self, id: ParticleId) -> impl Iterator<Item = (Cycle, &Sample)> + '_ {
        self.samples
            .iter()
            .filter_map(move |(&cycle, m)| m.get(&id).map(|s| (cycle, s)))
    }
}

/// The immutable entity graph built from one ingestion pass.
///
/// Both synthesizers and the stats aggregator are read-only passes over
/// this store; it is never mutated after [`StoreBuilder::finish`], so
/// concurrent reads need no locking.
#[derive(Clone, Debug)]
pub struct TrajectoryStore {
    environment: Environment,
    species: IndexMap<String, SpeciesSeries>,
    grid_names: IndexMap<GridIndex, String>,
    cycles: Vec<Cycle>,
    stats: IndexMap<Cycle, CycleStats>,
}

impl TrajectoryStore {
    /// Run-level environment constants.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// All ingested cycles, ascending.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Species in grid order: `(name, series)` pairs.
    pub fn species(&self) -> impl ExactSizeIterator<Item = (&str, &SpeciesSeries)> {
        self.species.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// One species' series by canonical name.
    pub fn species_named(&self, name: &str) -> Option<&SpeciesSeries> {
        self.species.get(name)
    }

    /// Resolve a raw grid index to the species name it was ingested as.
    pub fn species_for_grid(&self, grid: GridIndex) -> Option<&str> {
        self.grid_names.get(&grid).map(String::as_str)
    }

    /// One cycle's statistics, if that cycle was ingested.
    pub fn stats(&self, cycle: Cycle) -> Option<&CycleStats> {
        self.stats.get(&cycle)
    }
}

struct BuildSeries {
    grid: GridIndex,
    samples: IndexMap<Cycle, IndexMap<ParticleId, Sample>>,
    ids: IndexSet<ParticleId>,
}

/// Incremental builder for a [`TrajectoryStore`].
///
/// Feed it per-cycle output in any order; `finish()` establishes the
/// ascending orderings. The builder is consumed by `finish()` and
/// dropped on error, which is what makes construction atomic.
pub struct StoreBuilder {
    environment: Environment,
    species: IndexMap<String, BuildSeries>,
    grid_names: IndexMap<GridIndex, String>,
    cycles: IndexSet<Cycle>,
    stats: IndexMap<Cycle, CycleStats>,
}

impl StoreBuilder {
    /// Start a build for one source's environment.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            species: IndexMap::new(),
            grid_names: IndexMap::new(),
            cycles: IndexSet::new(),
            stats: IndexMap::new(),
        }
    }

    /// Register a species. Registration order fixes the presentation
    /// order of species in the finished store; the reader registers in
    /// ascending grid order. Re-registering a name is idempotent.
    pub fn register_species(&mut self, info: &SpeciesInfo) {
        self.grid_names.insert(info.grid, info.name.clone());
        self.species
            .entry(info.name.clone())
            .or_insert_with(|| BuildSeries {
                grid: info.grid,
                samples: IndexMap::new(),
                ids: IndexSet::new(),
            });
    }

    /// Record a cycle and its statistics. Every registered species gets
    /// a (possibly empty) sample map for the cycle, so downstream
    /// lookups are total over the cycle list.
    pub fn begin_cycle(&mut self, cycle: Cycle, stats: CycleStats) {
        self.cycles.insert(cycle);
        self.stats.insert(cycle, stats);
        for series in self.species.values_mut() {
            series.samples.entry(cycle).or_default();
        }
    }

    /// Insert one sample under `(species, cycle, particle)`.
    ///
    /// Registers the id in the species' global id set (idempotent
    /// union). A key collision is [`IngestError::DuplicateParticle`];
    /// the store never silently overwrites.
    pub fn insert(
        &mut self,
        species: &str,
        cycle: Cycle,
        particle: ParticleId,
        sample: Sample,
    ) -> Result<(), IngestError> {
        let series = self
            .species
            .get_mut(species)
            .ok_or_else(|| IngestError::UnknownSpecies {
                species: species.to_string(),
            })?;
        self.cycles.insert(cycle);
        let per_cycle = series.samples.entry(cycle).or_default();
        if per_cycle.contains_key(&particle) {
            return Err(IngestError::DuplicateParticle {
                species: species.to_string(),
                cycle,
                particle,
            });
        }
        per_cycle.insert(particle, sample);
        series.ids.insert(particle);
        Ok(())
    }

    /// Finalize: sort cycles and per-species id sets ascending and
    /// freeze the store.
    pub fn finish(self) -> TrajectoryStore {
        let mut cycles: Vec<Cycle> = self.cycles.into_iter().collect();
        cycles.sort_unstable();

        let mut species = IndexMap::with_capacity(self.species.len());
        for (name, build) in self.species {
            let mut samples = build.samples;
            for &cycle in &cycles {
                samples.entry(cycle).or_default();
            }
            samples.sort_unstable_keys();
            let mut ids: Vec<ParticleId> = build.ids.into_iter().collect();
            ids.sort_unstable();
            species.insert(
                name,
                SpeciesSeries {
                    grid: build.grid,
                    samples,
                    ids,
                },
            );
        }

        let mut stats = self.stats;
        stats.sort_unstable_keys();

        TrajectoryStore {
            environment: self.environment,
            species,
            grid_names: self.grid_names,
            cycles,
            stats,
        }
    }
}

/// Ingest every resolved cycle from a source, in ascending order.
///
/// Single sequential pass; construction either ingests the whole
/// requested range or fails with no store.
pub fn ingest(source: &dyn CycleSource) -> Result<TrajectoryStore, IngestError> {
    let reader = SourceReader::new(source)?;
    let cycles = reader.cycles().to_vec();
    build(&reader, cycles.into_iter().map(|c| reader.read_cycle(c)))
}

/// Convenience: open a source at `path` (group- or file-based, decided
/// by the path) and ingest it.
pub fn ingest_path(
    provider: &dyn StoreProvider,
    path: &str,
    options: IngestOptions,
) -> Result<TrajectoryStore, IngestError> {
    let source = crate::layout::open_source(provider, path, options)?;
    ingest(source.as_ref())
}

/// Merge cycle records into a finished store. Records must arrive in
/// ascending cycle order; both the sequential and the parallel path
/// funnel through here so their output is identical.
pub(crate) fn build(
    reader: &SourceReader<'_>,
    records: impl Iterator<Item = Result<crate::reader::CycleRecord, IngestError>>,
) -> Result<TrajectoryStore, IngestError> {
    let mut builder = StoreBuilder::new(reader.environment().clone());
    for info in reader.species().values() {
        builder.register_species(info);
    }
    for record in records {
        let record = record?;
        builder.begin_cycle(record.cycle, record.stats);
        for grid_samples in record.samples {
            for (id, sample) in grid_samples.particles {
                builder.insert(&grid_samples.species, record.cycle, id, sample)?;
            }
        }
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{open_source, TrailingCycle};
    use plexview_test_utils::fixtures;
    use proptest::prelude::*;

    fn test_environment() -> Environment {
        Environment {
            grid_shape: [4, 4, 4],
            cell_size: [1.0, 1.0, 1.0],
        }
    }

    fn electron() -> SpeciesInfo {
        SpeciesInfo {
            grid: GridIndex(0),
            name: "electron".to_string(),
            tracked: true,
        }
    }

    fn sample(x: f64) -> Sample {
        Sample {
            position: [x, x, x],
            momentum: [0.0; 3],
        }
    }

    #[test]
    fn two_cycle_scenario_builds_the_expected_store() {
        let (provider, path) = fixtures::two_cycle_electron();
        let store = ingest_path(&provider, path, IngestOptions::default()).unwrap();

        assert_eq!(store.cycles(), &[Cycle(0), Cycle(1)]);
        let electron = store.species_named("electron").unwrap();
        assert_eq!(electron.ids(), &[ParticleId(5), ParticleId(7)]);

        assert_eq!(
            electron.sample(Cycle(0), ParticleId(5)).unwrap().position,
            [0.0, 0.0, 0.0]
        );
        assert_eq!(
            electron.sample(Cycle(1), ParticleId(5)).unwrap().position,
            [1.0, 1.0, 1.0]
        );
        assert_eq!(electron.sample(Cycle(0), ParticleId(7)), None);
        assert_eq!(
            electron.sample(Cycle(1), ParticleId(7)).unwrap().position,
            [2.0, 2.0, 2.0]
        );
    }

    #[test]
    fn sentinel_cycle_never_reaches_the_store() {
        let (provider, path) = fixtures::two_cycle_electron();
        let store = ingest_path(&provider, path, IngestOptions::default()).unwrap();
        let electron = store.species_named("electron").unwrap();
        // Cycle 2 carries (9,9,9); if it shows up, the policy leaked.
        assert!(!store.cycles().contains(&Cycle(2)));
        for (_, s) in electron.samples_of(ParticleId(5)) {
            assert_ne!(s.position, [9.0, 9.0, 9.0]);
        }
    }

    #[test]
    fn cycles_are_numerically_ordered_in_the_store() {
        let (provider, path) = fixtures::multi_species();
        let store = ingest_path(&provider, path, IngestOptions::default()).unwrap();
        assert_eq!(store.cycles(), &[Cycle(1), Cycle(2), Cycle(10)]);
        let electron = store.species_named("electron").unwrap();
        let observed: Vec<Cycle> = electron
            .samples_of(ParticleId(3))
            .map(|(c, _)| c)
            .collect();
        assert_eq!(observed, vec![Cycle(1), Cycle(2)]);
    }

    #[test]
    fn same_raw_id_in_two_species_stays_distinct() {
        let (provider, path) = fixtures::multi_species();
        let store = ingest_path(&provider, path, IngestOptions::default()).unwrap();
        let electron = store.species_named("electron").unwrap();
        let proton = store.species_named("proton").unwrap();
        assert_eq!(electron.ids(), &[ParticleId(3), ParticleId(11)]);
        assert_eq!(proton.ids(), &[ParticleId(3)]);
        // Same id, different trajectories.
        assert_ne!(
            electron.sample(Cycle(1), ParticleId(3)).unwrap().position,
            proton.sample(Cycle(1), ParticleId(3)).unwrap().position
        );
    }

    #[test]
    fn file_based_ingest_matches_the_layout() {
        let (provider, template) = fixtures::file_based();
        let store = ingest_path(&provider, template, IngestOptions::default()).unwrap();
        assert_eq!(store.cycles(), &[Cycle(0), Cycle(5), Cycle(10)]);
        let electron = store.species_named("electron").unwrap();
        assert_eq!(electron.ids(), &[ParticleId(1), ParticleId(2)]);
        let observed: Vec<Cycle> = electron
            .samples_of(ParticleId(2))
            .map(|(c, _)| c)
            .collect();
        assert_eq!(observed, vec![Cycle(5)]);
    }

    #[test]
    fn duplicate_key_fails_and_consumes_the_build() {
        let mut builder = StoreBuilder::new(test_environment());
        builder.register_species(&electron());
        builder.begin_cycle(Cycle(0), CycleStats::new());
        builder
            .insert("electron", Cycle(0), ParticleId(5), sample(1.0))
            .unwrap();
        let err = builder
            .insert("electron", Cycle(0), ParticleId(5), sample(2.0))
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::DuplicateParticle {
                species: "electron".to_string(),
                cycle: Cycle(0),
                particle: ParticleId(5),
            }
        );
        // The builder is moved into the failing ingest path in
        // production; dropping it here is the "no partial store" state.
        drop(builder);
    }

    #[test]
    fn same_id_in_different_cycles_is_not_a_duplicate() {
        let mut builder = StoreBuilder::new(test_environment());
        builder.register_species(&electron());
        builder
            .insert("electron", Cycle(0), ParticleId(5), sample(1.0))
            .unwrap();
        builder
            .insert("electron", Cycle(1), ParticleId(5), sample(2.0))
            .unwrap();
        let store = builder.finish();
        assert_eq!(store.species_named("electron").unwrap().ids().len(), 1);
    }

    #[test]
    fn unknown_species_is_rejected() {
        let mut builder = StoreBuilder::new(test_environment());
        let err = builder
            .insert("muon", Cycle(0), ParticleId(1), sample(0.0))
            .unwrap_err();
        assert_eq!(
            err,
            IngestError::UnknownSpecies {
                species: "muon".to_string()
            }
        );
    }

    #[test]
    fn every_species_has_a_map_for_every_cycle() {
        let (provider, path) = fixtures::multi_species();
        let store = ingest_path(&provider, path, IngestOptions::default()).unwrap();
        let proton = store.species_named("proton").unwrap();
        // Proton has no samples in cycle 2, but the cycle map exists.
        let empty = proton.cycle_samples(Cycle(2)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn trailing_include_ingests_the_sentinel() {
        let (provider, path) = fixtures::two_cycle_electron();
        let options = IngestOptions {
            trailing: TrailingCycle::Include,
            ..Default::default()
        };
        let source = open_source(&provider, path, options).unwrap();
        let store = ingest(source.as_ref()).unwrap();
        assert_eq!(store.cycles(), &[Cycle(0), Cycle(1), Cycle(2)]);
        let electron = store.species_named("electron").unwrap();
        assert_eq!(
            electron.sample(Cycle(2), ParticleId(5)).unwrap().position,
            [9.0, 9.0, 9.0]
        );
    }

    proptest! {
        #[test]
        fn finalized_ids_are_sorted_and_unique(
            inserts in prop::collection::vec((0u64..32, 0u64..8), 0..64)
        ) {
            let mut builder = StoreBuilder::new(test_environment());
            builder.register_species(&electron());
            let mut seen = std::collections::HashSet::new();
            for &(id, cycle) in &inserts {
                if seen.insert((id, cycle)) {
                    builder
                        .insert("electron", Cycle(cycle), ParticleId(id), sample(id as f64))
                        .unwrap();
                }
            }
            let store = builder.finish();
            let ids = store.species_named("electron").unwrap().ids();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            let expected: std::collections::HashSet<u64> =
                inserts.iter().map(|&(id, _)| id).collect();
            prop_assert_eq!(ids.len(), expected.len());
        }

        #[test]
        fn cycles_always_ascend(cycles in prop::collection::vec(0u64..100, 1..32)) {
            let mut builder = StoreBuilder::new(test_environment());
            for &c in &cycles {
                builder.begin_cycle(Cycle(c), CycleStats::new());
            }
            let store = builder.finish();
            prop_assert!(store.cycles().windows(2).all(|w| w[0] < w[1]));
        }
    }
}
