//! The source reader: schema-aware reads over a [`CycleSource`].
//!
//! Expected schema inside a container:
//!
//! ```text
//! settings/environment            attrs: grid_shape (3 ints),
//!                                        cell_size (3 floats)
//! settings/grids/<index>          attrs: species (string), tracked (flag)
//! cycles/<n>/stats                attrs: global scalar statistics
//! cycles/<n>/stats/grids/<index>  attrs: per-species scalar statistics
//! cycles/<n>/grids/<index>/tracked
//!     attr tracking_ids (int vector); datasets X, U (N×3)
//! ```
//!
//! Untracked grids are skipped entirely. A missing `tracked` subtree
//! means zero tracked particles that cycle: an empty sample set, not
//! an error. Raw coordinates are scaled by the cell size here, once;
//! nothing downstream rescales.

use indexmap::IndexMap;

use plexview_core::{Cycle, Environment, GridIndex, ParticleId, Sample, SpeciesInfo};

use crate::error::IngestError;
use crate::layout::{CycleSource, StoreView};
use crate::store::CycleStats;

const ENVIRONMENT: &str = "settings/environment";
const GRIDS: &str = "settings/grids";
const STATS: &str = "stats";

/// One cycle's tracked samples for one species.
#[derive(Clone, Debug)]
pub struct GridSamples {
    /// The store's raw grid index.
    pub grid: GridIndex,
    /// Canonical species name (resolved from the grid settings).
    pub species: String,
    /// `(id, sample)` pairs, in store order. Positions are already
    /// cell-size scaled.
    pub particles: Vec<(ParticleId, Sample)>,
}

/// Everything read from one cycle.
#[derive(Clone, Debug)]
pub struct CycleRecord {
    /// The cycle this record describes.
    pub cycle: Cycle,
    /// Scalar statistics (empty if the cycle has no stats subtree).
    pub stats: CycleStats,
    /// Tracked samples, one entry per tracked species in grid order.
    pub samples: Vec<GridSamples>,
}

/// Schema-aware reader over one resolved source.
///
/// Construction reads the run-level settings (environment, species
/// table) and resolves the cycle list; [`read_cycle`](Self::read_cycle)
/// then reads one cycle at a time. The reader holds no per-cycle state,
/// so cycles may be read in any order, including from several threads.
pub struct SourceReader<'a> {
    source: &'a dyn CycleSource,
    environment: Environment,
    species: IndexMap<GridIndex, SpeciesInfo>,
    cycles: Vec<Cycle>,
}

impl std::fmt::Debug for SourceReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceReader")
            .field("environment", &self.environment)
            .field("species", &self.species)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl<'a> SourceReader<'a> {
    /// Open a reader: reads settings and resolves the cycle list.
    pub fn new(source: &'a dyn CycleSource) -> Result<Self, IngestError> {
        let settings = source.open_settings()?;
        let environment = read_environment(&settings)?;
        let species = read_species(&settings)?;
        let cycles = source.cycles()?;
        Ok(Self {
            source,
            environment,
            species,
            cycles,
        })
    }

    /// The run-level environment constants.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Tracked species, keyed by grid index in ascending grid order.
    pub fn species(&self) -> &IndexMap<GridIndex, SpeciesInfo> {
        &self.species
    }

    /// The resolved ascending cycle list.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    /// Read one cycle: statistics plus per-species tracked samples.
    pub fn read_cycle(&self, cycle: Cycle) -> Result<CycleRecord, IngestError> {
        let view = self.source.open_cycle(cycle)?;
        let stats = read_stats(&view)?;
        let mut samples = Vec::with_capacity(self.species.len());
        for info in self.species.values() {
            samples.push(self.read_grid_samples(&view, info)?);
        }
        Ok(CycleRecord {
            cycle,
            stats,
            samples,
        })
    }

    fn read_grid_samples(
        &self,
        view: &StoreView<'_>,
        info: &SpeciesInfo,
    ) -> Result<GridSamples, IngestError> {
        let base = format!("grids/{}/tracked", info.grid);
        let mut particles = Vec::new();
        if view.has_group(&base) {
            let ids = view.require_ids(&base, "tracking_ids")?;
            let xs = view.read_vectors(&format!("{base}/X"))?;
            let us = view.read_vectors(&format!("{base}/U"))?;
            if xs.len() != ids.len() || us.len() != ids.len() {
                return Err(IngestError::MalformedSchema {
                    path: view.abs_path(&base),
                    detail: format!(
                        "tracking_ids has {} entries but X has {} and U has {}",
                        ids.len(),
                        xs.len(),
                        us.len()
                    ),
                });
            }
            particles.reserve(ids.len());
            for ((id, x), u) in ids.into_iter().zip(xs).zip(us) {
                particles.push((id, Sample::from_raw(x, u, self.environment.cell_size)));
            }
        }
        Ok(GridSamples {
            grid: info.grid,
            species: info.name.clone(),
            particles,
        })
    }
}

fn read_environment(settings: &StoreView<'_>) -> Result<Environment, IngestError> {
    let shape = settings.require_int3(ENVIRONMENT, "grid_shape")?;
    let cell_size = settings.require_float3(ENVIRONMENT, "cell_size")?;
    let mut grid_shape = [0u64; 3];
    for axis in 0..3 {
        if shape[axis] < 0 {
            return Err(IngestError::MalformedSchema {
                path: settings.abs_path(ENVIRONMENT),
                detail: format!("grid_shape[{axis}] is negative"),
            });
        }
        grid_shape[axis] = shape[axis] as u64;
    }
    Ok(Environment {
        grid_shape,
        cell_size,
    })
}

/// Read the grid table: tracked species only, ascending grid order,
/// canonicalized on the species name.
fn read_species(settings: &StoreView<'_>) -> Result<IndexMap<GridIndex, SpeciesInfo>, IngestError> {
    let names = settings.child_groups(GRIDS)?;
    let mut indices = Vec::with_capacity(names.len());
    for name in names {
        let index: u32 = name.parse().map_err(|_| IngestError::MalformedSchema {
            path: settings.abs_path(&format!("{GRIDS}/{name}")),
            detail: "grid group name is not an integer".to_string(),
        })?;
        indices.push(index);
    }
    indices.sort_unstable();

    let mut table = IndexMap::with_capacity(indices.len());
    for index in indices {
        let rel = format!("{GRIDS}/{index}");
        let name = settings.require_str(&rel, "species")?;
        let tracked = settings.require_flag(&rel, "tracked")?;
        if !tracked {
            continue;
        }
        if table.values().any(|info: &SpeciesInfo| info.name == name) {
            return Err(IngestError::MalformedSchema {
                path: settings.abs_path(&rel),
                detail: format!("duplicate species name '{name}'"),
            });
        }
        table.insert(
            GridIndex(index),
            SpeciesInfo {
                grid: GridIndex(index),
                name,
                tracked,
            },
        );
    }
    Ok(table)
}

/// Read a cycle's statistics. A missing stats subtree yields empty
/// stats; gaps only become errors at aggregation time.
fn read_stats(view: &StoreView<'_>) -> Result<CycleStats, IngestError> {
    let mut stats = CycleStats::new();
    if !view.has_group(STATS) {
        return Ok(stats);
    }
    for name in view.attr_names(STATS)? {
        if let Some(value) = view.attr(STATS, &name)?.and_then(|a| a.as_float()) {
            stats.scalars.insert(name, value);
        }
    }
    let grids_rel = format!("{STATS}/grids");
    if view.has_group(&grids_rel) {
        for name in view.child_groups(&grids_rel)? {
            let index: u32 = name.parse().map_err(|_| IngestError::MalformedSchema {
                path: view.abs_path(&format!("{grids_rel}/{name}")),
                detail: "grid stats group name is not an integer".to_string(),
            })?;
            let rel = format!("{grids_rel}/{name}");
            let mut per_grid = IndexMap::new();
            for attr_name in view.attr_names(&rel)? {
                if let Some(value) = view.attr(&rel, &attr_name)?.and_then(|a| a.as_float()) {
                    per_grid.insert(attr_name, value);
                }
            }
            stats.by_grid.insert(GridIndex(index), per_grid);
        }
        stats.by_grid.sort_unstable_keys();
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GroupSource, IngestOptions};
    use plexview_test_utils::fixtures;
    use plexview_test_utils::{MemContainer, MemProvider};

    fn open(provider: &MemProvider, path: &str) -> GroupSource {
        GroupSource::open(provider, path, IngestOptions::default()).unwrap()
    }

    #[test]
    fn settings_are_read_once() {
        let (provider, path) = fixtures::multi_species();
        let source = open(&provider, path);
        let reader = SourceReader::new(&source).unwrap();
        assert_eq!(reader.environment().grid_shape, [16, 16, 16]);
        assert_eq!(reader.environment().cell_size, [0.5, 0.5, 2.0]);
        assert_eq!(reader.cycles(), &[Cycle(1), Cycle(2), Cycle(10)]);
    }

    #[test]
    fn untracked_grids_are_skipped() {
        let (provider, path) = fixtures::multi_species();
        let source = open(&provider, path);
        let reader = SourceReader::new(&source).unwrap();
        let names: Vec<&str> = reader.species().values().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["electron", "proton"]);
    }

    #[test]
    fn positions_are_scaled_at_read_time() {
        let (provider, path) = fixtures::multi_species();
        let source = open(&provider, path);
        let reader = SourceReader::new(&source).unwrap();
        let record = reader.read_cycle(Cycle(1)).unwrap();
        let electron = &record.samples[0];
        assert_eq!(electron.species, "electron");
        // Raw (1,1,1) with cell size (0.5, 0.5, 2.0).
        assert_eq!(electron.particles[0].1.position, [0.5, 0.5, 2.0]);
    }

    #[test]
    fn missing_tracked_subtree_is_an_empty_sample_set() {
        let (provider, path) = fixtures::multi_species();
        let source = open(&provider, path);
        let reader = SourceReader::new(&source).unwrap();
        let record = reader.read_cycle(Cycle(2)).unwrap();
        let proton = &record.samples[1];
        assert_eq!(proton.species, "proton");
        assert!(proton.particles.is_empty());
    }

    #[test]
    fn stats_include_per_grid_blocks() {
        let (provider, path) = fixtures::multi_species();
        let source = open(&provider, path);
        let reader = SourceReader::new(&source).unwrap();
        let record = reader.read_cycle(Cycle(1)).unwrap();
        assert_eq!(record.stats.scalars.get("n_particles"), Some(&3.0));
        assert_eq!(record.stats.scalars.get("field_E"), Some(&4.0));
        let grid0 = record.stats.by_grid.get(&GridIndex(0)).unwrap();
        assert_eq!(grid0.get("kinetic_E"), Some(&2.5));
    }

    #[test]
    fn missing_environment_attr_is_malformed_schema() {
        let mut c = MemContainer::new();
        c.set_attr("settings/environment", "grid_shape", [4i64, 4, 4]);
        // cell_size intentionally absent.
        fixtures::grid(&mut c, 0, "electron", true);
        c.add_group("cycles/0");
        c.add_group("cycles/1");
        let mut provider = MemProvider::new();
        provider.insert("bad.h5", c);
        let source = open(&provider, "bad.h5");
        let err = SourceReader::new(&source).unwrap_err();
        assert!(matches!(err, IngestError::MalformedSchema { .. }));
    }

    #[test]
    fn duplicate_species_name_is_malformed_schema() {
        let mut c = MemContainer::new();
        fixtures::environment(&mut c, [4, 4, 4], [1.0, 1.0, 1.0]);
        fixtures::grid(&mut c, 0, "electron", true);
        fixtures::grid(&mut c, 1, "electron", true);
        c.add_group("cycles/0");
        c.add_group("cycles/1");
        let mut provider = MemProvider::new();
        provider.insert("dup.h5", c);
        let source = open(&provider, "dup.h5");
        let err = SourceReader::new(&source).unwrap_err();
        assert!(matches!(err, IngestError::MalformedSchema { .. }));
    }

    #[test]
    fn id_array_length_mismatch_is_malformed_schema() {
        let mut c = MemContainer::new();
        fixtures::environment(&mut c, [4, 4, 4], [1.0, 1.0, 1.0]);
        fixtures::grid(&mut c, 0, "electron", true);
        let base = "cycles/0/grids/0/tracked";
        c.set_attr(base, "tracking_ids", vec![1i64, 2]);
        c.set_vectors(&format!("{base}/X"), vec![[0.0; 3]]);
        c.set_vectors(&format!("{base}/U"), vec![[0.0; 3]]);
        c.add_group("cycles/1");
        let mut provider = MemProvider::new();
        provider.insert("short.h5", c);
        let source = open(&provider, "short.h5");
        let reader = SourceReader::new(&source).unwrap();
        assert!(matches!(
            reader.read_cycle(Cycle(0)),
            Err(IngestError::MalformedSchema { .. })
        ));
    }
}
