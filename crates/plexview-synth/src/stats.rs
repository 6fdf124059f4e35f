//! Statistics aggregation: cycle-ordered scalar series.
//!
//! Independent of per-particle data. Series are aligned 1:1 with the
//! store's cycles; a missing value cannot be represented, so a gap is
//! a hard error for the requested series (and only for it).

use plexview_core::Cycle;
use plexview_ingest::TrajectoryStore;

use crate::error::StatsError;

/// What a series describes: the whole run, or one species.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeriesScope {
    /// A run-global statistic.
    Global,
    /// A per-species statistic, identified by canonical species name.
    Species(String),
}

/// A cycle-ascending scalar series.
///
/// `cycles` and `values` are parallel lists covering every store cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Statistic name (`"total_E"`, `"kinetic_E"`, …).
    pub name: String,
    /// Scope of the statistic.
    pub scope: SeriesScope,
    /// The store's cycles, ascending.
    pub cycles: Vec<Cycle>,
    /// One value per cycle, parallel to `cycles`.
    pub values: Vec<f64>,
}

/// Names of all global scalar statistics seen in any cycle, sorted.
pub fn scalar_names(store: &TrajectoryStore) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for &cycle in store.cycles() {
        if let Some(stats) = store.stats(cycle) {
            for name in stats.scalars.keys() {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
    }
    names.sort_unstable();
    names
}

/// Names of all per-species scalar statistics seen in any cycle, sorted.
pub fn species_stat_names(store: &TrajectoryStore) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for &cycle in store.cycles() {
        if let Some(stats) = store.stats(cycle) {
            for per_grid in stats.by_grid.values() {
                for name in per_grid.keys() {
                    if !names.contains(name) {
                        names.push(name.clone());
                    }
                }
            }
        }
    }
    names.sort_unstable();
    names
}

/// One global statistic as a series over every store cycle.
///
/// A cycle without the statistic is
/// [`StatsError::IncompleteStats`].
pub fn scalar_series(store: &TrajectoryStore, name: &str) -> Result<Series, StatsError> {
    let cycles = store.cycles().to_vec();
    let mut values = Vec::with_capacity(cycles.len());
    for &cycle in &cycles {
        let value = store
            .stats(cycle)
            .and_then(|s| s.scalar(name))
            .ok_or_else(|| StatsError::IncompleteStats {
                name: name.to_string(),
                cycle,
                species: None,
            })?;
        values.push(value);
    }
    Ok(Series {
        name: name.to_string(),
        scope: SeriesScope::Global,
        cycles,
        values,
    })
}

/// Every global statistic as a series, in sorted-name order.
pub fn all_scalar_series(store: &TrajectoryStore) -> Result<Vec<Series>, StatsError> {
    scalar_names(store)
        .into_iter()
        .map(|name| scalar_series(store, &name))
        .collect()
}

/// One per-species statistic as a series per species that carries it.
///
/// Per-grid statistics blocks are keyed by the store's raw grid index;
/// this is where they are re-mapped onto canonical species names. Any
/// grid index that never resolved to a species during ingestion is
/// [`StatsError::UnresolvedSpecies`]; raw indices are not trusted as
/// identities. A species that carries the statistic in one cycle must
/// carry it in every cycle, else [`StatsError::IncompleteStats`].
pub fn species_series(store: &TrajectoryStore, name: &str) -> Result<Vec<Series>, StatsError> {
    let cycles = store.cycles().to_vec();
    if cycles.is_empty() {
        return Ok(Vec::new());
    }

    // Resolve every referenced grid index and find the carriers.
    // Carrier order is deterministic: cycle-ascending, grid-ascending
    // within a cycle.
    let mut carriers: Vec<String> = Vec::new();
    for &cycle in &cycles {
        if let Some(stats) = store.stats(cycle) {
            for (&grid, per_grid) in &stats.by_grid {
                let species = store
                    .species_for_grid(grid)
                    .ok_or(StatsError::UnresolvedSpecies { grid, cycle })?;
                if per_grid.contains_key(name) && !carriers.iter().any(|c| c == species) {
                    carriers.push(species.to_string());
                }
            }
        }
    }
    if carriers.is_empty() {
        return Err(StatsError::IncompleteStats {
            name: name.to_string(),
            cycle: cycles[0],
            species: None,
        });
    }

    let mut series = Vec::with_capacity(carriers.len());
    for species in carriers {
        let grid = match store.species_named(&species) {
            Some(s) => s.grid(),
            // species_for_grid only returns ingested names.
            None => continue,
        };
        let mut values = Vec::with_capacity(cycles.len());
        for &cycle in &cycles {
            let value = store
                .stats(cycle)
                .and_then(|s| s.by_grid.get(&grid))
                .and_then(|per_grid| per_grid.get(name))
                .copied()
                .ok_or_else(|| StatsError::IncompleteStats {
                    name: name.to_string(),
                    cycle,
                    species: Some(species.clone()),
                })?;
            values.push(value);
        }
        series.push(Series {
            name: name.to_string(),
            scope: SeriesScope::Species(species),
            cycles: cycles.clone(),
            values,
        });
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexview_core::GridIndex;
    use plexview_ingest::{ingest_path, IngestOptions};
    use plexview_test_utils::fixtures;
    use plexview_test_utils::{MemContainer, MemProvider};

    fn multi_store() -> TrajectoryStore {
        let (provider, path) = fixtures::multi_species();
        ingest_path(&provider, path, IngestOptions::default()).unwrap()
    }

    #[test]
    fn scalar_series_covers_every_cycle() {
        let store = multi_store();
        let s = scalar_series(&store, "n_particles").unwrap();
        assert_eq!(s.scope, SeriesScope::Global);
        assert_eq!(s.cycles, vec![Cycle(1), Cycle(2), Cycle(10)]);
        assert_eq!(s.values, vec![3.0, 2.0, 3.0]);

        let e = scalar_series(&store, "total_E").unwrap();
        assert_eq!(e.values, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn scalar_names_are_sorted_and_complete() {
        let store = multi_store();
        assert_eq!(
            scalar_names(&store),
            vec!["field_E", "n_particles", "total_E"]
        );
        assert_eq!(species_stat_names(&store), vec!["kinetic_E", "n_particles"]);
    }

    #[test]
    fn all_scalar_series_matches_names() {
        let store = multi_store();
        let all = all_scalar_series(&store).unwrap();
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["field_E", "n_particles", "total_E"]);
    }

    #[test]
    fn species_series_remaps_grid_indices_to_names() {
        let store = multi_store();
        let series = species_series(&store, "kinetic_E").unwrap();
        assert_eq!(series.len(), 2);

        let electron = &series[0];
        assert_eq!(electron.scope, SeriesScope::Species("electron".to_string()));
        assert_eq!(electron.values, vec![2.5, 2.75, 3.0]);

        let proton = &series[1];
        assert_eq!(proton.scope, SeriesScope::Species("proton".to_string()));
        assert_eq!(proton.values, vec![5.0, 5.5, 6.0]);
    }

    #[test]
    fn missing_statistic_is_incomplete_stats() {
        let store = multi_store();
        let err = scalar_series(&store, "no_such_stat").unwrap_err();
        assert_eq!(
            err,
            StatsError::IncompleteStats {
                name: "no_such_stat".to_string(),
                cycle: Cycle(1),
                species: None,
            }
        );
    }

    #[test]
    fn per_species_gap_is_incomplete_stats() {
        let mut c = MemContainer::new();
        fixtures::environment(&mut c, [4, 4, 4], [1.0, 1.0, 1.0]);
        fixtures::grid(&mut c, 0, "electron", true);
        fixtures::stats(&mut c, 0, 1.0, 1.0);
        fixtures::grid_stat(&mut c, 0, 0, "kinetic_E", 0.5);
        fixtures::stats(&mut c, 1, 1.0, 1.0);
        // No kinetic_E for cycle 1.
        fixtures::stats(&mut c, 2, 0.0, 0.0);
        let mut provider = MemProvider::new();
        provider.insert("gap.h5", c);
        let store = ingest_path(&provider, "gap.h5", IngestOptions::default()).unwrap();

        let err = species_series(&store, "kinetic_E").unwrap_err();
        assert_eq!(
            err,
            StatsError::IncompleteStats {
                name: "kinetic_E".to_string(),
                cycle: Cycle(1),
                species: Some("electron".to_string()),
            }
        );
    }

    #[test]
    fn stray_grid_index_is_unresolved_species() {
        let mut c = MemContainer::new();
        fixtures::environment(&mut c, [4, 4, 4], [1.0, 1.0, 1.0]);
        fixtures::grid(&mut c, 0, "electron", true);
        fixtures::stats(&mut c, 0, 1.0, 1.0);
        // Grid 7 exists nowhere in the settings table.
        fixtures::grid_stat(&mut c, 0, 7, "kinetic_E", 0.5);
        fixtures::stats(&mut c, 1, 0.0, 0.0);
        let mut provider = MemProvider::new();
        provider.insert("stray.h5", c);
        let store = ingest_path(&provider, "stray.h5", IngestOptions::default()).unwrap();

        let err = species_series(&store, "kinetic_E").unwrap_err();
        assert_eq!(
            err,
            StatsError::UnresolvedSpecies {
                grid: GridIndex(7),
                cycle: Cycle(0),
            }
        );
    }

    #[test]
    fn stats_failure_does_not_affect_frames_or_traces() {
        let store = multi_store();
        assert!(scalar_series(&store, "no_such_stat").is_err());
        // The store is untouched; both synthesizers still run.
        assert_eq!(crate::frames::synthesize_frames(&store).len(), 3);
        assert!(!crate::traces::synthesize_traces(&store).is_empty());
    }
}
