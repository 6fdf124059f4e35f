//! Error types for statistics aggregation.

use std::fmt;

use plexview_core::{Cycle, GridIndex};

/// Errors from the stats aggregator.
///
/// Fatal for the specific series request only; frame and trace
/// synthesis never consult statistics and are unaffected.
#[derive(Clone, Debug, PartialEq)]
pub enum StatsError {
    /// A per-grid statistics block refers to a grid index that never
    /// resolved to a species name during ingestion. The aggregator
    /// refuses to trust raw index stability across schema generations.
    UnresolvedSpecies {
        /// The unresolvable grid index.
        grid: GridIndex,
        /// The cycle whose stats block referred to it.
        cycle: Cycle,
    },
    /// A statistic is absent for a cycle. Series are aligned 1:1 with
    /// the store's cycles, so a gap cannot be represented.
    IncompleteStats {
        /// Name of the statistic.
        name: String,
        /// The cycle missing it.
        cycle: Cycle,
        /// The species scope, or `None` for a global statistic.
        species: Option<String>,
    },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedSpecies { grid, cycle } => {
                write!(
                    f,
                    "stats for cycle {cycle} refer to grid {grid}, \
                     which resolves to no species"
                )
            }
            Self::IncompleteStats {
                name,
                cycle,
                species,
            } => match species {
                Some(species) => write!(
                    f,
                    "statistic '{name}' for species '{species}' is missing in cycle {cycle}"
                ),
                None => write!(f, "statistic '{name}' is missing in cycle {cycle}"),
            },
        }
    }
}

impl std::error::Error for StatsError {}
