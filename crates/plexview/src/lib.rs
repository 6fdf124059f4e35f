//! plexview: longitudinal views over particle-simulation output.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all plexview sub-crates. For most users, adding `plexview` as a
//! single dependency is sufficient.
//!
//! A hierarchical array store of time-sliced particle output (cycle by
//! cycle: positions, momenta, scalar statistics) is ingested once into
//! an immutable [`TrajectoryStore`](ingest::TrajectoryStore); frame,
//! trace, and statistics synthesis are then independent read-only
//! passes over it: two opposite time-alignments and a set of scalar
//! series from one pass over the source.
//!
//! # Quick start
//!
//! ```rust
//! use plexview::prelude::*;
//!
//! // An in-memory store; production code opens real containers
//! // through its own `StoreProvider`.
//! let (provider, path) = plexview_test_utils::fixtures::two_cycle_electron();
//!
//! let store = ingest_path(&provider, path, IngestOptions::default()).unwrap();
//!
//! // Frame-major: one index-aligned snapshot per cycle.
//! let frames = synthesize_frames(&store);
//! assert_eq!(frames.len(), 2);
//! assert_eq!(frames[0].label, "Cycle 0");
//!
//! // Particle-major: one sparse polyline per particle.
//! let traces = synthesize_traces(&store);
//! assert_eq!(traces.len(), 2);
//!
//! // Cycle-aligned scalar series for the stats panel.
//! let energy = scalar_series(&store, "total_E").unwrap();
//! assert_eq!(energy.values, vec![1.5, 3.25]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `plexview-core` | IDs, samples, attribute values, container traits |
//! | [`ingest`] | `plexview-ingest` | Source layouts, the reader, the trajectory store |
//! | [`synth`] | `plexview-synth` | Frame, trace, and statistics synthesis |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`plexview-core`).
///
/// Contains the strongly-typed IDs ([`types::Cycle`],
/// [`types::GridIndex`], [`types::ParticleId`]), sample and settings
/// types, and the container-access traits ([`types::Container`],
/// [`types::StoreProvider`]).
pub use plexview_core as types;

/// Source layouts, ingestion, and the trajectory store
/// (`plexview-ingest`).
///
/// Open a source with [`ingest::open_source`] (or go straight through
/// [`ingest::ingest_path`]) and build the immutable
/// [`ingest::TrajectoryStore`].
pub use plexview_ingest as ingest;

/// Frame, trace, and statistics synthesis (`plexview-synth`).
///
/// Pure read-only passes over the store:
/// [`synth::synthesize_frames`], [`synth::synthesize_traces`], and the
/// statistic series functions.
pub use plexview_synth as synth;

/// Common imports for typical plexview usage.
///
/// ```rust
/// use plexview::prelude::*;
/// ```
pub mod prelude {
    // IDs and data types
    pub use plexview_core::{
        AttrValue, Container, Cycle, Environment, GridIndex, ParticleId, Sample, SpeciesInfo,
        StoreError, StoreProvider, Vec3,
    };

    // Ingestion
    pub use plexview_ingest::{
        ingest, ingest_parallel, ingest_path, open_source, CycleSource, FileSource, FileTemplate,
        GroupSource, IngestError, IngestOptions, SourceReader, StoreBuilder, TrailingCycle,
        TrajectoryStore,
    };

    // Synthesis
    pub use plexview_synth::{
        scalar_series, species_series, synthesize_frames, synthesize_traces, Frame, FrameGroup,
        FrameSlot, Series, SeriesScope, StatsError, Trace,
    };
}
