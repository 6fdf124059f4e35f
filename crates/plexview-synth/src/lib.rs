//! Frame, trace, and statistics synthesis over a trajectory store.
//!
//! The two longitudinal views of one store, plus scalar series:
//!
//! - [`synthesize_frames`]: frame-major, one index-aligned snapshot
//!   per cycle with absent particles marked explicitly
//! - [`synthesize_traces`]: particle-major, one sparse lifetime
//!   polyline per `(species, particle)` pair
//! - [`scalar_series`] / [`species_series`]: cycle-aligned statistic
//!   series, with per-species statistics re-mapped from raw grid
//!   indices to species names
//!
//! All three are pure, read-only passes over an immutable
//! [`TrajectoryStore`](plexview_ingest::TrajectoryStore): they may run
//! repeatedly, or concurrently, and produce identical output each time.
//! Everything here is presentation-agnostic plain data; mapping to
//! visual marks belongs to a separate rendering layer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod frames;
pub mod stats;
pub mod traces;

pub use error::StatsError;
pub use frames::{synthesize_frames, Frame, FrameGroup, FrameSlot};
pub use stats::{
    all_scalar_series, scalar_names, scalar_series, species_series, species_stat_names, Series,
    SeriesScope,
};
pub use traces::{synthesize_traces, Trace};
