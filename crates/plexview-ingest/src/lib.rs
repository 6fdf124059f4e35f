//! Source layouts, ingestion, and the trajectory store.
//!
//! This crate turns a hierarchical array store of time-sliced particle
//! output into the immutable [`TrajectoryStore`] that frame, trace, and
//! stats synthesis all read from. One eager pass over the requested
//! cycles builds the store; nothing re-reads the source afterwards.
//!
//! # Architecture
//!
//! - [`GroupSource`] / [`FileSource`] resolve the two storage layouts
//!   behind the [`CycleSource`] capability ([`open_source`] picks one
//!   from the path)
//! - [`SourceReader`] does the schema-aware reads (settings, stats,
//!   tracked samples) and scales positions into physical units
//! - [`StoreBuilder`] accumulates samples with duplicate-key checking;
//!   [`ingest`] / [`ingest_path`] drive the sequential pass and
//!   [`ingest_parallel`] the fan-out variant with a deterministic
//!   cycle-order merge

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod layout;
pub mod parallel;
pub mod reader;
pub mod store;
pub mod template;

pub use error::IngestError;
pub use layout::{
    open_source, CycleSource, FileSource, GroupSource, IngestOptions, StoreView, TrailingCycle,
};
pub use parallel::{ingest_parallel, resolved_worker_count};
pub use reader::{CycleRecord, GridSamples, SourceReader};
pub use store::{ingest, ingest_path, CycleStats, SpeciesSeries, StoreBuilder, TrajectoryStore};
pub use template::FileTemplate;
