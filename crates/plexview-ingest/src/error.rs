//! Error types for source resolution and ingestion.

use std::fmt;

use plexview_core::{Cycle, ParticleId, StoreError};

/// Errors raised while resolving a source or building the trajectory
/// store.
///
/// All variants abort construction: there is no partially-usable store
/// after an ingestion failure.
#[derive(Clone, Debug, PartialEq)]
pub enum IngestError {
    /// The store (or one of its per-cycle containers) could not be opened.
    SourceUnavailable {
        /// Path of the container that failed to open.
        path: String,
        /// Human-readable description of the failure.
        detail: String,
    },
    /// A required attribute, group, or dataset is absent or has the
    /// wrong shape.
    MalformedSchema {
        /// Full path of the offending node.
        path: String,
        /// What went wrong.
        detail: String,
    },
    /// A file-name template does not contain exactly one `%T`
    /// placeholder.
    InvalidTemplate {
        /// The offending template.
        template: String,
    },
    /// No cycles remain after layout policy and explicit selection.
    NoCycles,
    /// Two samples arrived for the same `(species, cycle, particle)`
    /// key. The reader never produces this from a well-formed store;
    /// it indicates upstream corruption and is never silently resolved
    /// by overwriting.
    DuplicateParticle {
        /// Species name.
        species: String,
        /// Cycle of the colliding insert.
        cycle: Cycle,
        /// The colliding particle id.
        particle: ParticleId,
    },
    /// A sample was inserted for a species the builder has never seen.
    UnknownSpecies {
        /// The unregistered species name.
        species: String,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable { path, detail } => {
                write!(f, "source '{path}' unavailable: {detail}")
            }
            Self::MalformedSchema { path, detail } => {
                write!(f, "malformed schema at '{path}': {detail}")
            }
            Self::InvalidTemplate { template } => {
                write!(
                    f,
                    "file template '{template}' must contain exactly one %T placeholder \
                     in its file name"
                )
            }
            Self::NoCycles => write!(f, "no cycles to ingest"),
            Self::DuplicateParticle {
                species,
                cycle,
                particle,
            } => {
                write!(
                    f,
                    "duplicate sample for particle {particle} of species '{species}' \
                     in cycle {cycle}"
                )
            }
            Self::UnknownSpecies { species } => {
                write!(f, "species '{species}' was never registered")
            }
        }
    }
}

impl std::error::Error for IngestError {}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable { path, detail } => Self::SourceUnavailable { path, detail },
            StoreError::MissingGroup { path } => Self::MalformedSchema {
                path,
                detail: "missing group".to_string(),
            },
            StoreError::MissingData { path } => Self::MalformedSchema {
                path,
                detail: "missing dataset".to_string(),
            },
            StoreError::MissingAttr { path, name } => Self::MalformedSchema {
                path,
                detail: format!("missing attribute '{name}'"),
            },
            StoreError::AttrKind {
                path,
                name,
                expected,
            } => Self::MalformedSchema {
                path,
                detail: format!("attribute '{name}' is not a {expected}"),
            },
            StoreError::MalformedData { path, detail } => Self::MalformedSchema { path, detail },
        }
    }
}
