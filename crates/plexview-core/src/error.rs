//! Error type for container-level store access.

use std::fmt;

/// Errors raised by [`Container`](crate::Container) and
/// [`StoreProvider`](crate::StoreProvider) implementations.
///
/// These are the store's own failure modes; the ingestion layer folds
/// them into its schema-level taxonomy (anything other than
/// `Unavailable` indicates a malformed schema from the pipeline's point
/// of view).
#[derive(Clone, Debug, PartialEq)]
pub enum StoreError {
    /// The container at `path` could not be opened.
    Unavailable {
        /// Path of the container.
        path: String,
        /// Human-readable description of the failure.
        detail: String,
    },
    /// No group exists at the addressed path.
    MissingGroup {
        /// Full path of the missing group.
        path: String,
    },
    /// The group exists but carries no dataset.
    MissingData {
        /// Full path of the group addressed as a dataset.
        path: String,
    },
    /// A required attribute is absent.
    MissingAttr {
        /// Full path of the group.
        path: String,
        /// Name of the missing attribute.
        name: String,
    },
    /// An attribute exists but has the wrong kind or arity.
    AttrKind {
        /// Full path of the group.
        path: String,
        /// Name of the offending attribute.
        name: String,
        /// What the caller expected (e.g. `"3-float vector"`).
        expected: &'static str,
    },
    /// A dataset or group name could not be interpreted.
    MalformedData {
        /// Full path of the offending node.
        path: String,
        /// What went wrong.
        detail: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { path, detail } => {
                write!(f, "container '{path}' unavailable: {detail}")
            }
            Self::MissingGroup { path } => write!(f, "no group at '{path}'"),
            Self::MissingData { path } => write!(f, "no dataset at '{path}'"),
            Self::MissingAttr { path, name } => {
                write!(f, "group '{path}' has no attribute '{name}'")
            }
            Self::AttrKind {
                path,
                name,
                expected,
            } => {
                write!(f, "attribute '{name}' at '{path}' is not a {expected}")
            }
            Self::MalformedData { path, detail } => {
                write!(f, "malformed data at '{path}': {detail}")
            }
        }
    }
}

impl std::error::Error for StoreError {}
