//! Read-only access traits for hierarchical array stores.
//!
//! The underlying container format (storage layout, chunking,
//! compression) is an external collaborator. plexview reads it through
//! [`Container`], and resolves multi-file layouts through
//! [`StoreProvider`]. Implementations own their handles; dropping the
//! value releases them, so every exit path (including early returns on
//! malformed schemas) releases the store.

use crate::attr::AttrValue;
use crate::error::StoreError;
use crate::sample::Vec3;

/// Read-only hierarchical access to one open container.
///
/// Paths are `/`-separated group paths relative to the container root
/// (e.g. `"cycles/12/grids/0/tracked"`); the empty string addresses the
/// root itself.
///
/// # Thread Safety
///
/// `Send + Sync` is required so that parallel ingestion can read
/// independent cycle subtrees from worker threads through a shared
/// reference.
pub trait Container: Send + Sync {
    /// Whether a group exists at `path`.
    fn has_group(&self, path: &str) -> bool;

    /// Names of the direct child groups of `path`, in the store's native
    /// order.
    ///
    /// The native order of a hierarchical store is typically *string*
    /// order, so `"10"` sorts before `"2"`. Callers that need numeric
    /// order must sort after parsing; nothing in plexview trusts this
    /// ordering.
    fn child_groups(&self, path: &str) -> Result<Vec<String>, StoreError>;

    /// Names of the attributes attached to the group at `path`, in the
    /// store's native order.
    fn attr_names(&self, path: &str) -> Result<Vec<String>, StoreError>;

    /// Read one attribute of the group at `path`.
    ///
    /// Returns `Ok(None)` if the group exists but carries no such
    /// attribute; `Err(StoreError::MissingGroup)` if the group itself is
    /// absent.
    fn attr(&self, path: &str, name: &str) -> Result<Option<AttrValue>, StoreError>;

    /// Read the N×3 float dataset stored at `path`.
    fn read_vectors(&self, path: &str) -> Result<Vec<Vec3>, StoreError>;

    /// Read an attribute that must exist.
    ///
    /// Like [`attr`](Self::attr), but an absent attribute is
    /// `StoreError::MissingAttr` instead of `Ok(None)`.
    fn require_attr(&self, path: &str, name: &str) -> Result<AttrValue, StoreError> {
        self.attr(path, name)?.ok_or_else(|| StoreError::MissingAttr {
            path: path.to_string(),
            name: name.to_string(),
        })
    }
}

/// Opens containers by path and enumerates candidate files for
/// template resolution.
///
/// Concrete providers wrap whatever actually holds the data: a
/// filesystem of HDF5-like files in production, an in-memory map in
/// tests. The ingestion layer never touches the filesystem directly.
pub trait StoreProvider: Send + Sync {
    /// Open the container at `path`.
    ///
    /// Fails with [`StoreError::Unavailable`] if nothing can be opened
    /// there.
    fn open(&self, path: &str) -> Result<Box<dyn Container>, StoreError>;

    /// File names (not full paths) available in the directory `dir`.
    ///
    /// Used to resolve a file-based layout's cycle list by matching the
    /// names against the file-name template. `dir` may be empty for the
    /// provider's root.
    fn sibling_files(&self, dir: &str) -> Result<Vec<String>, StoreError>;
}
