//! Test utilities and mock stores for plexview development.
//!
//! Provides an in-memory implementation of the container-access traits
//! ([`Container`], [`StoreProvider`]) and canned source [`fixtures`]
//! shared by the workspace's tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::BTreeMap;

use indexmap::IndexMap;

use plexview_core::{AttrValue, Container, StoreError, StoreProvider, Vec3};

/// One group in a [`MemContainer`]: attributes plus an optional N×3
/// float dataset.
#[derive(Clone, Debug, Default)]
struct MemGroup {
    attrs: IndexMap<String, AttrValue>,
    vectors: Option<Vec<Vec3>>,
}

/// In-memory hierarchical container.
///
/// Groups are addressed by `/`-separated paths; the empty path is the
/// root. Child enumeration follows `BTreeMap` string order, which
/// mirrors the lexicographic iteration order of real hierarchical
/// stores: `"10"` lists before `"2"`, and code under test must do
/// its own numeric sorting.
#[derive(Clone, Debug)]
pub struct MemContainer {
    groups: BTreeMap<String, MemGroup>,
}

impl MemContainer {
    pub fn new() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(String::new(), MemGroup::default());
        Self { groups }
    }

    /// Create the group at `path` (and any missing ancestors).
    pub fn add_group(&mut self, path: &str) {
        let mut so_far = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !so_far.is_empty() {
                so_far.push('/');
            }
            so_far.push_str(segment);
            self.groups.entry(so_far.clone()).or_default();
        }
    }

    /// Set an attribute on the group at `path`, creating the group if
    /// needed.
    pub fn set_attr(&mut self, path: &str, name: &str, value: impl Into<AttrValue>) {
        self.add_group(path);
        self.groups
            .get_mut(path)
            .unwrap()
            .attrs
            .insert(name.to_string(), value.into());
    }

    /// Store an N×3 dataset at `path`, creating the group if needed.
    pub fn set_vectors(&mut self, path: &str, vectors: Vec<Vec3>) {
        self.add_group(path);
        self.groups.get_mut(path).unwrap().vectors = Some(vectors);
    }
}

impl Default for MemContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Container for MemContainer {
    fn has_group(&self, path: &str) -> bool {
        self.groups.contains_key(path)
    }

    fn child_groups(&self, path: &str) -> Result<Vec<String>, StoreError> {
        if !self.groups.contains_key(path) {
            return Err(StoreError::MissingGroup {
                path: path.to_string(),
            });
        }
        let mut children = Vec::new();
        for key in self.groups.keys() {
            let rest = if path.is_empty() {
                key.as_str()
            } else {
                match key.strip_prefix(path).and_then(|r| r.strip_prefix('/')) {
                    Some(rest) => rest,
                    None => continue,
                }
            };
            if !rest.is_empty() && !rest.contains('/') {
                children.push(rest.to_string());
            }
        }
        Ok(children)
    }

    fn attr_names(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let group = self.groups.get(path).ok_or_else(|| StoreError::MissingGroup {
            path: path.to_string(),
        })?;
        Ok(group.attrs.keys().cloned().collect())
    }

    fn attr(&self, path: &str, name: &str) -> Result<Option<AttrValue>, StoreError> {
        let group = self.groups.get(path).ok_or_else(|| StoreError::MissingGroup {
            path: path.to_string(),
        })?;
        Ok(group.attrs.get(name).cloned())
    }

    fn read_vectors(&self, path: &str) -> Result<Vec<Vec3>, StoreError> {
        let group = self.groups.get(path).ok_or_else(|| StoreError::MissingGroup {
            path: path.to_string(),
        })?;
        group.vectors.clone().ok_or_else(|| StoreError::MissingData {
            path: path.to_string(),
        })
    }
}

/// In-memory [`StoreProvider`]: a map from path to container.
#[derive(Clone, Debug, Default)]
pub struct MemProvider {
    files: BTreeMap<String, MemContainer>,
}

impl MemProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container under `path`.
    pub fn insert(&mut self, path: &str, container: MemContainer) {
        self.files.insert(path.to_string(), container);
    }
}

/// Split a registered path into `(directory, file name)`.
fn split_dir(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", path),
    }
}

impl StoreProvider for MemProvider {
    fn open(&self, path: &str) -> Result<Box<dyn Container>, StoreError> {
        match self.files.get(path) {
            Some(container) => Ok(Box::new(container.clone())),
            None => Err(StoreError::Unavailable {
                path: path.to_string(),
                detail: "no such container".to_string(),
            }),
        }
    }

    fn sibling_files(&self, dir: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .files
            .keys()
            .filter_map(|path| {
                let (d, name) = split_dir(path);
                (d == dir).then(|| name.to_string())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_groups_are_string_ordered() {
        let mut c = MemContainer::new();
        c.add_group("cycles/2");
        c.add_group("cycles/10");
        c.add_group("cycles/1");
        let children = c.child_groups("cycles").unwrap();
        assert_eq!(children, vec!["1", "10", "2"]);
    }

    #[test]
    fn missing_group_is_an_error_but_missing_attr_is_none() {
        let mut c = MemContainer::new();
        c.set_attr("settings", "a", 1i64);
        assert!(matches!(
            c.attr("nowhere", "a"),
            Err(StoreError::MissingGroup { .. })
        ));
        assert_eq!(c.attr("settings", "b").unwrap(), None);
    }

    #[test]
    fn sibling_files_filters_by_directory() {
        let mut p = MemProvider::new();
        p.insert("out/a.h5", MemContainer::new());
        p.insert("out/b.h5", MemContainer::new());
        p.insert("elsewhere/c.h5", MemContainer::new());
        p.insert("root.h5", MemContainer::new());
        assert_eq!(p.sibling_files("out").unwrap(), vec!["a.h5", "b.h5"]);
        assert_eq!(p.sibling_files("").unwrap(), vec!["root.h5"]);
    }
}
