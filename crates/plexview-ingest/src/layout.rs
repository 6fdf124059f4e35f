//! Source layout strategies.
//!
//! A hierarchical store arrives in one of two encodings: *group-based*
//! (one container, every cycle nested under `cycles/`) or *file-based*
//! (one container per cycle, resolved from a [`FileTemplate`]). Both are
//! presented to the reader through the [`CycleSource`] trait, the
//! capability to resolve the cycle list and open per-cycle views, so
//! the trajectory store never knows which layout supplied its data.

use plexview_core::{AttrValue, Container, Cycle, ParticleId, StoreError, StoreProvider, Vec3};

use crate::error::IngestError;
use crate::template::FileTemplate;

/// Root attribute naming the layout encoding, when the store declares it.
const ENCODING_ATTR: &str = "iteration_encoding";

/// Group holding the per-cycle subtrees.
const CYCLES_GROUP: &str = "cycles";

// ── Options ────────────────────────────────────────────────────────

/// Policy for the trailing cycle of a resolved cycle list.
///
/// Group-based sources commonly end with a sentinel cycle written at
/// shutdown, which the original pipeline always skipped; file-based
/// sources have no such sentinel. Rather than hard-coding either
/// behavior, the exclusion is an explicit choice with layout-dependent
/// defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrailingCycle {
    /// Use the layout's default: exclude for group-based, include for
    /// file-based.
    #[default]
    LayoutDefault,
    /// Always keep the trailing cycle.
    Include,
    /// Always drop the trailing cycle.
    Exclude,
}

/// External parameters for opening a source.
///
/// Cycle-range selection is the only external parameter of the
/// pipeline; everything else is read from the store itself.
#[derive(Clone, Debug, Default)]
pub struct IngestOptions {
    /// Explicit set of cycles to include, or `None` for all resolved
    /// cycles. Selection intersects with what the source actually has.
    pub cycles: Option<Vec<Cycle>>,
    /// Trailing-cycle policy (applied before explicit selection).
    pub trailing: TrailingCycle,
}

/// Sort, apply the trailing policy, then intersect with the explicit
/// selection. An empty result is [`IngestError::NoCycles`].
fn resolve_policy(
    mut cycles: Vec<Cycle>,
    options: &IngestOptions,
    layout_excludes_trailing: bool,
) -> Result<Vec<Cycle>, IngestError> {
    cycles.sort_unstable();
    cycles.dedup();
    let exclude = match options.trailing {
        TrailingCycle::LayoutDefault => layout_excludes_trailing,
        TrailingCycle::Include => false,
        TrailingCycle::Exclude => true,
    };
    if exclude {
        cycles.pop();
    }
    if let Some(selection) = &options.cycles {
        cycles.retain(|c| selection.contains(c));
    }
    if cycles.is_empty() {
        return Err(IngestError::NoCycles);
    }
    Ok(cycles)
}

// ── Views ──────────────────────────────────────────────────────────

/// Either a borrowed container (group-based: one container shared by
/// every view) or an owned one (file-based: each view owns its file's
/// handle, released on drop).
enum ContainerRef<'a> {
    Shared(&'a dyn Container),
    Owned(Box<dyn Container>),
}

impl ContainerRef<'_> {
    fn get(&self) -> &dyn Container {
        match self {
            Self::Shared(c) => *c,
            Self::Owned(c) => c.as_ref(),
        }
    }
}

/// A read-only view into one subtree of an open container.
///
/// All paths taken by the view's methods are relative to its base, so
/// the reader addresses `"grids/0/tracked"` identically whether the
/// subtree lives at `cycles/12/` of a shared container (group-based)
/// or of a per-cycle file (file-based). Errors carry the absolute path.
pub struct StoreView<'a> {
    container: ContainerRef<'a>,
    base: String,
}

impl<'a> StoreView<'a> {
    fn shared(container: &'a dyn Container, base: String) -> Self {
        Self {
            container: ContainerRef::Shared(container),
            base,
        }
    }

    fn owned(container: Box<dyn Container>, base: String) -> Self {
        Self {
            container: ContainerRef::Owned(container),
            base,
        }
    }

    /// The absolute path of a view-relative path.
    pub fn abs_path(&self, rel: &str) -> String {
        match (self.base.is_empty(), rel.is_empty()) {
            (true, _) => rel.to_string(),
            (false, true) => self.base.clone(),
            (false, false) => format!("{}/{}", self.base, rel),
        }
    }

    /// Whether a group exists at `rel`.
    pub fn has_group(&self, rel: &str) -> bool {
        self.container.get().has_group(&self.abs_path(rel))
    }

    /// Direct child group names under `rel`, in store-native order.
    pub fn child_groups(&self, rel: &str) -> Result<Vec<String>, StoreError> {
        self.container.get().child_groups(&self.abs_path(rel))
    }

    /// Attribute names on the group at `rel`, in store-native order.
    pub fn attr_names(&self, rel: &str) -> Result<Vec<String>, StoreError> {
        self.container.get().attr_names(&self.abs_path(rel))
    }

    /// Read one attribute, `Ok(None)` if absent.
    pub fn attr(&self, rel: &str, name: &str) -> Result<Option<AttrValue>, StoreError> {
        self.container.get().attr(&self.abs_path(rel), name)
    }

    /// Read the N×3 dataset at `rel`.
    pub fn read_vectors(&self, rel: &str) -> Result<Vec<Vec3>, StoreError> {
        self.container.get().read_vectors(&self.abs_path(rel))
    }

    /// Read a required string attribute.
    pub fn require_str(&self, rel: &str, name: &str) -> Result<String, StoreError> {
        let path = self.abs_path(rel);
        let value = self.container.get().require_attr(&path, name)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or(StoreError::AttrKind {
                path,
                name: name.to_string(),
                expected: "string",
            })
    }

    /// Read a required integer flag attribute (`0` = false).
    pub fn require_flag(&self, rel: &str, name: &str) -> Result<bool, StoreError> {
        let path = self.abs_path(rel);
        let value = self.container.get().require_attr(&path, name)?;
        value.as_int().map(|v| v != 0).ok_or(StoreError::AttrKind {
            path,
            name: name.to_string(),
            expected: "integer flag",
        })
    }

    /// Read a required 3-int vector attribute.
    pub fn require_int3(&self, rel: &str, name: &str) -> Result<[i64; 3], StoreError> {
        let path = self.abs_path(rel);
        let value = self.container.get().require_attr(&path, name)?;
        value.as_int3().ok_or(StoreError::AttrKind {
            path,
            name: name.to_string(),
            expected: "3-int vector",
        })
    }

    /// Read a required 3-float vector attribute.
    pub fn require_float3(&self, rel: &str, name: &str) -> Result<[f64; 3], StoreError> {
        let path = self.abs_path(rel);
        let value = self.container.get().require_attr(&path, name)?;
        value.as_float3().ok_or(StoreError::AttrKind {
            path,
            name: name.to_string(),
            expected: "3-float vector",
        })
    }

    /// Read a required vector of non-negative particle ids.
    pub fn require_ids(&self, rel: &str, name: &str) -> Result<Vec<ParticleId>, StoreError> {
        let path = self.abs_path(rel);
        let value = self.container.get().require_attr(&path, name)?;
        let ints = value.as_ints().ok_or(StoreError::AttrKind {
            path: path.clone(),
            name: name.to_string(),
            expected: "integer vector",
        })?;
        let mut ids = Vec::with_capacity(ints.len());
        for &v in ints {
            if v < 0 {
                return Err(StoreError::AttrKind {
                    path,
                    name: name.to_string(),
                    expected: "vector of non-negative ids",
                });
            }
            ids.push(ParticleId(v as u64));
        }
        Ok(ids)
    }
}

// ── CycleSource ────────────────────────────────────────────────────

/// The capability a source layout provides: resolve the cycle list and
/// open per-cycle (and settings) views.
///
/// `Send + Sync` so that parallel ingestion can fan per-cycle reads out
/// over worker threads through a shared reference.
pub trait CycleSource: Send + Sync {
    /// The ascending cycle list, after the trailing policy and explicit
    /// selection have been applied.
    fn cycles(&self) -> Result<Vec<Cycle>, IngestError>;

    /// Open the subtree for one cycle.
    fn open_cycle(&self, cycle: Cycle) -> Result<StoreView<'_>, IngestError>;

    /// Open the run-level settings subtree.
    fn open_settings(&self) -> Result<StoreView<'_>, IngestError>;
}

/// Pick the layout strategy for a path.
///
/// A path containing a `%T` placeholder is file-based; anything else is
/// a single group-based container. Either way, a container-level
/// `iteration_encoding` attribute that disagrees with the chosen layout
/// is a [`IngestError::MalformedSchema`].
pub fn open_source<'a>(
    provider: &'a dyn StoreProvider,
    path: &str,
    options: IngestOptions,
) -> Result<Box<dyn CycleSource + 'a>, IngestError> {
    if path.contains("%T") {
        Ok(Box::new(FileSource::open(provider, path, options)?))
    } else {
        Ok(Box::new(GroupSource::open(provider, path, options)?))
    }
}

/// Check a container's declared encoding against the layout opening it.
fn check_encoding(container: &dyn Container, path: &str, expected: &str) -> Result<(), IngestError> {
    if let Some(declared) = container.attr("", ENCODING_ATTR)? {
        if declared.as_str() != Some(expected) {
            return Err(IngestError::MalformedSchema {
                path: path.to_string(),
                detail: format!(
                    "container declares {ENCODING_ATTR} {declared:?}, \
                     but was opened as {expected}"
                ),
            });
        }
    }
    Ok(())
}

// ── Group-based ────────────────────────────────────────────────────

/// Group-based layout: one container, all cycles under `cycles/`.
pub struct GroupSource {
    container: Box<dyn Container>,
    options: IngestOptions,
}

impl GroupSource {
    /// Open a group-based source at `path`.
    pub fn open(
        provider: &dyn StoreProvider,
        path: &str,
        options: IngestOptions,
    ) -> Result<Self, IngestError> {
        let container = provider.open(path)?;
        check_encoding(container.as_ref(), path, "groupBased")?;
        Ok(Self { container, options })
    }
}

impl CycleSource for GroupSource {
    fn cycles(&self) -> Result<Vec<Cycle>, IngestError> {
        let names = self.container.child_groups(CYCLES_GROUP)?;
        let mut cycles = Vec::with_capacity(names.len());
        for name in names {
            let n: u64 = name.parse().map_err(|_| IngestError::MalformedSchema {
                path: format!("{CYCLES_GROUP}/{name}"),
                detail: "cycle group name is not an integer".to_string(),
            })?;
            cycles.push(Cycle(n));
        }
        resolve_policy(cycles, &self.options, true)
    }

    fn open_cycle(&self, cycle: Cycle) -> Result<StoreView<'_>, IngestError> {
        Ok(StoreView::shared(
            self.container.as_ref(),
            format!("{CYCLES_GROUP}/{cycle}"),
        ))
    }

    fn open_settings(&self) -> Result<StoreView<'_>, IngestError> {
        Ok(StoreView::shared(self.container.as_ref(), String::new()))
    }
}

// ── File-based ─────────────────────────────────────────────────────

/// File-based layout: one container per cycle, resolved from a
/// file-name template.
pub struct FileSource<'a> {
    provider: &'a dyn StoreProvider,
    template: FileTemplate,
    options: IngestOptions,
}

impl<'a> FileSource<'a> {
    /// Open a file-based source from a template path.
    pub fn open(
        provider: &'a dyn StoreProvider,
        template: &str,
        options: IngestOptions,
    ) -> Result<Self, IngestError> {
        let template = FileTemplate::parse(template)?;
        Ok(Self {
            provider,
            template,
            options,
        })
    }
}

impl CycleSource for FileSource<'_> {
    fn cycles(&self) -> Result<Vec<Cycle>, IngestError> {
        let cycles = match &self.options.cycles {
            // With an explicit selection there is nothing to scan for;
            // the selection is the resolved list.
            Some(selection) => selection.clone(),
            None => {
                let names = self.provider.sibling_files(self.template.dir())?;
                names
                    .iter()
                    .filter_map(|name| self.template.cycle_of(name))
                    .collect()
            }
        };
        resolve_policy(cycles, &self.options, false)
    }

    fn open_cycle(&self, cycle: Cycle) -> Result<StoreView<'_>, IngestError> {
        let path = self.template.path_for(cycle);
        let container = self.provider.open(&path)?;
        check_encoding(container.as_ref(), &path, "fileBased")?;
        Ok(StoreView::owned(container, format!("{CYCLES_GROUP}/{cycle}")))
    }

    fn open_settings(&self) -> Result<StoreView<'_>, IngestError> {
        let first = *self.cycles()?.first().ok_or(IngestError::NoCycles)?;
        let path = self.template.path_for(first);
        let container = self.provider.open(&path)?;
        check_encoding(container.as_ref(), &path, "fileBased")?;
        Ok(StoreView::owned(container, String::new()))
    }
}
