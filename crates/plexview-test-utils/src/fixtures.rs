//! Canned source fixtures shared by tests and benchmarks.
//!
//! Each fixture returns a populated [`MemProvider`] plus the path (or
//! file-name template) to open it with. Schema building blocks are also
//! exported so tests can compose custom stores.

use crate::{MemContainer, MemProvider};
use plexview_core::Vec3;

/// Write the `settings/environment` attributes.
pub fn environment(c: &mut MemContainer, grid_shape: [i64; 3], cell_size: [f64; 3]) {
    c.set_attr("settings/environment", "grid_shape", grid_shape);
    c.set_attr("settings/environment", "cell_size", cell_size);
}

/// Register a grid under `settings/grids`.
pub fn grid(c: &mut MemContainer, index: u32, species: &str, tracked: bool) {
    let path = format!("settings/grids/{index}");
    c.set_attr(&path, "species", species);
    c.set_attr(&path, "tracked", i64::from(tracked));
}

/// Write a cycle's global scalar statistics.
pub fn stats(c: &mut MemContainer, cycle: u64, n_particles: f64, total_e: f64) {
    let path = format!("cycles/{cycle}/stats");
    c.set_attr(&path, "n_particles", n_particles);
    c.set_attr(&path, "total_E", total_e);
}

/// Write one per-grid scalar statistic for a cycle.
pub fn grid_stat(c: &mut MemContainer, cycle: u64, grid: u32, name: &str, value: f64) {
    let path = format!("cycles/{cycle}/stats/grids/{grid}");
    c.set_attr(&path, name, value);
}

/// Write a cycle's tracked-particle arrays for one grid.
///
/// `ids`, `xs`, and `us` must be the same length; fixtures that want a
/// deliberately inconsistent store can call `set_vectors` directly.
pub fn tracked(c: &mut MemContainer, cycle: u64, grid: u32, ids: Vec<i64>, xs: Vec<Vec3>, us: Vec<Vec3>) {
    let base = format!("cycles/{cycle}/grids/{grid}/tracked");
    c.set_attr(&base, "tracking_ids", ids);
    c.set_vectors(&format!("{base}/X"), xs);
    c.set_vectors(&format!("{base}/U"), us);
}

/// The two-cycle, one-species scenario: species `"electron"` with
/// particle ids `{5, 7}`.
///
/// Particle 5 is present in cycles 0 and 1 at `(0,0,0)` then `(1,1,1)`;
/// particle 7 only in cycle 1 at `(2,2,2)`. Cell size is unit, so
/// physical positions equal raw coordinates. Cycle 2 is a trailing
/// sentinel with junk data: the group-based default policy must drop
/// it, and any assertion seeing position `(9,9,9)` has ingested it by
/// mistake.
pub fn two_cycle_electron() -> (MemProvider, &'static str) {
    let mut c = MemContainer::new();
    environment(&mut c, [8, 8, 8], [1.0, 1.0, 1.0]);
    grid(&mut c, 0, "electron", true);

    stats(&mut c, 0, 1.0, 1.5);
    tracked(&mut c, 0, 0, vec![5], vec![[0.0, 0.0, 0.0]], vec![[0.5, 0.0, 0.0]]);

    stats(&mut c, 1, 2.0, 3.25);
    tracked(
        &mut c,
        1,
        0,
        vec![5, 7],
        vec![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
        vec![[0.5, 0.0, 0.0], [0.0, 0.25, 0.0]],
    );

    // Trailing sentinel cycle.
    stats(&mut c, 2, 9.0, 9.9);
    tracked(&mut c, 2, 0, vec![5], vec![[9.0, 9.0, 9.0]], vec![[0.0, 0.0, 0.0]]);

    let mut provider = MemProvider::new();
    provider.insert("sim.h5", c);
    (provider, "sim.h5")
}

/// A richer group-based store: two tracked species plus one untracked
/// grid, non-unit cell size, and cycle names whose string order
/// (`1, 10, 11, 2`) differs from numeric order.
///
/// - grid 0 `"electron"` (tracked): ids `{3, 11}`
/// - grid 1 `"proton"` (tracked): id `{3}`, the same raw id as an
///   electron but a distinct particle; absent from cycle 2 entirely
///   (no tracked subtree)
/// - grid 2 `"neutral"` (untracked): carries sample arrays that must be
///   skipped
///
/// Cycle 11 is the trailing sentinel. Every non-sentinel cycle carries
/// global stats (`n_particles`, `total_E`, `field_E`) and per-grid
/// stats (`kinetic_E`, `n_particles`) for grids 0 and 1.
pub fn multi_species() -> (MemProvider, &'static str) {
    let mut c = MemContainer::new();
    c.set_attr("", "iteration_encoding", "groupBased");
    environment(&mut c, [16, 16, 16], [0.5, 0.5, 2.0]);
    grid(&mut c, 0, "electron", true);
    grid(&mut c, 1, "proton", true);
    grid(&mut c, 2, "neutral", false);

    for (cycle, (n, e, fe)) in [
        (1u64, (3.0, 10.0, 4.0)),
        (2, (2.0, 11.0, 4.5)),
        (10, (3.0, 12.0, 5.0)),
    ] {
        stats(&mut c, cycle, n, e);
        c.set_attr(&format!("cycles/{cycle}/stats"), "field_E", fe);
        grid_stat(&mut c, cycle, 0, "kinetic_E", e * 0.25);
        grid_stat(&mut c, cycle, 0, "n_particles", n - 1.0);
        grid_stat(&mut c, cycle, 1, "kinetic_E", e * 0.5);
        grid_stat(&mut c, cycle, 1, "n_particles", 1.0);
    }

    tracked(
        &mut c,
        1,
        0,
        vec![3, 11],
        vec![[1.0, 1.0, 1.0], [2.0, 2.0, 1.0]],
        vec![[0.1, 0.0, 0.0], [0.2, 0.0, 0.0]],
    );
    tracked(&mut c, 1, 1, vec![3], vec![[4.0, 4.0, 4.0]], vec![[0.0, 0.3, 0.0]]);
    tracked(&mut c, 1, 2, vec![1], vec![[7.0, 7.0, 7.0]], vec![[0.0, 0.0, 0.0]]);

    tracked(&mut c, 2, 0, vec![3], vec![[2.0, 2.0, 2.0]], vec![[0.1, 0.1, 0.0]]);
    // No proton subtree in cycle 2: zero tracked particles that cycle.

    tracked(&mut c, 10, 0, vec![11], vec![[6.0, 6.0, 3.0]], vec![[0.2, 0.1, 0.0]]);
    tracked(&mut c, 10, 1, vec![3], vec![[5.0, 5.0, 5.0]], vec![[0.0, 0.4, 0.0]]);

    // Trailing sentinel.
    stats(&mut c, 11, 0.0, 0.0);
    c.add_group("cycles/11");

    let mut provider = MemProvider::new();
    provider.insert("run.h5", c);
    (provider, "run.h5")
}

/// A file-based layout: one container per cycle under `out/`, resolved
/// from the template `out/data_%T.h5`.
///
/// Cycles 0, 5, and 10 exist (string order of the file names is
/// `data_0, data_10, data_5`); species `"electron"` on grid 0 with
/// particle 1 in every cycle and particle 2 only in cycle 5. A
/// non-matching `out/extra.h5` is present and must be ignored.
pub fn file_based() -> (MemProvider, &'static str) {
    let mut provider = MemProvider::new();
    for (cycle, ids, xs) in [
        (0u64, vec![1i64], vec![[0.0, 0.0, 0.0]]),
        (5, vec![1, 2], vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
        (10, vec![1], vec![[2.0, 0.0, 0.0]]),
    ] {
        let mut c = MemContainer::new();
        c.set_attr("", "iteration_encoding", "fileBased");
        environment(&mut c, [4, 4, 4], [1.0, 1.0, 1.0]);
        grid(&mut c, 0, "electron", true);
        stats(&mut c, cycle, ids.len() as f64, cycle as f64 + 0.5);
        let us = vec![[0.0, 0.0, 0.1]; ids.len()];
        tracked(&mut c, cycle, 0, ids, xs, us);
        provider.insert(&format!("out/data_{cycle}.h5"), c);
    }
    provider.insert("out/extra.h5", MemContainer::new());
    (provider, "out/data_%T.h5")
}
