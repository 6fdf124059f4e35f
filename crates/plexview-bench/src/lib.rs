//! Benchmark profiles for the plexview pipeline.
//!
//! Provides deterministic synthetic sources at benchmark scale:
//!
//! - [`reference_source`]: configurable cycles × particles, two
//!   species with particle churn and full statistics blocks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use plexview_core::Vec3;
use plexview_test_utils::fixtures;
use plexview_test_utils::{MemContainer, MemProvider};

/// Build a synthetic group-based source with `n_cycles` cycles and up
/// to `n_particles` particles per species.
///
/// Two tracked species (`electron` on grid 0, `proton` on grid 1) with
/// deterministic positions and per-particle churn: a particle sits out
/// every cycle where `(id + cycle) % 5 == 0`, so frames carry absent
/// markers and traces are sparse, as in real output. A trailing
/// sentinel cycle is included so the default ingest policy applies.
pub fn reference_source(n_cycles: u64, n_particles: u64) -> (MemProvider, &'static str) {
    let mut c = MemContainer::new();
    fixtures::environment(&mut c, [64, 64, 64], [0.25, 0.25, 0.5]);
    fixtures::grid(&mut c, 0, "electron", true);
    fixtures::grid(&mut c, 1, "proton", true);

    // One extra cycle: the trailing sentinel dropped by default policy.
    for cycle in 0..=n_cycles {
        fixtures::stats(&mut c, cycle, n_particles as f64, cycle as f64 * 0.5);
        for grid in 0..2u32 {
            fixtures::grid_stat(&mut c, cycle, grid, "kinetic_E", cycle as f64 + grid as f64);
            fixtures::grid_stat(&mut c, cycle, grid, "n_particles", n_particles as f64);
            let mut ids = Vec::new();
            let mut xs: Vec<Vec3> = Vec::new();
            let mut us: Vec<Vec3> = Vec::new();
            for id in 0..n_particles {
                if (id + cycle) % 5 == 0 {
                    continue;
                }
                ids.push(id as i64);
                let t = cycle as f64;
                let p = id as f64;
                xs.push([p % 64.0, (p + t) % 64.0, t % 64.0]);
                us.push([0.01 * p, -0.01 * t, 0.0]);
            }
            fixtures::tracked(&mut c, cycle, grid, ids, xs, us);
        }
    }

    let mut provider = MemProvider::new();
    provider.insert("bench.h5", c);
    (provider, "bench.h5")
}
