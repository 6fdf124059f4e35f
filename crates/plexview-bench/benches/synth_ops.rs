//! Criterion micro-benchmarks for frame, trace, and series synthesis.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plexview_bench::reference_source;
use plexview_ingest::{ingest_path, IngestOptions, TrajectoryStore};
use plexview_synth::{scalar_series, species_series, synthesize_frames, synthesize_traces};

fn reference_store() -> TrajectoryStore {
    let (provider, path) = reference_source(50, 128);
    ingest_path(&provider, path, IngestOptions::default()).unwrap()
}

/// Benchmark: frame synthesis (frame-major alignment).
fn bench_frames(c: &mut Criterion) {
    let store = reference_store();

    c.bench_function("synthesize_frames_50x128", |b| {
        b.iter(|| black_box(synthesize_frames(&store)));
    });
}

/// Benchmark: trace synthesis (particle-major alignment).
fn bench_traces(c: &mut Criterion) {
    let store = reference_store();

    c.bench_function("synthesize_traces_50x128", |b| {
        b.iter(|| black_box(synthesize_traces(&store)));
    });
}

/// Benchmark: statistic series extraction, global and per-species.
fn bench_series(c: &mut Criterion) {
    let store = reference_store();

    c.bench_function("stat_series_50x128", |b| {
        b.iter(|| {
            black_box(scalar_series(&store, "total_E").unwrap());
            black_box(species_series(&store, "kinetic_E").unwrap());
        });
    });
}

criterion_group!(benches, bench_frames, bench_traces, bench_series);
criterion_main!(benches);
