//! Parallel per-cycle ingestion.
//!
//! Cycles are independent units of I/O, so their reads can fan out over
//! worker threads. Determinism is preserved by construction: workers
//! only *read*, and their per-cycle payloads are merged into the
//! builder strictly in ascending cycle order on the calling thread, so
//! the duplicate-key check and the ascending-id-sort invariant behave
//! exactly as in the sequential pass. Output is identical to
//! [`ingest`](crate::ingest) for the same source.

use std::thread;

use crossbeam_channel::bounded;

use plexview_core::Cycle;

use crate::error::IngestError;
use crate::layout::CycleSource;
use crate::reader::{CycleRecord, SourceReader};
use crate::store::{build, TrajectoryStore};

/// Resolve the actual worker count.
///
/// `0` auto-detects (`available_parallelism / 2`, clamped to `[2, 16]`);
/// explicit values are clamped to `[1, 64]`.
pub fn resolved_worker_count(requested: usize) -> usize {
    if requested > 0 {
        requested.clamp(1, 64)
    } else {
        let cpus = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        (cpus / 2).clamp(2, 16)
    }
}

/// Ingest with per-cycle reads fanned out over `workers` threads
/// (`0` = auto-detect).
///
/// All resolved cycles are read regardless of individual failures; on
/// failure the error for the *earliest* cycle is returned, so the
/// outcome does not depend on thread scheduling.
pub fn ingest_parallel(
    source: &dyn CycleSource,
    workers: usize,
) -> Result<TrajectoryStore, IngestError> {
    let reader = SourceReader::new(source)?;
    let cycles = reader.cycles().to_vec();
    let workers = resolved_worker_count(workers).min(cycles.len().max(1));

    if workers <= 1 {
        let records = cycles.iter().map(|&c| reader.read_cycle(c));
        return build(&reader, records);
    }

    let mut results: Vec<(usize, Result<CycleRecord, IngestError>)> =
        Vec::with_capacity(cycles.len());
    let (job_tx, job_rx) = bounded::<(usize, Cycle)>(workers * 2);
    // Result capacity covers every cycle, so workers never block on
    // send while the feeder is still queueing jobs.
    let (result_tx, result_rx) = bounded(cycles.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let reader = &reader;
            scope.spawn(move || {
                while let Ok((index, cycle)) = job_rx.recv() {
                    if result_tx.send((index, reader.read_cycle(cycle))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for (index, &cycle) in cycles.iter().enumerate() {
            if job_tx.send((index, cycle)).is_err() {
                break;
            }
        }
        drop(job_tx);

        results.extend(result_rx.iter());
    });

    results.sort_unstable_by_key(|(index, _)| *index);
    build(&reader, results.into_iter().map(|(_, record)| record))
}
