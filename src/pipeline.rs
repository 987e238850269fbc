//! Batch conversion drivers.
//!
//! The parallel driver splits the query list into numbered chunks, converts
//! them on a worker pool and writes results strictly in input order, buffering
//! chunks that finish early. Output is byte-identical to the sequential driver.

use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info};
use std::collections::BTreeMap;
use std::io::Write;
use std::thread;
use std::time::Instant;

use crate::config::Config;
use crate::convert::{CoordinateConverter, PairedRange};
use crate::output::{format_output_line, write_header, ConversionSummary};
use crate::types::GenomicRange;

/// Work item for the parallel pipeline.
struct WorkItem<'q> {
    /// Sequence number for ordering (file order).
    seq_id: u64,
    queries: &'q [GenomicRange],
}

/// Result from processing a work item.
struct WorkResult {
    /// Sequence number matching the input WorkItem.
    seq_id: u64,
    results: crate::error::Result<Vec<PairedRange>>,
}

/// Convert and write `queries`, choosing the driver from `config.threads`.
pub fn run<W: Write + Send>(
    converter: &CoordinateConverter,
    source: &str,
    queries: &[GenomicRange],
    writer: &mut W,
    config: &Config,
) -> Result<ConversionSummary> {
    let num_threads = config.resolved_threads();
    let summary = if num_threads == 1 {
        run_sequential(converter, source, queries, writer)?
    } else {
        run_parallel(
            converter,
            source,
            queries,
            writer,
            num_threads,
            config.batch_size,
        )?
    };
    summary.log();
    Ok(summary)
}

/// Sequential implementation.
pub fn run_sequential<W: Write>(
    converter: &CoordinateConverter,
    source: &str,
    queries: &[GenomicRange],
    writer: &mut W,
) -> Result<ConversionSummary> {
    let target = converter.target_version(source)?;
    write_header(writer, source, target)?;

    let mut summary = ConversionSummary::default();
    for pair in converter.convert_many(source, queries) {
        let pair = pair?;
        let line = format_output_line(summary.rows + 1, &pair, source, target)?;
        writeln!(writer, "{}", line)?;
        summary.record(&pair);
    }

    writer.flush()?;
    Ok(summary)
}

/// Parallel implementation with order-preserving output.
pub fn run_parallel<W: Write + Send>(
    converter: &CoordinateConverter,
    source: &str,
    queries: &[GenomicRange],
    writer: &mut W,
    num_threads: usize,
    batch_size: usize,
) -> Result<ConversionSummary> {
    if batch_size == 0 {
        bail!("Batch size must be greater than 0");
    }
    let target = converter.target_version(source)?;
    info!("Using parallel mode with {} threads", num_threads);

    let (work_tx, work_rx): (Sender<WorkItem>, Receiver<WorkItem>) = bounded(100);
    let (result_tx, result_rx): (Sender<WorkResult>, Receiver<WorkResult>) = bounded(2000);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;

    thread::scope(|scope| -> Result<ConversionSummary> {
        let writer_handle =
            scope.spawn(move || write_results_ordered(writer, result_rx, source, target));

        // Workers own the only receiver and result sender, so both channels
        // close once the pool drains.
        let workers_handle = scope.spawn(move || {
            pool.scope(|s| {
                for _ in 0..num_threads {
                    let work_rx = work_rx.clone();
                    let result_tx = result_tx.clone();
                    s.spawn(move |_| worker_loop(work_rx, result_tx, converter, source));
                }
            });
        });

        for (seq_id, chunk) in queries.chunks(batch_size).enumerate() {
            let item = WorkItem {
                seq_id: seq_id as u64,
                queries: chunk,
            };
            if work_tx.send(item).is_err() {
                break;
            }
        }
        drop(work_tx);

        workers_handle
            .join()
            .map_err(|_| anyhow!("Worker thread panicked"))?;
        writer_handle
            .join()
            .map_err(|_| anyhow!("Writer thread panicked"))?
    })
}

/// Worker loop: receives work items and sends results.
fn worker_loop(
    work_rx: Receiver<WorkItem>,
    result_tx: Sender<WorkResult>,
    converter: &CoordinateConverter,
    source: &str,
) {
    while let Ok(item) = work_rx.recv() {
        let started = Instant::now();
        let results: crate::error::Result<Vec<PairedRange>> =
            converter.convert_many(source, item.queries).collect();
        debug!(
            "Chunk {} ({} queries) converted in {:?}",
            item.seq_id,
            item.queries.len(),
            started.elapsed()
        );

        let failed = results.is_err();
        let send_result = result_tx.send(WorkResult {
            seq_id: item.seq_id,
            results,
        });
        if send_result.is_err() || failed {
            break;
        }
    }
}

/// Write results in order, buffering out-of-order results.
fn write_results_ordered<W: Write>(
    writer: &mut W,
    result_rx: Receiver<WorkResult>,
    source: &str,
    target: &str,
) -> Result<ConversionSummary> {
    write_header(writer, source, target)?;

    let mut pending: BTreeMap<u64, Vec<PairedRange>> = BTreeMap::new();
    let mut next_expected: u64 = 0;
    let mut summary = ConversionSummary::default();

    for result in result_rx {
        pending.insert(result.seq_id, result.results?);

        // Write all ready consecutive results
        while let Some(pairs) = pending.remove(&next_expected) {
            for pair in &pairs {
                let line = format_output_line(summary.rows + 1, pair, source, target)?;
                writeln!(writer, "{}", line)?;
                summary.record(pair);
            }
            next_expected += 1;
        }
    }

    if !pending.is_empty() {
        bail!("{} result chunks were never written", pending.len());
    }

    writer.flush()?;
    Ok(summary)
}
