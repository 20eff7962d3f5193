//! Pipeline driver: composes the per-row stages and contains row failures.
//!
//! Rows have no ordering dependency on each other, so the stage chain runs
//! once per row on rayon workers with no shared mutable state beyond the
//! failure log. A row that fails any stage is logged, counted, and dropped;
//! the run itself only aborts on setup errors.

use crate::config::PipelineConfig;
use crate::error::RowResult;
use crate::label::{Vocabulary, encode_one_hot};
use crate::loader::{Sample, load_image};
use crate::manifest::{decode_line, read_manifest_lines};
use crate::record::encode_record;
use crate::report::{FailureLog, RunSummary};
use crate::shard::write_shards;
use crate::storage::StorageClient;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::Duration;
use tracing::{info, warn};

/// Convert the configured manifest into shard files.
///
/// Every manifest data row either becomes exactly one record in exactly one
/// shard file, or is dropped and accounted for in the returned summary.
///
/// # Errors
///
/// Returns an error only for setup failures: invalid configuration, a
/// missing manifest path, an unreadable manifest, or an unwritable output
/// location.
pub fn run(config: &PipelineConfig, storage: &dyn StorageClient) -> Result<RunSummary> {
    config.validate()?;
    let vocabulary = config.vocabulary()?;
    let manifest = config
        .csv_path
        .as_deref()
        .context("no manifest path configured")?;
    let lines = read_manifest_lines(manifest, 1)?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads())
        .build_global()
        .ok();

    let failures = FailureLog::new(config.failure_samples);
    let deadline = config.fetch_deadline();

    let records: Vec<Vec<u8>> = lines
        .par_iter()
        .filter_map(
            |line| match process_row(line, config, &vocabulary, storage, deadline) {
                Ok(bytes) => Some(bytes),
                Err(error) => {
                    let subject = failure_subject(line, &config.delimiter);
                    warn!(%error, row = %subject, "dropping row");
                    failures.record(&error, &subject);
                    None
                }
            },
        )
        .collect();

    let shard_files = write_shards(&records, &config.output_path_prefix, config.num_shards)?;

    let summary = RunSummary {
        rows_read: lines.len(),
        records_written: records.len(),
        rows_failed: failures.total(),
        shard_files,
        failures: failures.snapshot(),
    };
    info!(
        rows = summary.rows_read,
        written = summary.records_written,
        dropped = summary.rows_failed,
        "manifest conversion finished"
    );
    Ok(summary)
}

/// The full per-row stage chain: decode → one-hot → fetch/resize → encode.
fn process_row(
    line: &str,
    config: &PipelineConfig,
    vocabulary: &Vocabulary,
    storage: &dyn StorageClient,
    deadline: Option<Duration>,
) -> RowResult<Vec<u8>> {
    let row = decode_line(line, &config.delimiter)?;
    let label = encode_one_hot(&row.raw_label, vocabulary)?;
    let image = load_image(
        &row.reference,
        config.image_side_length,
        storage,
        &config.retry,
        deadline,
    )?;
    Ok(encode_record(&Sample { image, label }, &config.mode).to_bytes())
}

/// The reference half of a line when it splits, the whole line otherwise.
fn failure_subject(line: &str, delimiter: &str) -> String {
    line.split(delimiter).next().unwrap_or(line).to_string()
}
