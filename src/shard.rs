//! Sharded sink: partitions serialized records into a fixed number of
//! output files.
//!
//! Record `i` lands in shard `i % num_shards` (stride partition), so every
//! record appears in exactly one file and no file depends on any other.
//! Each shard frames its records as a `u64` little-endian length prefix
//! followed by the payload. Shards are written in parallel; intra-shard
//! order follows input order but carries no cross-shard meaning.

use anyhow::{Context, Result, ensure};
use rayon::prelude::*;
use std::fs::{File, create_dir_all};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Path of shard `index` out of `total` under `output_prefix`.
#[must_use]
pub fn shard_path(output_prefix: &str, index: usize, total: usize) -> PathBuf {
    PathBuf::from(format!("{output_prefix}-{index:05}-of-{total:05}.records"))
}

/// Write `records` into exactly `num_shards` shard files.
///
/// Creates parent directories as needed. Shards with no records are still
/// created (empty), so a run always produces the full file set.
///
/// # Errors
///
/// Returns an error if `num_shards` is zero or any file cannot be created
/// or written.
pub fn write_shards(
    records: &[Vec<u8>],
    output_prefix: &str,
    num_shards: usize,
) -> Result<Vec<PathBuf>> {
    ensure!(num_shards > 0, "num_shards must be at least 1");
    if let Some(parent) = shard_path(output_prefix, 0, num_shards).parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }

    (0..num_shards)
        .into_par_iter()
        .map(|shard| {
            let path = shard_path(output_prefix, shard, num_shards);
            let file =
                File::create(&path).with_context(|| format!("create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            for record in records.iter().skip(shard).step_by(num_shards) {
                writer.write_all(&(record.len() as u64).to_le_bytes())?;
                writer.write_all(record)?;
            }
            writer.flush()?;
            Ok(path)
        })
        .collect()
}

/// Read back all framed record payloads from one shard file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a frame is truncated.
pub fn read_shard(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut out = Vec::new();
    let mut len_buf = [0u8; 8];
    loop {
        match reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read record length from {}", path.display()));
            }
        }
        let len = usize::try_from(u64::from_le_bytes(len_buf))
            .with_context(|| format!("oversized record frame in {}", path.display()))?;
        let mut payload = vec![0u8; len];
        reader
            .read_exact(&mut payload)
            .with_context(|| format!("read {len}-byte record from {}", path.display()))?;
        out.push(payload);
    }
    Ok(out)
}
