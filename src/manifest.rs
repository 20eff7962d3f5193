//! Manifest ingestion: the text-line reader and the per-line decoder.
//!
//! The manifest is UTF-8 text with one header line followed by
//! `reference<delimiter>raw_label` lines. Header skipping belongs to the
//! reader; [`decode_line`] is a pure function of a single data line.

use crate::error::{RowError, RowResult};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One decoded manifest row: an opaque storage reference and its raw label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub reference: String,
    pub raw_label: String,
}

/// Split `line` on `delimiter` into a [`ManifestRow`].
///
/// Field 0 is the reference, field 1 the raw label. Extra fields beyond
/// index 1 are ignored on purpose; fewer than two fields is a
/// [`RowError::MalformedRow`].
pub fn decode_line(line: &str, delimiter: &str) -> RowResult<ManifestRow> {
    let mut fields = line.split(delimiter);
    match (fields.next(), fields.next()) {
        (Some(reference), Some(raw_label)) => Ok(ManifestRow {
            reference: reference.to_string(),
            raw_label: raw_label.to_string(),
        }),
        _ => Err(RowError::MalformedRow {
            line: line.to_string(),
            fields: line.split(delimiter).count(),
        }),
    }
}

/// Read all data lines from a manifest file, skipping `skip_header_lines`
/// leading lines and any blank lines (trailing newline).
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read; this is a
/// setup-time failure, not a row-scoped one.
pub fn read_manifest_lines(path: impl AsRef<Path>, skip_header_lines: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("open manifest {}", path.display()))?;
    let mut out = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read manifest line #{}", i + 1))?;
        if i < skip_header_lines || line.is_empty() {
            continue;
        }
        out.push(line);
    }
    Ok(out)
}
