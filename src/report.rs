//! Failure accounting and the end-of-run summary.
//!
//! Dropped rows are never silent: every row-scoped error increments a
//! per-kind counter and (up to a cap) records the failing reference for
//! post-run inspection. The summary can be printed or saved as JSON.

use crate::error::{RowError, RowErrorKind};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FailureLogInner {
    counts: HashMap<RowErrorKind, u64>,
    samples: HashMap<RowErrorKind, Vec<String>>,
}

/// Thread-safe log of dropped rows, shared across workers.
#[derive(Clone)]
pub struct FailureLog {
    inner: Arc<Mutex<FailureLogInner>>,
    sample_cap: usize,
}

impl FailureLog {
    #[must_use]
    pub fn new(sample_cap: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FailureLogInner::default())),
            sample_cap,
        }
    }

    /// Count one dropped row. `subject` identifies it for inspection —
    /// the reference when one was decoded, otherwise the raw line.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex is poisoned.
    pub fn record(&self, error: &RowError, subject: &str) {
        let kind = error.kind();
        let mut inner = self.inner.lock().expect("failure log mutex poisoned");
        *inner.counts.entry(kind).or_insert(0) += 1;
        let samples = inner.samples.entry(kind).or_default();
        if samples.len() < self.sample_cap {
            samples.push(subject.to_string());
        }
    }

    /// Total rows dropped so far.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex is poisoned.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.inner
            .lock()
            .expect("failure log mutex poisoned")
            .counts
            .values()
            .sum()
    }

    /// Per-kind breakdown, sorted by kind name for stable output.
    ///
    /// # Panics
    ///
    /// Panics if the log mutex is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FailureSummary> {
        let inner = self.inner.lock().expect("failure log mutex poisoned");
        let mut out: Vec<FailureSummary> = inner
            .counts
            .iter()
            .map(|(&kind, &count)| FailureSummary {
                kind: kind.label(),
                count,
                sample_references: inner.samples.get(&kind).cloned().unwrap_or_default(),
            })
            .collect();
        out.sort_by_key(|summary| summary.kind);
        out
    }
}

/// One error kind's share of the dropped rows.
#[derive(Debug, Clone, Serialize)]
pub struct FailureSummary {
    pub kind: &'static str,
    pub count: u64,
    pub sample_references: Vec<String>,
}

/// Outcome of a full conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub records_written: usize,
    pub rows_failed: u64,
    pub shard_files: Vec<PathBuf>,
    pub failures: Vec<FailureSummary>,
}

impl RunSummary {
    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("=== recordforge run summary ===");
        println!("rows read:       {}", self.rows_read);
        println!("records written: {}", self.records_written);
        println!("rows dropped:    {}", self.rows_failed);
        for failure in &self.failures {
            println!("  {} × {}", failure.count, failure.kind);
            for reference in &failure.sample_references {
                println!("      {reference}");
            }
        }
        println!("shard files:     {}", self.shard_files.len());
    }

    /// Save the summary as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("serialize run summary")?;
        let mut file =
            File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
