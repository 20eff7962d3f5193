//! Run configuration: one immutable object built at startup and threaded
//! through every stage.
//!
//! Nothing here is mutated after pipeline start; the vocabulary and image
//! dimensions are shared read-only across all workers.

use crate::label::Vocabulary;
use crate::retry::RetryPolicy;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_failure_samples() -> usize {
    10
}

/// Full configuration surface of a conversion run.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Source manifest location. Usually supplied on the command line
    /// rather than in the config file.
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
    /// Static label-name → class-index mapping.
    pub label_vocabulary: HashMap<String, usize>,
    /// Vocabulary size; must equal `label_vocabulary.len()`.
    pub num_classes: usize,
    /// Square side length every image is resized to.
    pub image_side_length: u32,
    /// Run-wide tag prefixed onto record feature names (e.g. "train").
    pub mode: String,
    /// Output path prefix for shard files.
    pub output_path_prefix: String,
    /// Fixed number of output shards.
    pub num_shards: usize,
    /// Manifest field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Retry policy for transient storage failures.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Optional per-fetch deadline in milliseconds.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
    /// Worker thread count; defaults to one thread per available CPU.
    #[serde(default)]
    pub workers: Option<usize>,
    /// How many failing references to keep per error kind in the summary.
    #[serde(default = "default_failure_samples")]
    pub failure_samples: usize,
}

impl PipelineConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed, or if
    /// validation fails. All of these abort the run.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open config {}", path.display()))?;
        let config: Self = serde_json::from_reader(file)
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that every stage relies on.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.image_side_length == 0 {
            bail!("image_side_length must be positive");
        }
        if self.num_shards == 0 {
            bail!("num_shards must be at least 1");
        }
        if self.delimiter.is_empty() {
            bail!("delimiter must not be empty");
        }
        if self.mode.is_empty() {
            bail!("mode must not be empty");
        }
        self.vocabulary().map(|_| ())
    }

    /// Build the validated vocabulary for this run.
    ///
    /// # Errors
    ///
    /// See [`Vocabulary::new`].
    pub fn vocabulary(&self) -> Result<Vocabulary> {
        Vocabulary::new(self.label_vocabulary.clone(), self.num_classes)
    }

    #[must_use]
    pub fn fetch_deadline(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Worker pool size for this run: the configured count, or one thread
    /// per available CPU.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}
