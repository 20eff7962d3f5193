//! # Recordforge
//!
//! A **batch ETL pipeline** that converts a CSV manifest of
//! `(image-reference, label)` pairs into a fixed number of shard files of
//! serialized binary training records.
//!
//! ## Pipeline
//!
//! Each manifest row flows through four stages, applied row-independently
//! on rayon workers:
//!
//! 1. **Manifest Decoder** ([`manifest`]) — split one text line into an
//!    opaque storage reference and a raw label.
//! 2. **Label Encoder** ([`label`]) — map the raw label to a one-hot f32
//!    vector through a static, validated vocabulary.
//! 3. **Sample Loader** ([`loader`]) — fetch the referenced bytes through a
//!    [`StorageClient`] (with retry and an optional deadline), decode the
//!    image, and resize it to a fixed square side length.
//! 4. **Record Encoder** ([`record`]) — pack image and label into a
//!    [`Record`] of mode-prefixed raw little-endian f32 features.
//!
//! Serialized records are then stride-partitioned into `num_shards` output
//! files by the [`shard`] sink. Per-row failures (malformed line, unknown
//! label, unreachable storage, undecodable bytes) are dropped and counted —
//! they never abort the run.
//!
//! ## Quick start
//!
//! ```ignore
//! use recordforge::{PipelineConfig, pipeline, storage::LocalStorage};
//!
//! let config = PipelineConfig::from_file("convert.json")?;
//! let summary = pipeline::run(&config, &LocalStorage::new())?;
//! summary.print();
//! ```
//!
//! ## Wire contract
//!
//! A record carries two byte-string features, `<mode>/image` and
//! `<mode>/label`, holding the flattened arrays as raw little-endian f32.
//! Shape and dtype are not embedded; readers must be configured identically
//! to the writer (see [`record::RecordDecoder`]).
//!
//! ## Module overview
//!
//! - [`config`] - the immutable run configuration, loaded once at startup
//! - [`manifest`] - manifest line reader and decoder
//! - [`label`] - vocabulary and one-hot encoding
//! - [`storage`] - the storage collaborator trait plus local/in-memory impls
//! - [`retry`] - transient-failure retry and fetch deadlines
//! - [`loader`] - the effectful fetch/decode/resize stage
//! - [`record`] - binary record encoding and the configured decoder
//! - [`shard`] - sharded output sink
//! - [`pipeline`] - the driver that chains the stages and isolates failures
//! - [`report`] - failure accounting and the run summary
//! - [`error`] - the row-scoped error taxonomy

pub mod config;
pub mod error;
pub mod label;
pub mod loader;
pub mod manifest;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod retry;
pub mod shard;
pub mod storage;

pub use config::PipelineConfig;
pub use error::{RowError, RowErrorKind, RowResult};
pub use label::{Vocabulary, encode_one_hot};
pub use loader::{Sample, load_image};
pub use manifest::{ManifestRow, decode_line, read_manifest_lines};
pub use record::{Record, RecordDecoder, encode_record};
pub use report::{FailureLog, RunSummary};
pub use retry::RetryPolicy;
pub use shard::{read_shard, shard_path, write_shards};
pub use storage::{LocalStorage, MemoryStorage, StorageClient, StorageError, StorageErrorKind};
