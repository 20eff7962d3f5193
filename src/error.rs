//! Row-scoped error taxonomy.
//!
//! Every variant here is contained at the row boundary by the pipeline
//! driver: the row is dropped and counted, the run continues. Setup-time
//! failures (unreadable manifest, invalid configuration) use `anyhow`
//! instead and abort the run.

use crate::storage::StorageError;
use thiserror::Error;

pub type RowResult<T> = Result<T, RowError>;

#[derive(Debug, Error)]
pub enum RowError {
    /// The manifest line split into fewer than two fields.
    #[error("malformed manifest line ({fields} field(s), need at least 2): {line:?}")]
    MalformedRow { line: String, fields: usize },

    /// The raw label is absent from the configured vocabulary.
    #[error("label {label:?} is not in the vocabulary")]
    UnknownLabel { label: String },

    /// The reference could not be fetched (after retries, if any).
    #[error("storage unavailable for {reference:?}")]
    StorageUnavailable {
        reference: String,
        #[source]
        source: StorageError,
    },

    /// The fetched bytes are not a decodable image.
    #[error("bytes at {reference:?} do not decode as an image: {detail}")]
    Decode { reference: String, detail: String },
}

impl RowError {
    #[must_use]
    pub fn kind(&self) -> RowErrorKind {
        match self {
            Self::MalformedRow { .. } => RowErrorKind::MalformedRow,
            Self::UnknownLabel { .. } => RowErrorKind::UnknownLabel,
            Self::StorageUnavailable { .. } => RowErrorKind::StorageUnavailable,
            Self::Decode { .. } => RowErrorKind::Decode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowErrorKind {
    MalformedRow,
    UnknownLabel,
    StorageUnavailable,
    Decode,
}

impl RowErrorKind {
    /// Stable snake_case name used in summaries and saved reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::MalformedRow => "malformed_row",
            Self::UnknownLabel => "unknown_label",
            Self::StorageUnavailable => "storage_unavailable",
            Self::Decode => "decode",
        }
    }
}
