//! Binary record encoding and the symmetric reader-side decoder.
//!
//! A [`Record`] is a map of named byte-string features. For a sample it
//! holds exactly two: `<mode>/image` and `<mode>/label`, each the raw
//! little-endian f32 buffer of the flattened array (row-major). Shape and
//! dtype are deliberately NOT embedded — a reader must be configured with
//! the same side length, class count, and mode used at write time. That
//! fragile contract is preserved as-is for compatibility with existing
//! readers of this layout; [`RecordDecoder`] is the configured counterpart.

use crate::loader::Sample;
use anyhow::{Context, Result, ensure};
use ndarray::{Array1, Array3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The serialized binary unit written to an output shard.
///
/// Features are kept in a `BTreeMap` so the envelope encoding is
/// deterministic: encoding the same sample twice yields byte-identical
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    features: BTreeMap<String, Vec<u8>>,
}

impl Record {
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&[u8]> {
        self.features.get(name).map(Vec::as_slice)
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Serialize the record envelope.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(self).expect("a map of byte strings always serializes")
    }

    /// Deserialize a record envelope produced by [`Record::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a valid record envelope.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        postcard::from_bytes(bytes).context("deserialize record envelope")
    }
}

/// Pack a sample into a record under mode-prefixed feature names.
///
/// Pure and deterministic; a well-formed [`Sample`] cannot fail to encode.
#[must_use]
pub fn encode_record(sample: &Sample, mode: &str) -> Record {
    let mut features = BTreeMap::new();
    features.insert(format!("{mode}/image"), le_bytes(sample.image.iter()));
    features.insert(format!("{mode}/label"), le_bytes(sample.label.iter()));
    Record { features }
}

fn le_bytes<'a>(values: impl ExactSizeIterator<Item = &'a f32>) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * 4);
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

/// Reader configured identically to the writer, reconstructing arrays from
/// a record's raw feature buffers.
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    pub mode: String,
    pub side_length: u32,
    pub num_classes: usize,
}

impl RecordDecoder {
    /// Reconstruct the `(side, side, 3)` image array.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature is missing or its length disagrees
    /// with the configured side length.
    pub fn image(&self, record: &Record) -> Result<Array3<f32>> {
        let name = format!("{}/image", self.mode);
        let floats = self.floats(record, &name)?;
        let side = self.side_length as usize;
        ensure!(
            floats.len() == side * side * 3,
            "feature {name:?} holds {} float(s), expected {} for side length {side}",
            floats.len(),
            side * side * 3
        );
        Array3::from_shape_vec((side, side, 3), floats).context("reshape image feature")
    }

    /// Reconstruct the one-hot label vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature is missing or its length disagrees
    /// with the configured class count.
    pub fn label(&self, record: &Record) -> Result<Array1<f32>> {
        let name = format!("{}/label", self.mode);
        let floats = self.floats(record, &name)?;
        ensure!(
            floats.len() == self.num_classes,
            "feature {name:?} holds {} float(s), expected {}",
            floats.len(),
            self.num_classes
        );
        Ok(Array1::from_vec(floats))
    }

    fn floats(&self, record: &Record, name: &str) -> Result<Vec<f32>> {
        let bytes = record
            .feature(name)
            .with_context(|| format!("record has no feature {name:?}"))?;
        ensure!(
            bytes.len().is_multiple_of(4),
            "feature {name:?} is {} byte(s), not a whole number of f32s",
            bytes.len()
        );
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}
