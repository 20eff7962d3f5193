//! Label vocabulary and one-hot encoding.

use crate::error::{RowError, RowResult};
use anyhow::{Result, bail};
use ndarray::Array1;
use std::collections::HashMap;

/// A validated, static mapping from label name to dense class index.
///
/// The mapping is injective over `[0, num_classes)`: every index is owned by
/// exactly one label. Validation happens once at construction, so encoding
/// never has to re-check it.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    size: usize,
}

impl Vocabulary {
    /// Build a vocabulary from a label→index mapping of exactly
    /// `num_classes` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping size disagrees with `num_classes`,
    /// an index falls outside `[0, num_classes)`, or two labels share an
    /// index. These are configuration mistakes and fatal.
    pub fn new(mapping: HashMap<String, usize>, num_classes: usize) -> Result<Self> {
        if num_classes == 0 {
            bail!("vocabulary must have at least one class");
        }
        if mapping.len() != num_classes {
            bail!(
                "vocabulary has {} label(s) but num_classes is {num_classes}",
                mapping.len()
            );
        }
        let mut claimed = vec![false; num_classes];
        for (label, &idx) in &mapping {
            if idx >= num_classes {
                bail!("label {label:?} maps to index {idx}, outside [0, {num_classes})");
            }
            if claimed[idx] {
                bail!("index {idx} is assigned to more than one label");
            }
            claimed[idx] = true;
        }
        Ok(Self {
            index: mapping,
            size: num_classes,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }
}

/// Encode `raw_label` as a one-hot vector of length `vocabulary.len()`.
///
/// Deterministic and pure: `1.0` at the label's index, `0.0` elsewhere.
/// A label absent from the vocabulary is a [`RowError::UnknownLabel`],
/// never a default class.
pub fn encode_one_hot(raw_label: &str, vocabulary: &Vocabulary) -> RowResult<Array1<f32>> {
    let idx = vocabulary
        .index_of(raw_label)
        .ok_or_else(|| RowError::UnknownLabel {
            label: raw_label.to_string(),
        })?;
    let mut vector = Array1::<f32>::zeros(vocabulary.len());
    vector[idx] = 1.0;
    Ok(vector)
}
