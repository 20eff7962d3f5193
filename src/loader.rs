//! Sample Loader: the one effectful stage in the pipeline.
//!
//! Resolves a reference to bytes through the injected [`StorageClient`]
//! (with retry and an optional deadline), decodes the bytes as an image,
//! and resizes to the configured square side length. Failures here are
//! row-scoped and never abort the run.

use crate::error::{RowError, RowResult};
use crate::retry::{RetryPolicy, retry_transient, with_deadline};
use crate::storage::StorageClient;
use image::imageops::FilterType;
use ndarray::{Array1, Array3};
use std::time::Duration;

/// A fully materialized training sample, consumed once by the record
/// encoder and then discarded.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Channel-last `(side, side, 3)` pixel intensities.
    pub image: Array3<f32>,
    /// One-hot label vector.
    pub label: Array1<f32>,
}

/// Fetch, decode, and resize the image behind `reference`.
///
/// Transient storage failures are retried per `retry`; a fetch that outlives
/// `deadline` counts as a timeout. The decoded image is resized (never
/// cropped) to `side_length × side_length` with nearest-neighbor
/// interpolation — the policy is fixed so a reader resizing at inference
/// time sees the same pixels.
///
/// # Errors
///
/// [`RowError::StorageUnavailable`] when the reference cannot be opened,
/// [`RowError::Decode`] when the bytes are not a valid image.
pub fn load_image(
    reference: &str,
    side_length: u32,
    storage: &dyn StorageClient,
    retry: &RetryPolicy,
    deadline: Option<Duration>,
) -> RowResult<Array3<f32>> {
    let bytes = retry_transient(retry, || with_deadline(deadline, || storage.open(reference)))
        .map_err(|source| RowError::StorageUnavailable {
            reference: reference.to_string(),
            source,
        })?;
    decode_and_resize(&bytes, side_length).map_err(|detail| RowError::Decode {
        reference: reference.to_string(),
        detail,
    })
}

fn decode_and_resize(bytes: &[u8], side_length: u32) -> Result<Array3<f32>, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = decoded.resize_exact(side_length, side_length, FilterType::Nearest);
    let rgb = resized.to_rgb8();
    let pixels: Vec<f32> = rgb.into_raw().into_iter().map(f32::from).collect();
    let side = side_length as usize;
    Array3::from_shape_vec((side, side, 3), pixels).map_err(|err| err.to_string())
}
