//! Core data types flowing through the classification pipeline.
//!
//! Raw upload bytes become a [`NormalizedTensor`], the remote classifier turns
//! each tensor row into a [`PredictionVector`], and ranking produces
//! [`RankedLabels`].

use ndarray::{Array4, ArrayView3, ArrayView4, Axis};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Side length of the square model input, in pixels.
pub const INPUT_SIZE: usize = 299;

/// Number of color channels (RGB).
pub const CHANNELS: usize = 3;

/// A batch of RGB images laid out NHWC, `(N, 299, 299, 3)`.
///
/// Values are raw 0-255 channel intensities; the remote model applies its
/// own scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array4<u8>,
}

impl NormalizedTensor {
    /// Wrap an NHWC array, checking the spatial and channel dimensions.
    pub fn from_array(data: Array4<u8>) -> Result<Self, PipelineError> {
        let shape = data.shape();
        if shape[0] == 0 || shape[1] != INPUT_SIZE || shape[2] != INPUT_SIZE || shape[3] != CHANNELS
        {
            return Err(PipelineError::Decode {
                message: format!(
                    "tensor shape {:?} does not match (N, {INPUT_SIZE}, {INPUT_SIZE}, {CHANNELS})",
                    shape
                ),
            });
        }
        Ok(Self { data })
    }

    /// Shape as `[batch, height, width, channels]`.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of images in this tensor.
    pub fn batch_size(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn view(&self) -> ArrayView4<'_, u8> {
        self.data.view()
    }

    /// Iterate over the `(299, 299, 3)` instances in batch order.
    pub fn instances(&self) -> impl Iterator<Item = ArrayView3<'_, u8>> {
        self.data.outer_iter()
    }

    /// RGB value of one pixel.
    pub fn pixel(&self, batch: usize, y: usize, x: usize) -> Option<[u8; 3]> {
        let r = *self.data.get((batch, y, x, 0))?;
        let g = *self.data.get((batch, y, x, 1))?;
        let b = *self.data.get((batch, y, x, 2))?;
        Some([r, g, b])
    }
}

/// Class scores for one image, indexed like the class table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionVector(Vec<f32>);

impl PredictionVector {
    pub fn new(scores: Vec<f32>) -> Self {
        Self(scores)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for PredictionVector {
    fn from(scores: Vec<f32>) -> Self {
        Self(scores)
    }
}

/// Class labels ordered from most to least likely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedLabels(Vec<String>);

impl RankedLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// The most likely label, if any.
    pub fn top(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}
