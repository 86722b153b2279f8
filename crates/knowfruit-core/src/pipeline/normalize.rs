//! Image decoding and normalization for the remote classifier.
//!
//! The deployed model expects:
//! - Input size: 299×299 pixels
//! - Channel order: RGB
//! - Values: raw 0-255 intensities (the model rescales internally)
//! - Tensor layout: NHWC [batch, height, width, channels]

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ndarray::Array4;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::{NormalizedTensor, CHANNELS, INPUT_SIZE};

/// Decode raw upload bytes into a `(1, 299, 299, 3)` RGB tensor.
///
/// The format is detected from content, not from a file name. Any decode
/// failure yields `PipelineError::Decode` and no tensor.
pub fn normalize(raw: &[u8]) -> Result<NormalizedTensor, PipelineError> {
    let image = decode(raw)?;
    to_tensor(&image)
}

/// Convert an already decoded image into a single-instance tensor.
pub fn to_tensor(image: &DynamicImage) -> Result<NormalizedTensor, PipelineError> {
    // Collapse every source layout (luma, alpha, 16-bit) to 8-bit RGB exactly once.
    let rgb = image.to_rgb8();
    let size = INPUT_SIZE as u32;
    let resized = image::imageops::resize(&rgb, size, size, FilterType::CatmullRom);

    // RgbImage is row-major with interleaved channels, which is already HWC.
    let data = Array4::from_shape_vec((1, INPUT_SIZE, INPUT_SIZE, CHANNELS), resized.into_raw())
        .map_err(|e| PipelineError::Decode {
            message: format!("Cannot pack pixels into tensor: {e}"),
        })?;
    NormalizedTensor::from_array(data)
}

fn decode(raw: &[u8]) -> Result<DynamicImage, PipelineError> {
    let reader = image::ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            message: format!("Cannot detect image format: {e}"),
        })?;
    if reader.format().is_none() {
        return Err(PipelineError::Decode {
            message: "Unrecognized image format".to_string(),
        });
    }
    reader.decode().map_err(|e| PipelineError::Decode {
        message: e.to_string(),
    })
}

/// Normalizer with upload limits, for use from async request handlers.
pub struct ImageNormalizer {
    limits: LimitsConfig,
}

impl ImageNormalizer {
    /// Create a new normalizer with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Validate and normalize an upload.
    ///
    /// Decoding runs on the blocking pool so large images don't stall the
    /// runtime.
    pub async fn normalize(&self, raw: Vec<u8>) -> Result<NormalizedTensor, PipelineError> {
        self.check_size(raw.len())?;

        let max_dim = self.limits.max_image_dimension;
        tokio::task::spawn_blocking(move || {
            let image = decode(&raw)?;
            let (width, height) = image.dimensions();
            if width > max_dim || height > max_dim {
                return Err(PipelineError::ImageTooLarge {
                    width,
                    height,
                    max_dim,
                });
            }
            to_tensor(&image)
        })
        .await
        .map_err(|e| PipelineError::Decode {
            message: format!("Task join error: {e}"),
        })?
    }

    fn check_size(&self, len: usize) -> Result<(), PipelineError> {
        let max_bytes = self.limits.max_upload_mb.saturating_mul(1024 * 1024);
        if len as u64 > max_bytes {
            return Err(PipelineError::FileTooLarge {
                size_mb: len as u64 / (1024 * 1024),
                max_mb: self.limits.max_upload_mb,
            });
        }
        Ok(())
    }
}
