//! Top-K ranking of prediction vectors against the class table.

use crate::error::ConfigError;
use crate::labels::ClassNames;
use crate::types::{PredictionVector, RankedLabels};

/// Rank one prediction vector and return the `k` most likely labels.
///
/// `k` larger than the class table is clamped, so the full ranking comes
/// back. Equal scores keep ascending class index order; NaN sorts via
/// `f32::total_cmp`, so output is always deterministic.
pub fn rank(
    vector: &PredictionVector,
    k: usize,
    class_names: &ClassNames,
) -> Result<RankedLabels, ConfigError> {
    let scores = vector.as_slice();
    if scores.len() != class_names.len() {
        return Err(ConfigError::ClassCountMismatch {
            expected: class_names.len(),
            actual: scores.len(),
        });
    }

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    indices.truncate(k);

    let labels = indices
        .into_iter()
        .filter_map(|i| class_names.get(i).map(String::from))
        .collect();
    Ok(RankedLabels::new(labels))
}

/// Rank every vector of a batch independently, preserving batch order.
pub fn rank_batch(
    vectors: &[PredictionVector],
    k: usize,
    class_names: &ClassNames,
) -> Result<Vec<RankedLabels>, ConfigError> {
    vectors.iter().map(|v| rank(v, k, class_names)).collect()
}
