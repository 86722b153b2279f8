//! Pipeline orchestration: normalize → predict → rank.

use crate::client::{Classifier, CloudPredictClient};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::labels::ClassNames;
use crate::types::RankedLabels;

use super::normalize::ImageNormalizer;
use super::rank::rank_batch;

/// Turns uploaded image bytes into ranked class labels.
///
/// Holds only immutable state, so one instance can serve concurrent
/// requests behind an `Arc`.
pub struct InferencePipeline {
    normalizer: ImageNormalizer,
    classifier: Box<dyn Classifier>,
    class_names: ClassNames,
    top_k: usize,
}

impl InferencePipeline {
    pub fn new(
        normalizer: ImageNormalizer,
        classifier: Box<dyn Classifier>,
        class_names: ClassNames,
        top_k: usize,
    ) -> Self {
        Self {
            normalizer,
            classifier,
            class_names,
            top_k,
        }
    }

    /// Build the production pipeline backed by the hosted model.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = CloudPredictClient::from_config(&config.model);
        tracing::debug!("Prediction endpoint: {}", client.url());
        Self::with_classifier(config, Box::new(client))
    }

    /// Build a pipeline around any classifier implementation.
    pub fn with_classifier(config: &Config, classifier: Box<dyn Classifier>) -> Result<Self> {
        Ok(Self::new(
            ImageNormalizer::new(config.limits.clone()),
            classifier,
            config.class_names()?,
            config.classes.top_k,
        ))
    }

    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify one upload with the configured `top_k`.
    pub async fn classify(&self, raw: Vec<u8>) -> Result<RankedLabels> {
        self.classify_top(raw, self.top_k).await
    }

    /// Classify one upload, returning up to `k` labels.
    pub async fn classify_top(&self, raw: Vec<u8>, k: usize) -> Result<RankedLabels> {
        let mut ranked = self.classify_batch_top(vec![raw], k).await?;
        Ok(ranked.pop().ok_or_else(|| PipelineError::Inference {
            message: format!("Classifier {} returned no predictions", self.classifier.name()),
            status_code: None,
        })?)
    }

    /// Classify several uploads in a single remote call.
    pub async fn classify_batch(&self, raws: Vec<Vec<u8>>) -> Result<Vec<RankedLabels>> {
        self.classify_batch_top(raws, self.top_k).await
    }

    async fn classify_batch_top(&self, raws: Vec<Vec<u8>>, k: usize) -> Result<Vec<RankedLabels>> {
        let start = std::time::Instant::now();

        let mut tensors = Vec::with_capacity(raws.len());
        for raw in raws {
            tensors.push(self.normalizer.normalize(raw).await?);
        }
        tracing::trace!("  Normalize: {:?}", start.elapsed());

        let predict_start = std::time::Instant::now();
        let vectors = self.classifier.predict(&tensors).await?;
        tracing::trace!("  Predict: {:?}", predict_start.elapsed());

        let ranked = rank_batch(&vectors, k, &self.class_names)?;
        tracing::debug!(
            classifier = self.classifier.name(),
            images = ranked.len(),
            "Classified in {:?}",
            start.elapsed()
        );
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, KnowFruitError};
    use crate::types::{NormalizedTensor, PredictionVector};
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns the same scores for every submitted instance.
    struct FixedClassifier {
        scores: Vec<f32>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn predict(
            &self,
            batch: &[NormalizedTensor],
        ) -> std::result::Result<Vec<PredictionVector>, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n: usize = batch.iter().map(NormalizedTensor::batch_size).sum();
            Ok(vec![PredictionVector::new(self.scores.clone()); n])
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        fn name(&self) -> &str {
            "failing"
        }

        async fn predict(
            &self,
            _batch: &[NormalizedTensor],
        ) -> std::result::Result<Vec<PredictionVector>, PipelineError> {
            Err(PipelineError::Inference {
                message: "model unavailable".to_string(),
                status_code: Some(503),
            })
        }
    }

    fn config(names: &[&str], top_k: usize) -> Config {
        let mut config = Config::default();
        config.classes.names = names.iter().map(|s| s.to_string()).collect();
        config.classes.top_k = top_k;
        config
    }

    fn png() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([120, 200, 40])))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn fixed(scores: Vec<f32>) -> (Box<dyn Classifier>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = FixedClassifier {
            scores,
            calls: calls.clone(),
        };
        (Box::new(classifier), calls)
    }

    #[tokio::test]
    async fn test_classify_end_to_end() {
        let (classifier, calls) = fixed(vec![0.1, 0.7, 0.05, 0.15]);
        let pipeline =
            InferencePipeline::with_classifier(&config(&["A", "B", "C", "D"], 2), classifier)
                .unwrap();

        let ranked = pipeline.classify(png()).await.unwrap();
        assert_eq!(ranked.iter().collect::<Vec<_>>(), vec!["B", "D"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_classify_top_clamps_k() {
        let (classifier, _) = fixed(vec![0.1, 0.7, 0.05, 0.15]);
        let pipeline =
            InferencePipeline::with_classifier(&config(&["A", "B", "C", "D"], 2), classifier)
                .unwrap();

        let ranked = pipeline.classify_top(png(), 50).await.unwrap();
        assert_eq!(ranked.iter().collect::<Vec<_>>(), vec!["B", "D", "A", "C"]);
    }

    #[tokio::test]
    async fn test_classify_batch_single_remote_call() {
        let (classifier, calls) = fixed(vec![0.9, 0.1]);
        let pipeline =
            InferencePipeline::with_classifier(&config(&["Lime", "Lemon"], 1), classifier)
                .unwrap();

        let ranked = pipeline.classify_batch(vec![png(), png(), png()]).await.unwrap();
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.top() == Some("Lime")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_upload_never_reaches_classifier() {
        let (classifier, calls) = fixed(vec![0.5, 0.5]);
        let pipeline =
            InferencePipeline::with_classifier(&config(&["Lime", "Lemon"], 1), classifier)
                .unwrap();

        let err = pipeline.classify(b"garbage".to_vec()).await.unwrap_err();
        assert!(matches!(
            err,
            KnowFruitError::Pipeline(PipelineError::Decode { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_inference_error_propagates() {
        let pipeline = InferencePipeline::with_classifier(
            &config(&["Lime", "Lemon"], 1),
            Box::new(FailingClassifier),
        )
        .unwrap();

        let err = pipeline.classify(png()).await.unwrap_err();
        assert!(matches!(
            err,
            KnowFruitError::Pipeline(PipelineError::Inference {
                status_code: Some(503),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_mismatched_class_table_is_config_error() {
        let (classifier, _) = fixed(vec![0.2, 0.3, 0.5]);
        let pipeline =
            InferencePipeline::with_classifier(&config(&["Lime", "Lemon"], 1), classifier)
                .unwrap();

        let err = pipeline.classify(png()).await.unwrap_err();
        assert!(matches!(
            err,
            KnowFruitError::Config(ConfigError::ClassCountMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_invalid_class_table_rejected_at_build() {
        let (classifier, _) = fixed(vec![]);
        let result = InferencePipeline::with_classifier(&config(&[], 1), classifier);
        assert!(matches!(result, Err(KnowFruitError::Config(_))));
    }
}
