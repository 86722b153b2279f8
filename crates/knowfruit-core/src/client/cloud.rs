//! HTTP client for a hosted prediction endpoint.
//!
//! Speaks the `:predict` JSON envelope: `{"instances": [...]}` in,
//! `{"predictions": [{"<field>": [...]}]}` out. An `"error"` key anywhere at
//! the top level of the response fails the whole call.

use async_trait::async_trait;
use ndarray::{ArrayView2, ArrayView3, Axis};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use std::time::Instant;

use super::classifier::{resolve_env_var, Classifier, ModelIdentity};
use crate::config::ModelConfig;
use crate::error::PipelineError;
use crate::types::{NormalizedTensor, PredictionVector};

/// Client for a versioned model behind a `:predict` endpoint.
pub struct CloudPredictClient {
    client: reqwest::Client,
    url: String,
    identity: ModelIdentity,
    output_field: String,
    access_token: Option<String>,
}

impl CloudPredictClient {
    pub fn new(
        endpoint: &str,
        identity: ModelIdentity,
        output_field: &str,
        access_token: Option<String>,
    ) -> Self {
        let url = format!(
            "{}/v1/{}:predict",
            endpoint.trim_end_matches('/'),
            identity.resource_name()
        );
        Self {
            client: reqwest::Client::new(),
            url,
            identity,
            output_field: output_field.to_string(),
            access_token,
        }
    }

    /// Build a client from the `[model]` config section.
    ///
    /// The access token is resolved once here; refreshing it is the
    /// deployment's job. Without one, requests go out unauthenticated.
    pub fn from_config(config: &ModelConfig) -> Self {
        let access_token = resolve_env_var(&config.access_token);
        Self::new(
            &config.endpoint,
            ModelIdentity::from_config(config),
            &config.output_field,
            access_token,
        )
    }

    pub fn identity(&self) -> &ModelIdentity {
        &self.identity
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }
}

// --- Request types ---

#[derive(serde::Serialize)]
struct PredictRequest<'a> {
    instances: Vec<Instance<'a>>,
}

/// One `(299, 299, 3)` image serialized as nested arrays.
struct Instance<'a>(ArrayView3<'a, u8>);

struct Row<'a>(ArrayView2<'a, u8>);

impl Serialize for Instance<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut rows = serializer.serialize_seq(Some(self.0.len_of(Axis(0))))?;
        for row in self.0.outer_iter() {
            rows.serialize_element(&Row(row))?;
        }
        rows.end()
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pixels = serializer.serialize_seq(Some(self.0.nrows()))?;
        for pixel in self.0.outer_iter() {
            pixels.serialize_element(&pixel.to_vec())?;
        }
        pixels.end()
    }
}

// --- Response handling ---

/// Turn a response body into one vector per submitted instance.
pub(crate) fn parse_predictions(
    body: &Value,
    output_field: &str,
    expected: usize,
    status_code: Option<u16>,
) -> Result<Vec<PredictionVector>, PipelineError> {
    if let Some(error) = body.get("error") {
        return Err(PipelineError::Inference {
            message: format!("Model returned an error: {}", error_message(error)),
            status_code,
        });
    }

    let predictions = body
        .get("predictions")
        .and_then(Value::as_array)
        .ok_or_else(|| PipelineError::Inference {
            message: "Response has no predictions array".to_string(),
            status_code,
        })?;

    if predictions.len() != expected {
        return Err(PipelineError::Inference {
            message: format!(
                "Expected {expected} predictions, got {}",
                predictions.len()
            ),
            status_code,
        });
    }

    predictions
        .iter()
        .enumerate()
        .map(|(i, prediction)| {
            let scores = prediction
                .get(output_field)
                .and_then(Value::as_array)
                .ok_or_else(|| PipelineError::Inference {
                    message: format!("Prediction {i} has no '{output_field}' array"),
                    status_code,
                })?;
            scores
                .iter()
                .map(|s| s.as_f64().map(|v| v as f32))
                .collect::<Option<Vec<f32>>>()
                .map(PredictionVector::new)
                .ok_or_else(|| PipelineError::Inference {
                    message: format!("Prediction {i} contains a non-numeric score"),
                    status_code,
                })
        })
        .collect()
}

/// Human-readable text for an error object (string or `{message: ...}`).
fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

#[async_trait]
impl Classifier for CloudPredictClient {
    fn name(&self) -> &str {
        "cloud-predict"
    }

    async fn predict(
        &self,
        batch: &[NormalizedTensor],
    ) -> Result<Vec<PredictionVector>, PipelineError> {
        let instances: Vec<Instance<'_>> = batch
            .iter()
            .flat_map(|tensor| tensor.instances().map(Instance))
            .collect();
        if instances.is_empty() {
            return Ok(Vec::new());
        }
        let expected = instances.len();
        let start = Instant::now();

        let mut request = self.client.post(&self.url).json(&PredictRequest { instances });
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await.map_err(|e| PipelineError::Inference {
            message: format!("Prediction request failed: {e}"),
            status_code: None,
        })?;

        let status = resp.status();
        let code = Some(status.as_u16());
        let text = resp.text().await.map_err(|e| PipelineError::Inference {
            message: format!("Failed to read prediction response: {e}"),
            status_code: code,
        })?;

        let body = serde_json::from_str::<Value>(&text);
        if let Ok(body) = &body {
            if let Some(error) = body.get("error") {
                return Err(PipelineError::Inference {
                    message: format!("Model returned an error: {}", error_message(error)),
                    status_code: code,
                });
            }
        }
        if !status.is_success() {
            return Err(PipelineError::Inference {
                message: format!("Prediction service HTTP {status}: {text}"),
                status_code: code,
            });
        }
        let body = body.map_err(|e| PipelineError::Inference {
            message: format!("Failed to parse prediction response: {e}"),
            status_code: code,
        })?;

        let vectors = parse_predictions(&body, &self.output_field, expected, code)?;
        tracing::debug!(
            model = %self.identity.resource_name(),
            instances = expected,
            latency_ms = start.elapsed().as_millis() as u64,
            "Prediction complete"
        );
        Ok(vectors)
    }
}
