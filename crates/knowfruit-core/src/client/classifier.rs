//! Classifier trait and model identity.

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::PipelineError;
use crate::types::{NormalizedTensor, PredictionVector};

/// A service that maps tensor batches to probability-vector batches.
///
/// Implementations return exactly one vector per tensor row, in submission
/// order, or an error. They never return a partial batch.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn Classifier>` for dynamic dispatch).
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifier name for logging (e.g., "cloud-predict").
    fn name(&self) -> &str;

    /// Score every instance in the batch.
    async fn predict(
        &self,
        batch: &[NormalizedTensor],
    ) -> Result<Vec<PredictionVector>, PipelineError>;
}

/// The deployed model artifact a client talks to.
///
/// Project, model and version together pin one artifact; class tables are
/// only valid for the artifact they were exported from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIdentity {
    pub project: String,
    pub model: String,
    pub version: Option<String>,
}

impl ModelIdentity {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            project: config.project.clone(),
            model: config.name.clone(),
            version: config.version.clone(),
        }
    }

    /// Resource path, e.g. `projects/p/models/m/versions/v7`.
    pub fn resource_name(&self) -> String {
        let mut name = format!("projects/{}/models/{}", self.project, self.model);
        if let Some(version) = &self.version {
            name.push_str("/versions/");
            name.push_str(version);
        }
        name
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_with_version() {
        let identity = ModelIdentity::from_config(&ModelConfig::default());
        assert_eq!(
            identity.resource_name(),
            "projects/know-your-fruit-283323/models/prod/versions/v7"
        );
    }

    #[test]
    fn test_resource_name_without_version() {
        let identity = ModelIdentity {
            project: "p".into(),
            model: "m".into(),
            version: None,
        };
        assert_eq!(identity.resource_name(), "projects/p/models/m");
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-token"), Some("plain-token".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_KYF_123}"), None);
    }
}
