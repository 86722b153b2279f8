//! Sub-configuration structs with defaults matching the production deployment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Class labels in the exact order the deployed model emits scores.
///
/// Index `i` of every prediction vector belongs to `DEFAULT_CLASS_NAMES[i]`.
/// Pinned to model `prod`, version `v7`.
pub const DEFAULT_CLASS_NAMES: [&str; 34] = [
    "Apple",
    "Avocado",
    "Avocado-cut",
    "Banana",
    "Bell Peppers",
    "Blackberries",
    "Blueberries",
    "Cherries (Sweet)",
    "Coconut",
    "Cucumber",
    "Cucumber-cut",
    "Grapes",
    "Kiwifruit",
    "Kiwifruit-cut",
    "Lemon",
    "Lime",
    "Lychee",
    "Mango",
    "Honeydew Melon",
    "Orange",
    "Orange-cut",
    "Papaya",
    "Papaya-cut",
    "Peach",
    "Pear",
    "Pineapple",
    "Plum",
    "Pomegranate",
    "Pomegranate-cut",
    "Raspberries",
    "Strawberries",
    "Tomato",
    "Watermelon",
    "Watermelon-cut",
];

/// Remote model identity and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of the prediction service
    pub endpoint: String,

    /// Cloud project hosting the model
    pub project: String,

    /// Deployed model name
    pub name: String,

    /// Model version. When unset the service's default version answers.
    pub version: Option<String>,

    /// Key holding the probability vector inside each prediction object
    pub output_field: String,

    /// Bearer token (supports ${ENV_VAR} syntax)
    pub access_token: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ml.googleapis.com".to_string(),
            project: "know-your-fruit-283323".to_string(),
            name: "prod".to_string(),
            version: Some("v7".to_string()),
            output_field: "sequential".to_string(),
            access_token: "${GOOGLE_ACCESS_TOKEN}".to_string(),
        }
    }
}

/// Class vocabulary and ranking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassesConfig {
    /// Ordered class labels, aligned with the model's output indices
    pub names: Vec<String>,

    /// Number of ranked labels returned per image
    pub top_k: usize,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            top_k: 7,
        }
    }
}

/// Caller-side retry policy for inference failures.
///
/// The classifier client never retries on its own; the web front end reads
/// these values to decide whether to try again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max retry attempts for transient failures (0 disables retries)
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            retry_delay_ms: 500,
        }
    }
}

/// Resource limits to protect against problematic uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_upload_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// End-to-end budget for one classification request in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_mb: 20,
            max_image_dimension: 10000,
            request_timeout_ms: 30000,
        }
    }
}

/// Web front end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Directory served under `/static`
    pub static_dir: PathBuf,

    /// JSON file mapping fruit names to descriptive text
    pub fruit_info_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            static_dir: PathBuf::from("static"),
            fruit_info_path: PathBuf::from("dict_fruit.txt"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
