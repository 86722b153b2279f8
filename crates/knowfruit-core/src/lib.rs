//! Know Your Fruit Core - identify fruit from a photo.
//!
//! Uploaded image bytes are normalized locally, scored by a hosted image
//! classifier, and ranked into the most likely fruit labels.
//!
//! # Architecture
//!
//! ```text
//! Upload bytes → Decode/RGB/299×299 → Remote classifier → Top-K labels
//! ```
//!
//! The remote model sits behind the [`Classifier`] trait so the pipeline can
//! run against a substitute in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use knowfruit_core::{Config, InferencePipeline};
//!
//! #[tokio::main]
//! async fn main() -> knowfruit_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = InferencePipeline::from_config(&config)?;
//!
//!     let bytes = std::fs::read("./banana.jpg")?;
//!     let labels = pipeline.classify(bytes).await?;
//!     println!("Top guess: {:?}", labels.top());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod fruit_info;
pub mod labels;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use client::{Classifier, CloudPredictClient, ModelIdentity};
pub use config::Config;
pub use error::{ConfigError, KnowFruitError, PipelineError, PipelineResult, Result};
pub use fruit_info::FruitInfoStore;
pub use labels::{display_names, strip_cut_suffix, ClassNames};
pub use pipeline::InferencePipeline;
pub use types::{NormalizedTensor, PredictionVector, RankedLabels};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
