//! Remote classifier integration.
//!
//! Provides the [`Classifier`] capability the pipeline depends on, the HTTP
//! implementation that talks to the hosted model, and retry helpers for
//! callers that choose to retry.

pub(crate) mod classifier;
pub(crate) mod cloud;
pub mod retry;

pub use classifier::{resolve_env_var, Classifier, ModelIdentity};
pub use cloud::CloudPredictClient;
