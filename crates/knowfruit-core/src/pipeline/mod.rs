//! Image-to-ranked-label pipeline.
//!
//! - **normalize**: decode uploads into fixed-shape RGB tensors
//! - **rank**: map probability vectors to top-K class labels
//! - **processor**: wires normalization, the remote classifier and ranking

pub mod normalize;
pub mod processor;
pub mod rank;

// Re-exports for convenient access
pub use normalize::{normalize, ImageNormalizer};
pub use processor::InferencePipeline;
pub use rank::{rank, rank_batch};
