//! Embedding model boundary.
//!
//! This module defines the abstraction over the learned embedding model that
//! maps a paper record to a fixed-size dense vector. Model training and
//! inference live outside this crate; selectors only require that a paper can
//! be embedded into the same space the nearest-neighbor index was built in.

use crate::corpus::Paper;
use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// Model not available or initialization failed
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    /// Forward pass through the model failed
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    /// Input could not be prepared for the model
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Trait for paper embedding models.
///
/// Implementations map a [`Paper`] to a dense vector of dimension
/// [`embedding_dim`](PaperEmbedder::embedding_dim). The dimension must match
/// the build-time dimensionality of whichever nearest-neighbor index the
/// embeddings are searched in.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single embedder is typically
/// shared by a long-lived selector invoked from multiple threads.
pub trait PaperEmbedder: Send + Sync {
    /// Returns the embedding dimension (vector length).
    ///
    /// All embeddings produced by this model have this length.
    fn embedding_dim(&self) -> usize;

    /// Computes the embedding for a paper.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError`] when the backing model cannot produce a
    /// vector for this record.
    fn embed(&self, paper: &Paper) -> Result<Vec<f32>, EmbeddingError>;
}

// Blanket implementation for Arc<T> where T: PaperEmbedder
// This allows sharing one model across selectors
impl<T: PaperEmbedder> PaperEmbedder for std::sync::Arc<T> {
    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn embed(&self, paper: &Paper) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(paper)
    }
}
