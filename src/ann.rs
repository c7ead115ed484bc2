// rust-cv/hnsw approximate nearest-neighbor search over paper embeddings

use crate::config::{HNSW_M, HNSW_M0, MIN_EF_SEARCH};
use crate::corpus::PaperId;
use hnsw::{Hnsw, Searcher};
use space::{Metric, Neighbor};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur during nearest-neighbor index operations.
#[derive(Debug, Clone, Error)]
pub enum AnnError {
    /// Vector dimension mismatch (expected vs actual)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension
        expected: usize,
        /// Actual embedding dimension received
        actual: usize,
    },
    /// Index query failed
    #[error("Index error: {0}")]
    IndexError(String),
}

/// Validates that an embedding has the expected dimension.
///
/// Returns `Ok(())` if dimensions match, or `Err(AnnError::DimensionMismatch)`
/// otherwise.
pub fn validate_dimension(expected: usize, actual: usize) -> Result<(), AnnError> {
    if actual == expected {
        Ok(())
    } else {
        Err(AnnError::DimensionMismatch { expected, actual })
    }
}

/// Approximate nearest-neighbor index over paper embeddings.
///
/// `get_nearest` returns ids nearest-first, at most `n` of them. The hit list
/// may include ids that are no longer present in the corpus the caller works
/// against; consumers filter stale ids themselves.
pub trait AnnIndex {
    /// Returns up to `n` paper ids nearest to `embedding`, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`AnnError::DimensionMismatch`] if `embedding` does not match
    /// the index's build-time dimensionality.
    fn get_nearest(&self, embedding: &[f32], n: usize) -> Result<Vec<PaperId>, AnnError>;
}

// Blanket implementation for Arc<T> where T: AnnIndex
// This allows sharing an index between multiple selectors
impl<T: AnnIndex> AnnIndex for std::sync::Arc<T> {
    fn get_nearest(&self, embedding: &[f32], n: usize) -> Result<Vec<PaperId>, AnnError> {
        (**self).get_nearest(embedding, n)
    }
}

/// Cosine distance metric for embedding vectors
/// Computes 1 - cosine_similarity, scaled to u32
///
/// Accepts Box<[f32]> for owned, stable heap allocations that avoid lifetime issues.
struct CosineDistance;

impl Metric<Box<[f32]>> for CosineDistance {
    type Unit = u32;

    fn distance(&self, a: &Box<[f32]>, b: &Box<[f32]>) -> u32 {
        let a_slice: &[f32] = a;
        let b_slice: &[f32] = b;

        let dot: f32 = a_slice
            .iter()
            .zip(b_slice.iter())
            .map(|(&x, &y)| x * y)
            .sum();
        let mag_a: f32 = a_slice.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b_slice.iter().map(|y| y * y).sum::<f32>().sqrt();

        if mag_a == 0.0 || mag_b == 0.0 {
            return u32::MAX; // Maximum distance for zero vectors
        }

        let cosine_sim = dot / (mag_a * mag_b);
        let distance = 1.0 - cosine_sim; // Convert similarity to distance [0, 2]

        // Convert to u32 by scaling to [0, u32::MAX]
        // Distance is in [0, 2], so we scale by u32::MAX/2
        (distance * (u32::MAX as f32 / 2.0)) as u32
    }
}

/// HNSW-backed nearest-neighbor index (Hierarchical Navigable Small World).
///
/// Uses rust-cv/hnsw, which supports incremental insertion without index
/// rebuilds. Embeddings are stored as `Box<[f32]>` (stable heap allocations
/// owned by the index), so no unsafe lifetime tricks are needed.
///
/// Queries allocate a fresh scratch [`Searcher`] per call; the index itself
/// holds no query-time mutable state, so `get_nearest` takes `&self` and
/// concurrent read access needs no locking.
///
/// # HNSW Parameters
///
/// - **M = 16**: bidirectional links per node at layers > 0. Higher values
///   improve recall at the cost of memory and build time.
/// - **M0 = 32**: links at layer 0, 2*M per standard practice.
///
/// Reference: "Efficient and robust approximate nearest neighbor search using
/// Hierarchical Navigable Small World graphs" by Malkov & Yashunin (2018).
/// arXiv:1603.09320
pub struct HnswAnnIndex {
    /// HNSW index for similarity search using cosine distance
    /// Type parameters: <Metric, Data, RNG, M, M0>
    index: Hnsw<CosineDistance, Box<[f32]>, rand::rngs::StdRng, HNSW_M, HNSW_M0>,
    /// Map from HNSW index position to PaperId
    paper_ids: Vec<PaperId>,
    /// Dimensionality of embeddings (fixed at construction)
    dimension: usize,
}

impl HnswAnnIndex {
    /// Creates a new empty index.
    ///
    /// # Arguments
    /// * `dimension` - Dimensionality of embeddings (must match the model)
    pub fn new(dimension: usize) -> Self {
        Self {
            index: Hnsw::new(CosineDistance),
            paper_ids: Vec::new(),
            dimension,
        }
    }

    /// Inserts a paper embedding into the index.
    ///
    /// Insertion is incremental; the graph stays searchable after every call.
    ///
    /// # Errors
    ///
    /// Returns [`AnnError::DimensionMismatch`] if the embedding dimension
    /// doesn't match the index's configured dimension.
    #[instrument(skip_all, fields(index_size = self.paper_ids.len()))]
    pub fn insert(&mut self, paper_id: PaperId, embedding: Vec<f32>) -> Result<(), AnnError> {
        validate_dimension(self.dimension, embedding.len())?;

        let boxed_embedding = embedding.into_boxed_slice();
        self.paper_ids.push(paper_id);

        let mut searcher = Searcher::default();
        self.index.insert(boxed_embedding, &mut searcher);
        Ok(())
    }

    /// Returns the number of indexed embeddings.
    pub fn len(&self) -> usize {
        self.paper_ids.len()
    }

    /// Checks if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.paper_ids.is_empty()
    }

    /// Returns the embedding dimension the index was built with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl AnnIndex for HnswAnnIndex {
    fn get_nearest(&self, embedding: &[f32], n: usize) -> Result<Vec<PaperId>, AnnError> {
        validate_dimension(self.dimension, embedding.len())?;

        if self.paper_ids.is_empty() || n == 0 {
            return Ok(Vec::new());
        }

        // Allocate neighbor buffer for min(n, index_size) results
        let actual_n = std::cmp::min(n, self.paper_ids.len());
        let mut neighbors = vec![
            Neighbor {
                index: !0,
                distance: !0
            };
            actual_n
        ];

        // ef_search controls search quality (higher = better but slower)
        let ef_search = std::cmp::max(n * 2, MIN_EF_SEARCH);

        // Convert query to Box<[f32]> to match the index's data type
        let query_box = embedding.to_vec().into_boxed_slice();

        let mut searcher = Searcher::default();
        self.index
            .nearest(&query_box, ef_search, &mut searcher, &mut neighbors);

        // Neighbors come back nearest-first; unfilled slots keep the sentinel
        let results = neighbors
            .into_iter()
            .filter(|neighbor| neighbor.index != !0)
            .map(|neighbor| self.paper_ids[neighbor.index].clone())
            .collect();
        Ok(results)
    }
}
