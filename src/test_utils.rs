//! Shared test fixtures.
//!
//! Helpers used by unit tests, the integration suite, and benchmarks:
//! a deterministic fixture embedder, seeded embedding generation, and a
//! compact paper constructor. Nothing here is intended for production use.

use crate::corpus::{Paper, PaperId};
use crate::embedding::{EmbeddingError, PaperEmbedder};
use std::collections::HashMap;

/// Builds a paper record from string literals.
pub fn paper(id: &str, title: &str, abstract_text: &str, citations: &[&str]) -> Paper {
    Paper {
        id: PaperId::from(id),
        title: title.to_string(),
        abstract_text: abstract_text.to_string(),
        out_citations: citations.iter().map(|c| PaperId::from(*c)).collect(),
    }
}

/// Embedder that returns pre-registered vectors by paper id.
///
/// Lets tests place papers at exact positions in embedding space so
/// nearest-neighbor outcomes are fully determined. Embedding a paper with no
/// registered vector is an error, mirroring a model that cannot process a
/// record.
pub struct FixedEmbedder {
    dimension: usize,
    embeddings: HashMap<PaperId, Vec<f32>>,
}

impl FixedEmbedder {
    /// Creates an embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            embeddings: HashMap::new(),
        }
    }

    /// Registers the embedding for a paper.
    ///
    /// # Panics
    ///
    /// Panics if the vector length doesn't match the declared dimension.
    /// This is intentional for tests - a bad fixture should fail loudly.
    pub fn set(&mut self, id: PaperId, embedding: Vec<f32>) {
        assert_eq!(
            embedding.len(),
            self.dimension,
            "fixture embedding dimension mismatch"
        );
        self.embeddings.insert(id, embedding);
    }

    /// Returns the registered embedding for a paper, if any.
    pub fn get(&self, id: &PaperId) -> Option<Vec<f32>> {
        self.embeddings.get(id).cloned()
    }
}

impl PaperEmbedder for FixedEmbedder {
    fn embedding_dim(&self) -> usize {
        self.dimension
    }

    fn embed(&self, paper: &Paper) -> Result<Vec<f32>, EmbeddingError> {
        self.embeddings
            .get(&paper.id)
            .cloned()
            .ok_or_else(|| {
                EmbeddingError::InferenceFailed(format!("no fixture embedding for {}", paper.id))
            })
    }
}

/// Generates a deterministic L2-normalized embedding from a seed.
///
/// Produces vectors matching real embedding characteristics (unit length,
/// values spread over [-1, 1]) without any model dependency. Identical seeds
/// always yield identical vectors.
pub fn seeded_embedding(dimension: usize, seed: u64) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let raw: Vec<f32> = (0..dimension)
        .map(|i| {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            i.hash(&mut hasher);
            let h = hasher.finish();
            ((h as f32 / u64::MAX as f32) * 2.0) - 1.0
        })
        .collect();

    let norm: f32 = raw.iter().map(|x| x * x).sum::<f32>().sqrt();
    raw.into_iter().map(|x| x / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_embedder_roundtrip() {
        let mut embedder = FixedEmbedder::new(2);
        embedder.set(PaperId::from("p1"), vec![1.0, 0.0]);

        let record = paper("p1", "title", "", &[]);
        assert_eq!(embedder.embed(&record).unwrap(), vec![1.0, 0.0]);

        let unknown = paper("p2", "other", "", &[]);
        assert!(embedder.embed(&unknown).is_err());
    }

    #[test]
    fn test_seeded_embedding_deterministic_and_normalized() {
        let a = seeded_embedding(16, 42);
        let b = seeded_embedding(16, 42);
        assert_eq!(a, b);
        assert_ne!(a, seeded_embedding(16, 43));

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
