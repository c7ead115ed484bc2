//! Candidate selection strategies.
//!
//! A candidate selector narrows the corpus down to a small, high-recall set
//! of citation candidates for one query paper, cheaply enough to feed an
//! expensive downstream ranker. Two interchangeable strategies share one
//! contract:
//!
//! - `embedding`: approximate nearest-neighbor search in embedding space
//! - `lexical`: BM25 search over title/abstract text
//! - `union`: composition of other selectors
//!
//! Both strategies share the same post-processing policy: drop the query
//! paper itself, optionally expand through the citation graph, intersect
//! with the caller's eligibility pool, and deduplicate.

mod embedding;
mod lexical;
mod union;

pub use embedding::EmbeddingCandidateSelector;
pub use lexical::LexicalCandidateSelector;
pub use union::UnionCandidateSelector;

use crate::ann::AnnError;
use crate::config::DEFAULT_TOP_K;
use crate::corpus::{Corpus, CorpusError, Paper, PaperId};
use crate::embedding::EmbeddingError;
use crate::lexical::LexicalError;
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during candidate selection.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The query paper id cannot be resolved against the corpus.
    ///
    /// This is fatal to the call; it is never silently reported as an empty
    /// candidate set.
    #[error("Paper not found: {0}")]
    PaperNotFound(PaperId),
    /// Invalid selector configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Corpus backend error
    #[error("Corpus error: {0}")]
    Corpus(String),
    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),
    /// Backing index construction or query error
    #[error("Index error: {0}")]
    Index(String),
}

impl From<CorpusError> for SelectError {
    fn from(e: CorpusError) -> Self {
        SelectError::Corpus(e.to_string())
    }
}

impl From<EmbeddingError> for SelectError {
    fn from(e: EmbeddingError) -> Self {
        SelectError::Embedding(e.to_string())
    }
}

impl From<AnnError> for SelectError {
    fn from(e: AnnError) -> Self {
        SelectError::Index(e.to_string())
    }
}

impl From<LexicalError> for SelectError {
    fn from(e: LexicalError) -> Self {
        SelectError::Index(e.to_string())
    }
}

/// Selector configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Maximum number of raw hits requested from the backing index before
    /// expansion and filtering. Bounds retrieval breadth only: citation
    /// expansion can grow the result past `top_k` and pool intersection can
    /// shrink it below.
    pub top_k: usize,
    /// Whether to append the outbound citations of every direct hit to the
    /// candidate set. This recovers citations that are topically close but
    /// embedding-distant, e.g. foundational papers everyone cites.
    pub extend_candidate_citations: bool,
}

impl SelectorConfig {
    /// Creates a configuration with the given retrieval breadth.
    pub fn new(top_k: usize, extend_candidate_citations: bool) -> Self {
        Self {
            top_k,
            extend_candidate_citations,
        }
    }

    /// Checks the configuration; selector constructors call this so a bad
    /// `top_k` fails at construction rather than on the first query.
    pub(crate) fn validate(&self) -> Result<(), SelectError> {
        if self.top_k == 0 {
            return Err(SelectError::InvalidConfig(
                "top_k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            extend_candidate_citations: false,
        }
    }
}

/// Trait for candidate selection strategies.
///
/// Implementations are constructed once per corpus/index snapshot, hold no
/// per-query mutable state, and may be invoked concurrently so long as their
/// backing index supports concurrent reads.
pub trait CandidateSelector {
    /// Returns the candidate set for one query paper.
    ///
    /// `candidate_id_pool` is the universe of ids eligible to be returned; it
    /// may be unordered, contain duplicates, contain `doc_id` itself, or
    /// contain ids absent from the corpus; none of those are errors.
    ///
    /// # Guarantees
    ///
    /// - The result never contains `doc_id`.
    /// - Every returned id is a member of `candidate_id_pool`.
    /// - Returned ids are unique regardless of how many retrieval paths
    ///   produced them.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::PaperNotFound`] if `doc_id` is not in the
    /// corpus; backend faults surface as the other [`SelectError`] variants.
    /// An empty result is a value, never an error.
    fn fetch_candidates(
        &self,
        doc_id: &PaperId,
        candidate_id_pool: &[PaperId],
    ) -> Result<HashSet<PaperId>, SelectError>;
}

/// Resolves the query paper or fails the call.
pub(crate) fn require_paper<C: Corpus>(corpus: &C, doc_id: &PaperId) -> Result<Paper, SelectError> {
    corpus
        .get(doc_id)?
        .ok_or_else(|| SelectError::PaperNotFound(doc_id.clone()))
}

/// Normalizes the caller-supplied pool into a set, once per call.
///
/// Callers pass whatever collection they have; duplicates and ordering are
/// their business, not the selector's.
pub(crate) fn normalize_pool(candidate_id_pool: &[PaperId]) -> HashSet<&PaperId> {
    candidate_id_pool.iter().collect()
}

/// Appends the full outbound-citation list of every direct hit.
///
/// Hits that have vanished from the corpus contribute nothing; dangling ids
/// inside citation lists pass through untouched and are culled later by pool
/// intersection. The per-candidate citation count is deliberately unbounded.
pub(crate) fn expand_with_citations<C: Corpus>(
    corpus: &C,
    hits: &[PaperId],
) -> Result<Vec<PaperId>, SelectError> {
    let mut expanded = Vec::new();
    for hit in hits {
        if let Some(paper) = corpus.get(hit)? {
            expanded.extend(paper.out_citations);
        }
    }
    Ok(expanded)
}

/// Intersects gathered candidates with the pool and drops the query paper.
///
/// The query id is dropped here even though direct hits were already
/// self-filtered: citation expansion can reintroduce it when a candidate
/// cites the query paper.
pub(crate) fn intersect_pool(
    candidates: impl IntoIterator<Item = PaperId>,
    pool: &HashSet<&PaperId>,
    doc_id: &PaperId,
) -> HashSet<PaperId> {
    candidates
        .into_iter()
        .filter(|candidate| candidate != doc_id && pool.contains(candidate))
        .collect()
}
