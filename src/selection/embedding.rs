//! Candidate generation via nearest-neighbor search in embedding space.

use super::{
    expand_with_citations, intersect_pool, normalize_pool, require_paper, CandidateSelector,
    SelectError, SelectorConfig,
};
use crate::ann::AnnIndex;
use crate::corpus::{Corpus, PaperId};
use crate::embedding::PaperEmbedder;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Candidate selector backed by an embedding model and an approximate
/// nearest-neighbor index.
///
/// The query paper is embedded and its `top_k` nearest neighbors become the
/// direct candidates. The index is asked for `top_k + 1` hits because a query
/// paper that is itself indexed comes back as its own nearest neighbor at
/// distance zero and is discarded.
///
/// Nearest-neighbor ties are broken by the index's internal order; this
/// selector imposes no ordering of its own and returns an unordered set.
pub struct EmbeddingCandidateSelector<C, E, A>
where
    C: Corpus,
    E: PaperEmbedder,
    A: AnnIndex,
{
    corpus: C,
    embedder: E,
    ann: A,
    config: SelectorConfig,
}

impl<C, E, A> EmbeddingCandidateSelector<C, E, A>
where
    C: Corpus,
    E: PaperEmbedder,
    A: AnnIndex,
{
    /// Creates a selector over the given corpus, embedder, and ANN index.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidConfig`] if `config.top_k` is zero.
    pub fn new(corpus: C, embedder: E, ann: A, config: SelectorConfig) -> Result<Self, SelectError> {
        config.validate()?;
        Ok(Self {
            corpus,
            embedder,
            ann,
            config,
        })
    }

    /// Returns the selector's configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

impl<C, E, A> CandidateSelector for EmbeddingCandidateSelector<C, E, A>
where
    C: Corpus,
    E: PaperEmbedder,
    A: AnnIndex,
{
    #[instrument(skip_all, fields(doc_id = %doc_id, pool_size = candidate_id_pool.len()))]
    fn fetch_candidates(
        &self,
        doc_id: &PaperId,
        candidate_id_pool: &[PaperId],
    ) -> Result<HashSet<PaperId>, SelectError> {
        let paper = require_paper(&self.corpus, doc_id)?;
        let query_embedding = self.embedder.embed(&paper)?;

        // Over-fetch by one: the query paper is usually its own nearest
        // neighbor and gets discarded below.
        let mut hits = self
            .ann
            .get_nearest(&query_embedding, self.config.top_k + 1)?;
        hits.retain(|hit| hit != doc_id);
        hits.truncate(self.config.top_k);

        let mut candidate_ids = hits;
        if self.config.extend_candidate_citations {
            let expanded = expand_with_citations(&self.corpus, &candidate_ids)?;
            candidate_ids.extend(expanded);
        }
        debug!(candidates = candidate_ids.len(), "Gathered raw candidates");

        let pool = normalize_pool(candidate_id_pool);
        Ok(intersect_pool(candidate_ids, &pool, doc_id))
    }
}
