//! Candidate generation via BM25 lexical search on title/abstract.

use super::{
    expand_with_citations, intersect_pool, normalize_pool, require_paper, CandidateSelector,
    SelectError, SelectorConfig,
};
use crate::corpus::{Corpus, PaperId};
use crate::lexical::LexicalSearcher;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, instrument};

/// Candidate selector backed by a persisted BM25 index.
///
/// The query paper's title is the query text, parsed as a disjunction across
/// the indexed title and abstract fields. Querying with the title alone is a
/// deliberate precision/recall baseline; richer query text would keep the
/// same OR-across-terms, both-fields semantics.
///
/// The index handle is acquired once at construction and held for the
/// selector's lifetime; queries never reopen the index.
pub struct LexicalCandidateSelector<C: Corpus> {
    corpus: C,
    searcher: LexicalSearcher,
    config: SelectorConfig,
}

impl<C: Corpus> LexicalCandidateSelector<C> {
    /// Creates a selector over an already-opened index.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidConfig`] if `config.top_k` is zero.
    pub fn new(
        corpus: C,
        searcher: LexicalSearcher,
        config: SelectorConfig,
    ) -> Result<Self, SelectError> {
        config.validate()?;
        Ok(Self {
            corpus,
            searcher,
            config,
        })
    }

    /// Opens the index directory at `index_path` and builds a selector on it.
    ///
    /// Fails fast at construction when the index is missing or its schema is
    /// incompatible; errors are never deferred to the first query.
    pub fn open_in_dir(
        corpus: C,
        index_path: impl AsRef<Path>,
        config: SelectorConfig,
    ) -> Result<Self, SelectError> {
        let searcher = LexicalSearcher::open_in_dir(index_path)?;
        Self::new(corpus, searcher, config)
    }

    /// Returns the selector's configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

impl<C: Corpus> CandidateSelector for LexicalCandidateSelector<C> {
    #[instrument(skip_all, fields(doc_id = %doc_id, pool_size = candidate_id_pool.len()))]
    fn fetch_candidates(
        &self,
        doc_id: &PaperId,
        candidate_id_pool: &[PaperId],
    ) -> Result<HashSet<PaperId>, SelectError> {
        let paper = require_paper(&self.corpus, doc_id)?;

        // A blank title parses to a zero-hit query, which is an empty
        // candidate set rather than an error.
        let mut candidate_ids = self
            .searcher
            .search(&paper.title, self.config.top_k + 1)?;
        candidate_ids.truncate(self.config.top_k);

        if self.config.extend_candidate_citations {
            let expanded = expand_with_citations(&self.corpus, &candidate_ids)?;
            candidate_ids.extend(expanded);
        }
        debug!(candidates = candidate_ids.len(), "Gathered raw candidates");

        let pool = normalize_pool(candidate_id_pool);
        Ok(intersect_pool(candidate_ids, &pool, doc_id))
    }
}
