//! Composition of candidate selectors.

use super::{CandidateSelector, SelectError};
use crate::corpus::PaperId;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Candidate selector that unions the results of several member selectors.
///
/// Each member already guarantees self-exclusion, pool membership, and
/// uniqueness, and a union cannot reintroduce the query id or off-pool ids,
/// so the combined result satisfies the same contract. Typical use is merging
/// the embedding and lexical strategies so candidates missed by one retrieval
/// path are recovered by the other.
///
/// Members are queried sequentially; an error from any member fails the call.
pub struct UnionCandidateSelector {
    selectors: Vec<Box<dyn CandidateSelector>>,
}

impl UnionCandidateSelector {
    /// Creates a composite over the given member selectors.
    pub fn new(selectors: Vec<Box<dyn CandidateSelector>>) -> Self {
        Self { selectors }
    }

    /// Returns the number of member selectors.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Checks if the composite has no members.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl CandidateSelector for UnionCandidateSelector {
    #[instrument(skip_all, fields(doc_id = %doc_id, members = self.selectors.len()))]
    fn fetch_candidates(
        &self,
        doc_id: &PaperId,
        candidate_id_pool: &[PaperId],
    ) -> Result<HashSet<PaperId>, SelectError> {
        let mut merged = HashSet::new();
        for selector in &self.selectors {
            let candidates = selector.fetch_candidates(doc_id, candidate_id_pool)?;
            merged.extend(candidates);
        }
        debug!(candidates = merged.len(), "Merged member results");
        Ok(merged)
    }
}
