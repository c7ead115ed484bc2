//! Paper records and read-only corpus access.
//!
//! The corpus is the authoritative lookup from [`PaperId`] to [`Paper`].
//! Selectors consume it read-only through the [`Corpus`] trait; loading and
//! persistence live with the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Unique paper identifier.
///
/// Opaque and stable for the lifetime of a corpus snapshot. Backed by a
/// string so ids from external metadata sources can be carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    /// Creates a paper id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaperId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PaperId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A paper record as loaded from the corpus.
///
/// Immutable once loaded. `out_citations` is the ordered list of papers this
/// paper cites; it may be empty and may reference ids that are not present in
/// the corpus snapshot (dangling citations are a fact of real metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Unique paper identifier
    pub id: PaperId,
    /// Paper title (may be empty for malformed records)
    pub title: String,
    /// Paper abstract
    pub abstract_text: String,
    /// Outbound citations, in the order they appear in the source metadata
    pub out_citations: Vec<PaperId>,
}

/// Errors that can occur during corpus access.
///
/// "Paper not present" is not an error at this layer; lookups return
/// `Ok(None)` and callers decide whether absence is fatal.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// I/O error from a disk- or network-backed corpus
    #[error("I/O error: {0}")]
    Io(String),
    /// Record exists but cannot be decoded
    #[error("Corrupt record for {0}: {1}")]
    CorruptRecord(PaperId, String),
}

/// Read-only lookup from [`PaperId`] to [`Paper`].
///
/// Implementations must be cheap to query repeatedly: selectors call `get`
/// once for the query paper and once per direct hit during citation
/// expansion. Backends that fault (I/O, decoding) surface [`CorpusError`];
/// a missing paper is `Ok(None)`.
pub trait Corpus {
    /// Retrieves a paper by id.
    ///
    /// Returns `Ok(None)` if the paper is not in this corpus snapshot.
    fn get(&self, id: &PaperId) -> Result<Option<Paper>, CorpusError>;

    /// Checks whether a paper is present without materializing the record.
    fn contains(&self, id: &PaperId) -> Result<bool, CorpusError> {
        Ok(self.get(id)?.is_some())
    }

    /// Returns the number of papers in the corpus.
    fn len(&self) -> Result<usize, CorpusError>;

    /// Checks if the corpus is empty.
    fn is_empty(&self) -> Result<bool, CorpusError> {
        Ok(self.len()? == 0)
    }
}

// Blanket implementation for Arc<T> where T: Corpus
// This allows sharing a corpus between multiple selectors
impl<T: Corpus> Corpus for Arc<T> {
    fn get(&self, id: &PaperId) -> Result<Option<Paper>, CorpusError> {
        (**self).get(id)
    }

    fn contains(&self, id: &PaperId) -> Result<bool, CorpusError> {
        (**self).contains(id)
    }

    fn len(&self) -> Result<usize, CorpusError> {
        (**self).len()
    }
}

/// In-memory corpus backed by a `HashMap`.
///
/// Built once from a batch of records and read-only afterwards, matching the
/// snapshot semantics selectors assume. Suitable for tests and for corpora
/// that fit in memory; larger deployments implement [`Corpus`] over their
/// own storage.
#[derive(Debug, Default)]
pub struct InMemoryCorpus {
    papers: HashMap<PaperId, Paper>,
}

impl InMemoryCorpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a corpus from a batch of papers.
    ///
    /// Later records win when ids collide, mirroring load-order semantics of
    /// metadata dumps where re-exported records supersede earlier ones.
    pub fn from_papers(papers: impl IntoIterator<Item = Paper>) -> Self {
        let papers = papers
            .into_iter()
            .map(|paper| (paper.id.clone(), paper))
            .collect();
        Self { papers }
    }

    /// Iterates over all papers in the corpus (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.papers.values()
    }
}

impl Corpus for InMemoryCorpus {
    fn get(&self, id: &PaperId) -> Result<Option<Paper>, CorpusError> {
        Ok(self.papers.get(id).cloned())
    }

    fn contains(&self, id: &PaperId) -> Result<bool, CorpusError> {
        Ok(self.papers.contains_key(id))
    }

    fn len(&self) -> Result<usize, CorpusError> {
        Ok(self.papers.len())
    }
}
