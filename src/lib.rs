//! # citescout
//!
//! Candidate generation for citation recommendation.
//!
//! Given a query paper and a pool of eligible candidate ids, this crate
//! narrows a corpus down to a small, high-recall set of citation candidates
//! cheap enough to feed an expensive downstream ranking model. Two
//! interchangeable retrieval strategies implement one contract:
//!
//! - **Embedding**: approximate nearest-neighbor search (HNSW) over learned
//!   paper embeddings
//! - **Lexical**: BM25 search over a persisted title/abstract index (tantivy)
//!
//! Both share the same post-processing policy: self-exclusion, optional
//! citation-graph expansion, pool intersection, and deduplication.
//!
//! ## Modules
//!
//! - [`selection`] - The [`CandidateSelector`] contract and its strategies
//! - [`corpus`] - Paper records and read-only corpus access
//! - [`embedding`] - Embedding model boundary
//! - [`ann`] - Approximate nearest-neighbor index (HNSW)
//! - [`lexical`] - Persisted BM25 index over titles and abstracts
//! - [`config`] - Production configuration constants
//! - [`test_utils`] - Deterministic fixtures shared by tests and benches
//!
//! ## Example
//!
//! ```no_run
//! use citescout::{
//!     CandidateSelector, LexicalCandidateSelector, InMemoryCorpus, PaperId,
//!     SelectorConfig,
//! };
//!
//! # fn run(corpus: InMemoryCorpus, pool: Vec<PaperId>) -> Result<(), Box<dyn std::error::Error>> {
//! let selector = LexicalCandidateSelector::open_in_dir(
//!     corpus,
//!     "/data/citation-index",
//!     SelectorConfig::new(100, true),
//! )?;
//!
//! let candidates = selector.fetch_candidates(&PaperId::from("paper-42"), &pool)?;
//! # Ok(())
//! # }
//! ```

pub mod ann;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod lexical;
pub mod selection;
pub mod test_utils;

// Re-export main types (public API)
pub use ann::{AnnIndex, HnswAnnIndex};
pub use corpus::{Corpus, CorpusError, InMemoryCorpus, Paper, PaperId};
pub use embedding::PaperEmbedder;
pub use lexical::{LexicalIndexBuilder, LexicalSearcher};
pub use selection::{
    CandidateSelector, EmbeddingCandidateSelector, LexicalCandidateSelector, SelectError,
    SelectorConfig, UnionCandidateSelector,
};
