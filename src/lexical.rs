//! Persisted BM25 lexical index over paper titles and abstracts.
//!
//! The index is a tantivy directory with three fields: a stored `id`
//! identifier plus indexed `title` and `abstract` text. [`LexicalSearcher`]
//! opens an existing directory read-only and fails fast when the directory or
//! any expected field is missing; [`LexicalIndexBuilder`] produces compatible
//! directories for tests and offline tooling.

use crate::corpus::{Paper, PaperId};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use thiserror::Error;
use tracing::{debug, info};

/// Stored identifier field name.
pub const ID_FIELD: &str = "id";
/// Indexed title field name.
pub const TITLE_FIELD: &str = "title";
/// Indexed abstract field name.
pub const ABSTRACT_FIELD: &str = "abstract";

/// Errors that can occur while opening, writing, or querying the lexical index.
#[derive(Debug, Error)]
pub enum LexicalError {
    /// Index directory missing, unreadable, or corrupt
    #[error("Failed to open index: {0}")]
    Open(String),
    /// Index exists but its schema doesn't match what queries expect
    #[error("Index schema incompatible: {0}")]
    SchemaMismatch(String),
    /// Query execution failed
    #[error("Query failed: {0}")]
    Query(String),
    /// Index creation or document write failed
    #[error("Failed to write index: {0}")]
    Write(String),
}

/// Builds the on-disk schema: stored raw `id`, tokenized `title`/`abstract`.
pub fn citation_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field(ID_FIELD, STRING | STORED);
    builder.add_text_field(TITLE_FIELD, TEXT);
    builder.add_text_field(ABSTRACT_FIELD, TEXT);
    builder.build()
}

/// Resolves and validates the three expected fields against an opened index.
fn resolve_fields(index: &Index) -> Result<(Field, Field, Field), LexicalError> {
    let schema = index.schema();
    let field = |name: &'static str| {
        schema
            .get_field(name)
            .map_err(|_| LexicalError::SchemaMismatch(format!("missing field `{name}`")))
    };

    let id = field(ID_FIELD)?;
    let title = field(TITLE_FIELD)?;
    let abstract_ = field(ABSTRACT_FIELD)?;

    if !schema.get_field_entry(id).is_stored() {
        return Err(LexicalError::SchemaMismatch(
            "field `id` must be stored".to_string(),
        ));
    }
    for (name, f) in [(TITLE_FIELD, title), (ABSTRACT_FIELD, abstract_)] {
        if !schema.get_field_entry(f).is_indexed() {
            return Err(LexicalError::SchemaMismatch(format!(
                "field `{name}` must be indexed"
            )));
        }
    }

    Ok((id, title, abstract_))
}

/// Read-only searcher over a persisted lexical index.
///
/// The reader handle is acquired once at construction and released on drop;
/// queries never reopen the index. Ranking is tantivy's BM25, with query
/// terms combined as a disjunction ("OR") across the title and abstract
/// fields, so a hit in either field contributes to the score.
pub struct LexicalSearcher {
    reader: IndexReader,
    query_parser: QueryParser,
    id_field: Field,
}

impl LexicalSearcher {
    /// Opens a persisted index directory read-only.
    ///
    /// Fails fast when the directory cannot be opened or its schema lacks
    /// the `id`/`title`/`abstract` fields; errors are never deferred to the
    /// first query.
    pub fn open_in_dir(path: impl AsRef<Path>) -> Result<Self, LexicalError> {
        let path = path.as_ref();
        let index = Index::open_in_dir(path).map_err(|e| LexicalError::Open(e.to_string()))?;
        let (id_field, title_field, abstract_field) = resolve_fields(&index)?;

        // Snapshot semantics: the index is immutable for this searcher's
        // lifetime, so no reload watcher is needed.
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| LexicalError::Open(e.to_string()))?;

        let query_parser = QueryParser::for_index(&index, vec![title_field, abstract_field]);

        info!(path = %path.display(), "Opened lexical index");
        Ok(Self {
            reader,
            query_parser,
            id_field,
        })
    }

    /// Runs a BM25-ranked disjunctive query across title and abstract.
    ///
    /// Returns up to `limit` paper ids, best score first. Blank query text is
    /// a legitimate zero-hit query, not an error; the same goes for query
    /// text whose terms match nothing.
    pub fn search(&self, query_text: &str, limit: usize) -> Result<Vec<PaperId>, LexicalError> {
        if query_text.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        // Lenient parsing: titles routinely contain `:`/`-`/parentheses that
        // the strict parser would reject as query syntax.
        let (query, _parse_errors) = self.query_parser.parse_query_lenient(query_text);

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| LexicalError::Query(e.to_string()))?;

        let mut ids = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let stored: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| LexicalError::Query(e.to_string()))?;
            if let Some(id) = stored.get_first(self.id_field).and_then(|v| v.as_str()) {
                ids.push(PaperId::from(id));
            }
        }

        debug!(hits = ids.len(), "Lexical query completed");
        Ok(ids)
    }
}

/// Writer for producing index directories compatible with [`LexicalSearcher`].
///
/// Intended for tests and offline tooling; bulk corpus indexing pipelines
/// live with the caller.
pub struct LexicalIndexBuilder {
    writer: IndexWriter,
    id_field: Field,
    title_field: Field,
    abstract_field: Field,
}

impl LexicalIndexBuilder {
    /// Writer heap budget. Small segments are fine here; the builder exists
    /// for fixture-sized indexes, not bulk ingestion.
    const WRITER_HEAP_BYTES: usize = 50_000_000;

    /// Creates a fresh index in `path` (the directory must exist and be empty).
    pub fn create_in_dir(path: impl AsRef<Path>) -> Result<Self, LexicalError> {
        let index = Index::create_in_dir(path.as_ref(), citation_schema())
            .map_err(|e| LexicalError::Write(e.to_string()))?;
        let (id_field, title_field, abstract_field) = resolve_fields(&index)?;
        let writer = index
            .writer(Self::WRITER_HEAP_BYTES)
            .map_err(|e| LexicalError::Write(e.to_string()))?;

        Ok(Self {
            writer,
            id_field,
            title_field,
            abstract_field,
        })
    }

    /// Queues a paper for indexing.
    pub fn add_paper(&mut self, paper: &Paper) -> Result<(), LexicalError> {
        self.writer
            .add_document(doc!(
                self.id_field => paper.id.as_str(),
                self.title_field => paper.title.as_str(),
                self.abstract_field => paper.abstract_text.as_str(),
            ))
            .map_err(|e| LexicalError::Write(e.to_string()))?;
        Ok(())
    }

    /// Commits queued papers, making them visible to subsequent readers.
    pub fn commit(&mut self) -> Result<(), LexicalError> {
        self.writer
            .commit()
            .map_err(|e| LexicalError::Write(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paper(id: &str, title: &str, abstract_text: &str) -> Paper {
        Paper {
            id: PaperId::from(id),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            out_citations: Vec::new(),
        }
    }

    fn build_index(papers: &[Paper]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let mut builder = LexicalIndexBuilder::create_in_dir(dir.path()).unwrap();
        for p in papers {
            builder.add_paper(p).unwrap();
        }
        builder.commit().unwrap();
        dir
    }

    #[test]
    fn test_search_matches_title_and_abstract() {
        let dir = build_index(&[
            paper(
                "p1",
                "Graph neural networks for molecules",
                "We study message passing.",
            ),
            paper(
                "p2",
                "Convolutional architectures",
                "A survey of graph neural networks.",
            ),
            paper("p3", "Unrelated biology paper", "Cell membranes."),
        ]);

        let searcher = LexicalSearcher::open_in_dir(dir.path()).unwrap();
        let hits = searcher.search("graph neural networks", 10).unwrap();

        // Both title hits and abstract hits qualify (OR across both fields)
        assert!(hits.contains(&PaperId::from("p1")));
        assert!(hits.contains(&PaperId::from("p2")));
        assert!(!hits.contains(&PaperId::from("p3")));
    }

    #[test]
    fn test_search_respects_limit() {
        let dir = build_index(&[
            paper("p1", "retrieval models", ""),
            paper("p2", "retrieval systems", ""),
            paper("p3", "retrieval pipelines", ""),
        ]);

        let searcher = LexicalSearcher::open_in_dir(dir.path()).unwrap();
        let hits = searcher.search("retrieval", 2).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_blank_query_returns_no_hits() {
        let dir = build_index(&[paper("p1", "some title", "some abstract")]);
        let searcher = LexicalSearcher::open_in_dir(dir.path()).unwrap();

        assert!(searcher.search("", 10).unwrap().is_empty());
        assert!(searcher.search("   ", 10).unwrap().is_empty());
    }

    #[test]
    fn test_punctuation_heavy_query_is_tolerated() {
        let dir = build_index(&[paper(
            "p1",
            "BERT: pre-training of deep bidirectional transformers",
            "",
        )]);
        let searcher = LexicalSearcher::open_in_dir(dir.path()).unwrap();

        let hits = searcher
            .search("BERT: pre-training of deep bidirectional transformers", 10)
            .unwrap();
        assert_eq!(hits, vec![PaperId::from("p1")]);
    }

    #[test]
    fn test_open_missing_dir_fails_fast() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-index");
        assert!(matches!(
            LexicalSearcher::open_in_dir(&missing),
            Err(LexicalError::Open(_))
        ));
    }

    #[test]
    fn test_open_incompatible_schema_fails_fast() {
        let dir = TempDir::new().unwrap();
        let mut builder = Schema::builder();
        builder.add_text_field("body", TEXT);
        Index::create_in_dir(dir.path(), builder.build()).unwrap();

        assert!(matches!(
            LexicalSearcher::open_in_dir(dir.path()),
            Err(LexicalError::SchemaMismatch(_))
        ));
    }
}
