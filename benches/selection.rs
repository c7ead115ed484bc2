//! Benchmarks for candidate selection.
//!
//! Run with: `cargo bench --bench selection`
//!
//! Measures `fetch_candidates` for both retrieval strategies across corpus
//! sizes, with and without citation expansion. Embeddings are seeded and
//! deterministic so runs are comparable.

use citescout::test_utils::{paper, seeded_embedding, FixedEmbedder};
use citescout::{
    CandidateSelector, EmbeddingCandidateSelector, HnswAnnIndex, InMemoryCorpus,
    LexicalCandidateSelector, LexicalIndexBuilder, Paper, PaperId, SelectorConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use tempfile::TempDir;

/// Embedding dimension for benchmark fixtures.
///
/// Smaller than production model output so index build time stays reasonable;
/// the selection layer's own cost is dimension-independent.
const EMBEDDING_DIM: usize = 64;

/// Retrieval breadth used by all benchmark queries.
const TOP_K: usize = 50;

fn sample_title(i: usize) -> String {
    let topics = [
        "graph neural networks for molecular property prediction",
        "approximate nearest neighbor search at scale",
        "citation recommendation with dense retrieval",
        "bm25 term weighting and field boosts",
        "transformer models for scientific text",
        "sampling strategies for large graphs",
        "entity resolution in bibliographic data",
        "contrastive learning of paper embeddings",
    ];
    format!("{} variant {}", topics[i % topics.len()], i)
}

/// Builds a corpus of `n` papers where each paper cites the three papers
/// before it, giving citation expansion realistic fan-out.
fn build_papers(n: usize) -> Vec<Paper> {
    (0..n)
        .map(|i| {
            let citations: Vec<String> = (1..=3)
                .filter(|back| *back <= i)
                .map(|back| format!("p{}", i - back))
                .collect();
            let citation_refs: Vec<&str> = citations.iter().map(String::as_str).collect();
            paper(
                &format!("p{i}"),
                &sample_title(i),
                "benchmark abstract text",
                &citation_refs,
            )
        })
        .collect()
}

struct BenchWorld {
    corpus: Arc<InMemoryCorpus>,
    embedder: Arc<FixedEmbedder>,
    ann: Arc<HnswAnnIndex>,
    index_dir: TempDir,
    pool: Vec<PaperId>,
}

fn build_world(n: usize) -> BenchWorld {
    let papers = build_papers(n);

    let mut embedder = FixedEmbedder::new(EMBEDDING_DIM);
    let mut ann = HnswAnnIndex::new(EMBEDDING_DIM);
    for (i, p) in papers.iter().enumerate() {
        let embedding = seeded_embedding(EMBEDDING_DIM, i as u64);
        embedder.set(p.id.clone(), embedding.clone());
        ann.insert(p.id.clone(), embedding).unwrap();
    }

    let index_dir = TempDir::new().unwrap();
    let mut builder = LexicalIndexBuilder::create_in_dir(index_dir.path()).unwrap();
    for p in &papers {
        builder.add_paper(p).unwrap();
    }
    builder.commit().unwrap();

    let pool = papers.iter().map(|p| p.id.clone()).collect();

    BenchWorld {
        corpus: Arc::new(InMemoryCorpus::from_papers(papers)),
        embedder: Arc::new(embedder),
        ann: Arc::new(ann),
        index_dir,
        pool,
    }
}

fn bench_embedding_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("embedding_fetch_candidates");

    for &size in &[100usize, 1_000] {
        let world = build_world(size);
        let query = PaperId::from("p0");

        for &extend in &[false, true] {
            let selector = EmbeddingCandidateSelector::new(
                Arc::clone(&world.corpus),
                Arc::clone(&world.embedder),
                Arc::clone(&world.ann),
                SelectorConfig::new(TOP_K, extend),
            )
            .unwrap();

            group.throughput(Throughput::Elements(1));
            group.bench_with_input(
                BenchmarkId::new(if extend { "expanded" } else { "direct" }, size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let result = selector
                            .fetch_candidates(black_box(&query), black_box(&world.pool))
                            .unwrap();
                        black_box(result)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_lexical_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexical_fetch_candidates");

    for &size in &[100usize, 1_000] {
        let world = build_world(size);
        let query = PaperId::from("p0");

        for &extend in &[false, true] {
            let selector = LexicalCandidateSelector::open_in_dir(
                Arc::clone(&world.corpus),
                world.index_dir.path(),
                SelectorConfig::new(TOP_K, extend),
            )
            .unwrap();

            group.throughput(Throughput::Elements(1));
            group.bench_with_input(
                BenchmarkId::new(if extend { "expanded" } else { "direct" }, size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let result = selector
                            .fetch_candidates(black_box(&query), black_box(&world.pool))
                            .unwrap();
                        black_box(result)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_embedding_selector, bench_lexical_selector);
criterion_main!(benches);
