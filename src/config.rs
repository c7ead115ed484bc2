//! Production configuration constants.
//!
//! This module contains constants that define the production configuration
//! for candidate generation. These values are used throughout the codebase
//! and in benchmarks to ensure consistency.

// =============================================================================
// Candidate Selection Configuration
// =============================================================================

/// Default number of raw hits requested from a backing index per query.
///
/// This bounds retrieval breadth before citation expansion and pool
/// intersection; the final candidate set may be larger (expansion) or
/// smaller (intersection).
pub const DEFAULT_TOP_K: usize = 100;

// =============================================================================
// HNSW Index Configuration
// =============================================================================

/// Number of bidirectional links per HNSW node at layers > 0.
///
/// Higher values improve recall at the cost of memory and build time.
/// Range 12-48 is typical; 16 is the paper's recommendation for balanced
/// performance.
///
/// Reference: "Efficient and robust approximate nearest neighbor search using
/// Hierarchical Navigable Small World graphs" by Malkov & Yashunin (2018).
/// arXiv:1603.09320
pub const HNSW_M: usize = 16;

/// Number of links at HNSW layer 0 (entry layer).
///
/// Standard practice is M0 = 2*M for denser connectivity at the base layer.
pub const HNSW_M0: usize = 32;

/// Minimum ef_search parameter for HNSW queries.
///
/// ef_search controls recall vs speed tradeoff in HNSW search:
/// - Higher values = better recall but slower
/// - Lower values = faster but may miss relevant results
///
/// Queries use max(n * 2, MIN_EF_SEARCH) to scale with result count
/// while ensuring a minimum quality floor.
pub const MIN_EF_SEARCH: usize = 50;
