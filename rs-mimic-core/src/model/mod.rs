//! N-gram models, sentence generation and model caching.
//!
//! This module provides:
//! - Word-level n-gram models (`NGramModel`)
//! - Per-context frequency distributions (`State`)
//! - Sentence generation by weighted random walk (`SentenceGenerator`)
//! - A least-recently-used model store (`ModelCache`)

/// Least-recently-used store for built models.
pub mod cache;

/// Sentence generation by weighted random walk over an `NGramModel`.
///
/// Handles start selection, continuation, punctuation and word-count
/// termination, and overflow trimming.
pub mod generator;

/// Fixed-order word n-gram model (`order >= 2`).
///
/// Handles building from a token sequence, transition counting and
/// valid-start indexing.
pub mod ngram_model;

/// Next-token frequency distribution of a single context.
pub mod state;
