//! Word-level n-gram text generation library.
//!
//! This crate provides the generation core of a chat bot that imitates a
//! corpus, including:
//! - A tokenizer adapter (whitespace tokens, sentence splitting)
//! - Word n-gram models built from a corpus in a single pass
//! - Sentence generation by frequency-weighted random walk
//! - A least-recently-used cache of built models
//! - A façade reading corpora from disk and enforcing output limits
//! - The writer side of the message extraction pipeline

/// Runtime configuration (defaults and `MIMIC_*` environment overrides).
pub mod config;

/// Error taxonomy shared by every module.
pub mod error;

/// Writer side of the message extraction pipeline.
pub mod extraction;

/// Corpus store access (path building, file loading, listing).
pub mod io;

/// Core n-gram models, generation logic and model cache.
pub mod model;

/// Generation façade: cache lookup, model build, generation, truncation.
pub mod text_generator;

/// Tokenizer adapter.
pub mod tokenizer;

pub use config::MimicConfig;
pub use error::{MimicError, Result};
pub use text_generator::TextGenerator;
