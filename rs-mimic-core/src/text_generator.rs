use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};
use rand::Rng;

use crate::config::MimicConfig;
use crate::error::{MimicError, Result};
use crate::io;
use crate::model::cache::ModelCache;
use crate::model::generator::SentenceGenerator;
use crate::model::ngram_model::NGramModel;
use crate::tokenizer::{Tokenizer, WhitespaceTokenizer};

/// Entry point of the generation pipeline.
///
/// # Responsibilities
/// - Resolve an identifier to a model: cache hit, or read + tokenize + build
///   on a miss
/// - Generate one sentence from the model
/// - Cut the result to the configured character limit
///
/// The cache sits behind a mutex held only for lookups and insertions; the
/// corpus read and model build run outside it. Models are shared through
/// `Arc`, so a caller keeps a usable model even if it is evicted meanwhile.
#[derive(Debug)]
pub struct TextGenerator<T: Tokenizer = WhitespaceTokenizer> {
	config: MimicConfig,
	tokenizer: T,
	sentence_generator: SentenceGenerator,
	cache: Mutex<ModelCache<Arc<NGramModel>>>,
}

impl TextGenerator<WhitespaceTokenizer> {
	/// Creates a generator using the whitespace tokenizer.
	pub fn from_config(config: MimicConfig) -> Result<Self> {
		Self::new(config, WhitespaceTokenizer)
	}
}

impl<T: Tokenizer> TextGenerator<T> {
	/// Creates a generator with an empty cache of `config.cache_size` entries.
	///
	/// # Errors
	/// Returns an error if `config` fails validation.
	pub fn new(config: MimicConfig, tokenizer: T) -> Result<Self> {
		config.validate()?;
		let cache = ModelCache::new(config.cache_size)?;
		Ok(Self {
			sentence_generator: SentenceGenerator::new(config.max_words),
			tokenizer,
			cache: Mutex::new(cache),
			config,
		})
	}

	pub fn config(&self) -> &MimicConfig {
		&self.config
	}

	pub fn tokenizer(&self) -> &T {
		&self.tokenizer
	}

	/// Generates one sentence from the corpus of `identifier`.
	///
	/// An empty string is a valid result: the corpus has no sentence start.
	///
	/// # Errors
	/// - `NotFound` if the identifier has no corpus file
	/// - `Io` if the corpus file cannot be read
	/// - `InvalidIdentifier` if the identifier cannot name a corpus file
	pub fn generate_text(&self, identifier: &str) -> Result<String> {
		self.generate_text_with_rng(identifier, &mut rand::rng())
	}

	/// Same as `generate_text`, drawing randomness from `rng`.
	pub fn generate_text_with_rng<R: Rng + ?Sized>(&self, identifier: &str, rng: &mut R) -> Result<String> {
		let model = self.model(identifier)?;
		let sentence = self.sentence_generator.generate_with_rng(&model, rng);
		if sentence.is_empty() {
			debug!("corpus '{identifier}' produced an empty sentence");
		}
		Ok(truncate_chars(sentence, self.config.max_chars))
	}

	/// Returns the model of `identifier`, building and caching it on a miss.
	pub fn model(&self, identifier: &str) -> Result<Arc<NGramModel>> {
		if let Some(model) = self.lock_cache()?.get(identifier) {
			debug!("model cache hit for '{identifier}'");
			return Ok(Arc::clone(model));
		}
		debug!("model cache miss for '{identifier}'");

		let text = io::read_corpus(&self.config.corpus_dir, identifier)?;
		let model = Arc::new(NGramModel::from_text(&text, &self.tokenizer, self.config.order)?);
		info!(
			"built model '{}': {} tokens, {} contexts, {} starts",
			identifier,
			model.tokens().len(),
			model.len(),
			model.valid_starts().len()
		);

		let mut cache = self.lock_cache()?;
		cache.set(identifier, Arc::clone(&model));
		debug!("model cache holds {}/{} corpora", cache.len(), cache.max_size());
		Ok(model)
	}

	/// Identifiers available in the corpus directory, sorted.
	pub fn list_corpora(&self) -> Result<Vec<String>> {
		io::list_identifiers(&self.config.corpus_dir)
	}

	/// Cached identifiers, least recently used first.
	pub fn cached_identifiers(&self) -> Result<Vec<String>> {
		Ok(self.lock_cache()?.keys().map(str::to_owned).collect())
	}

	/// Drops the cached model of `identifier` so the next request rebuilds it.
	///
	/// Returns `true` if a model was cached.
	pub fn forget(&self, identifier: &str) -> Result<bool> {
		Ok(self.lock_cache()?.remove(identifier).is_some())
	}

	fn lock_cache(&self) -> Result<MutexGuard<'_, ModelCache<Arc<NGramModel>>>> {
		self.cache.lock().map_err(|_| MimicError::CacheUnavailable)
	}
}

/// Keeps at most `max_chars` characters of `text`.
///
/// A plain cut: it may split a word.
pub fn truncate_chars(mut text: String, max_chars: usize) -> String {
	if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
		text.truncate(byte_index);
	}
	text
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn truncate_counts_characters_not_bytes() {
		assert_eq!(truncate_chars("héllo wörld".to_owned(), 7), "héllo w");
		assert_eq!(truncate_chars("short".to_owned(), 10), "short");
		assert_eq!(truncate_chars("exact".to_owned(), 5), "exact");
		assert_eq!(truncate_chars(String::new(), 3), "");
	}

	#[test]
	fn invalid_config_is_rejected() {
		let config = MimicConfig { cache_size: 0, ..MimicConfig::default() };
		assert!(TextGenerator::from_config(config).is_err());
	}
}
