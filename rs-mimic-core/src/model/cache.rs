use std::num::NonZeroUsize;

use log::debug;
use lru::LruCache;

use crate::error::{MimicError, Result};

/// Default number of entries kept by a `ModelCache`.
pub const DEFAULT_CACHE_SIZE: usize = 10;

/// Fixed-capacity store with least-recently-used eviction.
///
/// # Responsibilities
/// - Map a corpus identifier to its built model
/// - Track recency: every `get` hit and every `set` makes the key most recent
/// - Evict the least recently used key when a new key would exceed capacity
///
/// Entries and recency order live in one `LruCache`, so they cannot drift
/// apart.
#[derive(Debug)]
pub struct ModelCache<V> {
	entries: LruCache<String, V>,
}

impl<V> ModelCache<V> {
	/// Creates an empty cache holding at most `max_size` entries.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `max_size` is 0.
	pub fn new(max_size: usize) -> Result<Self> {
		let capacity = NonZeroUsize::new(max_size)
			.ok_or_else(|| MimicError::InvalidConfig("cache size must be >= 1".to_owned()))?;
		Ok(Self { entries: LruCache::new(capacity) })
	}

	pub fn max_size(&self) -> usize {
		self.entries.cap().get()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns `true` if `key` is cached, without touching its recency.
	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains(key)
	}

	/// Returns the value stored under `key` and marks it most recently used.
	///
	/// A miss leaves the cache untouched.
	pub fn get(&mut self, key: &str) -> Option<&V> {
		self.entries.get(key)
	}

	/// Inserts or overwrites `key` and marks it most recently used.
	///
	/// If `key` is new and the cache is full, the least recently used entry
	/// is evicted first.
	pub fn set(&mut self, key: &str, value: V) {
		if !self.entries.contains(key) && self.entries.len() >= self.max_size() {
			self.evict();
		}
		// Capacity is free or `key` is overwritten, so nothing else is displaced
		self.entries.push(key.to_owned(), value);
	}

	/// Removes `key`, returning its value if it was cached.
	pub fn remove(&mut self, key: &str) -> Option<V> {
		self.entries.pop(key)
	}

	/// Removes the single least recently used entry and returns its key.
	///
	/// Returns `None` on an empty cache.
	fn evict(&mut self) -> Option<String> {
		let (oldest, _) = self.entries.pop_lru()?;
		debug!("evicted '{oldest}' from model cache");
		Some(oldest)
	}

	/// Cached keys from least to most recently used.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().rev().map(|(key, _)| key.as_str())
	}
}
