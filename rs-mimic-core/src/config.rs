use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MimicError, Result};
use crate::io;
use crate::model::cache::DEFAULT_CACHE_SIZE;

/// Runtime configuration of the text generator.
///
/// Every field has a default; `from_env` overrides them from `MIMIC_*`
/// environment variables.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MimicConfig {
	/// Directory holding one `{identifier}.txt` corpus per identifier.
	pub corpus_dir: PathBuf,

	/// N-gram order (context length is `order - 1`).
	pub order: usize,

	/// Word ceiling of a generated sentence.
	pub max_words: usize,

	/// Character ceiling of the returned text (transport limit).
	pub max_chars: usize,

	/// Number of models kept in memory.
	pub cache_size: usize,
}

impl Default for MimicConfig {
	fn default() -> Self {
		Self {
			corpus_dir: PathBuf::from("./corpus"),
			order: 3,
			max_words: 100,
			max_chars: 1999,
			cache_size: DEFAULT_CACHE_SIZE,
		}
	}
}

impl MimicConfig {
	/// Builds a configuration from defaults overridden by environment variables:
	/// `MIMIC_CORPUS_DIR`, `MIMIC_ORDER`, `MIMIC_MAX_WORDS`, `MIMIC_MAX_CHARS`
	/// and `MIMIC_CACHE_SIZE`.
	///
	/// # Errors
	/// Returns `InvalidConfig` if a variable is set but cannot be parsed, or if
	/// the resulting configuration fails `validate`.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(dir) = lookup("MIMIC_CORPUS_DIR") {
			config.corpus_dir = io::normalize_folder(dir.trim());
		}
		override_number(&lookup, "MIMIC_ORDER", &mut config.order)?;
		override_number(&lookup, "MIMIC_MAX_WORDS", &mut config.max_words)?;
		override_number(&lookup, "MIMIC_MAX_CHARS", &mut config.max_chars)?;
		override_number(&lookup, "MIMIC_CACHE_SIZE", &mut config.cache_size)?;

		config.validate()?;
		Ok(config)
	}

	/// Checks the constraints between fields.
	pub fn validate(&self) -> Result<()> {
		if self.order < 2 {
			return Err(MimicError::InvalidOrder(self.order));
		}
		if self.max_words < self.order {
			return Err(MimicError::InvalidConfig(format!(
				"max_words ({}) must be >= order ({})",
				self.max_words, self.order
			)));
		}
		if self.max_chars == 0 {
			return Err(MimicError::InvalidConfig("max_chars must be >= 1".to_owned()));
		}
		if self.cache_size == 0 {
			return Err(MimicError::InvalidConfig("cache_size must be >= 1".to_owned()));
		}
		Ok(())
	}
}

fn override_number<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
{
	if let Some(raw) = lookup(key) {
		*target = raw
			.trim()
			.parse()
			.map_err(|_| MimicError::InvalidConfig(format!("{key} is not a valid number: '{raw}'")))?;
	}
	Ok(())
}
