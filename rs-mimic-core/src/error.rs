use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the text generation core.
///
/// Every failure kind a caller may want to report differently has its own
/// variant. An empty generated sentence is not an error.
#[derive(Debug, Error)]
pub enum MimicError {
	/// The requested identifier has no corpus file.
	#[error("no corpus named '{identifier}' (expected {})", .path.display())]
	NotFound {
		identifier: String,
		path: PathBuf,
	},

	/// Reading, writing or listing the corpus store failed.
	#[error("I/O failure on {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// Identifier is empty or would escape the corpus directory.
	#[error("invalid corpus identifier '{0}'")]
	InvalidIdentifier(String),

	/// Model order below 2.
	#[error("model order must be >= 2, got {0}")]
	InvalidOrder(usize),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// The cache lock was poisoned by a panicking caller.
	#[error("model cache unavailable")]
	CacheUnavailable,
}

impl MimicError {
	/// Maps an I/O error on `path` for `identifier`, keeping a missing file
	/// distinct from every other I/O failure.
	pub(crate) fn from_read(identifier: &str, path: PathBuf, source: io::Error) -> Self {
		if source.kind() == io::ErrorKind::NotFound {
			MimicError::NotFound { identifier: identifier.to_owned(), path }
		} else {
			MimicError::Io { path, source }
		}
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, MimicError::NotFound { .. })
	}
}

pub type Result<T> = std::result::Result<T, MimicError>;
