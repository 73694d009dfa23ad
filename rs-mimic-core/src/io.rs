use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::{MimicError, Result};

/// Extension of every corpus file.
pub const CORPUS_EXTENSION: &str = "txt";

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Builds the path of the corpus file backing `identifier`.
///
/// Example:
/// `corpus` + `"alice"` → `corpus/alice.txt`
///
/// # Errors
/// `InvalidIdentifier` if the identifier is empty or contains a path
/// separator or `..`, so that no identifier resolves outside `dir`.
pub fn corpus_path<P: AsRef<Path>>(dir: P, identifier: &str) -> Result<PathBuf> {
	let trimmed = identifier.trim();
	if trimmed.is_empty()
		|| trimmed != identifier
		|| identifier.contains(['/', '\\'])
		|| identifier.contains("..")
	{
		return Err(MimicError::InvalidIdentifier(identifier.to_owned()));
	}

	Ok(dir.as_ref().join(format!("{identifier}.{CORPUS_EXTENSION}")))
}

/// Reads the whole corpus of `identifier` as UTF-8 text.
///
/// # Errors
/// - `NotFound` if the file does not exist
/// - `Io` for any other failure (permissions, invalid UTF-8, ...)
pub fn read_corpus<P: AsRef<Path>>(dir: P, identifier: &str) -> Result<String> {
	let path = corpus_path(dir, identifier)?;
	fs::read_to_string(&path).map_err(|source| MimicError::from_read(identifier, path, source))
}

/// Lists the identifiers available in a corpus directory.
///
/// Identifiers are the file stems of the `.txt` files directly contained in
/// `dir`, sorted. Subdirectories are ignored.
pub fn list_identifiers<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
	let dir = dir.as_ref();
	let io_error = |source| MimicError::Io { path: dir.to_path_buf(), source };

	let mut identifiers = Vec::new();
	for entry in fs::read_dir(dir).map_err(io_error)? {
		let path = entry.map_err(io_error)?.path();

		if path.is_file() && path.extension() == Some(OsStr::new(CORPUS_EXTENSION)) {
			if let Some(stem) = path.file_stem() {
				identifiers.push(stem.to_string_lossy().to_string());
			}
		}
	}

	identifiers.sort();
	Ok(identifiers)
}

/// Writes `lines` joined with `\n` to `path`, replacing any previous content.
///
/// The parent directory is created if missing.
pub(crate) fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
	let io_error = |source| MimicError::Io { path: path.to_path_buf(), source };

	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).map_err(io_error)?;
	}

	let contents = lines.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join("\n");
	fs::write(path, contents).map_err(io_error)
}
