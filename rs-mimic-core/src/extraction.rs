use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::io;
use crate::tokenizer::Tokenizer;

/// Identifier under which the messages of `user_id` are stored.
pub fn user_identifier(user_id: u64) -> String {
	format!("user_messages_{user_id}")
}

/// Splits chat messages into sentences, in message order.
pub fn sentences_from_messages<T, S>(tokenizer: &T, messages: &[S]) -> Vec<String>
where
	T: Tokenizer + ?Sized,
	S: AsRef<str>,
{
	messages
		.iter()
		.flat_map(|message| tokenizer.sentences(message.as_ref()))
		.collect()
}

/// Writes `sentences` to the corpus `{identifier}.txt`, one per line.
///
/// Replaces any previous corpus with the same identifier and returns the
/// written path.
pub fn save_sentences<P, S>(corpus_dir: P, identifier: &str, sentences: &[S]) -> Result<PathBuf>
where
	P: AsRef<Path>,
	S: AsRef<str>,
{
	let path = io::corpus_path(corpus_dir, identifier)?;
	io::write_lines(&path, sentences)?;
	info!("saved {} sentences to {}", sentences.len(), path.display());
	Ok(path)
}

/// Writes the sentences of `user_id` to `user_messages_{user_id}.txt`.
pub fn save_user_messages<P, S>(corpus_dir: P, user_id: u64, sentences: &[S]) -> Result<PathBuf>
where
	P: AsRef<Path>,
	S: AsRef<str>,
{
	save_sentences(corpus_dir, &user_identifier(user_id), sentences)
}
