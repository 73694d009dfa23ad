/// Characters closing a sentence.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Returns `true` if `token` ends with `.`, `!` or `?`.
pub fn ends_sentence(token: &str) -> bool {
	token.ends_with(TERMINAL_PUNCTUATION)
}

/// Splits raw text into tokens and sentences.
///
/// The model builder only sees the token sequence; sentence splitting is
/// used when turning extracted chat messages into corpus lines.
pub trait Tokenizer: Send + Sync {
	/// Splits `text` into an ordered sequence of tokens.
	fn tokenize(&self, text: &str) -> Vec<String>;

	/// Splits `text` into trimmed, non-empty sentences.
	fn sentences(&self, text: &str) -> Vec<String>;
}

/// Tokenizer treating every maximal run of non-whitespace as one token.
///
/// Punctuation stays attached to its word (`"world."` is one token), which
/// is what lets the generator detect sentence ends from tokens alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
	fn tokenize(&self, text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	/// A sentence ends after a token ending in terminal punctuation, or at a
	/// line break.
	fn sentences(&self, text: &str) -> Vec<String> {
		let mut sentences = Vec::new();

		for line in text.lines() {
			let mut current: Vec<&str> = Vec::new();
			for token in line.split_whitespace() {
				current.push(token);
				if ends_sentence(token) {
					sentences.push(current.join(" "));
					current.clear();
				}
			}
			if !current.is_empty() {
				sentences.push(current.join(" "));
			}
		}

		sentences
	}
}
