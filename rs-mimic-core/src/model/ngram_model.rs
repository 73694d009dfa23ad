use std::collections::HashMap;

use super::state::State;
use crate::error::{MimicError, Result};
use crate::tokenizer::{ends_sentence, Tokenizer};

/// An ordered run of `order - 1` tokens used as lookup key.
pub type Context = Vec<String>;

/// Returns `true` if `context` may begin a generated sentence: its first
/// token starts with an uppercase letter and its last token does not end
/// in terminal punctuation.
pub fn is_valid_start(context: &[String]) -> bool {
	let capitalized = context
		.first()
		.and_then(|token| token.chars().next())
		.is_some_and(char::is_uppercase);
	let open = context.last().is_some_and(|token| !ends_sentence(token));
	capitalized && open
}

/// Word-level n-gram model of one corpus.
///
/// The `NGramModel` maps every context of `order - 1` tokens seen in the
/// corpus to the distribution of the token that followed it.
///
/// # Invariants
/// - `order` is always >= 2
/// - Every key in `states` has exactly `order - 1` tokens
/// - All state transitions have occurrence counts >= 1
/// - `starts` lists each valid-start context once, in first-seen order
///
/// A model is immutable once built; a new corpus means a new model.
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (number of tokens in the n-gram)
	order: usize,

	/// Tokenized corpus the model was built from
	tokens: Vec<String>,

	/// Mapping from a context (length order-1) to its next-token distribution
	states: HashMap<Context, State>,

	/// Contexts eligible to start a sentence
	starts: Vec<Context>,
}

impl NGramModel {
	/// Builds a model of order `order` from a token sequence.
	///
	/// Slides a window of `order` tokens over the sequence and counts, for
	/// each leading `order - 1` tokens, the token that follows. A sequence
	/// shorter than `order` gives an empty model.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order < 2`.
	pub fn build(tokens: Vec<String>, order: usize) -> Result<Self> {
		if order < 2 {
			return Err(MimicError::InvalidOrder(order));
		}

		let mut states: HashMap<Context, State> = HashMap::new();
		let mut starts = Vec::new();

		for window in tokens.windows(order) {
			let (context, next) = window.split_at(order - 1);
			let next_token = &next[0];

			match states.get_mut(context) {
				Some(state) => state.add_transition(next_token),
				None => {
					if is_valid_start(context) {
						starts.push(context.to_vec());
					}
					states.insert(context.to_vec(), State::with_transition(next_token));
				}
			}
		}

		Ok(Self { order, tokens, states, starts })
	}

	/// Tokenizes `text` and builds a model from the tokens.
	pub fn from_text<T: Tokenizer + ?Sized>(text: &str, tokenizer: &T, order: usize) -> Result<Self> {
		Self::build(tokenizer.tokenize(text), order)
	}

	/// N-gram order the model was built with.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Tokenized corpus the model was built from.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// `true` if no context could be formed (corpus shorter than `order`).
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Distribution of the tokens following `context`, if it was observed.
	pub fn state(&self, context: &[String]) -> Option<&State> {
		self.states.get(context)
	}

	/// Iterates over every observed context.
	pub fn contexts(&self) -> impl Iterator<Item = &[String]> {
		self.states.keys().map(Vec::as_slice)
	}

	/// Contexts eligible to start a sentence, in first-seen order.
	pub fn valid_starts(&self) -> &[Context] {
		&self.starts
	}
}
