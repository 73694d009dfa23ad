use std::collections::BTreeMap;

use rand::Rng;

/// Frequency distribution of the tokens observed after one context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - A state is created together with its first transition, so it is
///   never empty
/// - Each transition occurrence count is strictly positive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
	/// Outgoing transitions indexed by the next token, kept sorted so a
	/// seeded sampler walks them in the same order on every build.
	/// Example: { "there" => 1, "world." => 2 }
	transitions: BTreeMap<String, usize>,
}

impl State {
	/// Creates a state holding a single observation of `next_token`.
	pub(crate) fn with_transition(next_token: &str) -> Self {
		let mut state = Self { transitions: BTreeMap::new() };
		state.add_transition(next_token);
		state
	}

	/// Records an occurrence of a transition toward `next_token`.
	pub(crate) fn add_transition(&mut self, next_token: &str) {
		match self.transitions.get_mut(next_token) {
			Some(occurrence) => *occurrence += 1,
			None => {
				self.transitions.insert(next_token.to_owned(), 1);
			}
		}
	}

	/// Number of times `next_token` followed this context.
	pub fn count(&self, next_token: &str) -> usize {
		self.transitions.get(next_token).copied().unwrap_or(0)
	}

	/// Total number of observations.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Iterates over `(next_token, count)` pairs in token order.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// `true` if no transition was recorded.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Picks the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count: an O(n) scan with cumulative subtraction.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next_token, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_token.as_str());
			}
			r -= occurrence;
		}

		// Unreachable while counts sum to `total`
		None
	}
}
