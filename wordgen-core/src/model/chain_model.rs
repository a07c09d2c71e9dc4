use std::collections::HashMap;

use rand::Rng;
use tracing::warn;

use crate::codec;
use crate::error::{DecodeError, ModelError};
use crate::model::distribution::AlphabetDistribution;
use crate::symbol::{Context, ContextSymbol, Symbol};

/// A character-level Markov chain of one fixed order.
///
/// The model maps every context observed in the corpus (a window of `order`
/// symbols) to the frequency distribution of the symbol that followed it.
///
/// # Responsibilities
/// - Train from a corpus of words, one context table per order
/// - Answer "next symbol" queries during generation
/// - Round-trip through the binary wire format via the codec
///
/// # Invariants
/// - `order` is always >= 1
/// - Every key in `chain` has length exactly `order`
/// - Built exactly once (trained or decoded), read-only afterwards
#[derive(Clone, PartialEq, Debug)]
pub struct ChainModel {
	order: usize,
	gain: u32,
	chain: HashMap<Context, AlphabetDistribution>,
}

impl ChainModel {
	/// Trains a model of the given order from a corpus of words.
	///
	/// Each word is padded with `order` start sentinels on the left and the
	/// end marker on the right; every order-wide window then feeds the count
	/// of the symbol that follows it, weighted by `gain`. Words are
	/// lowercased first; words with characters outside `a-z` are skipped.
	///
	/// # Errors
	/// - `InvalidOrder` if `order` is zero
	/// - `EmptyCorpus` if the corpus is empty or no word was usable
	pub fn train(order: usize, gain: u32, corpus: &[String]) -> Result<Self, ModelError> {
		if order == 0 {
			return Err(ModelError::InvalidOrder);
		}
		if corpus.is_empty() {
			return Err(ModelError::EmptyCorpus);
		}

		let mut model = Self { order, gain, chain: HashMap::new() };
		for raw in corpus {
			let word = raw.trim().to_lowercase();
			if word.is_empty() {
				continue;
			}
			match as_letters(&word) {
				Some(letters) => model.ingest(&letters),
				None => warn!(word = %raw, "skipping word with characters outside a-z"),
			}
		}

		if model.chain.is_empty() {
			return Err(ModelError::EmptyCorpus);
		}
		Ok(model)
	}

	/// Rebuilds a model from persisted bytes.
	///
	/// Order and gain are not part of the payload and must be supplied by
	/// the caller; every decoded key is checked against `order`.
	pub fn from_bytes(order: usize, gain: u32, bytes: &[u8]) -> Result<Self, ModelError> {
		if order == 0 {
			return Err(ModelError::InvalidOrder);
		}

		let chain = codec::decode_table(bytes)?;
		for context in chain.keys() {
			if context.len() != order {
				return Err(DecodeError::ContextLength {
					found: context.len(),
					expected: order,
				}
				.into());
			}
		}
		Ok(Self { order, gain, chain })
	}

	/// Serializes the context table; the strict inverse of [`Self::from_bytes`].
	pub fn to_bytes(&self) -> Vec<u8> {
		codec::encode_table(&self.chain)
	}

	/// Samples the symbol following `context`.
	///
	/// `None` means the context was never observed; that is absence, not an
	/// error, and lets the caller back off to a lower order.
	pub fn next_symbol<R: Rng + ?Sized>(&self, context: &Context, rng: &mut R) -> Option<Symbol> {
		self.chain
			.get(context)
			.map(|distribution| distribution.sample_with(rng))
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn gain(&self) -> u32 {
		self.gain
	}

	/// Number of distinct contexts observed.
	pub fn len(&self) -> usize {
		self.chain.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chain.is_empty()
	}

	pub(crate) fn distribution(&self, context: &Context) -> Option<&AlphabetDistribution> {
		self.chain.get(context)
	}

	/// Counts every transition of one word into the chain.
	fn ingest(&mut self, letters: &[char]) {
		let order = self.order;
		let gain = self.gain;

		// Padded sequence: `order` sentinels, the letters, the end marker.
		// One window starts at every position up to and including the last
		// letter; the symbol right after the window gets the gain.
		for i in 0..=letters.len() {
			let mut window = Vec::with_capacity(order);
			for j in i..i + order {
				window.push(if j < order {
					ContextSymbol::StartSentinel
				} else {
					ContextSymbol::Letter(letters[j - order])
				});
			}

			let next = if i == letters.len() {
				Symbol::EndMarker
			} else {
				Symbol::Letter(letters[i])
			};

			self.get_or_insert(Context::from_symbols(window)).increment(next, gain);
		}
	}

	/// Looks up a context's distribution, creating a fresh smoothed one the
	/// first time the context is seen.
	fn get_or_insert(&mut self, context: Context) -> &mut AlphabetDistribution {
		self.chain.entry(context).or_default()
	}
}

fn as_letters(word: &str) -> Option<Vec<char>> {
	word.chars()
		.map(|c| c.is_ascii_lowercase().then_some(c))
		.collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::symbol::ALPHABET_LEN;

	fn ctx(s: &str) -> Context {
		Context::from_symbols(s.chars().map(|c| match c {
			'#' => ContextSymbol::StartSentinel,
			_ => ContextSymbol::Letter(c),
		}))
	}

	fn corpus(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| (*w).to_string()).collect()
	}

	#[test]
	fn trains_smoothed_counts_from_a_single_word() {
		let model = ChainModel::train(2, 10, &corpus(&["ab"])).unwrap();
		assert_eq!(model.len(), 3);

		let d = model.distribution(&ctx("##")).unwrap();
		assert_eq!(d.counts()[Symbol::Letter('a').index()], 11);
		assert_eq!(d.total(), 37);

		let d = model.distribution(&ctx("#a")).unwrap();
		assert_eq!(d.counts()[Symbol::Letter('b').index()], 11);
		assert_eq!(d.total(), 37);

		let d = model.distribution(&ctx("ab")).unwrap();
		assert_eq!(d.counts()[Symbol::EndMarker.index()], 11);
		assert_eq!(d.total(), 37);
	}

	#[test]
	fn repeated_words_accumulate_gain() {
		let model = ChainModel::train(1, 5, &corpus(&["ab", "ab", "ac"])).unwrap();
		let d = model.distribution(&ctx("a")).unwrap();
		assert_eq!(d.counts()[Symbol::Letter('b').index()], 11);
		assert_eq!(d.counts()[Symbol::Letter('c').index()], 6);
	}

	#[test]
	fn words_are_lowercased() {
		let model = ChainModel::train(1, 1, &corpus(&["AB"])).unwrap();
		assert!(model.distribution(&ctx("a")).is_some());
	}

	#[test]
	fn unusable_words_are_skipped() {
		let model = ChainModel::train(1, 1, &corpus(&["a-b", "ok"])).unwrap();
		assert!(model.distribution(&ctx("o")).is_some());
		assert!(model.distribution(&ctx("b")).is_none());
	}

	#[test]
	fn empty_corpus_is_rejected() {
		assert!(matches!(
			ChainModel::train(2, 1, &[]),
			Err(ModelError::EmptyCorpus)
		));
		assert!(matches!(
			ChainModel::train(2, 1, &corpus(&["", "a+b"])),
			Err(ModelError::EmptyCorpus)
		));
	}

	#[test]
	fn zero_order_is_rejected() {
		assert!(matches!(
			ChainModel::train(0, 1, &corpus(&["ab"])),
			Err(ModelError::InvalidOrder)
		));
		assert!(matches!(
			ChainModel::from_bytes(0, 1, &[]),
			Err(ModelError::InvalidOrder)
		));
	}

	#[test]
	fn next_symbol_is_absent_for_unknown_contexts() {
		let model = ChainModel::train(2, 10, &corpus(&["ab"])).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		assert!(model.next_symbol(&ctx("xy"), &mut rng).is_none());
		assert!(model.next_symbol(&ctx("##"), &mut rng).is_some());
	}

	#[test]
	fn serialization_round_trips() {
		let model = ChainModel::train(3, 42, &corpus(&["banana", "bandana", "cabana"])).unwrap();
		let restored = ChainModel::from_bytes(3, 42, &model.to_bytes()).unwrap();
		assert_eq!(restored, model);
		// Order and gain travel outside the payload
		assert_eq!(restored.order(), 3);
		assert_eq!(restored.gain(), 42);
	}

	#[test]
	fn from_bytes_checks_key_length_against_order() {
		let model = ChainModel::train(2, 1, &corpus(&["ab"])).unwrap();
		let err = ChainModel::from_bytes(3, 1, &model.to_bytes()).unwrap_err();
		assert!(matches!(
			err,
			ModelError::Decode(DecodeError::ContextLength { found: 2, expected: 3 })
		));
	}

	#[test]
	fn trained_distributions_stay_smoothed() {
		let model = ChainModel::train(2, 10, &corpus(&["ab"])).unwrap();
		for key in ["##", "#a", "ab"] {
			let counts = model.distribution(&ctx(key)).unwrap().counts();
			assert!(counts.iter().all(|&c| c >= 1));
			assert_eq!(counts.len(), ALPHABET_LEN);
		}
	}
}
