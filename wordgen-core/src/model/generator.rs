use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::ModelError;
use crate::io;
use crate::model::chain_model::ChainModel;
use crate::symbol::{Context, Symbol};

/// Retry cap for the length filter; starving beyond this fails instead of
/// looping forever on a corpus that cannot produce a word in range.
const MAX_ATTEMPTS: usize = 10_000;

/// Order-backoff word generator over an ensemble of chain models.
///
/// Holds models of orders N, N-1, …, 1 and one owned random source. The
/// random source is an explicit value (generic over [`Rng`], [`StdRng`] by
/// default) so generation can be made deterministic in tests and by the
/// `--seed` flag.
///
/// # Responsibilities
/// - Enforce the ensemble shape (non-empty, contiguous descending orders)
/// - Run the generation/backoff loop
/// - Apply the min/max length filter with a bounded retry count
///
/// # Invariants
/// - `models[i].order() == order - i`, down to order 1
/// - Models are read-only; each `generate_word` call is independent
#[derive(Debug)]
pub struct BackoffGenerator<R: Rng = StdRng> {
	order: usize,
	models: Vec<ChainModel>,
	rng: R,
}

impl BackoffGenerator<StdRng> {
	/// Builds a generator over `models` with an OS-seeded random source.
	pub fn new(models: Vec<ChainModel>) -> Result<Self, ModelError> {
		Self::with_rng(models, StdRng::from_os_rng())
	}

	/// Loads or trains a full ensemble for one corpus file, then builds a
	/// generator over it. See [`load_or_train`].
	pub fn open<P: AsRef<Path>>(corpus_path: P, order: usize, gain: u32) -> Result<Self, ModelError> {
		Self::new(load_or_train(corpus_path, order, gain)?)
	}
}

impl<R: Rng> BackoffGenerator<R> {
	/// Builds a generator with an explicit random source.
	///
	/// # Errors
	/// - `NoModels` if `models` is empty
	/// - `OrderGap` unless orders run contiguously from `models[0].order()`
	///   down to 1
	pub fn with_rng(models: Vec<ChainModel>, rng: R) -> Result<Self, ModelError> {
		let Some(first) = models.first() else {
			return Err(ModelError::NoModels);
		};
		let order = first.order();

		for (i, model) in models.iter().enumerate() {
			let expected = order.saturating_sub(i);
			if expected == 0 || model.order() != expected {
				return Err(ModelError::OrderGap { expected, found: model.order() });
			}
		}
		let lowest = models[models.len() - 1].order();
		if lowest != 1 {
			return Err(ModelError::OrderGap { expected: 1, found: lowest });
		}

		Ok(Self { order, models, rng })
	}

	/// Order of the highest model in the ensemble.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Generates one word with no length constraint.
	///
	/// The working context starts as `order` sentinels; each emitted letter
	/// is appended and the next probe restarts from the highest order. The
	/// word ends on an end marker from the lowest-order model or on a dead
	/// end (no model can extend the context).
	pub fn generate(&mut self) -> String {
		let mut context = Context::start(self.order);
		loop {
			match self.next_symbol(&context) {
				Some(Symbol::Letter(letter)) => context.push(letter),
				Some(Symbol::EndMarker) | None => break,
			}
		}
		context.letters()
	}

	/// Generates words until one of length in `[min, max]` appears.
	///
	/// # Errors
	/// `NoWordInRange` once the retry cap is exhausted.
	pub fn generate_word(&mut self, min: usize, max: usize) -> Result<String, ModelError> {
		for _ in 0..MAX_ATTEMPTS {
			let word = self.generate();
			if (min..=max).contains(&word.chars().count()) {
				return Ok(word);
			}
		}
		Err(ModelError::NoWordInRange { min, max, attempts: MAX_ATTEMPTS })
	}

	/// One backoff pass over the ensemble.
	///
	/// The probe starts as the last `order` symbols of the working context.
	/// A missing context backs off; so does an end marker from any model but
	/// the lowest-order one, which would otherwise cut words short wherever
	/// a high-order context happens to end a corpus word. Only the terminal
	/// model may answer with the end marker; `None` is a dead end.
	fn next_symbol(&mut self, context: &Context) -> Option<Symbol> {
		let mut probe = context.tail(self.order);
		let terminal = self.models.len() - 1;

		for (i, model) in self.models.iter().enumerate() {
			match model.next_symbol(&probe, &mut self.rng) {
				Some(Symbol::Letter(letter)) => return Some(Symbol::Letter(letter)),
				Some(Symbol::EndMarker) if i == terminal => return Some(Symbol::EndMarker),
				Some(Symbol::EndMarker) | None => probe.drop_front(),
			}
		}
		None
	}
}

/// Loads the cached model of every order from N down to 1, training and
/// persisting any that is missing.
///
/// Model files sit next to the corpus file, one per order (`family.3.bin`
/// and so on). A missing or empty cache file triggers training followed by
/// a save; a corrupt one is a hard `Decode` error, and a save that cannot
/// be written is an `Io` error. The corpus is only read when at least one
/// order actually needs training.
pub fn load_or_train<P: AsRef<Path>>(
	corpus_path: P,
	order: usize,
	gain: u32,
) -> Result<Vec<ChainModel>, ModelError> {
	if order == 0 {
		return Err(ModelError::InvalidOrder);
	}
	let corpus_path = corpus_path.as_ref();

	let mut corpus: Option<Vec<String>> = None;
	let mut models = Vec::with_capacity(order);
	for n in (1..=order).rev() {
		let path = io::model_path(corpus_path, n)?;
		let model = match io::load_model_bytes(&path)? {
			Some(bytes) => {
				info!(path = %path.display(), order = n, "loading cached model");
				ChainModel::from_bytes(n, gain, &bytes)?
			}
			None => {
				if corpus.is_none() {
					corpus = Some(io::read_corpus(corpus_path)?);
				}
				// Populated just above
				let words = corpus.as_deref().unwrap_or_default();
				info!(path = %path.display(), order = n, "training model");
				let model = ChainModel::train(n, gain, words)?;
				io::save_model_bytes(&path, &model.to_bytes())?;
				model
			}
		};
		models.push(model);
	}
	Ok(models)
}
