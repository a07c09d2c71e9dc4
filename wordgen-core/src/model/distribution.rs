use rand::Rng;

use crate::symbol::{ALPHABET_LEN, Symbol};

/// Per-context frequency table over the fixed 27-symbol alphabet.
///
/// # Responsibilities
/// - Accumulate transition counts during training
/// - Produce the cumulative table used for weighted sampling
/// - Expose its raw counts to the codec
///
/// # Invariants
/// - Every symbol starts at count 1 (additive smoothing), so the total is
///   always at least 27 and no continuation is ever truly impossible
/// - Counts never shrink
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AlphabetDistribution {
	counts: [u32; ALPHABET_LEN],
}

impl Default for AlphabetDistribution {
	fn default() -> Self {
		Self::new()
	}
}

impl AlphabetDistribution {
	pub fn new() -> Self {
		Self { counts: [1; ALPHABET_LEN] }
	}

	/// Rebuilds a distribution from decoded counts; smoothing is whatever the
	/// persisted table held.
	pub(crate) fn from_counts(counts: [u32; ALPHABET_LEN]) -> Self {
		Self { counts }
	}

	pub(crate) fn counts(&self) -> &[u32; ALPHABET_LEN] {
		&self.counts
	}

	/// Adds `amount` (the configured gain) to a symbol's count.
	pub fn increment(&mut self, symbol: Symbol, amount: u32) {
		let slot = &mut self.counts[symbol.index()];
		*slot = slot.saturating_add(amount);
	}

	/// Partial sums over the alphabet order; the last entry is the total.
	///
	/// Accumulated in `u64`: the individual counts are `u32`, but 27 of them
	/// can sum past `u32::MAX` for a heavily trained table.
	pub fn cumulative_table(&self) -> [u64; ALPHABET_LEN] {
		let mut table = [0u64; ALPHABET_LEN];
		let mut acc = 0u64;
		for (slot, &count) in table.iter_mut().zip(&self.counts) {
			acc += u64::from(count);
			*slot = acc;
		}
		table
	}

	pub fn total(&self) -> u64 {
		self.counts.iter().map(|&count| u64::from(count)).sum()
	}

	/// Picks the symbol at the first cumulative-sum position `>= r`.
	///
	/// `r` is expected to be uniform in `[0, total)`; any such `r` lands on a
	/// valid symbol because the last bound equals the total.
	pub fn sample(&self, r: u64) -> Symbol {
		let mut fallback = Symbol::EndMarker;
		for (index, bound) in self.cumulative_table().into_iter().enumerate() {
			if let Some(symbol) = Symbol::from_index(index) {
				fallback = symbol;
				if bound >= r {
					return symbol;
				}
			}
		}
		// Only reachable when r >= total, kept for safety
		fallback
	}

	/// Draws `r` uniformly from the distribution's range and samples.
	pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Symbol {
		let total = self.total();
		if total == 0 {
			// Possible only for a hand-crafted all-zero table
			return Symbol::EndMarker;
		}
		self.sample(rng.random_range(0..total))
	}
}
