/// Number of sampled symbols: the end marker plus the 26 lowercase letters.
///
/// The alphabet order is fixed (`[end, 'a'..'z']`) and significant: it defines
/// both the sampling tie-break and the on-disk layout of a distribution.
pub const ALPHABET_LEN: usize = 27;

/// Wire byte marking one start sentinel inside a serialized context.
pub(crate) const START_BYTE: u8 = b'#';

/// A sampled outcome of a chain model: either "the word ends here" or a letter.
///
/// # Invariants
/// - `Letter` only ever carries an ASCII lowercase letter
/// - `index()` positions follow the fixed alphabet order, end marker first
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Symbol {
	EndMarker,
	Letter(char),
}

impl Symbol {
	/// Builds a letter symbol; returns `None` for anything outside `a-z`.
	pub fn from_letter(letter: char) -> Option<Self> {
		letter.is_ascii_lowercase().then_some(Self::Letter(letter))
	}

	/// Maps an alphabet position back to its symbol.
	///
	/// Position implies identity in the wire format, which stores no symbol
	/// tags; returns `None` for positions outside the alphabet.
	pub fn from_index(index: usize) -> Option<Self> {
		match index {
			0 => Some(Self::EndMarker),
			1..=26 => Some(Self::Letter((b'a' + index as u8 - 1) as char)),
			_ => None,
		}
	}

	/// Position of this symbol in the fixed alphabet order.
	pub fn index(self) -> usize {
		match self {
			Self::EndMarker => 0,
			Self::Letter(letter) => (letter as u8 - b'a') as usize + 1,
		}
	}
}

/// One element of a context key: left-padding sentinel or a letter.
///
/// The end marker never appears in a context; it only terminates words, so
/// the two symbol spaces are kept as separate types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ContextSymbol {
	StartSentinel,
	Letter(char),
}

impl ContextSymbol {
	pub(crate) fn to_byte(self) -> u8 {
		match self {
			Self::StartSentinel => START_BYTE,
			Self::Letter(letter) => letter as u8,
		}
	}

	/// Decodes a wire byte; `None` for anything that is not `'#'` or `a-z`.
	pub(crate) fn from_byte(byte: u8) -> Option<Self> {
		match byte {
			START_BYTE => Some(Self::StartSentinel),
			b'a'..=b'z' => Some(Self::Letter(byte as char)),
			_ => None,
		}
	}
}

/// A fixed-length lookup key into a chain model.
///
/// A context of a model of order `n` always holds exactly `n` symbols:
/// leading start sentinels (padding for positions before the word begins)
/// followed by letters of the word so far.
///
/// # Responsibilities
/// - Key the context → distribution map (`Hash`/`Eq`)
/// - Give the codec a stable serialization order (`Ord`)
/// - Support the generator's probe trimming during backoff
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Context(Vec<ContextSymbol>);

impl Context {
	/// The all-sentinel context a generation run starts from.
	pub fn start(order: usize) -> Self {
		Self(vec![ContextSymbol::StartSentinel; order])
	}

	pub fn from_symbols<I: IntoIterator<Item = ContextSymbol>>(symbols: I) -> Self {
		Self(symbols.into_iter().collect())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Appends a letter to the working context during generation.
	pub fn push(&mut self, letter: char) {
		self.0.push(ContextSymbol::Letter(letter));
	}

	/// The last `n` symbols as a fresh context (the whole context if shorter).
	pub fn tail(&self, n: usize) -> Self {
		let skip = self.0.len().saturating_sub(n);
		Self(self.0[skip..].to_vec())
	}

	/// Drops the leftmost symbol; one backoff step shrinks the probe this way.
	pub fn drop_front(&mut self) {
		if !self.0.is_empty() {
			self.0.remove(0);
		}
	}

	/// The letters of this context with all sentinels stripped.
	///
	/// Applied to a finished working context, this is the generated word.
	pub fn letters(&self) -> String {
		self.0
			.iter()
			.filter_map(|symbol| match symbol {
				ContextSymbol::Letter(letter) => Some(*letter),
				ContextSymbol::StartSentinel => None,
			})
			.collect()
	}

	pub(crate) fn to_bytes(&self) -> Vec<u8> {
		self.0.iter().map(|symbol| symbol.to_byte()).collect()
	}
}
