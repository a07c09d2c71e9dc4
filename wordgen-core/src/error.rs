use thiserror::Error;

/// Failure while decoding persisted model bytes.
///
/// The wire format carries no header, version tag or record count, so the only
/// way to detect corruption is a declared length running past the buffer or a
/// record boundary not landing exactly on the buffer end. All of those surface
/// here instead of reading out of bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
	#[error("model data ends at offset {offset}, {needed} more bytes expected")]
	UnexpectedEof { offset: usize, needed: usize },

	#[error("invalid context byte {byte:#04x} at offset {offset}")]
	InvalidContextByte { byte: u8, offset: usize },

	#[error("distribution payload of {found} bytes, expected {expected}")]
	DistributionLength { found: u32, expected: u32 },

	#[error("context of length {found} in a model of order {expected}")]
	ContextLength { found: usize, expected: usize },
}

/// Top-level error type of the library.
#[derive(Debug, Error)]
pub enum ModelError {
	/// Training was handed an empty corpus, or one with no usable words.
	#[error("corpus contains no usable words")]
	EmptyCorpus,

	/// A model order of zero was requested.
	#[error("model order must be at least 1")]
	InvalidOrder,

	#[error("malformed model data: {0}")]
	Decode(#[from] DecodeError),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// The length filter starved: no generated word landed in range.
	#[error("no word of length {min}..={max} generated after {attempts} attempts")]
	NoWordInRange { min: usize, max: usize, attempts: usize },

	/// A generator was built without any models.
	#[error("generator needs at least one model")]
	NoModels,

	/// Model orders must run contiguously from the highest order down to 1.
	#[error("expected a model of order {expected}, got one of order {found}")]
	OrderGap { expected: usize, found: usize },
}
