//! Binary codec for persisted chain models.
//!
//! A model is serialized as a plain concatenation of records, one per
//! context, with no header and no record count; the end of the table is the
//! end of the buffer. Each record is:
//!
//! ```text
//! u32_le  context byte length
//! bytes   context ('#' sentinels and 'a'..'z' letters)
//! u32_le  distribution byte length (always 108 = 27 * 4)
//! u32_le  count, one per alphabet symbol, in fixed alphabet order
//! ```
//!
//! Counts are positional: the format stores no symbol identifiers, so
//! decoding reconstructs them by alphabet order. Decoding walks the buffer
//! from offset 0 and must consume it exactly; anything else is a
//! [`DecodeError`], never an out-of-bounds read.

use std::collections::HashMap;

use crate::error::DecodeError;
use crate::model::distribution::AlphabetDistribution;
use crate::symbol::{ALPHABET_LEN, Context, ContextSymbol};

/// Byte length of one serialized distribution payload.
pub(crate) const DISTRIBUTION_LEN: u32 = (ALPHABET_LEN * size_of::<u32>()) as u32;

pub(crate) fn push_u32(buf: &mut Vec<u8>, value: u32) {
	buf.extend_from_slice(&value.to_le_bytes());
}

/// Appends a length-prefixed context.
pub(crate) fn push_context(buf: &mut Vec<u8>, context: &Context) {
	let bytes = context.to_bytes();
	push_u32(buf, bytes.len() as u32);
	buf.extend_from_slice(&bytes);
}

/// Appends a length-prefixed distribution payload.
pub(crate) fn push_distribution(buf: &mut Vec<u8>, distribution: &AlphabetDistribution) {
	push_u32(buf, DISTRIBUTION_LEN);
	for &count in distribution.counts() {
		push_u32(buf, count);
	}
}

/// Serializes a whole context table.
///
/// Contexts are written in sorted order so the same table always produces
/// the same bytes.
pub(crate) fn encode_table(table: &HashMap<Context, AlphabetDistribution>) -> Vec<u8> {
	let mut contexts: Vec<&Context> = table.keys().collect();
	contexts.sort();

	let mut buf = Vec::new();
	for context in contexts {
		push_context(&mut buf, context);
		push_distribution(&mut buf, &table[context]);
	}
	buf
}

/// Deserializes a context table; the exact inverse of [`encode_table`].
///
/// An empty buffer is a valid empty table.
pub(crate) fn decode_table(
	bytes: &[u8],
) -> Result<HashMap<Context, AlphabetDistribution>, DecodeError> {
	let mut reader = Reader::new(bytes);
	let mut table = HashMap::new();
	while !reader.at_end() {
		let context = reader.read_context()?;
		let distribution = reader.read_distribution()?;
		table.insert(context, distribution);
	}
	Ok(table)
}

/// Bounds-checked cursor over a model byte buffer.
struct Reader<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	fn at_end(&self) -> bool {
		self.pos >= self.bytes.len()
	}

	fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
		let available = self.bytes.len() - self.pos;
		if available < n {
			return Err(DecodeError::UnexpectedEof {
				offset: self.pos,
				needed: n - available,
			});
		}
		let slice = &self.bytes[self.pos..self.pos + n];
		self.pos += n;
		Ok(slice)
	}

	fn read_u32(&mut self) -> Result<u32, DecodeError> {
		let bytes = self.take(4)?;
		Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
	}

	fn read_context(&mut self) -> Result<Context, DecodeError> {
		let len = self.read_u32()? as usize;
		let start = self.pos;
		let raw = self.take(len)?;

		let mut symbols = Vec::with_capacity(len);
		for (i, &byte) in raw.iter().enumerate() {
			let symbol = ContextSymbol::from_byte(byte).ok_or(DecodeError::InvalidContextByte {
				byte,
				offset: start + i,
			})?;
			symbols.push(symbol);
		}
		Ok(Context::from_symbols(symbols))
	}

	fn read_distribution(&mut self) -> Result<AlphabetDistribution, DecodeError> {
		let declared = self.read_u32()?;
		if declared != DISTRIBUTION_LEN {
			return Err(DecodeError::DistributionLength {
				found: declared,
				expected: DISTRIBUTION_LEN,
			});
		}

		let mut counts = [0u32; ALPHABET_LEN];
		for slot in counts.iter_mut() {
			*slot = self.read_u32()?;
		}
		Ok(AlphabetDistribution::from_counts(counts))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::symbol::Symbol;

	fn ctx(s: &str) -> Context {
		Context::from_symbols(s.chars().map(|c| match c {
			'#' => ContextSymbol::StartSentinel,
			_ => ContextSymbol::Letter(c),
		}))
	}

	#[test]
	fn record_layout_matches_wire_format() {
		let mut distribution = AlphabetDistribution::new();
		distribution.increment(Symbol::Letter('a'), 10);

		let mut table = HashMap::new();
		table.insert(ctx("##"), distribution);

		let bytes = encode_table(&table);

		let mut expected = Vec::new();
		expected.extend_from_slice(&2u32.to_le_bytes());
		expected.extend_from_slice(b"##");
		expected.extend_from_slice(&108u32.to_le_bytes());
		expected.extend_from_slice(&1u32.to_le_bytes()); // end marker
		expected.extend_from_slice(&11u32.to_le_bytes()); // 'a'
		for _ in 0..25 {
			expected.extend_from_slice(&1u32.to_le_bytes());
		}
		assert_eq!(bytes, expected);
	}

	#[test]
	fn table_round_trips() {
		let mut table = HashMap::new();
		for (key, letter, amount) in [("##", 'a', 11), ("#a", 'b', 5), ("ab", 'z', 3)] {
			let mut distribution = AlphabetDistribution::new();
			distribution.increment(Symbol::Letter(letter), amount);
			table.insert(ctx(key), distribution);
		}

		let decoded = decode_table(&encode_table(&table)).unwrap();
		assert_eq!(decoded, table);
	}

	#[test]
	fn empty_buffer_is_an_empty_table() {
		assert_eq!(decode_table(&[]).unwrap(), HashMap::new());
	}

	#[test]
	fn truncated_record_is_rejected() {
		let mut table = HashMap::new();
		table.insert(ctx("ab"), AlphabetDistribution::new());
		let bytes = encode_table(&table);

		let truncated = &bytes[..bytes.len() - 3];
		assert_eq!(
			decode_table(truncated),
			Err(DecodeError::UnexpectedEof {
				offset: truncated.len() - 1,
				needed: 3
			})
		);
	}

	#[test]
	fn context_length_past_buffer_is_rejected() {
		let mut bytes = Vec::new();
		push_u32(&mut bytes, 100);
		bytes.extend_from_slice(b"ab");
		assert_eq!(
			decode_table(&bytes),
			Err(DecodeError::UnexpectedEof { offset: 4, needed: 98 })
		);
	}

	#[test]
	fn wrong_distribution_length_is_rejected() {
		let mut bytes = Vec::new();
		push_u32(&mut bytes, 1);
		bytes.push(b'a');
		push_u32(&mut bytes, 27); // claims 27 bytes, must be 108
		assert_eq!(
			decode_table(&bytes),
			Err(DecodeError::DistributionLength { found: 27, expected: 108 })
		);
	}

	#[test]
	fn end_marker_byte_in_context_is_rejected() {
		let mut bytes = Vec::new();
		push_u32(&mut bytes, 2);
		bytes.extend_from_slice(b"a@");
		assert_eq!(
			decode_table(&bytes),
			Err(DecodeError::InvalidContextByte { byte: b'@', offset: 5 })
		);
	}
}
