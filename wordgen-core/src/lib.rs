//! Markov chain word generation library.
//!
//! This crate trains character-level Markov chains of configurable order
//! from a corpus of words and uses them to synthesize novel, pronounceable
//! words. It provides:
//! - A tagged symbol alphabet (end marker, start sentinel, letters)
//! - Per-context smoothed frequency distributions
//! - Fixed-order chain models with a compact binary persistence format
//! - An order-backoff generator with an injectable random source
//!
//! Only the high-level API is exposed publicly. The codec and file I/O
//! helpers are kept internal so every model goes through the same
//! validated encode/decode path.

/// Error types: decoding failures and the library-level error.
pub mod error;

/// Chain models, distributions and the backoff generator.
pub mod model;

/// The fixed symbol alphabet and context keys.
pub mod symbol;

/// Binary wire format for persisted models.
///
/// Not exposed
pub(crate) mod codec;

/// I/O utilities (corpus reading, model cache files).
///
/// Not exposed
pub(crate) mod io;
