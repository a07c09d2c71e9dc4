//! Top-level module for the Markov chain word generation system.
//!
//! This module provides a multi-order chain-model ensemble, including:
//! - Per-context frequency tables (`AlphabetDistribution`)
//! - Fixed-order chain models (`ChainModel`)
//! - The order-backoff generation loop (`BackoffGenerator`)

/// Fixed-order character-level chain model.
///
/// Handles corpus ingestion, transition counting, next-symbol sampling,
/// and binary persistence via the codec.
pub mod chain_model;

/// Per-context frequency table over the fixed 27-symbol alphabet.
///
/// Tracks smoothed transition counts and supports cumulative-sum
/// weighted random sampling.
pub mod distribution;

/// High-level interface for generating words from a model ensemble.
///
/// Exposes ensemble loading (cached or freshly trained), the backoff
/// algorithm, and length-filtered word generation.
pub mod generator;
