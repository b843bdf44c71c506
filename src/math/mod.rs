//! Mathematical utilities for the algorithm

/// Weighted and uniform random selection over an explicit generator
pub mod probability;
