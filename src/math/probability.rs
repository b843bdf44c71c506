//! Random choices driven by a caller-owned generator
//!
//! Nothing here seeds or stores a generator; reproducibility comes entirely
//! from the `Rng` the caller threads through.

use rand::Rng;

/// Weighted random selection
///
/// Returns an index into `weights` using the cumulative distribution, or
/// `None` for an empty slice. When every weight is zero the pick is uniform.
pub fn weighted_choice<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return uniform_choice(rng, weights.len());
    }

    let mut rand_val = rng.random::<f64>() * total;
    for (i, &weight) in weights.iter().enumerate() {
        rand_val -= weight;
        if rand_val < 0.0 {
            return Some(i);
        }
    }

    // Rounding can leave a sliver past the end; give it to the last positive weight
    weights.iter().rposition(|&weight| weight > 0.0)
}

/// Uniform random index in `0..len`, or `None` when `len` is zero
pub fn uniform_choice<R: Rng>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}
