//! Tests for weighted and uniform random choice

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tilewave::math::probability::{uniform_choice, weighted_choice};

    // Tests empty inputs produce no choice
    // Verified by returning index zero for empty slices
    #[test]
    fn test_empty_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(weighted_choice(&mut rng, &[]), None);
        assert_eq!(uniform_choice(&mut rng, 0), None);
    }

    // Tests a single positive weight always wins
    // Verified by subtracting weights before comparing
    #[test]
    fn test_single_positive_weight() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(weighted_choice(&mut rng, &[0.0, 3.5, 0.0]), Some(1));
        }
    }

    // Tests all-zero weights fall back to a uniform pick
    // Verified by returning None when the total is zero
    #[test]
    fn test_zero_total_is_uniform() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let index = weighted_choice(&mut rng, &[0.0, 0.0, 0.0]).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    // Tests picks follow the weight ratio
    // Verified by ignoring weights and picking uniformly
    #[test]
    fn test_weighted_distribution() {
        let mut rng = StdRng::seed_from_u64(3);
        let trials = 10_000;
        let mut counts = [0u32; 2];
        for _ in 0..trials {
            counts[weighted_choice(&mut rng, &[1.0, 3.0]).unwrap()] += 1;
        }
        let share = f64::from(counts[1]) / f64::from(trials);
        assert!((0.72..0.78).contains(&share), "share was {share}");
    }

    // Tests identical seeds give identical sequences
    // Verified by drawing from a thread-local generator
    #[test]
    fn test_seeded_reproducibility() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| weighted_choice(&mut rng, &[0.2, 0.3, 0.5]).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(8), draw(8));
    }

    // Tests uniform picks stay in range
    // Verified by using an inclusive range
    #[test]
    fn test_uniform_range() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            assert!(uniform_choice(&mut rng, 5).unwrap() < 5);
        }
        assert_eq!(uniform_choice(&mut rng, 1), Some(0));
    }
}
