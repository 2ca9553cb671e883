//! Draw helpers over the run's single random stream.
//!
//! Every generation step borrows the same `RandomNumberGenerator`; nothing in
//! the crate seeds a generator of its own except [`crate::map::RunGenerator::generate`].

use bracket_random::prelude::RandomNumberGenerator;

/// Uniform draw from `0..upper`. Consumes nothing when only one value is possible.
pub fn below(rng: &mut RandomNumberGenerator, upper: usize) -> usize {
    if upper <= 1 {
        return 0;
    }
    rng.range(0, upper)
}

/// Uniform draw from the closed range `min..=max`.
pub fn inclusive(rng: &mut RandomNumberGenerator, min: usize, max: usize) -> usize {
    if min >= max {
        return min;
    }
    min + below(rng, max - min + 1)
}

/// Uniform random permutation of `0..len` (Fisher-Yates).
pub fn permutation(rng: &mut RandomNumberGenerator, len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = below(rng, i + 1);
        order.swap(i, j);
    }
    order
}
