//! Unbiased in-place shuffle (Durstenfeld's Fisher–Yates)

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Shuffle `items` in place, drawing from `rng`.
///
/// Walks from the last index down to 1, swapping each slot with a uniform
/// pick from `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// RNG used for load-order shuffling
pub fn rng_from_seed(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
