//! Seed mixing and bounded draws over the ChaCha stream used by generation.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Derives an independent seed for `stream` so separate consumers of one run
/// seed never share a ChaCha stream.
pub fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

pub(crate) fn seeded(seed: u64, stream: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix_seed_stream(seed, stream))
}

/// Uniform draw from the inclusive range `min_value..=max_value`.
pub(crate) fn random_inclusive(rng: &mut ChaCha8Rng, min_value: usize, max_value: usize) -> usize {
    debug_assert!(min_value <= max_value);
    let range_size = (max_value - min_value) as u64 + 1;
    min_value + (rng.next_u64() % range_size) as usize
}

pub(crate) fn coin_flip(rng: &mut ChaCha8Rng) -> bool {
    rng.next_u64() & 1 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_inclusive_stays_inside_requested_bounds() {
        let mut rng = seeded(12_345, 0);
        for _ in 0..200 {
            let value = random_inclusive(&mut rng, 7, 13);
            assert!((7..=13).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_always_returns_its_only_value() {
        let mut rng = seeded(1, 1);
        assert_eq!(random_inclusive(&mut rng, 4, 4), 4);
    }

    #[test]
    fn streams_of_one_seed_are_distinct() {
        assert_ne!(mix_seed_stream(99, 1), mix_seed_stream(99, 2));
        assert_ne!(mix_seed_stream(99, 1), mix_seed_stream(98, 1));
        assert_eq!(mix_seed_stream(99, 1), mix_seed_stream(99, 1));
    }
}
