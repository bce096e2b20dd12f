//! Mapping of identifiers onto positions of the ring's modular space.

use std::num::NonZeroU64;

use sha2::{Digest, Sha256};

/// Hash an identifier onto a slot in `[0, total_slots)`.
///
/// The SHA-256 digest of the identifier's UTF-8 bytes is read as an unsigned
/// big-endian 256-bit integer and reduced modulo `total_slots`. The reduction
/// is exact over the whole digest, not a truncation of it, so every slot is
/// reachable with near-uniform probability for any modulus.
pub fn hash_to_slot(identifier: &str, total_slots: NonZeroU64) -> u64 {
    let digest = Sha256::digest(identifier.as_bytes());

    reduce(&digest, total_slots)
}

/// Horner's rule over the big-endian bytes, each step kept below `modulus`.
fn reduce(bytes: &[u8], modulus: NonZeroU64) -> u64 {
    let modulus = modulus.get() as u128;

    let remainder = bytes
        .iter()
        .fold(0u128, |acc, byte| ((acc << 8) | *byte as u128) % modulus);

    // The remainder is strictly less than a u64 modulus.
    remainder as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn known_vectors() {
        let billion = slots(1_000_000_000);

        assert_eq!(hash_to_slot("10.0.0.1", billion), 559_225_869);
        assert_eq!(hash_to_slot("10.0.0.2", billion), 835_577_503);
        assert_eq!(hash_to_slot("10.0.0.3", billion), 819_559_057);
        assert_eq!(hash_to_slot("10.0.0.4", billion), 897_913_644);
        assert_eq!(hash_to_slot("K1", billion), 107_775_607);
        assert_eq!(hash_to_slot("K2", billion), 433_190_569);
        assert_eq!(hash_to_slot("", billion), 665_086_549);
    }

    #[test]
    fn full_width_modulus() {
        let max = slots(u64::MAX);

        assert_eq!(hash_to_slot("10.0.0.1", max), 5_381_466_319_354_624_014);
        assert_eq!(hash_to_slot("K1", max), 10_223_991_514_686_853_067);
        assert_eq!(hash_to_slot("x", max), 17_963_778_874_616_180_885);
    }

    #[test]
    fn small_prime_modulus() {
        let prime = slots(97);

        assert_eq!(hash_to_slot("10.0.0.1", prime), 32);
        assert_eq!(hash_to_slot("10.0.0.4", prime), 95);
        assert_eq!(hash_to_slot("K2", prime), 60);
    }

    #[test]
    fn single_slot() {
        assert_eq!(hash_to_slot("solo", slots(1)), 0);
        assert_eq!(hash_to_slot("anything else", slots(1)), 0);
    }

    #[test]
    fn deterministic_and_in_range() {
        for n in [1, 2, 3, 7, 16, 1000, 1 << 40, u64::MAX] {
            for i in 0..200 {
                let identifier = format!("host-{i}");

                let first = hash_to_slot(&identifier, slots(n));
                let second = hash_to_slot(&identifier, slots(n));

                assert_eq!(first, second);
                assert!(first < n, "{identifier} hashed to {first} outside [0, {n})");
            }
        }
    }

    #[test]
    fn roughly_uniform() {
        let buckets = 8u64;
        let samples = 8_000;

        let mut counts = [0usize; 8];
        for i in 0..samples {
            counts[hash_to_slot(&format!("key-{i}"), slots(buckets)) as usize] += 1;
        }

        let expected = samples / buckets as usize;
        for (slot, count) in counts.iter().enumerate() {
            assert!(
                (expected * 8 / 10..=expected * 12 / 10).contains(count),
                "slot {slot} got {count} of {samples} samples"
            );
        }
    }

    #[test]
    fn reduce_matches_native_arithmetic() {
        let bytes = 0x0123_4567_89ab_cdefu64.to_be_bytes();

        for n in [1u64, 10, 255, 256, 65_537, u64::MAX] {
            assert_eq!(
                reduce(&bytes, slots(n)),
                0x0123_4567_89ab_cdefu64 % n,
                "modulus {n}"
            );
        }
    }
}
