//! Seeded 53-bit string fingerprint (cyrb53)
//!
//! Generated selector names are derived from this value, so the lane
//! constants and mixing order must not change. Input is consumed as UTF-16
//! code units so that fingerprints match those produced by browser-side
//! renderers of the same style attributes.

use rand::Rng;

const LANE_1_INIT: u32 = 0xdeadbeef;
const LANE_2_INIT: u32 = 0x41c6ce57;
const LANE_1_MUL: u32 = 2654435761;
const LANE_2_MUL: u32 = 1597334677;
const FINAL_MUL_A: u32 = 2246822507;
const FINAL_MUL_B: u32 = 3266489909;

/// Largest seed produced by [`random_seed`] (nine decimal digits).
pub const MAX_RANDOM_SEED: u32 = 999_999_999;

/// Hash `text` with `seed` into an unsigned 53-bit integer.
pub fn hash(text: &str, seed: u32) -> u64 {
    let mut h1 = LANE_1_INIT ^ seed;
    let mut h2 = LANE_2_INIT ^ seed;

    for unit in text.encode_utf16() {
        let ch = u32::from(unit);
        h1 = (h1 ^ ch).wrapping_mul(LANE_1_MUL);
        h2 = (h2 ^ ch).wrapping_mul(LANE_2_MUL);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(FINAL_MUL_A) ^ (h2 ^ (h2 >> 13)).wrapping_mul(FINAL_MUL_B);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(FINAL_MUL_A) ^ (h1 ^ (h1 >> 13)).wrapping_mul(FINAL_MUL_B);

    (u64::from(h2 & 0x1f_ffff) << 32) | u64::from(h1)
}

/// Fresh per-instance seed.
pub fn random_seed() -> u32 {
    rand::thread_rng().gen_range(1..=MAX_RANDOM_SEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(hash("a", 0), 7929297801672961);
        assert_eq!(hash("b", 0), 8684336938537663);
        assert_eq!(hash("revenge", 0), 4051478007546757);
        assert_eq!(hash("revenue", 0), 8309097637345594);
        assert_eq!(hash("", 0), 3338908027751811);
        assert_eq!(hash("日本", 0), 402342642078485);
    }

    #[test]
    fn seed_changes_output() {
        assert_eq!(hash("a", 1), 5368154436228575);
        assert_ne!(hash("a", 0), hash("a", 1));
        assert_eq!(
            hash("@media all and (max-width: 767.98px):border:1px solid #000", 42),
            7935904294605120
        );
    }

    #[test]
    fn fits_in_53_bits() {
        for text in ["", "a", "@media all", "lorem ipsum dolor sit amet"] {
            assert!(hash(text, 123_456_789) < (1u64 << 53));
        }
    }

    #[test]
    fn random_seed_in_range() {
        for _ in 0..32 {
            let seed = random_seed();
            assert!((1..=MAX_RANDOM_SEED).contains(&seed));
        }
    }
}
