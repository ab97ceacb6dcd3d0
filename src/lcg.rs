//! Linear congruential generator for workload shaping.
//!
//! Uses the glibc constants and keeps 31 bits of state. Callers reduce the
//! output with a modulus, which only looks at the low bits; that trades
//! randomness quality for speed, which is fine for picking memory addresses
//! but not for anything that needs real randomness.

use rand_core::{impls, Error, RngCore};

/// Seeded 31-bit LCG.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    /// Multiplier.
    pub const MULTIPLIER: u32 = 1_103_515_245;
    /// Increment.
    pub const INCREMENT: u32 = 12_345;
    /// State mask, modulus `2^31`.
    pub const MASK: u32 = 0x7fff_ffff;

    /// Create a generator; the seed is reduced to 31 bits.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { seed: seed & Self::MASK }
    }

    /// Current state.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance and return the new state.
    #[inline(always)]
    pub fn step(&mut self) -> u32 {
        self.seed = self
            .seed
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
            & Self::MASK;
        self.seed
    }

    /// Advance and reduce modulo `bound`. `bound` must be nonzero.
    #[inline(always)]
    pub fn below(&mut self, bound: u32) -> u32 {
        self.step() % bound
    }

    /// Mix bits into the state, keeping it at 31 bits.
    #[inline(always)]
    pub fn fold(&mut self, bits: u32) {
        self.seed = (self.seed ^ bits) & Self::MASK;
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        // Only 31 bits of state, so draw twice to cover the whole word.
        let high = self.step();
        let low = self.step();
        (high << 1) ^ (low >> 15)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use super::*;

    #[test]
    fn test_first_value_from_seed_one() {
        let mut lcg = Lcg::new(1);
        assert_eq!(lcg.step(), 1_103_527_590);
        assert_eq!(lcg.seed(), 1_103_527_590);
    }

    #[test]
    fn test_matches_reference_formula() {
        let mut lcg = Lcg::new(42);
        let mut seed: u64 = 42;
        for _ in 0..1000 {
            seed = (seed * 1_103_515_245 + 12_345) % (1 << 31);
            assert_eq!(u64::from(lcg.step()), seed);
        }
    }

    #[test]
    fn test_replay_is_deterministic() {
        let a: Vec<u32> = {
            let mut lcg = Lcg::new(7);
            (0..64).map(|_| lcg.step()).collect()
        };
        let b: Vec<u32> = {
            let mut lcg = Lcg::new(7);
            (0..64).map(|_| lcg.step()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_state_stays_31_bits() {
        let mut lcg = Lcg::new(u32::MAX);
        assert_eq!(lcg.seed(), Lcg::MASK);
        for _ in 0..1000 {
            assert!(lcg.step() <= Lcg::MASK);
        }
        lcg.fold(u32::MAX);
        assert!(lcg.seed() <= Lcg::MASK);
    }

    #[test]
    fn test_below_bounds() {
        let mut lcg = Lcg::default();
        for bound in [1, 2, 3, 400, 0x20_0000] {
            for _ in 0..100 {
                assert!(lcg.below(bound) < bound);
            }
        }
    }

    #[test]
    fn test_fold_flips_low_bit() {
        let mut lcg = Lcg::new(10);
        lcg.fold(1);
        assert_eq!(lcg.seed(), 11);
        lcg.fold(0);
        assert_eq!(lcg.seed(), 11);
    }

    #[test]
    fn test_rng_core_fill_bytes() {
        let mut a = Lcg::new(3);
        let mut b = Lcg::new(3);
        let mut x = [0u8; 13];
        let mut y = [0u8; 13];
        a.fill_bytes(&mut x);
        b.try_fill_bytes(&mut y).unwrap();
        assert_eq!(x, y);
        assert_ne!(x, [0u8; 13]);
    }
}
