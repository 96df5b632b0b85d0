//! Deterministic pseudo-random generator used by every exploration strategy.
//!
//! A 64-bit linear congruential recurrence with fixed constants. Given the same seed,
//! every conforming implementation draws the same stream, which is what makes logged
//! decisions replayable. It is **not** cryptographic and not meant to be statistically
//! strong; the stream is a compatibility contract.

use rand::RngCore;

const MULTIPLIER: u64 = 0xeece_66d5_deec_e66d;
const INCREMENT: u64 = 2_147_483_647;

/// Seed used by [`Prg::default`].
pub const DEFAULT_SEED: u64 = 2_147_483_647;

/// Seedable LCG with the `drand48`-style output mapping.
///
/// Construct one per decision from the salted seed; never share an instance across
/// concurrent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prg {
    state: u64,
}

impl Prg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Current state (the value the next draw advances from).
    pub fn state(&self) -> u64 {
        self.state
    }

    /// `V = A*V + C` with 64-bit wraparound.
    #[inline]
    pub fn advance(&mut self) {
        self.state = MULTIPLIER.wrapping_mul(self.state).wrapping_add(INCREMENT);
    }

    /// Uniform `f32` in `[0, 1)`.
    ///
    /// Bits 25..=47 of the advanced state become the mantissa of a float in `[1, 2)`,
    /// which is then shifted down by one. Exactly 23 bits of randomness.
    pub fn uniform_unit_interval(&mut self) -> f32 {
        self.advance();
        let mantissa = ((self.state >> 25) & 0x007f_ffff) as u32;
        f32::from_bits(0x3f80_0000 | mantissa) - 1.0
    }

    /// Uniform integer in `[low, high]` (both inclusive).
    ///
    /// Uses `low + ((V >> 25) mod width)`. The modulo mapping is slightly biased when
    /// `width` does not divide `2^39`; recorded logs depend on this exact mapping.
    /// Callers must pass `low <= high`.
    pub fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
        debug_assert!(low <= high, "uniform_int: low {low} > high {high}");
        self.advance();
        let width = u64::from(high) - u64::from(low) + 1;
        low + ((self.state >> 25) % width) as u32
    }
}

impl Default for Prg {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Raw access for `rand` distributions in simulations.
///
/// These draws advance the same state but are not part of the reproducible
/// exploration stream; strategies only use [`Prg::uniform_unit_interval`] and
/// [`Prg::uniform_int`].
impl RngCore for Prg {
    fn next_u32(&mut self) -> u32 {
        self.advance();
        (self.state >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
