/// Seed used when no other seed is configured.
pub const DEFAULT_SEED: u32 = 123_456_789;

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;

/// 32-bit linear congruential generator (Numerical Recipes constants).
///
/// Every draw advances the state; the returned value is the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    pub const fn new(seed: u32) -> Self {
        Lcg { seed }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.seed
    }

    /// Current state. Feeding it back into [`Lcg::new`] continues the sequence.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Lcg::new(DEFAULT_SEED)
    }
}
