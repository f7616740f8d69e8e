//! Random source for the Producer

/// Source of raw 31-bit random numbers
pub trait RandomSource {
    fn next_random(&mut self) -> u32;
}

/// 64-bit linear congruential generator, the same recurrence newlib's
/// `rand()` uses
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    const MULTIPLIER: u64 = 6_364_136_223_846_793_005;

    pub const fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }
}

impl RandomSource for Lcg {
    fn next_random(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(Self::MULTIPLIER).wrapping_add(1);
        ((self.state >> 32) & 0x7fff_ffff) as u32
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_random(&mut self) -> u32 {
        (**self).next_random()
    }
}
