//! A small seeded random source.
//!
//! Rendering takes any `rand::Rng`, so production code uses the thread-local
//! system generator. Tests and benchmarks want something reproducible and
//! cheap: [`Lcg`] implements `RngCore`, which gives it the whole `rand::Rng`
//! API for free.

use rand::RngCore;

/// A fast, deterministic pseudo-random number generator.
///
/// Linear Congruential Generator with the Knuth/Numerical Recipes 64-bit
/// constants. Not suitable for anything security related.
///
/// # Example
/// ```
/// use leopard::rng::Lcg;
/// use rand::Rng;
///
/// let mut rng = Lcg::new(12345);
/// let value: f64 = rng.random(); // Returns value in [0, 1)
/// assert!((0.0..1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new generator. The same seed always produces the same
    /// sequence.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    #[inline]
    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngCore for Lcg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        // High bits of an LCG are the well-mixed ones
        (self.step() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
