use crate::error::{ConfigError, HashError};
use crate::rolling_hash::{RollingHash, Window};

/// Multiplier of the polynomial (the 32-bit FNV prime).
const BASE: u32 = 16_777_619;

/// Rabin-Karp polynomial hash over wrapping 32-bit arithmetic.
///
/// `h = d[0]·B^(n-1) + d[1]·B^(n-2) + … + d[n-1]`, all mod 2^32. Rolling
/// multiplies by `B`, cancels the evicted byte's `B^n` term and adds the new
/// byte at `B^0`.
#[derive(Debug, Clone)]
pub struct RabinKarp32 {
    hash: u32,
    /// `B^n` mod 2^32 for the configured window length `n`.
    evict_power: u32,
    window: Window,
}

impl RabinKarp32 {
    pub fn new(window_size: usize) -> Result<Self, ConfigError> {
        let window = Window::zeroed(window_size)?;
        let evict_power = (0..window_size).fold(1u32, |p, _| p.wrapping_mul(BASE));
        // An all-zero window hashes to zero.
        Ok(Self {
            hash: 0,
            evict_power,
            window,
        })
    }
}

impl RollingHash for RabinKarp32 {
    fn window_size(&self) -> usize {
        self.window.len()
    }

    fn width(&self) -> u32 {
        32
    }

    fn initialize(&mut self, window: &[u8]) -> Result<(), HashError> {
        self.window.load(window)?;
        self.hash = window
            .iter()
            .fold(0u32, |h, &b| h.wrapping_mul(BASE).wrapping_add(b as u32));
        Ok(())
    }

    fn roll(&mut self, byte: u8) {
        let old = self.window.slide(byte) as u32;
        self.hash = self
            .hash
            .wrapping_mul(BASE)
            .wrapping_add(byte as u32)
            .wrapping_sub(old.wrapping_mul(self.evict_power));
    }

    fn value(&self) -> u64 {
        self.hash as u64
    }
}
