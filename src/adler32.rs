//! Adler32-style rolling checksum.
//!
//! Uses two 16-bit sums (a, b) combined into a 32-bit hash.
//! Supports O(1) sliding window updates: remove oldest byte, add new byte.

use crate::error::{ConfigError, HashError};
use crate::rolling_hash::{RollingHash, Window};

const MOD_ADLER: u32 = 65521;

#[derive(Debug, Clone)]
pub struct Adler32 {
    a: u32,
    b: u32,
    window: Window,
}

impl Adler32 {
    pub fn new(window_size: usize) -> Result<Self, ConfigError> {
        let mut hash = Self {
            a: 1,
            b: 0,
            window: Window::zeroed(window_size)?,
        };
        hash.recompute();
        Ok(hash)
    }

    fn recompute(&mut self) {
        // Accumulate in u64 and reduce once per 4096 bytes rather than on every byte;
        // that is well inside the range where `b` cannot overflow.
        let mut a: u64 = 1;
        let mut b: u64 = 0;
        for (i, byte) in self.window.iter().enumerate() {
            a += byte as u64;
            b += a;
            if i % 4096 == 4095 {
                a %= MOD_ADLER as u64;
                b %= MOD_ADLER as u64;
            }
        }
        self.a = (a % MOD_ADLER as u64) as u32;
        self.b = (b % MOD_ADLER as u64) as u32;
    }
}

impl RollingHash for Adler32 {
    fn window_size(&self) -> usize {
        self.window.len()
    }

    fn width(&self) -> u32 {
        32
    }

    fn initialize(&mut self, window: &[u8]) -> Result<(), HashError> {
        self.window.load(window)?;
        self.recompute();
        Ok(())
    }

    fn roll(&mut self, byte: u8) {
        let old = self.window.slide(byte) as u32;
        let new = byte as u32;
        let weighted = ((old as u64 * self.window.len() as u64) % MOD_ADLER as u64) as u32;

        self.a = (self.a + MOD_ADLER - old + new) % MOD_ADLER;
        self.b = (self.b + MOD_ADLER - 1 + self.a - weighted) % MOD_ADLER;
    }

    fn value(&self) -> u64 {
        ((self.b << 16) | self.a) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(data: &[u8]) -> u64 {
        let mut h = Adler32::new(data.len()).unwrap();
        h.initialize(data).unwrap();
        h.value()
    }

    #[test]
    fn test_init_deterministic() {
        assert_eq!(digest(b"Hello, World!"), digest(b"Hello, World!"));
    }

    #[test]
    fn test_different_data_different_hash() {
        assert_ne!(digest(b"Hello"), digest(b"World"));
    }

    #[test]
    fn test_known_adler32() {
        // Reference Adler-32 of "Wikipedia".
        assert_eq!(digest(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_rotate_equals_fresh_init() {
        let data = b"ABCDE";
        let mut rolling = Adler32::new(4).unwrap();
        rolling.initialize(&data[0..4]).unwrap();
        rolling.roll(data[4]);

        assert_eq!(rolling.value(), digest(&data[1..5]));
    }

    #[test]
    fn test_roll_extreme_bytes() {
        let mut rolling = Adler32::new(3).unwrap();
        rolling.initialize(&[0xff, 0xff, 0xff]).unwrap();
        rolling.roll(0x00);
        rolling.roll(0x00);
        assert_eq!(rolling.value(), digest(&[0xff, 0x00, 0x00]));
    }

    #[test]
    fn test_fresh_hasher_covers_zero_window() {
        let h = Adler32::new(8).unwrap();
        assert_eq!(h.value(), digest(&[0u8; 8]));
    }
}
