//! Buzhash (cyclic polynomial) rolling hashes.
//!
//! Each byte value maps to a pseudo-random word through a 256-entry table.
//! The hash of a window is the XOR of those words, each rotated left by its
//! distance from the trailing edge, so sliding the window is one rotate and
//! two XORs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ConfigError, HashError};
use crate::rolling_hash::{RollingHash, Window};

/// Seed for the byte table. Fixed so every run and every process hashes
/// the same window to the same value.
const TABLE_SEED: u64 = 0x6275_7a68_6173_6821;

macro_rules! buzhash {
    ($(#[$doc:meta])* $name:ident, $word:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            hash: $word,
            table: [$word; 256],
            window: Window,
        }

        impl $name {
            pub fn new(window_size: usize) -> Result<Self, ConfigError> {
                let mut rng = StdRng::seed_from_u64(TABLE_SEED);
                let table: [$word; 256] = std::array::from_fn(|_| rng.gen());
                let mut hash = Self {
                    hash: 0,
                    table,
                    window: Window::zeroed(window_size)?,
                };
                hash.recompute();
                Ok(hash)
            }

            fn recompute(&mut self) {
                let mut hash: $word = 0;
                for byte in self.window.iter() {
                    hash = hash.rotate_left(1) ^ self.table[byte as usize];
                }
                self.hash = hash;
            }

            /// Rotation that brings the evicted byte's word back into alignment.
            fn evict_rotation(&self) -> u32 {
                (self.window.len() % <$word>::BITS as usize) as u32
            }
        }

        impl RollingHash for $name {
            fn window_size(&self) -> usize {
                self.window.len()
            }

            fn width(&self) -> u32 {
                <$word>::BITS
            }

            fn initialize(&mut self, window: &[u8]) -> Result<(), HashError> {
                self.window.load(window)?;
                self.recompute();
                Ok(())
            }

            fn roll(&mut self, byte: u8) {
                let old = self.window.slide(byte);
                self.hash = self.hash.rotate_left(1)
                    ^ self.table[old as usize].rotate_left(self.evict_rotation())
                    ^ self.table[byte as usize];
            }

            fn value(&self) -> u64 {
                self.hash as u64
            }
        }
    };
}

buzhash!(
    /// 32-bit buzhash.
    Buzhash32,
    u32
);

buzhash!(
    /// 64-bit buzhash.
    Buzhash64,
    u64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_stable_across_instances() {
        let a = Buzhash64::new(16).unwrap();
        let b = Buzhash64::new(32).unwrap();
        assert_eq!(a.table, b.table);
    }

    #[test]
    fn test_table_entries_distinct() {
        let h = Buzhash32::new(4).unwrap();
        let mut entries = h.table.to_vec();
        entries.sort_unstable();
        entries.dedup();
        assert!(entries.len() > 250);
    }

    #[test]
    fn test_single_byte_window_is_table_entry() {
        let mut h = Buzhash32::new(1).unwrap();
        h.initialize(&[9]).unwrap();
        assert_eq!(h.value(), h.table[9] as u64);
        h.roll(200);
        assert_eq!(h.value(), h.table[200] as u64);
    }

    #[test]
    fn test_window_multiple_of_word_width() {
        // Window length 64 makes the eviction rotation wrap to zero for u32 and u64.
        let data: Vec<u8> = (0..=255u8).collect();
        let mut rolling32 = Buzhash32::new(64).unwrap();
        let mut rolling64 = Buzhash64::new(64).unwrap();
        rolling32.initialize(&data[..64]).unwrap();
        rolling64.initialize(&data[..64]).unwrap();
        for &b in &data[64..] {
            rolling32.roll(b);
            rolling64.roll(b);
        }

        let mut fresh32 = Buzhash32::new(64).unwrap();
        let mut fresh64 = Buzhash64::new(64).unwrap();
        fresh32.initialize(&data[192..]).unwrap();
        fresh64.initialize(&data[192..]).unwrap();
        assert_eq!(rolling32.value(), fresh32.value());
        assert_eq!(rolling64.value(), fresh64.value());
    }

    #[test]
    fn test_uses_high_bits() {
        let mut h = Buzhash64::new(8).unwrap();
        h.initialize(b"abcdefgh").unwrap();
        let mut seen_high = false;
        for b in 0..=255u8 {
            h.roll(b);
            seen_high |= h.value() >> 32 != 0;
        }
        assert!(seen_high);
    }
}
