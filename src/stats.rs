use std::io::{self, Write};

use crate::masks::{self, MASK_COUNT};
use crate::units;

/// Pack checksum bytes into an integer, first byte most significant.
///
/// Checksums narrower than 8 bytes land in the low-order bits.
pub fn pack_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// Per-mask count of positions whose hash satisfied the mask.
#[derive(Debug, Clone)]
pub struct HitCounter {
    masks: [u64; MASK_COUNT],
    hits: [u64; MASK_COUNT],
}

impl HitCounter {
    pub fn new() -> Self {
        Self {
            masks: masks::generate_masks(),
            hits: [0; MASK_COUNT],
        }
    }

    /// Count `value` against every mask it satisfies.
    ///
    /// Masks are nested, so the scan stops at the first one that fails.
    #[inline]
    pub fn record(&mut self, value: u64) {
        for (mask, hits) in self.masks.iter().zip(self.hits.iter_mut()) {
            if value & mask != *mask {
                break;
            }
            *hits += 1;
        }
    }

    pub fn hits(&self) -> &[u64; MASK_COUNT] {
        &self.hits
    }

    /// Mean distance between matches of mask `index` over `total` bytes.
    pub fn average_distance(&self, total: u64, index: usize) -> Option<u64> {
        match self.hits[index] {
            0 => None,
            hits => Some(total / hits),
        }
    }

    /// Write the per-mask frequency table, one line per mask.
    ///
    /// Masks needing more bits than a `width`-bit checksum has can never match
    /// and say so instead of reporting missing data.
    pub fn write_table<W: Write>(&self, out: &mut W, total: u64, width: u32) -> io::Result<()> {
        for (i, mask) in self.masks.iter().enumerate() {
            let bits = masks::bits_required(i);
            let frequency = if bits > width {
                format!("never (exceeds {width}-bit checksum)")
            } else {
                match self.average_distance(total, i) {
                    Some(distance) => units::format_size(distance),
                    None => "no data".to_string(),
                }
            };
            writeln!(out, "0x{mask:016x} ({bits:02} bits): every {frequency}")?;
        }
        Ok(())
    }
}

impl Default for HitCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_pack_be() {
        assert_eq!(pack_be(&[]), 0);
        assert_eq!(pack_be(&[0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
        assert_eq!(pack_be(&0xdead_beef_u32.to_be_bytes()), 0xdead_beef);
        assert_eq!(pack_be(&u64::MAX.to_be_bytes()), u64::MAX);
    }

    #[test]
    fn test_record_counts_nested_prefix() {
        let mut counter = HitCounter::new();
        counter.record(0b0111);
        assert_eq!(&counter.hits()[..4], &[1, 1, 1, 0]);
        assert!(counter.hits()[4..].iter().all(|&h| h == 0));

        counter.record(0b1110);
        assert_eq!(counter.hits()[0], 1, "low bit clear matches nothing");

        counter.record(u64::MAX);
        assert!(counter.hits()[3..].iter().all(|&h| h == 1));
    }

    #[test]
    fn test_short_circuit_agrees_with_full_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counter = HitCounter::new();
        let mut expected = [0u64; MASK_COUNT];
        for _ in 0..10_000 {
            // Skew toward trailing ones so the stricter masks see traffic.
            let value: u64 = rng.gen::<u64>() | (u64::MAX >> rng.gen_range(40..64));
            counter.record(value);
            for (i, &m) in counter.masks.iter().enumerate() {
                if value & m == m {
                    expected[i] += 1;
                }
            }
        }
        assert_eq!(counter.hits(), &expected);
    }

    #[test]
    fn test_hits_bounded_and_monotonic() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut counter = HitCounter::new();
        let total = 50_000u64;
        for _ in 0..total {
            counter.record(rng.gen());
        }
        let hits = counter.hits();
        assert!(hits.iter().all(|&h| h <= total));
        assert!(hits.windows(2).all(|w| w[0] >= w[1]));
        assert!(hits[0] >= hits[63]);
        // Half of uniform values have the low bit set.
        assert!((20_000..30_000).contains(&hits[0]));
    }

    #[test]
    fn test_average_distance() {
        let mut counter = HitCounter::new();
        for _ in 0..4 {
            counter.record(0b1);
        }
        assert_eq!(counter.average_distance(1024, 0), Some(256));
        assert_eq!(counter.average_distance(1024, 1), None);
    }

    #[test]
    fn test_table_caps_at_checksum_width() {
        let mut counter = HitCounter::new();
        counter.record(0xff);
        let mut out = Vec::new();
        counter.write_table(&mut out, 2048, 32).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 64);
        assert_eq!(lines[0], "0x0000000000000001 (01 bits): every 2.0K");
        assert_eq!(lines[8], "0x00000000000001ff (09 bits): every no data");
        assert_eq!(lines[31], "0x00000000ffffffff (32 bits): every no data");
        assert_eq!(
            lines[32],
            "0x00000001ffffffff (33 bits): every never (exceeds 32-bit checksum)"
        );
        assert!(lines[63].starts_with("0xffffffffffffffff (64 bits)"));
    }
}
