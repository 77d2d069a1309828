/// Number of masks in the table, one per bit of a `u64`.
pub const MASK_COUNT: usize = 64;

/// Build the boundary masks, loosest first.
///
/// Entry `i` has its low `i + 1` bits set, so a uniformly distributed hash
/// satisfies it with probability `1 / 2^(i + 1)`.
pub fn generate_masks() -> [u64; MASK_COUNT] {
    let mut masks = [0u64; MASK_COUNT];
    for (i, mask) in masks.iter_mut().enumerate() {
        *mask = u64::MAX >> (MASK_COUNT - 1 - i);
    }
    masks
}

/// Bits a value must have set to satisfy the mask at `index`.
pub fn bits_required(index: usize) -> u32 {
    index as u32 + 1
}
