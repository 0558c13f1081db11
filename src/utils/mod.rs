//! Utility functions

use ark_std::log2;

/// Number of binary variables needed to index `n` items, `ceil(log2(n))`.
pub fn lg(n: usize) -> usize {
    log2(n) as usize
}

pub fn ceil_div(a: usize, b: usize) -> usize {
    (a + (b - 1)) / b
}

/// Spread the 32 bits of `x` onto the even bit positions of a u64.
fn spread_bits(x: u32) -> u64 {
    let mut x = x as u64;
    x = (x | (x << 16)) & 0x0000_FFFF_0000_FFFF;
    x = (x | (x << 8)) & 0x00FF_00FF_00FF_00FF;
    x = (x | (x << 4)) & 0x0F0F_0F0F_0F0F_0F0F;
    x = (x | (x << 2)) & 0x3333_3333_3333_3333;
    x = (x | (x << 1)) & 0x5555_5555_5555_5555;
    x
}

/// Morton (Z-order) key of the pair `(x0, x1)`: `x0` occupies the even bits
/// and `x1` the odd bits.
pub fn morton_key(x0: u32, x1: u32) -> u64 {
    spread_bits(x0) | (spread_bits(x1) << 1)
}

pub fn u32_to_le(x: u32) -> [u8; 4] {
    x.to_le_bytes()
}

pub fn u32_from_le(bytes: &[u8]) -> Option<u32> {
    Some(u32::from_le_bytes(bytes.get(..4)?.try_into().ok()?))
}

pub fn u64_to_le(x: u64) -> [u8; 8] {
    x.to_le_bytes()
}
