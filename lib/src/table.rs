//! Byte-at-a-time CRC-16/ARC driven by a 256-entry lookup table.

use crate::bitwise;

/// `TABLE[i]` is the register after feeding the single byte `i` into a zero
/// register.
pub static TABLE: [u16; 256] = generate();

const fn generate() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = bitwise::update(0, &[i as u8]);
        i += 1;
    }
    table
}

/// Continues `crc` over `data`, one table lookup per byte.
#[inline]
#[must_use]
pub fn update(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &byte| {
        (crc >> 8) ^ TABLE[usize::from(crc as u8 ^ byte)]
    })
}
