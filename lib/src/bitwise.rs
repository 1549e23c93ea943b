//! Bit-at-a-time CRC-16/ARC.
//!
//! This is the definition every faster path is checked against. It is a
//! `const fn` so the lookup table can be derived from it at compile time.

use crate::POLY;

/// Continues `crc` over `data`, one bit per step.
///
/// `update(INIT, data)` is the checksum of `data`.
#[must_use]
pub const fn update(crc: u16, data: &[u8]) -> u16 {
    let mut crc = crc;
    let mut i = 0;
    while i < data.len() {
        crc ^= data[i] as u16;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        i += 1;
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CHECK, INIT};

    #[test]
    fn check_value() {
        assert_eq!(update(INIT, b"123456789"), CHECK);
    }

    #[test]
    fn empty_input_keeps_register() {
        assert_eq!(update(INIT, &[]), INIT);
        assert_eq!(update(0x1234, &[]), 0x1234);
    }

    #[test]
    fn resumes_across_splits() {
        let head = update(INIT, b"1234");
        assert_eq!(update(head, b"56789"), CHECK);
    }

    #[test]
    fn evaluates_in_const_context() {
        const CRC: u16 = update(INIT, &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(CRC, 0xE59B);
    }
}
