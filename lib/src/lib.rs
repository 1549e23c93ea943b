//! CRC-16/ARC for black-channel frame integrity checks.
//!
//! The algorithm parameters come from the `crc` catalogue entry
//! [`CRC_16_ARC`]: polynomial `0x8005` processed reflected (`0xA001`
//! LSB-first), zero initial register, no final XOR. Two in-crate engines
//! compute it, a bitwise definition and a table-driven fast path, and the
//! `crc` crate itself is available as a third for cross-checking.

#![no_std]

use core::fmt;

use crc::{Crc, CRC_16_ARC};

pub mod bitwise;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod table;

/// Reflected generator polynomial.
pub const POLY: u16 = CRC_16_ARC.poly.reverse_bits();

/// Initial register value, also the checksum of an empty buffer.
pub const INIT: u16 = CRC_16_ARC.init;

/// Checksum of the ASCII bytes `123456789`.
pub const CHECK: u16 = CRC_16_ARC.check;

/// The `crc` crate's implementation of the same algorithm.
pub static ARC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Checksum of the whole of `msg`.
#[inline]
pub fn checksum(msg: &[u8]) -> u16 {
    table::update(INIT, msg)
}

/// Checksum of the first `length` bytes of `data`.
///
/// # Panics
///
/// Panics if `length` exceeds `data.len()`.
#[inline]
pub fn calculate(data: &[u8], length: u16) -> u16 {
    checksum(&data[..usize::from(length)])
}

/// Interchangeable implementations of the checksum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Engine {
    /// 256-entry lookup table, one step per byte.
    #[default]
    Table,
    /// One step per bit.
    Bitwise,
    /// The `crc` crate, see [`ARC`].
    Reference,
}

impl Engine {
    /// Every engine, table first.
    pub const ALL: [Engine; 3] = [Engine::Table, Engine::Bitwise, Engine::Reference];

    /// Checksum of the whole of `msg` computed by this engine.
    pub fn checksum(self, msg: &[u8]) -> u16 {
        match self {
            Engine::Table => table::update(INIT, msg),
            Engine::Bitwise => bitwise::update(INIT, msg),
            Engine::Reference => ARC.checksum(msg),
        }
    }

    /// A fresh [`Digest`] backed by this engine.
    pub fn digest(self) -> Digest {
        let state = match self {
            Engine::Table => State::Table(INIT),
            Engine::Bitwise => State::Bitwise(INIT),
            Engine::Reference => State::Reference(ARC.digest()),
        };
        Digest { state }
    }
}

/// Incremental checksum over data that arrives in pieces.
///
/// Any split of the input across [`update`](Digest::update) calls finalizes
/// to the same value as a one-shot checksum.
#[derive(Clone)]
pub struct Digest {
    state: State,
}

#[derive(Clone)]
enum State {
    Table(u16),
    Bitwise(u16),
    Reference(crc::Digest<'static, u16>),
}

impl Digest {
    /// A digest backed by the table engine.
    pub fn new() -> Self {
        Engine::Table.digest()
    }

    /// The engine this digest was created with.
    pub fn engine(&self) -> Engine {
        match self.state {
            State::Table(_) => Engine::Table,
            State::Bitwise(_) => Engine::Bitwise,
            State::Reference(_) => Engine::Reference,
        }
    }

    /// Feeds the next piece of input.
    pub fn update(&mut self, bytes: &[u8]) {
        match &mut self.state {
            State::Table(crc) => *crc = table::update(*crc, bytes),
            State::Bitwise(crc) => *crc = bitwise::update(*crc, bytes),
            State::Reference(digest) => digest.update(bytes),
        }
    }

    /// Checksum of everything fed so far.
    pub fn finalize(self) -> u16 {
        match self.state {
            State::Table(crc) | State::Bitwise(crc) => crc,
            State::Reference(digest) => digest.finalize(),
        }
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Digest");
        debug.field("engine", &self.engine());
        match &self.state {
            State::Table(crc) | State::Bitwise(crc) => debug.field("register", crc),
            State::Reference(_) => &mut debug,
        };
        debug.finish_non_exhaustive()
    }
}

impl Default for Digest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEADBEEF: &[u8] = &[0xDE, 0xAD, 0xBE, 0xEF];

    #[test]
    fn parameters() {
        assert_eq!(POLY, 0xA001);
        assert_eq!(INIT, 0x0000);
        assert_eq!(CHECK, 0xBB3D);
    }

    #[test]
    fn empty() {
        assert_eq!(calculate(&[], 0), 0x0000);
        assert_eq!(checksum(&[]), 0x0000);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(calculate(b"123456789", 9), 0xBB3D);
        assert_eq!(checksum(DEADBEEF), 0xE59B);
        assert_eq!(checksum(b"A"), 0x30C0);
        assert_eq!(checksum(b"hello world"), 0x39C1);
        assert_eq!(
            checksum(b"The quick brown fox jumps over the lazy dog"),
            0xFCDF
        );
    }

    #[test]
    fn zero_bytes_leave_zero_register() {
        assert_eq!(checksum(&[0u8; 32]), 0x0000);
    }

    #[test]
    fn length_selects_prefix() {
        let data = b"123456789 and then some";
        assert_eq!(calculate(data, 9), CHECK);
        assert_eq!(calculate(data, 0), INIT);
        assert_eq!(calculate(data, data.len() as u16), checksum(data));
    }

    #[test]
    #[should_panic]
    fn length_past_end_panics() {
        calculate(b"1234", 5);
    }

    #[test]
    fn engines_agree_on_check_string() {
        for engine in Engine::ALL {
            assert_eq!(engine.checksum(b"123456789"), CHECK, "{engine:?}");
        }
    }

    #[test]
    fn digest_matches_one_shot() {
        for engine in Engine::ALL {
            let mut digest = engine.digest();
            assert_eq!(digest.engine(), engine);
            digest.update(b"1234");
            digest.update(&[]);
            digest.update(b"5");
            digest.update(b"6789");
            assert_eq!(digest.finalize(), CHECK, "{engine:?}");
        }
    }

    #[test]
    fn cloned_digest_forks_the_stream() {
        for engine in Engine::ALL {
            let mut header = engine.digest();
            header.update(b"1234");
            let mut frame = header.clone();
            frame.update(b"56789");
            assert_eq!(header.finalize(), engine.checksum(b"1234"), "{engine:?}");
            assert_eq!(frame.finalize(), CHECK, "{engine:?}");
        }
    }

    #[test]
    fn empty_digest_finalizes_to_init() {
        for engine in Engine::ALL {
            assert_eq!(engine.digest().finalize(), INIT, "{engine:?}");
        }
        assert_eq!(Digest::default().engine(), Engine::Table);
    }
}
