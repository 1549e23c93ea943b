//! C ABI export for firmware that links the checksum as a plain symbol.

use crate::{checksum, INIT};

/// Computes CRC-16/ARC over `size` bytes starting at `data`.
///
/// A zero `size` or a null `data` returns the initial register value without
/// touching memory.
///
/// # Safety
///
/// When `size > 0` and `data` is non-null, `data` must point to at least
/// `size` readable bytes that stay unmodified for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn crc_16_arc_calculate(data: *const u8, size: u16) -> u16 {
    if size == 0 || data.is_null() {
        return INIT;
    }
    let bytes = unsafe { core::slice::from_raw_parts(data, usize::from(size)) };
    checksum(bytes)
}
