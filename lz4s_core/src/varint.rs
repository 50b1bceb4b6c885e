//! Little-endian base-128 integers used for chunk length fields.
//!
//! Each byte carries 7 payload bits, least-significant group first; a set
//! high bit (0x80) means another byte follows.

use std::io::Read;

use crate::error::{Error, Result};
use crate::input::Input;

/// Largest number of groups a `u64` can need (`ceil(64 / 7)`).
pub const MAX_VARINT_GROUPS: u32 = 10;

const CONTINUATION: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7F;

/// Decode one varint.
///
/// Fails with [`Error::TruncatedHeader`] if the input ends before the
/// terminal byte, and with [`Error::VarIntOverflow`] if the value does not
/// fit in a `u64` (more than ten groups, or a tenth group above 1).
pub fn read_varint<R: Read>(input: &mut Input<R>) -> Result<u64> {
    let mut value = 0u64;
    for group in 0..MAX_VARINT_GROUPS {
        let byte = input.read_u8()?.ok_or(Error::TruncatedHeader)?;
        let payload = u64::from(byte & PAYLOAD_MASK);
        let shift = group * 7;

        // Only one bit of the tenth group is left in a u64.
        if group == MAX_VARINT_GROUPS - 1 && (payload > 1 || byte & CONTINUATION != 0) {
            return Err(Error::VarIntOverflow);
        }
        value |= payload << shift;

        if byte & CONTINUATION == 0 {
            return Ok(value);
        }
    }
    Err(Error::VarIntOverflow)
}

/// Append the varint encoding of `value` to `out`.
pub fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= u64::from(CONTINUATION) {
        out.push((value as u8 & PAYLOAD_MASK) | CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}
