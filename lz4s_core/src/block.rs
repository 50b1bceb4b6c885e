//! LZ4 block replay.
//!
//! A block is a sequence of tokens:
//!
//! ```text
//! token:u8 [literal ext] literal[literal_len] [offset:u16-LE] [match ext]
//! ```
//!
//! The high nibble of the token is the literal length, the low nibble the
//! match length minus [`MIN_MATCH`]. A nibble of `0xF` is extended by adding
//! following bytes until one of them is not `0xFF`. The block carries no end
//! marker: it ends when the chunk's declared original length has been
//! produced, which always happens right after a literal run.

use std::io::Read;

use crate::error::{Error, Result};
use crate::format::{EXTENSION_CONTINUE, MIN_MATCH, RUN_MASK};
use crate::input::Input;
use crate::output::OutputBuffer;

/// One decode instruction: a literal run followed by an optional match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token {
    literal_length: usize,
    match_nibble: u8,
}

impl Token {
    fn read<R: Read>(byte: u8, input: &mut Input<R>) -> Result<Self> {
        let literal_nibble = byte >> 4;
        Ok(Self {
            literal_length: read_length(literal_nibble, input)?,
            match_nibble: byte & RUN_MASK,
        })
    }
}

/// Expand a 4-bit length, consuming extension bytes when it is saturated.
///
/// Once the nibble is `0xF` at least one extension byte is always read; every
/// byte read is added, and reading stops after the first byte that is not
/// `0xFF`.
pub fn read_length<R: Read>(nibble: u8, input: &mut Input<R>) -> Result<usize> {
    let mut length = usize::from(nibble);
    if nibble != RUN_MASK {
        return Ok(length);
    }
    loop {
        let byte = input.read_u8()?.ok_or(Error::TruncatedPayload)?;
        length = length
            .checked_add(usize::from(byte))
            .ok_or(Error::LengthOverflow)?;
        if byte != EXTENSION_CONTINUE {
            return Ok(length);
        }
    }
}

/// Decode one compressed chunk, appending `original_length` bytes to `out`.
///
/// Matches may reach back into earlier chunks; the whole of `out` is the
/// window. If the input is exhausted where a token is expected, decoding
/// stops early and the caller's length cross-check reports the shortfall.
pub fn decode_block<R: Read>(
    input: &mut Input<R>,
    out: &mut OutputBuffer,
    original_length: u64,
) -> Result<()> {
    let start = out.len() as u64;
    let target = start.saturating_add(original_length);
    let check_bound = |produced: u64| -> Result<()> {
        if produced > target {
            return Err(Error::ChunkOverrun {
                declared: original_length,
                produced: produced - start,
            });
        }
        Ok(())
    };

    let mut tokens = 0u64;
    loop {
        let Some(byte) = input.read_u8()? else {
            break;
        };
        tokens += 1;
        let token = Token::read(byte, input)?;

        let literal_length = token.literal_length as u64;
        check_bound(out.len() as u64 + literal_length)?;
        out.fill_from(input, literal_length)?;

        if out.len() as u64 >= target {
            break;
        }

        let offset = input.read_u16_le()?.ok_or(Error::TruncatedPayload)?;
        let match_length = read_length(token.match_nibble, input)?
            .checked_add(MIN_MATCH)
            .ok_or(Error::LengthOverflow)?;
        check_bound(out.len() as u64 + match_length as u64)?;
        out.copy_match(offset, match_length)?;

        if out.len() as u64 == target {
            return Err(Error::BlockEndsOnMatch);
        }
    }

    tracing::trace!(
        tokens,
        produced = out.len() as u64 - start,
        declared = original_length,
        "block decoded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(block: &[u8], original_length: u64) -> Result<Vec<u8>> {
        let mut out = OutputBuffer::new();
        decode_block(&mut Input::new(block), &mut out, original_length)?;
        Ok(out.into_vec())
    }

    #[test]
    fn literal_only_block() {
        // token 0x50: 5 literals, no match
        let block = [0x50, b'h', b'e', b'l', b'l', b'o'];
        assert_eq!(run(&block, 5).unwrap(), b"hello");
    }

    #[test]
    fn literal_then_overlapping_match_then_tail() {
        // "ab" + match(offset 2, len 4+2=6) + "c"
        let block = [0x22, b'a', b'b', 0x02, 0x00, 0x10, b'c'];
        assert_eq!(run(&block, 9).unwrap(), b"ababababc");
    }

    #[test]
    fn extension_bytes_accumulate() {
        // 0xF + 0xFF + 0xFF + 0x05 = 530
        let mut input = Input::new(&[0xFF, 0xFF, 0x05, 0x99][..]);
        assert_eq!(read_length(0x0F, &mut input).unwrap(), 15 + 255 + 255 + 5);
        assert_eq!(input.position(), 3);
    }

    #[test]
    fn saturated_nibble_always_reads_one_extension_byte() {
        let mut input = Input::new(&[0x00, 0x42][..]);
        assert_eq!(read_length(0x0F, &mut input).unwrap(), 15);
        assert_eq!(input.position(), 1);
    }

    #[test]
    fn unsaturated_nibble_reads_nothing() {
        let mut input = Input::new(&[0xFF][..]);
        assert_eq!(read_length(0x0E, &mut input).unwrap(), 14);
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn long_literal_run() {
        let len = 15 + 255 + 255 + 5;
        let mut block = vec![0xF0, 0xFF, 0xFF, 0x05];
        let literals: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        block.extend_from_slice(&literals);
        assert_eq!(run(&block, len as u64).unwrap(), literals);
    }

    #[test]
    fn long_match_length() {
        // 1 literal, match nibble 0xF + ext 0x0A → 15 + 10 + 4 = 29, then 1 literal
        let block = [0x1F, b'z', 0x01, 0x00, 0x0A, 0x10, b'!'];
        let mut expected = vec![b'z'; 30];
        expected.push(b'!');
        assert_eq!(run(&block, 31).unwrap(), expected);
    }

    #[test]
    fn matches_reach_into_earlier_chunks() {
        let mut out = OutputBuffer::new();
        out.extend_literal(b"wxyz");
        // no literals, match(offset 4, len 4), then one literal
        let block = [0x00, 0x04, 0x00, 0x10, b'!'];
        decode_block(&mut Input::new(&block[..]), &mut out, 5).unwrap();
        assert_eq!(out.as_slice(), b"wxyzwxyz!");
    }

    #[test]
    fn offset_beyond_output_is_rejected() {
        let block = [0x20, b'a', b'b', 0x03, 0x00];
        assert!(matches!(
            run(&block, 10),
            Err(Error::InvalidMatchOffset { offset: 3, available: 2 })
        ));
    }

    #[test]
    fn zero_offset_is_rejected() {
        let block = [0x10, b'a', 0x00, 0x00];
        assert!(matches!(run(&block, 10), Err(Error::InvalidMatchOffset { offset: 0, .. })));
    }

    #[test]
    fn truncated_literals() {
        let block = [0x50, b'h', b'e'];
        assert!(matches!(run(&block, 5), Err(Error::TruncatedPayload)));
    }

    #[test]
    fn truncated_offset() {
        let block = [0x10, b'a', 0x01];
        assert!(matches!(run(&block, 10), Err(Error::TruncatedPayload)));
    }

    #[test]
    fn truncated_extension() {
        let block = [0xF0, 0xFF];
        assert!(matches!(run(&block, 400), Err(Error::TruncatedPayload)));
    }

    #[test]
    fn missing_token_stops_early() {
        // the shortfall is left for the chunk loop to report
        let block = [0x10, b'a', 0x01, 0x00];
        assert_eq!(run(&block, 10).unwrap(), b"aaaaa");
    }

    #[test]
    fn block_ending_on_match_is_rejected() {
        // "a" + match(offset 1, len 4) fills all 5 bytes without a final literal run
        let block = [0x10, b'a', 0x01, 0x00];
        assert!(matches!(run(&block, 5), Err(Error::BlockEndsOnMatch)));
    }

    #[test]
    fn literal_overrun_is_rejected() {
        let block = [0x50, b'h', b'e', b'l', b'l', b'o'];
        assert!(matches!(
            run(&block, 3),
            Err(Error::ChunkOverrun { declared: 3, produced: 5 })
        ));
    }

    #[test]
    fn match_overrun_is_rejected() {
        let block = [0x10, b'a', 0x01, 0x00];
        assert!(matches!(
            run(&block, 3),
            Err(Error::ChunkOverrun { declared: 3, produced: 5 })
        ));
    }

    #[test]
    fn stops_at_declared_length_leaving_rest_of_input() {
        let block = [0x20, b'o', b'k', 0x00, 0xEE];
        let mut input = Input::new(&block[..]);
        let mut out = OutputBuffer::new();
        decode_block(&mut input, &mut out, 2).unwrap();
        assert_eq!(out.as_slice(), b"ok");
        assert_eq!(input.position(), 3);
    }
}
