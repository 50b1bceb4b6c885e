use std::io::Read;

use crate::error::Result;
use crate::format::{ChunkHeader, FLAG_COMPRESSED};
use crate::input::Input;
use crate::varint::read_varint;

/// Outcome of trying to read the next chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRead {
    Header(ChunkHeader),
    /// No byte was left for the chunk type: the stream ended cleanly.
    EndOfStream,
}

/// Read one chunk header.
///
/// Only an empty read of the leading type byte counts as end of stream. Once
/// that byte is consumed, running out of input is [`Error::TruncatedHeader`].
pub fn read_header<R: Read>(input: &mut Input<R>) -> Result<HeaderRead> {
    let Some(chunk_type) = input.read_u8()? else {
        return Ok(HeaderRead::EndOfStream);
    };

    let original_length = read_varint(input)?;
    let compressed_length = if chunk_type & FLAG_COMPRESSED != 0 {
        Some(read_varint(input)?)
    } else {
        None
    };
    let header = ChunkHeader {
        chunk_type,
        original_length,
        compressed_length,
    };

    match header.compressed_length {
        Some(compressed) => tracing::debug!(
            chunk_type = %format!("0x{:02X}", chunk_type),
            original_length,
            compressed_length = compressed,
            ratio = header.ratio(),
            "compressed chunk"
        ),
        None => tracing::debug!(
            chunk_type = %format!("0x{:02X}", chunk_type),
            original_length,
            "uncompressed chunk"
        ),
    }

    Ok(HeaderRead::Header(header))
}
