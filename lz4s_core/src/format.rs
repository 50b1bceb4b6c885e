use crate::varint::write_varint;

// ── Chunk type flags ───────────────────────────────────────────────────────

/// Payload is an LZ4 block; a compressed-length varint follows the original length.
pub const FLAG_COMPRESSED: u8 = 1 << 0;

/// Block was produced by the high-compression encoder. Informational only.
pub const FLAG_HIGH_COMPRESSION: u8 = 1 << 1;

// ── Block token layout ─────────────────────────────────────────────────────

/// Shortest match the format can express; added to every decoded match length.
pub const MIN_MATCH: usize = 4;

/// A length nibble with this value is followed by extension bytes.
pub const RUN_MASK: u8 = 0x0F;

/// Extension bytes with this value are followed by another extension byte.
pub const EXTENSION_CONTINUE: u8 = 0xFF;

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded chunk header.
///
/// ```text
/// chunk := type:u8 original_len:varint [compressed_len:varint if type & 1] payload
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub chunk_type: u8,
    /// Decompressed size of this chunk in bytes.
    pub original_length: u64,
    /// Encoded payload size; present exactly when the compressed flag is set.
    pub compressed_length: Option<u64>,
}

impl ChunkHeader {
    /// Header for a chunk stored verbatim.
    pub fn raw(original_length: u64) -> Self {
        Self {
            chunk_type: 0,
            original_length,
            compressed_length: None,
        }
    }

    /// Header for a chunk holding an LZ4 block.
    pub fn compressed(original_length: u64, compressed_length: u64) -> Self {
        Self {
            chunk_type: FLAG_COMPRESSED,
            original_length,
            compressed_length: Some(compressed_length),
        }
    }

    pub fn is_compressed(&self) -> bool {
        self.chunk_type & FLAG_COMPRESSED != 0
    }

    pub fn is_high_compression(&self) -> bool {
        self.chunk_type & FLAG_HIGH_COMPRESSION != 0
    }

    /// Number of payload bytes that follow the header on the wire.
    ///
    /// For compressed chunks this is the header's own claim; the block
    /// decoder stops on output length, not on this value.
    pub fn payload_length(&self) -> u64 {
        self.compressed_length.unwrap_or(self.original_length)
    }

    /// Compressed / original size, `1.0` for raw or empty chunks.
    pub fn ratio(&self) -> f64 {
        match self.compressed_length {
            Some(c) if self.original_length > 0 => c as f64 / self.original_length as f64,
            _ => 1.0,
        }
    }

    /// Serialize the header. The compressed-length field is written whenever
    /// the compressed flag is set, as `0` if it is missing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + 2 * 10);
        buf.push(self.chunk_type);
        write_varint(self.original_length, &mut buf);
        if self.is_compressed() {
            write_varint(self.compressed_length.unwrap_or(0), &mut buf);
        }
        buf
    }
}
