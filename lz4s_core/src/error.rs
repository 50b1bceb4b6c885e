use std::io;

/// Result alias used throughout `lz4s_core`.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while decoding a chunked LZ4 stream.
///
/// Running out of input exactly at a chunk-header boundary is not an error;
/// it is reported as [`HeaderRead::EndOfStream`](crate::chunk::HeaderRead).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input ended after a chunk header was started but before all of
    /// its fields were read.
    #[error("input ended in the middle of a chunk header")]
    TruncatedHeader,

    /// Fewer raw, literal, offset or length-extension bytes were available
    /// than the stream declared.
    #[error("input ended in the middle of a chunk payload")]
    TruncatedPayload,

    /// A back-reference pointed before the start of the output (or was zero).
    #[error("invalid match offset {offset} (only {available} bytes decoded so far)")]
    InvalidMatchOffset { offset: u16, available: usize },

    /// A chunk length field does not fit in 64 bits.
    #[error("varint length field overflows 64 bits")]
    VarIntOverflow,

    /// A token's literal or match length extension overflowed.
    #[error("token length extension overflows")]
    LengthOverflow,

    /// A compressed block produced more bytes than its chunk declared.
    #[error("block overran its chunk: declared {declared} bytes, would produce {produced}")]
    ChunkOverrun { declared: u64, produced: u64 },

    /// A block reached its chunk's declared length on a match. Blocks end
    /// with a literal run, so the last bytes of a chunk are never a match.
    #[error("block ended on a match instead of a literal run")]
    BlockEndsOnMatch,

    /// Strict mode only: the block consumed a different number of input bytes
    /// than its header's compressed length.
    #[error("compressed length mismatch: header says {declared} bytes, block used {consumed}")]
    CompressedLengthMismatch { declared: u64, consumed: u64 },

    /// The decoded output would exceed the configured limit.
    #[error("decoded output would reach {requested} bytes, limit is {limit}")]
    OutputLimitExceeded { requested: u64, limit: u64 },

    /// The underlying reader failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
