use std::io::Read;

use crate::block::decode_block;
use crate::chunk::{read_header, HeaderRead};
use crate::error::{Error, Result};
use crate::format::ChunkHeader;
use crate::input::Input;
use crate::output::OutputBuffer;

/// Knobs for a decode call. The defaults accept anything the format allows.
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Require each compressed block to consume exactly the number of input
    /// bytes its header declares. Off by default: the declared original
    /// length alone decides where a block ends.
    pub strict_compressed_length: bool,
    /// Reject streams whose chunks declare more than this many output bytes
    /// in total. Checked before a chunk is decoded.
    pub max_output: Option<u64>,
}

/// Where a chunk sat in the input and how much payload it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntry {
    pub header: ChunkHeader,
    /// Input offset of the chunk's type byte.
    pub offset: u64,
    /// Payload bytes actually consumed after the header.
    pub payload_len: u64,
}

/// Result of a full decode: the reconstructed bytes plus per-chunk records.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub data: Vec<u8>,
    pub chunks: Vec<ChunkEntry>,
}

impl Decoded {
    /// Total decoded size in bytes.
    pub fn raw_size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Total payload bytes consumed, excluding headers.
    pub fn compressed_size(&self) -> u64 {
        self.chunks.iter().map(|c| c.payload_len).sum()
    }

    /// Compression ratio (raw / compressed).
    pub fn ratio(&self) -> f64 {
        let compressed = self.compressed_size();
        if compressed == 0 {
            return 1.0;
        }
        self.raw_size() as f64 / compressed as f64
    }
}

/// Sequential decoder for a chunked LZ4 stream.
///
/// The stream is a plain concatenation of chunks with no terminator; input
/// exhaustion at a chunk boundary ends it. Each chunk is either stored raw or
/// holds one LZ4 block whose matches may reach back into any earlier chunk's
/// output, so all chunks decode into one shared [`OutputBuffer`].
///
/// [`finish`](Self::finish) drives the whole stream. Callers that want to
/// stop between chunks can step with [`next_chunk`](Self::next_chunk) first.
pub struct Decoder<R> {
    input: Input<R>,
    config: DecoderConfig,
    out: OutputBuffer,
    chunks: Vec<ChunkEntry>,
    /// Sum of every chunk's declared original length so far.
    expected_length: u64,
}

impl<R: Read> Decoder<R> {
    pub fn new(input: R) -> Self {
        Self::with_config(input, DecoderConfig::default())
    }

    pub fn with_config(input: R, config: DecoderConfig) -> Self {
        Self {
            input: Input::new(input),
            config,
            out: OutputBuffer::new(),
            chunks: Vec::new(),
            expected_length: 0,
        }
    }

    /// Bytes decoded so far.
    pub fn output_len(&self) -> usize {
        self.out.len()
    }

    /// Decode the next chunk into the output buffer.
    ///
    /// Returns `Ok(None)` once the input is exhausted at a chunk boundary.
    pub fn next_chunk(&mut self) -> Result<Option<ChunkEntry>> {
        let offset = self.input.position();
        let header = match read_header(&mut self.input)? {
            HeaderRead::Header(header) => header,
            HeaderRead::EndOfStream => return Ok(None),
        };

        let expected = self.expected_length.saturating_add(header.original_length);
        if let Some(limit) = self.config.max_output {
            if expected > limit {
                return Err(Error::OutputLimitExceeded {
                    requested: expected,
                    limit,
                });
            }
        }
        self.expected_length = expected;

        let payload_start = self.input.position();
        if header.is_compressed() {
            decode_block(&mut self.input, &mut self.out, header.original_length)?;
        } else {
            self.out.fill_from(&mut self.input, header.original_length)?;
        }
        let payload_len = self.input.position() - payload_start;

        if self.out.len() as u64 != self.expected_length {
            return Err(Error::TruncatedPayload);
        }
        if self.config.strict_compressed_length {
            if let Some(declared) = header.compressed_length {
                if declared != payload_len {
                    return Err(Error::CompressedLengthMismatch {
                        declared,
                        consumed: payload_len,
                    });
                }
            }
        }

        let entry = ChunkEntry {
            header,
            offset,
            payload_len,
        };
        self.chunks.push(entry);
        Ok(Some(entry))
    }

    /// Decode all remaining chunks and hand back the output.
    pub fn finish(mut self) -> Result<Decoded> {
        while self.next_chunk()?.is_some() {}

        tracing::debug!(
            chunks = self.chunks.len(),
            bytes = self.out.len(),
            consumed = self.input.position(),
            "stream decoded"
        );
        Ok(Decoded {
            data: self.out.into_vec(),
            chunks: self.chunks,
        })
    }
}

/// Decode a complete chunked LZ4 stream into its original bytes.
pub fn decode<R: Read>(input: R) -> Result<Vec<u8>> {
    Ok(Decoder::new(input).finish()?.data)
}
