pub mod block;
pub mod chunk;
pub mod decoder;
pub mod error;
pub mod format;
pub mod input;
pub mod output;
pub mod varint;

pub use chunk::{read_header, HeaderRead};
pub use decoder::{decode, ChunkEntry, Decoded, Decoder, DecoderConfig};
pub use error::{Error, Result};
pub use format::ChunkHeader;
pub use output::OutputBuffer;
