use std::io::{self, BufRead, BufReader, Read};

use crate::error::Result;

/// Forward-only byte cursor over the compressed stream.
///
/// Wraps any [`Read`] in a [`BufReader`] so the byte-at-a-time reads done by
/// the header and token parsers stay cheap, and counts every byte consumed.
/// Running out of input is reported as `None` / a short count rather than an
/// error; the caller decides whether that is a clean end or a truncation.
pub struct Input<R> {
    inner: BufReader<R>,
    position: u64,
}

impl<R: Read> Input<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            position: 0,
        }
    }

    /// Number of bytes consumed from the underlying reader so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read a single byte, or `None` if the input is exhausted.
    pub fn read_u8(&mut self) -> Result<Option<u8>> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let Some(&byte) = buf.first() else {
                return Ok(None);
            };
            self.inner.consume(1);
            self.position += 1;
            return Ok(Some(byte));
        }
    }

    /// Read a little-endian `u16`, or `None` if fewer than two bytes remain.
    pub fn read_u16_le(&mut self) -> Result<Option<u16>> {
        let Some(lo) = self.read_u8()? else {
            return Ok(None);
        };
        let Some(hi) = self.read_u8()? else {
            return Ok(None);
        };
        Ok(Some(u16::from_le_bytes([lo, hi])))
    }

    /// Append up to `len` bytes to `out`, returning how many were appended.
    ///
    /// A return value smaller than `len` means the input ran out. `out` grows
    /// only as data actually arrives, so a bogus huge `len` cannot force a
    /// huge allocation up front.
    pub fn read_into(&mut self, out: &mut Vec<u8>, len: u64) -> Result<u64> {
        let n = (&mut self.inner).take(len).read_to_end(out)? as u64;
        self.position += n;
        Ok(n)
    }
}
