use std::io::Read;

use crate::error::{Error, Result};
use crate::input::Input;

/// Append-only arena holding every byte decoded so far, across all chunks.
///
/// Back-references address this buffer by distance from its end, so it is a
/// single flat `Vec<u8>` and its length only ever grows.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Append literal bytes.
    pub fn extend_literal(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Move exactly `len` bytes from `input` onto the end of the buffer.
    ///
    /// Fails with [`Error::TruncatedPayload`] if the input runs out first.
    pub fn fill_from<R: Read>(&mut self, input: &mut Input<R>, len: u64) -> Result<()> {
        if input.read_into(&mut self.data, len)? != len {
            return Err(Error::TruncatedPayload);
        }
        Ok(())
    }

    /// Copy `length` bytes starting `offset` bytes back from the end.
    ///
    /// When `length > offset` the source overlaps the bytes being written, so
    /// the copy runs in slices of at most `offset` bytes; every slice reads
    /// only bytes that are already in the buffer. An offset of 2 over `..XY`
    /// with length 6 appends `XYXYXY`.
    pub fn copy_match(&mut self, offset: u16, length: usize) -> Result<()> {
        let distance = usize::from(offset);
        if distance == 0 || distance > self.data.len() {
            return Err(Error::InvalidMatchOffset {
                offset,
                available: self.data.len(),
            });
        }

        self.data.reserve(length);
        let mut remaining = length;
        while remaining > 0 {
            let slice = distance.min(remaining);
            let start = self.data.len() - distance;
            self.data.extend_from_within(start..start + slice);
            remaining -= slice;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(bytes: &[u8]) -> OutputBuffer {
        let mut out = OutputBuffer::new();
        out.extend_literal(bytes);
        out
    }

    #[test]
    fn non_overlapping_match() {
        let mut out = buffer(b"abcdef");
        out.copy_match(6, 4).unwrap();
        assert_eq!(out.as_slice(), b"abcdefabcd");
    }

    #[test]
    fn overlapping_match_repeats_pattern() {
        let mut out = buffer(b"..XY");
        out.copy_match(2, 6).unwrap();
        assert_eq!(out.as_slice(), b"..XYXYXYXY");
    }

    #[test]
    fn offset_one_is_a_run() {
        let mut out = buffer(b"a");
        out.copy_match(1, 9).unwrap();
        assert_eq!(out.as_slice(), b"aaaaaaaaaa");
    }

    #[test]
    fn match_length_not_multiple_of_offset() {
        let mut out = buffer(b"abc");
        out.copy_match(3, 7).unwrap();
        assert_eq!(out.as_slice(), b"abcabcabca");
    }

    #[test]
    fn rejects_zero_offset() {
        let mut out = buffer(b"abc");
        assert!(matches!(
            out.copy_match(0, 4),
            Err(Error::InvalidMatchOffset { offset: 0, available: 3 })
        ));
    }

    #[test]
    fn rejects_offset_past_start() {
        let mut out = buffer(b"abc");
        assert!(matches!(
            out.copy_match(4, 4),
            Err(Error::InvalidMatchOffset { offset: 4, available: 3 })
        ));
        assert_eq!(out.len(), 3, "failed copy must not grow the buffer");
    }

    #[test]
    fn fill_from_requires_every_byte() {
        let mut out = OutputBuffer::new();
        let mut input = Input::new(&b"hello"[..]);
        out.fill_from(&mut input, 3).unwrap();
        assert_eq!(out.as_slice(), b"hel");
        assert!(matches!(out.fill_from(&mut input, 3), Err(Error::TruncatedPayload)));
    }
}
