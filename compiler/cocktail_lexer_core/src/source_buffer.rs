//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content, so
//! the scanner detects EOF without explicit bounds checks. The total size is
//! rounded up to the next 64-byte boundary, which also provides safe padding
//! for `peek()` near the end of the buffer.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
}

impl SourceBuffer {
    /// Copy `source` into a sentinel-terminated, cache-line-padded buffer.
    ///
    /// Sources larger than `u32::MAX` bytes are accepted but `len()`
    /// saturates; the owning lexer reports oversized files upstream.
    pub fn new(source: &str) -> Self {
        let source_bytes = source.as_bytes();
        let source_len = source_bytes.len();

        // Round up to the next 64-byte boundary (minimum: source + sentinel).
        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        // The sentinel and padding are already 0x00 in the zero-filled vec.
        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source_bytes);

        Self {
            buf,
            source_len: u32::try_from(source_len).unwrap_or(u32::MAX),
        }
    }

    /// The source bytes, without sentinel or padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source() {
        let buf = SourceBuffer::new("");
        assert_eq!(buf.len(), 0);
        assert!(buf.is_empty());
        assert!(buf.as_bytes().is_empty());
    }

    #[test]
    fn ascii_source() {
        let buf = SourceBuffer::new("hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.as_bytes(), b"hello");
    }

    #[test]
    fn buffer_is_cache_line_padded() {
        for len in [0, 1, 10, 63, 64, 65, 127, 128, 1000] {
            let source: String = "x".repeat(len);
            let buf = SourceBuffer::new(&source);
            assert_eq!(
                buf.buf.len() % CACHE_LINE,
                0,
                "buffer length {} not cache-line aligned for source length {len}",
                buf.buf.len()
            );
        }
    }

    #[test]
    fn sentinel_and_padding_are_zero() {
        let buf = SourceBuffer::new("abc");
        for &b in &buf.buf[3..] {
            assert_eq!(b, 0, "non-zero byte in sentinel/padding region");
        }
    }

    #[test]
    fn utf8_multibyte_source() {
        let source = "hi \u{1F600} bye";
        let buf = SourceBuffer::new(source);
        assert_eq!(buf.len() as usize, source.len());
        assert_eq!(buf.as_bytes(), source.as_bytes());
    }

    #[test]
    fn cursor_starts_at_zero() {
        let buf = SourceBuffer::new("hello");
        let cursor = buf.cursor();
        assert_eq!(cursor.pos(), 0);
        assert_eq!(cursor.current(), b'h');
    }

    #[test]
    fn cursor_on_empty_source_is_eof() {
        let buf = SourceBuffer::new("");
        let cursor = buf.cursor();
        assert!(cursor.is_eof());
        assert_eq!(cursor.current(), 0);
    }
}
