//! Byte cursor over a sentinel-terminated buffer.
//!
//! The cursor advances byte-by-byte. EOF is detected when the current byte
//! equals the sentinel (`0x00`) and the position has reached the source
//! length; an interior null at `pos < source_len` is not EOF.

/// Byte cursor over a sentinel-terminated buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`], enabling cheap state snapshots for backtracking.
///
/// # Invariant
///
/// `buf` must be sentinel-terminated: `buf[source_len] == 0x00` and all bytes
/// after `source_len` are `0x00`. Guaranteed by `SourceBuffer` construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a [u8],
    /// Current read position.
    pos: u32,
    /// Length of the source content (excludes sentinel and padding).
    source_len: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// The byte at the current position; `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// The byte one position ahead. Safe at any position thanks to the
    /// sentinel and padding.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// `true` once the cursor has consumed all source content.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Length of the source content.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content and on UTF-8
    /// character boundaries, which holds whenever both offsets come from
    /// token boundary tracking over a source that was originally `&str`.
    #[allow(
        unsafe_code,
        reason = "from_utf8_unchecked on source originally validated as &str"
    )]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        // SAFETY: The buffer was constructed from `&str` (valid UTF-8) and
        // the caller guarantees character-boundary offsets.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Extract a source substring from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// The remaining source content from the current position, as `&str`.
    pub fn rest(&self) -> &'a str {
        self.slice(self.pos, self.source_len)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false`; this holds for every classifier
    /// predicate, so the sentinel terminates the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Advance past horizontal whitespace (spaces and tabs).
    ///
    /// Runs between tokens are short (1-4 bytes), so a plain byte loop beats
    /// anything wider. The sentinel terminates scanning.
    #[inline]
    pub fn eat_whitespace(&mut self) {
        loop {
            let b = self.buf[self.pos as usize];
            if b == b' ' || b == b'\t' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Advance to the next `\n` byte or EOF using SIMD-accelerated search.
    ///
    /// Used to skip comment bodies. Scans only within source content; if no
    /// newline is found the cursor lands on the EOF sentinel.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "remaining.len() <= source_len which fits in u32"
    )]
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(b'\n', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// The number of bytes in the UTF-8 character whose leading byte is `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance the cursor past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    #[test]
    fn current_returns_first_byte() {
        let buf = SourceBuffer::new("abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
    }

    #[test]
    fn advance_moves_forward() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn advance_through_entire_source() {
        let buf = SourceBuffer::new("hi");
        let mut cursor = buf.cursor();
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_eof());
    }

    #[test]
    fn peek_returns_next_byte() {
        let buf = SourceBuffer::new("abc");
        let cursor = buf.cursor();
        assert_eq!(cursor.peek(), b'b');
    }

    #[test]
    fn peek_near_end_returns_sentinel() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.peek(), 0);
    }

    #[test]
    fn interior_null_is_not_eof() {
        let buf = SourceBuffer::new("a\0b");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof());
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
    }

    #[test]
    fn slice_extracts_substring() {
        let buf = SourceBuffer::new("hello world");
        let cursor = buf.cursor();
        assert_eq!(cursor.slice(0, 5), "hello");
        assert_eq!(cursor.slice(6, 11), "world");
    }

    #[test]
    fn slice_from_extracts_to_current() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(3);
        assert_eq!(cursor.slice_from(0), "abc");
        assert_eq!(cursor.slice_from(1), "bc");
    }

    #[test]
    fn rest_returns_remaining_source() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);
        assert_eq!(cursor.rest(), "cdef");
    }

    #[test]
    fn rest_at_eof_is_empty() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);
        assert_eq!(cursor.rest(), "");
    }

    #[test]
    fn eat_while_consumes_matching_bytes() {
        let buf = SourceBuffer::new("aaabbb");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.current(), b'b');
    }

    #[test]
    fn eat_while_stops_at_sentinel() {
        let buf = SourceBuffer::new("aaa");
        let mut cursor = buf.cursor();
        cursor.eat_while(|b| b == b'a');
        assert!(cursor.is_eof());
    }

    #[test]
    fn eat_whitespace_mixed() {
        let buf = SourceBuffer::new("  \t \t  x");
        let mut cursor = buf.cursor();
        cursor.eat_whitespace();
        assert_eq!(cursor.pos(), 7);
        assert_eq!(cursor.current(), b'x');
    }

    #[test]
    fn eat_whitespace_stops_at_newline() {
        let buf = SourceBuffer::new("   \nhello");
        let mut cursor = buf.cursor();
        cursor.eat_whitespace();
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_finds_lf() {
        let buf = SourceBuffer::new("hello\nworld");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 5);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn eat_until_newline_stops_at_eof() {
        let buf = SourceBuffer::new("no newline here");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 15);
        assert!(cursor.is_eof());
    }

    #[test]
    fn cursor_is_copy_for_checkpointing() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(2);

        let saved = cursor;
        cursor.advance_n(3);

        assert_eq!(cursor.pos(), 5);
        assert_eq!(saved.pos(), 2);
        assert_eq!(saved.current(), b'c');
    }

    #[test]
    fn advance_char_skips_multibyte() {
        let buf = SourceBuffer::new("\u{1F600}x");
        let mut cursor = buf.cursor();
        cursor.advance_char();
        assert_eq!(cursor.current(), b'x');
    }

    mod proptest_cursor {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn eat_whitespace_matches_scalar_count(
                ws in proptest::collection::vec(prop_oneof![Just(b' '), Just(b'\t')], 0..64),
                tail in "[a-z]{0,8}",
            ) {
                let mut source = String::from_utf8(ws.clone()).unwrap();
                source.push_str(&tail);
                let buf = SourceBuffer::new(&source);
                let mut cursor = buf.cursor();
                cursor.eat_whitespace();
                prop_assert_eq!(cursor.pos() as usize, ws.len());
            }

            #[test]
            fn eat_until_newline_lands_on_newline_or_eof(source in "[a-z\n ]{0,64}") {
                let buf = SourceBuffer::new(&source);
                let mut cursor = buf.cursor();
                cursor.eat_until_newline_or_eof();
                prop_assert!(cursor.current() == b'\n' || cursor.is_eof());
            }
        }
    }
}
