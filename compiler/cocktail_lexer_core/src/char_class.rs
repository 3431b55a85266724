//! Byte classification predicates used throughout the lexer.
//!
//! All predicates return `false` for the sentinel byte (`0x00`), so
//! `Cursor::eat_while` loops terminate naturally at EOF.

/// `0-9`.
#[inline]
pub fn is_decimal_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// `0-9A-F`. Cocktail hex digits are uppercase-only.
#[inline]
pub fn is_upper_hex_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'A'..=b'F')
}

/// `0-9a-f`.
#[inline]
pub fn is_lower_hex_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

/// ASCII letter or digit.
#[inline]
pub fn is_alnum(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

/// ASCII lowercase letter.
#[inline]
pub fn is_lower(b: u8) -> bool {
    b.is_ascii_lowercase()
}

/// Space or horizontal tab. Newlines are not horizontal whitespace.
#[inline]
pub fn is_horizontal_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Space, horizontal tab, or newline.
#[inline]
pub fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_digits() {
        assert!(is_decimal_digit(b'0'));
        assert!(is_decimal_digit(b'9'));
        assert!(!is_decimal_digit(b'a'));
        assert!(!is_decimal_digit(b'_'));
        assert!(!is_decimal_digit(0));
    }

    #[test]
    fn upper_hex_rejects_lowercase() {
        assert!(is_upper_hex_digit(b'A'));
        assert!(is_upper_hex_digit(b'F'));
        assert!(is_upper_hex_digit(b'7'));
        assert!(!is_upper_hex_digit(b'a'));
        assert!(!is_upper_hex_digit(b'G'));
    }

    #[test]
    fn lower_hex_rejects_uppercase() {
        assert!(is_lower_hex_digit(b'a'));
        assert!(!is_lower_hex_digit(b'A'));
    }

    #[test]
    fn horizontal_whitespace_excludes_newline() {
        assert!(is_horizontal_whitespace(b' '));
        assert!(is_horizontal_whitespace(b'\t'));
        assert!(!is_horizontal_whitespace(b'\n'));
        assert!(!is_horizontal_whitespace(b'\r'));
    }

    #[test]
    fn space_includes_newline() {
        assert!(is_space(b' '));
        assert!(is_space(b'\t'));
        assert!(is_space(b'\n'));
        assert!(!is_space(b'\r'));
        assert!(!is_space(0));
    }

    #[test]
    fn alnum_and_lower() {
        assert!(is_alnum(b'z'));
        assert!(is_alnum(b'Q'));
        assert!(is_alnum(b'5'));
        assert!(!is_alnum(b'.'));
        assert!(is_lower(b'e'));
        assert!(!is_lower(b'E'));
        assert!(!is_lower(b'3'));
    }
}
