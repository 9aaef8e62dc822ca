//! Byte classification for the Flow surface syntax.

/// Whitespace skipped between tokens: space, tab, CR, LF.
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// String delimiters. All three quote styles behave identically.
#[inline]
pub fn is_quote(b: u8) -> bool {
    matches!(b, b'\'' | b'"' | b'`')
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// Characters allowed in a bare word.
///
/// `@` is a word character so that the call-contract names (`@args`, `@ret`,
/// `@0`, ...) scan as ordinary symbols.
#[inline]
pub fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'@'
}

/// Returns the closing bracket for an opening bracket, if `b` is one.
#[inline]
pub fn closing_bracket(b: u8) -> Option<u8> {
    match b {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        _ => None,
    }
}
