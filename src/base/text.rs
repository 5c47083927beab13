//! Byte-level scanning helpers.
//!
//! Completion runs on text that is usually mid-edit and may not parse, so
//! several operations work directly on bytes rather than on a syntax tree.

use std::borrow::Cow;

/// The two-byte accessor tokens: instance member access and scoped access.
pub const PHP_ACCESSORS: [&[u8; 2]; 2] = [b"->", b"::"];

/// Replace every line-break byte (`\n`, `\r`) with a single space.
///
/// Each byte is replaced one for one, so offsets into the result line up
/// with offsets into the input.
pub fn flatten_line_breaks(text: &str) -> Cow<'_, [u8]> {
    let bytes = text.as_bytes();
    if !bytes.iter().any(|&b| b == b'\n' || b == b'\r') {
        return Cow::Borrowed(bytes);
    }
    Cow::Owned(
        bytes
            .iter()
            .map(|&b| if b == b'\n' || b == b'\r' { b' ' } else { b })
            .collect(),
    )
}

/// Move `pos` backward while the byte just before it satisfies `pred`.
///
/// Returns the first position (exclusive end) whose preceding byte fails
/// the predicate, or 0.
pub fn skip_back_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    pos = pos.min(bytes.len());
    while pos > 0 && pred(bytes[pos - 1]) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_preserves_length() {
        let text = "a\nb\r\nc";
        let flat = flatten_line_breaks(text);
        assert_eq!(flat.len(), text.len());
        assert_eq!(&*flat, b"a b  c");
    }

    #[test]
    fn test_flatten_borrows_when_single_line() {
        assert!(matches!(flatten_line_breaks("abc"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_skip_back_while_spaces() {
        let bytes = b"$a   ";
        assert_eq!(skip_back_while(bytes, 5, |b| b == b' '), 2);
        assert_eq!(skip_back_while(bytes, 2, |b| b == b' '), 2);
        assert_eq!(skip_back_while(b"   ", 3, |b| b == b' '), 0);
    }
}
