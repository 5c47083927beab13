//! Source text positions and ranges.

// Re-export from text-size for compatibility
pub use text_size::TextRange;
pub use text_size::TextSize;

/// Clamp a byte offset into `0..=text.len()`.
///
/// Requests coming from an editor may carry an offset computed against a
/// stale buffer; anything past the end is treated as end of input.
#[inline]
pub fn clamp_offset(text: &str, offset: TextSize) -> TextSize {
    let len = TextSize::of(text);
    if offset > len { len } else { offset }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_offset_within_bounds() {
        assert_eq!(clamp_offset("hello", TextSize::from(3)), TextSize::from(3));
        assert_eq!(clamp_offset("hello", TextSize::from(5)), TextSize::from(5));
    }

    #[test]
    fn test_clamp_offset_past_end() {
        assert_eq!(clamp_offset("hello", TextSize::from(42)), TextSize::from(5));
        assert_eq!(clamp_offset("", TextSize::from(1)), TextSize::from(0));
    }
}
