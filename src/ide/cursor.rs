//! Cursor context resolution for member completion.
//!
//! [`resolve_offset`] is a text scan, not a parse: it finds the `->` or
//! `::` before the cursor, the end of the expression in front of it, and
//! the identifier fragment typed after it. It does not know about strings
//! or comments, so an accessor-like byte pair inside either one is taken
//! at face value.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{clamp_offset, flatten_line_breaks, skip_back_while, TextSize, PHP_ACCESSORS};
use crate::syntax::SourceFile;

/// Hard failures of a completion request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("no accessor found before offset {offset:?}")]
    NoAccessorFound { offset: TextSize },
}

/// Where to reflect for a member completion, and what was typed so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOffset {
    /// End of the receiver expression (exclusive). Never past the request
    /// offset.
    pub corrected_offset: TextSize,
    /// Text between the accessor and the cursor; empty right after it.
    pub partial_text: SmolStr,
}

fn is_space(byte: u8) -> bool {
    byte == b' '
}

fn is_accessor_at(bytes: &[u8], pos: usize) -> bool {
    bytes
        .get(pos..pos + 2)
        .is_some_and(|pair| PHP_ACCESSORS.iter().any(|accessor| pair == &accessor[..]))
}

/// Locate the accessor before `offset` and split the text around it.
pub fn resolve_offset(source: &str, offset: TextSize) -> Result<ResolvedOffset, CompletionError> {
    let offset = clamp_offset(source, offset);
    let end = usize::from(offset);
    let flat = flatten_line_breaks(source);
    let until_cursor = &flat[..end];

    let start = skip_back_while(until_cursor, end, is_space);
    // Position 0 is never tested.
    let anchor = (1..start)
        .rev()
        .find(|&pos| is_accessor_at(until_cursor, pos))
        .ok_or(CompletionError::NoAccessorFound { offset })?;

    let scope_end = skip_back_while(until_cursor, anchor, is_space);
    let accessor_offset = (anchor - scope_end) + 2;
    let partial = &until_cursor[scope_end + accessor_offset..];

    Ok(ResolvedOffset {
        corrected_offset: TextSize::from(scope_end as u32),
        partial_text: SmolStr::new(String::from_utf8_lossy(partial)),
    })
}

/// Whether the cursor sits in a member or scoped access.
///
/// Looks at the node just before the cursor, ignoring spaces and line
/// breaks in between.
pub fn could_complete(source: &str, offset: TextSize) -> bool {
    let end = usize::from(clamp_offset(source, offset));
    if end == 0 {
        return false;
    }
    let bytes = source.as_bytes();
    let mut pos = end - 1;
    while pos > 0 && matches!(bytes[pos], b' ' | b'\n' | b'\r') {
        pos -= 1;
    }
    SourceFile::parse(source)
        .node_at(TextSize::from(pos as u32))
        .is_access()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str) -> Result<(u32, String), CompletionError> {
        resolve_offset(source, TextSize::of(source))
            .map(|resolved| (resolved.corrected_offset.into(), resolved.partial_text.to_string()))
    }

    #[test]
    fn test_cursor_right_after_accessor() {
        assert_eq!(resolve("<?php $foo->"), Ok((10, String::new())));
        assert_eq!(resolve("<?php Foo::"), Ok((9, String::new())));
    }

    #[test]
    fn test_partial_identifier() {
        assert_eq!(resolve("<?php $foo->ba"), Ok((10, "ba".to_string())));
    }

    #[test]
    fn test_spaces_around_accessor() {
        assert_eq!(resolve("<?php $foo  ->  "), Ok((10, "  ".to_string())));
    }

    #[test]
    fn test_line_breaks_count_as_spaces() {
        assert_eq!(resolve("<?php $foo\r\n->bar"), Ok((10, "bar".to_string())));
    }

    #[test]
    fn test_rightmost_accessor_wins() {
        assert_eq!(resolve("<?php $a->b()->c"), Ok((13, "c".to_string())));
    }

    #[test]
    fn test_no_accessor() {
        let err = resolve("<?php $foo").unwrap_err();
        assert_eq!(err, CompletionError::NoAccessorFound { offset: TextSize::from(10) });
    }

    #[test]
    fn test_accessor_at_position_zero_is_not_found() {
        assert!(resolve("->").is_err());
        assert!(resolve("").is_err());
    }

    #[test]
    fn test_corrected_offset_never_exceeds_offset() {
        let source = "<?php $a->b; $c::d";
        for offset in 0..=source.len() as u32 {
            if let Ok(resolved) = resolve_offset(source, TextSize::from(offset)) {
                assert!(resolved.corrected_offset <= TextSize::from(offset));
            }
        }
    }

    #[test]
    fn test_could_complete() {
        let source = "<?php $foo->";
        assert!(could_complete(source, TextSize::of(source)));
        assert!(could_complete("<?php Foo::  \n", TextSize::from(14)));
        assert!(could_complete("<?php $foo->ba", TextSize::from(14)));
        assert!(!could_complete("<?php $foo", TextSize::from(10)));
        assert!(!could_complete("<?php new Us", TextSize::from(12)));
        assert!(!could_complete("$a->b", TextSize::from(0)));
    }
}
