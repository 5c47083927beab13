//! Foundation types for the quill completion core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Byte positions in source text
//! - [`flatten_line_breaks`] and friends - Byte-level text scanning helpers
//!
//! This module has NO dependencies on other quill modules.

mod span;
mod text;

pub use span::{clamp_offset, TextRange, TextSize};
pub use text::{flatten_line_breaks, skip_back_while, PHP_ACCESSORS};

// Re-export text-size types for convenience
pub use text_size;
