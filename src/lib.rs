//! # quill-base
//!
//! Core library for tolerant PHP code completion: cursor context, member
//! suggestions and class-name suggestions.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → Completion (cursor resolution, member and class suggestions)
//!   ↓
//! project  → Workspace file listings, file → class mapping
//! hir      → Semantic model: types, class-likes, reflection
//!   ↓
//! syntax   → Tolerant lexer + declaration extraction
//!   ↓
//! base     → Primitives (TextRange, TextSize, byte scanning)
//! ```
//!
//! Every request is independent: nothing is cached between calls and no
//! state is shared across them.

/// Foundation types: TextRange, TextSize, byte-level scanning
pub mod base;

/// Tolerant PHP syntax: tokens, declarations, nodes at offsets
pub mod syntax;

/// Semantic model: types, class-likes and the reflector
pub mod hir;

/// Workspace collaborators: filesystems and file → class candidates
pub mod project;

/// IDE features: completion
pub mod ide;

// Re-export the entry points
pub use base::{TextRange, TextSize};
pub use ide::{CompletionConfig, CompletionError, Completor, Response, Suggestion, SuggestionKind, SuggestionSet};
