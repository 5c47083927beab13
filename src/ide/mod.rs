//! IDE features: code completion.
//!
//! This module is the interface between the semantic model (HIR) and an
//! editor host. It never talks a wire protocol; hosts convert
//! [`Suggestion`]s at their own boundary (or use [`SuggestionSet::to_value`]).
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: source text and an offset in, suggestions out
//! 2. **Tolerant**: unfinished code still completes; problems become issues
//! 3. **Lazy**: workspace scans run only as far as suggestions are pulled
//!
//! ## Usage
//!
//! ```ignore
//! use quill::ide::{CompletionConfig, Completor};
//! use quill::hir::SourceReflector;
//! use quill::project::{Psr4FileToClass, WalkdirFilesystem};
//!
//! let completor = Completor::new(
//!     SourceReflector::new().with_source(source),
//!     WalkdirFilesystem::new("src"),
//!     Psr4FileToClass::new().with_mapping("App", "src"),
//!     CompletionConfig::default(),
//! );
//! let response = completor.complete(source, offset)?;
//! ```

mod class_completion;
mod completion;
mod config;
mod cursor;
mod member_completion;
mod suggestion;

pub use class_completion::{ClassCandidateScanner, ClassSuggestions};
pub use completion::{Completor, Response};
pub use config::CompletionConfig;
pub use cursor::{could_complete, resolve_offset, CompletionError, ResolvedOffset};
pub use member_completion::MemberSuggestionBuilder;
pub use suggestion::{Suggestion, SuggestionKind, SuggestionSet};
