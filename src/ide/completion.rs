//! Completion entry point.
//!
//! [`Completor::complete`] decides which context the cursor is in and routes
//! the request: member access goes through reflection and the member
//! builder, class positions through the workspace scan.

use std::fmt;

use crate::base::{clamp_offset, TextSize};
use crate::hir::Reflector;
use crate::project::{FileToClass, Filesystem};
use crate::syntax::{NodeKind, SourceFile};
use super::class_completion::ClassCandidateScanner;
use super::config::CompletionConfig;
use super::cursor::{could_complete, resolve_offset, CompletionError};
use super::member_completion::MemberSuggestionBuilder;
use super::suggestion::{Suggestion, SuggestionSet};

/// Keywords after which a class name is expected.
const CLASS_KEYWORDS: [&str; 4] = ["new", "extends", "implements", "instanceof"];

/// Suggestions for one request, plus the issues met producing them.
///
/// Suggestions are pulled lazily; dropping the response stops any
/// remaining workspace scan.
pub struct Response<'a> {
    suggestions: Box<dyn Iterator<Item = Suggestion> + 'a>,
    issues: Vec<String>,
}

impl<'a> Response<'a> {
    pub fn new(suggestions: impl Iterator<Item = Suggestion> + 'a, issues: Vec<String>) -> Self {
        Self { suggestions: Box::new(suggestions), issues }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty(), Vec::new())
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Collect the remaining suggestions.
    pub fn into_suggestion_set(self) -> SuggestionSet {
        self.suggestions.collect()
    }
}

impl<'a> IntoIterator for Response<'a> {
    type Item = Suggestion;
    type IntoIter = Box<dyn Iterator<Item = Suggestion> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.suggestions
    }
}

impl fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response").field("issues", &self.issues).finish_non_exhaustive()
    }
}

/// Completion over a reflector and a workspace.
///
/// Holds no per-request state; every call to [`Completor::complete`] starts
/// from the source text alone.
pub struct Completor<R, F, C> {
    reflector: R,
    filesystem: F,
    file_to_class: C,
    config: CompletionConfig,
}

impl<R, F, C> Completor<R, F, C>
where
    R: Reflector,
    F: Filesystem,
    C: FileToClass,
{
    pub fn new(reflector: R, filesystem: F, file_to_class: C, config: CompletionConfig) -> Self {
        Self { reflector, filesystem, file_to_class, config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Whether `offset` is in a member or scoped access.
    pub fn could_complete(&self, source: &str, offset: TextSize) -> bool {
        could_complete(source, offset)
    }

    /// Complete at `offset`.
    ///
    /// Positions that are neither member access nor a class position give
    /// an empty response.
    pub fn complete(&self, source: &str, offset: TextSize) -> Result<Response<'_>, CompletionError> {
        let offset = clamp_offset(source, offset);
        tracing::debug!(offset = u32::from(offset), len = source.len(), "completion request");

        if could_complete(source, offset) {
            return self.complete_members(source, offset);
        }

        let file = SourceFile::parse(source);
        if !is_class_position(&file, offset) {
            tracing::debug!("no completion context");
            return Ok(Response::empty());
        }

        let suggestions = ClassCandidateScanner::new(&self.filesystem, &self.file_to_class)
            .with_source_extension(&self.config.source_extension)
            .complete(&file, offset);
        Ok(match self.config.class_limit {
            Some(limit) => Response::new(suggestions.take(limit), Vec::new()),
            None => Response::new(suggestions, Vec::new()),
        })
    }

    fn complete_members(&self, source: &str, offset: TextSize) -> Result<Response<'_>, CompletionError> {
        let resolved = resolve_offset(source, offset)?;
        tracing::debug!(
            corrected = u32::from(resolved.corrected_offset),
            partial = %resolved.partial_text,
            "member completion"
        );

        let context = self.reflector.reflect_offset(source, resolved.corrected_offset);
        let types = context.types().clone();
        let (mut suggestions, context) = MemberSuggestionBuilder::new(&self.reflector, offset).build(context, types);

        let partial = resolved.partial_text.trim();
        if !partial.is_empty() {
            suggestions.retain(|suggestion| suggestion.name().starts_with(partial));
        }
        let issues = context.into_issues();
        for issue in &issues {
            tracing::debug!(%issue, "completion issue");
        }
        Ok(Response::new(suggestions.into_iter(), issues))
    }
}

/// A qualified name under the cursor, or a keyword that expects one just
/// before it.
fn is_class_position(file: &SourceFile, offset: TextSize) -> bool {
    if file.node_at(offset).kind == NodeKind::QualifiedName {
        return true;
    }
    file.token_index_before(offset)
        .is_some_and(|idx| CLASS_KEYWORDS.iter().any(|kw| file.is_keyword_at(idx, kw)))
}

impl<R, F, C> fmt::Debug for Completor<R, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completor").field("config", &self.config).finish_non_exhaustive()
    }
}
