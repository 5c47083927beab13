//! Class name suggestions from the workspace files.
//!
//! Each file contributes at most one suggestion: the best class candidate
//! its path maps to. Files are read lazily as the suggestions are pulled,
//! so dropping the iterator stops the scan.

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};
use crate::project::{ClassCandidate, FileList, FileToClass, Filesystem};
use crate::syntax::{ImportEntry, NodeKind, SourceFile, SyntaxNode};
use super::suggestion::{Suggestion, SuggestionKind};

/// Scans a workspace for class suggestions.
#[derive(Clone, Copy)]
pub struct ClassCandidateScanner<'a> {
    filesystem: &'a dyn Filesystem,
    file_to_class: &'a dyn FileToClass,
    source_extension: &'a str,
}

impl<'a> ClassCandidateScanner<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, file_to_class: &'a dyn FileToClass) -> Self {
        Self { filesystem, file_to_class, source_extension: "php" }
    }

    pub fn with_source_extension(mut self, extension: &'a str) -> Self {
        self.source_extension = extension;
        self
    }

    /// Suggest classes for `node` at `offset`.
    ///
    /// A qualified name under the cursor restricts the scan to files whose
    /// name starts with its text. `imports` is the class import table in
    /// scope; an empty `current_namespace` means the global namespace.
    pub fn scan(
        &self,
        node: &SyntaxNode,
        imports: &[ImportEntry],
        current_namespace: Option<&str>,
        offset: TextSize,
    ) -> ClassSuggestions<'a> {
        let mut files = self.filesystem.file_list().with_extension(self.source_extension);
        let range = match node.kind {
            NodeKind::QualifiedName => {
                let prefix = node.text.clone();
                files = files.filter(move |file| file.filename.starts_with(prefix.as_str()));
                node.range
            }
            NodeKind::MemberAccess | NodeKind::ScopedAccess | NodeKind::Other => TextRange::empty(offset),
        };
        ClassSuggestions {
            files,
            file_to_class: self.file_to_class,
            imports: imports.to_vec(),
            current_namespace: current_namespace.filter(|ns| !ns.is_empty()).map(SmolStr::new),
            range,
        }
    }

    /// Suggest classes at `offset` in `file`, taking the node, namespace
    /// and imports from the file.
    pub fn complete(&self, file: &SourceFile, offset: TextSize) -> ClassSuggestions<'a> {
        let node = file.node_at(offset);
        let imports = file.import_tables_at(offset).get(0).unwrap_or_default();
        let namespace = file.namespace_at(offset).map(SmolStr::as_str);
        tracing::debug!(node = ?node.kind, text = %node.text, namespace = ?namespace, "class completion");
        self.scan(&node, imports, namespace, offset)
    }
}

/// Lazy class suggestions, one per file with a class candidate.
pub struct ClassSuggestions<'a> {
    files: FileList<'a>,
    file_to_class: &'a dyn FileToClass,
    imports: Vec<ImportEntry>,
    current_namespace: Option<SmolStr>,
    range: TextRange,
}

impl ClassSuggestions<'_> {
    /// The name to import for `candidate`, or `None` when it is already
    /// reachable: same namespace as the cursor, or imported by a `use`.
    fn import_for(&self, candidate: &ClassCandidate) -> Option<SmolStr> {
        if candidate.namespace.as_deref().unwrap_or("") == self.current_namespace.as_deref().unwrap_or("") {
            return None;
        }
        let fqn = candidate.fully_qualified_name.as_str();
        if self
            .imports
            .iter()
            .any(|entry| entry.fully_qualified.trim_start_matches('\\') == fqn)
        {
            return None;
        }
        Some(candidate.fully_qualified_name.clone())
    }
}

impl Iterator for ClassSuggestions<'_> {
    type Item = Suggestion;

    fn next(&mut self) -> Option<Suggestion> {
        loop {
            let file = self.files.next()?;
            let candidates = self.file_to_class.candidates_for(&file.path);
            let Some(best) = candidates.best() else {
                tracing::trace!(path = %file.path.display(), "no class candidate");
                continue;
            };
            let suggestion = Suggestion::new(SuggestionKind::Class, best.name(), best.to_string(), self.range)
                .with_import(self.import_for(best));
            return Some(suggestion);
        }
    }
}
