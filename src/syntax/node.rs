//! The node at a cursor position, classified for completion.

use smol_str::SmolStr;

use crate::base::TextRange;

/// What kind of syntax the cursor sits in.
///
/// Completion only distinguishes these four shapes, so callers can match
/// exhaustively instead of probing node types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// `$receiver->member`
    MemberAccess,
    /// `Receiver::member`
    ScopedAccess,
    /// A (possibly partial, possibly namespaced) class-like name.
    QualifiedName,
    Other,
}

/// A classified node with its byte range and text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub range: TextRange,
    pub text: SmolStr,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, range: TextRange, text: impl Into<SmolStr>) -> Self {
        Self { kind, range, text: text.into() }
    }

    pub fn is_access(&self) -> bool {
        matches!(self.kind, NodeKind::MemberAccess | NodeKind::ScopedAccess)
    }
}
