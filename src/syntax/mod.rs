//! Tolerant syntax layer for PHP source.
//!
//! Completion requests arrive while the user is typing, so nothing here is
//! allowed to fail: every input produces a [`SourceFile`], and unknown or
//! unfinished constructs are skipped.

mod decl;
mod lexer;
mod literal;
mod node;
mod parser;
mod source_file;

pub use decl::{
    ClassDecl, ClassDeclKind, ConstDecl, FunctionDecl, ImportEntry, ImportKind, ImportTables,
    Modifiers, NamespaceScope, ParamDecl, PropertyDecl, Visibility,
};
pub use lexer::{tokenize, Token, TokenKind};
pub use literal::Literal;
pub use node::{NodeKind, SyntaxNode};
pub use source_file::{is_reserved, SourceFile};
