//! A parsed source file and the position queries completion needs.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};
use super::decl::{ClassDecl, FunctionDecl, ImportTables, NamespaceScope};
use super::lexer::{tokenize, Token, TokenKind};
use super::node::{NodeKind, SyntaxNode};
use super::parser::{extract, is_kw};

/// Names that never denote a class reference at the cursor.
const RESERVED: &[&str] = &[
    "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
    "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
    "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "enum", "extends",
    "final", "finally", "fn", "for", "foreach", "function", "global", "goto", "if",
    "implements", "include", "include_once", "instanceof", "insteadof", "interface", "isset",
    "list", "match", "namespace", "new", "or", "print", "private", "protected", "public",
    "readonly", "require", "require_once", "return", "static", "switch", "throw", "trait",
    "try", "unset", "use", "var", "while", "xor", "yield",
];

/// Keywords after which a name is being declared, not referenced.
const DECLARING: &[&str] = &["class", "interface", "trait", "enum", "function", "const", "namespace", "as"];

pub fn is_reserved(text: &str) -> bool {
    RESERVED.iter().any(|kw| is_kw(text, kw))
}

/// A tokenized source file with its extracted declarations.
///
/// Parsing is tolerant: any text produces a `SourceFile`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    text: Arc<str>,
    tokens: Vec<Token>,
    scopes: Vec<NamespaceScope>,
    classes: Vec<ClassDecl>,
    functions: Vec<FunctionDecl>,
}

impl SourceFile {
    pub fn parse(text: &str) -> Self {
        let tokens = tokenize(text);
        let extracted = extract(text, &tokens);
        Self {
            text: Arc::from(text),
            tokens,
            scopes: extracted.scopes,
            classes: extracted.classes,
            functions: extracted.functions,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_text(&self, token: &Token) -> &str {
        token.text(&self.text)
    }

    pub fn classes(&self) -> &[ClassDecl] {
        &self.classes
    }

    pub fn functions(&self) -> &[FunctionDecl] {
        &self.functions
    }

    // ========================================================================
    // SCOPES
    // ========================================================================

    fn scope_at(&self, offset: TextSize) -> &NamespaceScope {
        // The global scope starts at 0, so there is always a match.
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.start <= offset)
            .unwrap_or(&self.scopes[0])
    }

    /// The namespace enclosing `offset`, `None` for the global namespace.
    pub fn namespace_at(&self, offset: TextSize) -> Option<&SmolStr> {
        self.scope_at(offset).name.as_ref()
    }

    /// The import tables in scope at `offset`.
    pub fn import_tables_at(&self, offset: TextSize) -> &ImportTables {
        &self.scope_at(offset).imports
    }

    /// Resolve a class name as written at `offset` to its fully-qualified
    /// form (without leading separator).
    pub fn resolve_class_name(&self, name: &str, offset: TextSize) -> SmolStr {
        if let Some(fully_qualified) = name.strip_prefix('\\') {
            return fully_qualified.into();
        }
        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let imports = self.import_tables_at(offset).classes();
        if let Some(entry) = imports.iter().find(|e| e.alias.eq_ignore_ascii_case(first)) {
            return match rest {
                Some(rest) => SmolStr::new(format!("{}\\{}", entry.fully_qualified, rest)),
                None => entry.fully_qualified.clone(),
            };
        }
        match self.namespace_at(offset) {
            Some(namespace) => SmolStr::new(format!("{namespace}\\{name}")),
            None => name.into(),
        }
    }

    /// The innermost class-like whose range contains `offset`.
    pub fn class_at(&self, offset: TextSize) -> Option<&ClassDecl> {
        self.classes
            .iter()
            .filter(|class| class.range.contains_inclusive(offset))
            .min_by_key(|class| class.range.len())
    }

    /// The method or function whose body contains `offset`.
    pub fn function_at(&self, offset: TextSize) -> Option<&FunctionDecl> {
        let in_body = |f: &&FunctionDecl| f.body.is_some_and(|body| body.contains_inclusive(offset));
        self.class_at(offset)
            .and_then(|class| class.methods.iter().find(in_body))
            .or_else(|| self.functions.iter().find(in_body))
    }

    // ========================================================================
    // TOKENS & NODES
    // ========================================================================

    /// Index of the last token ending at or before `offset`.
    pub fn token_index_before(&self, offset: TextSize) -> Option<usize> {
        let idx = self.tokens.partition_point(|t| t.range.end() <= offset);
        idx.checked_sub(1)
    }

    /// Index of the token covering `offset`, else of the token ending there.
    ///
    /// A name or variable ending exactly at `offset` wins over a token
    /// starting there, so `new Us|;` lands on `Us`.
    fn token_index_at(&self, offset: TextSize) -> Option<usize> {
        let idx = self.tokens.partition_point(|t| t.range.end() <= offset);
        let ending = idx.checked_sub(1).filter(|&i| {
            let token = self.tokens[i];
            token.range.end() == offset && matches!(token.kind, TokenKind::Name | TokenKind::Variable)
        });
        if ending.is_some() {
            return ending;
        }
        if let Some(token) = self.tokens.get(idx) {
            if token.range.contains(offset) {
                return Some(idx);
            }
        }
        idx.checked_sub(1).filter(|&i| self.tokens[i].range.end() == offset)
    }

    /// For a closing `)`/`]` at `close`, the index of its opening partner.
    pub fn matching_open(&self, close: usize) -> Option<usize> {
        let (open_kind, close_kind) = match self.tokens.get(close)?.kind {
            TokenKind::RParen => (TokenKind::LParen, TokenKind::RParen),
            TokenKind::RBracket => (TokenKind::LBracket, TokenKind::RBracket),
            _ => return None,
        };
        let mut depth = 0usize;
        for idx in (0..=close).rev() {
            let kind = self.tokens[idx].kind;
            if kind == close_kind {
                depth += 1;
            } else if kind == open_kind {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Whether the token at `idx` is a name spelling `keyword`.
    pub fn is_keyword_at(&self, idx: usize, keyword: &str) -> bool {
        self.tokens
            .get(idx)
            .is_some_and(|t| t.kind == TokenKind::Name && is_kw(self.token_text(t), keyword))
    }

    /// The classified node at `offset`.
    ///
    /// Always returns a node; positions with no token give an empty
    /// `Other` node at the offset.
    pub fn node_at(&self, offset: TextSize) -> SyntaxNode {
        let Some(idx) = self.token_index_at(offset) else {
            return SyntaxNode::new(NodeKind::Other, TextRange::empty(offset), "");
        };
        let token = self.tokens[idx];
        let text = self.token_text(&token);
        let prev = idx.checked_sub(1).map(|i| self.tokens[i].kind);

        let kind = match token.kind {
            kind if kind.is_member_accessor() => NodeKind::MemberAccess,
            TokenKind::DoubleColon => NodeKind::ScopedAccess,
            TokenKind::Name | TokenKind::Variable => match prev {
                Some(kind) if kind.is_member_accessor() => NodeKind::MemberAccess,
                Some(TokenKind::DoubleColon) => NodeKind::ScopedAccess,
                _ if token.kind == TokenKind::Variable || is_reserved(text) => NodeKind::Other,
                _ if DECLARING.iter().any(|kw| idx > 0 && self.is_keyword_at(idx - 1, kw)) => {
                    NodeKind::Other
                }
                _ => NodeKind::QualifiedName,
            },
            _ => NodeKind::Other,
        };
        SyntaxNode::new(kind, token.range, text)
    }
}
