//! Tolerant PHP lexer.
//!
//! Uses the `logos` crate. Lexing never fails: bytes that start no known
//! token come out as [`TokenKind::Error`], unterminated strings and comments
//! run to the end of input. Keywords are not separate token kinds; PHP
//! keywords are case-insensitive names and are recognised by text.

use logos::Logos;

use crate::base::{TextRange, TextSize};

/// A significant token with its byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Slice this token's text out of the source it was lexed from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range]
    }
}

fn line_comment(lex: &mut logos::Lexer<TokenKind>) {
    let rest = lex.remainder();
    let len = rest.find('\n').unwrap_or(rest.len());
    lex.bump(len);
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) {
    let rest = lex.remainder();
    let len = rest.find("*/").map(|idx| idx + 2).unwrap_or(rest.len());
    lex.bump(len);
}

fn quoted(lex: &mut logos::Lexer<TokenKind>, quote: u8) {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == quote => {
                lex.bump(i + 1);
                return;
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
}

fn single_quoted(lex: &mut logos::Lexer<TokenKind>) {
    quoted(lex, b'\'')
}

fn double_quoted(lex: &mut logos::Lexer<TokenKind>) {
    quoted(lex, b'"')
}

/// All token kinds of the PHP subset the completion core understands.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[token("<?php")]
    #[token("<?=")]
    OpenTag,
    #[token("?>")]
    CloseTag,

    #[token("//", line_comment)]
    #[token("#", line_comment)]
    #[token("/*", block_comment)]
    Comment,

    // ========== Names & literals ==========
    #[regex(r"\$[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*")]
    Variable,
    #[regex(r"\\?[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*(\\[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*)*\\?")]
    Name,
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    Integer,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,
    #[token("'", single_quoted)]
    #[token("\"", double_quoted)]
    String,

    // ========== Accessors ==========
    #[token("->")]
    Arrow,
    #[token("?->")]
    NullsafeArrow,
    #[token("::")]
    DoubleColon,
    #[token("=>")]
    FatArrow,
    #[token("...")]
    Ellipsis,

    // ========== Punctuation ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token(".")]
    Dot,
    #[token("$")]
    Dollar,
    #[token("\\")]
    Backslash,

    #[regex(r"===|!==|==|!=|<>|<=>|<=|>=|\?\?=|\?\?|\.=|\+=|-=|\*=|/=|%=|\|\||&&|\+\+|--|\*\*|<<|>>")]
    #[regex(r"[-+*/%<>!@^~]")]
    Operator,

    Error,
}

impl TokenKind {
    /// Comments carry no meaning for completion.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment)
    }

    /// `->` or `?->`.
    pub fn is_member_accessor(self) -> bool {
        matches!(self, TokenKind::Arrow | TokenKind::NullsafeArrow)
    }
}

/// Tokenize `source`, dropping trivia.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (result, span) in TokenKind::lexer(source).spanned() {
        let kind = result.unwrap_or(TokenKind::Error);
        if kind.is_trivia() {
            continue;
        }
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        tokens.push(Token::new(kind, range));
    }
    tokens
}
