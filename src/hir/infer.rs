//! Type inference for the expression ending at an offset.
//!
//! Works backwards over the token stream from the end of the expression:
//! a variable, a class name, a literal, a property fetch or a call on an
//! inferred receiver. This is a heuristic, not a type checker. Anything it
//! cannot follow yields no types.

use smol_str::SmolStr;

use crate::base::TextSize;
use crate::syntax::{is_reserved, SourceFile, Token, TokenKind};
use super::class_like::ClassLike;
use super::reflect::Reflector;
use super::symbol_context::SymbolContext;
use super::types::{without_null, Type, TypeScope};

/// Receiver chains deeper than this are not followed.
const MAX_DEPTH: usize = 8;

/// Infer the expression whose last token ends at or before `offset`.
pub(crate) fn infer_at<R>(file: &SourceFile, offset: TextSize, reflector: &R) -> SymbolContext
where
    R: Reflector + ?Sized,
{
    let Some(end) = file.token_index_before(offset) else {
        return SymbolContext::unknown("");
    };
    let inference = Inference { file, reflector, scope: TypeScope::at(file, offset) };
    let (name, types) = inference.expr(end, 0);
    tracing::trace!(symbol = %name, types = types.len(), "inferred expression");
    SymbolContext::new(name, without_null(types))
}

struct Inference<'a, R: ?Sized> {
    file: &'a SourceFile,
    reflector: &'a R,
    scope: TypeScope<'a>,
}

impl<R: Reflector + ?Sized> Inference<'_, R> {
    fn token(&self, idx: usize) -> Token {
        self.file.tokens()[idx]
    }

    fn kind(&self, idx: usize) -> TokenKind {
        self.token(idx).kind
    }

    fn text(&self, idx: usize) -> &str {
        self.file.token_text(&self.file.tokens()[idx])
    }

    fn expr(&self, end: usize, depth: usize) -> (SmolStr, Vec<Type>) {
        if depth > MAX_DEPTH || end >= self.file.tokens().len() {
            return (SmolStr::default(), Vec::new());
        }
        let token = self.token(end);
        let text = self.text(end);
        let prev = end.checked_sub(1).map(|idx| self.kind(idx));

        match token.kind {
            TokenKind::Variable => {
                let name = SmolStr::new(&text[1..]);
                let types = match prev {
                    Some(TokenKind::DoubleColon) if end >= 2 => {
                        self.member(end - 2, depth, |class| property_types(class, &name))
                    }
                    _ => self.variable(text, token.range.start(), depth),
                };
                (name, types)
            }
            TokenKind::Name => {
                let name = SmolStr::new(text);
                let types = match prev {
                    Some(kind) if kind.is_member_accessor() && end >= 2 => {
                        self.member(end - 2, depth, |class| property_types(class, &name))
                    }
                    // Class constant fetch; constants carry no type.
                    Some(TokenKind::DoubleColon) => Vec::new(),
                    _ => self.name(text),
                };
                (name, types)
            }
            TokenKind::Integer => (SmolStr::default(), vec![Type::primitive("int")]),
            TokenKind::Float => (SmolStr::default(), vec![Type::primitive("float")]),
            TokenKind::String => (SmolStr::default(), vec![Type::primitive("string")]),
            TokenKind::RParen => self.call(end, depth),
            TokenKind::RBracket => (SmolStr::default(), self.array(end)),
            _ => (SmolStr::default(), Vec::new()),
        }
    }

    /// A bare name: a keyword literal, `self`/`static`/`parent` or a class.
    fn name(&self, text: &str) -> Vec<Type> {
        if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
            return vec![Type::primitive("bool")];
        }
        if text.eq_ignore_ascii_case("null") {
            return vec![Type::primitive("null")];
        }
        let relative = ["self", "static", "parent"].iter().any(|kw| text.eq_ignore_ascii_case(kw));
        if is_reserved(text) && !relative {
            return Vec::new();
        }
        vec![self.scope.lower(text)]
    }

    /// Property types or method return types on the receiver ending at
    /// `receiver_end`.
    fn member<F>(&self, receiver_end: usize, depth: usize, select: F) -> Vec<Type>
    where
        F: Fn(&ClassLike) -> Vec<Type>,
    {
        let (_, receiver) = self.expr(receiver_end, depth + 1);
        receiver
            .iter()
            .filter_map(Type::class_name)
            .filter_map(|name| self.reflector.reflect_class_like(name).ok())
            .flat_map(|class| select(class.as_ref()))
            .collect()
    }

    fn call(&self, close: usize, depth: usize) -> (SmolStr, Vec<Type>) {
        let Some(open) = self.file.matching_open(close) else {
            return (SmolStr::default(), Vec::new());
        };
        let callee = open.checked_sub(1).map(|idx| (idx, self.kind(idx)));
        match callee {
            Some((name_idx, TokenKind::Name)) => {
                let name = SmolStr::new(self.text(name_idx));
                let before = name_idx.checked_sub(1).map(|idx| self.kind(idx));
                let types = match before {
                    Some(kind) if (kind.is_member_accessor() || kind == TokenKind::DoubleColon) && name_idx >= 2 => {
                        self.member(name_idx - 2, depth, |class| return_types(class, &name))
                    }
                    _ if name_idx > 0 && self.file.is_keyword_at(name_idx - 1, "new") => {
                        vec![self.scope.lower(&name)]
                    }
                    _ if name.eq_ignore_ascii_case("array") => vec![Type::primitive("array")],
                    _ => Vec::new(),
                };
                (name, types)
            }
            Some((_, TokenKind::Variable | TokenKind::RParen | TokenKind::RBracket)) => {
                (SmolStr::default(), Vec::new())
            }
            // Parenthesized expression.
            _ if close > open + 1 => self.expr(close - 1, depth + 1),
            _ => (SmolStr::default(), Vec::new()),
        }
    }

    /// `[...]` is an array literal unless it indexes something.
    fn array(&self, close: usize) -> Vec<Type> {
        let Some(open) = self.file.matching_open(close) else {
            return Vec::new();
        };
        let indexes = open.checked_sub(1).is_some_and(|idx| match self.kind(idx) {
            TokenKind::Variable | TokenKind::RParen | TokenKind::RBracket => true,
            TokenKind::Name => !is_reserved(self.text(idx)),
            _ => false,
        });
        if indexes { Vec::new() } else { vec![Type::primitive("array")] }
    }

    fn variable(&self, text: &str, at: TextSize, depth: usize) -> Vec<Type> {
        if text == "$this" {
            return self.scope.self_class().cloned().map(Type::Class).into_iter().collect();
        }
        if let Some(end) = self.last_assignment(text, at) {
            return self.expr(end, depth + 1).1;
        }
        self.parameter(&text[1..], at)
    }

    /// End index of the right-hand side of the latest `$var = ...;` that
    /// completes before `at`, searching the enclosing function body (or the
    /// whole file outside functions).
    fn last_assignment(&self, variable: &str, at: TextSize) -> Option<usize> {
        let tokens = self.file.tokens();
        let lower = self
            .file
            .function_at(at)
            .and_then(|function| function.body)
            .map_or(TextSize::from(0), |body| body.start());

        let mut found = None;
        for (idx, pair) in tokens.windows(2).enumerate() {
            let [var, eq] = pair else { continue };
            if var.range.start() < lower {
                continue;
            }
            if var.range.start() >= at {
                break;
            }
            if var.kind != TokenKind::Variable || eq.kind != TokenKind::Eq || self.text(idx) != variable {
                continue;
            }
            let rhs = idx + 2;
            if let Some(stop) = self.statement_end(rhs) {
                if stop > rhs && tokens[stop].range.end() <= at {
                    found = Some(stop - 1);
                }
            }
        }
        found
    }

    /// Index of the `;` closing the statement that continues at `from`.
    fn statement_end(&self, from: usize) -> Option<usize> {
        let mut nesting = 0usize;
        for idx in from..self.file.tokens().len() {
            match self.kind(idx) {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => nesting += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    nesting = nesting.checked_sub(1)?;
                }
                TokenKind::Semicolon if nesting == 0 => return Some(idx),
                _ => {}
            }
        }
        None
    }

    fn parameter(&self, name: &str, at: TextSize) -> Vec<Type> {
        self.file
            .function_at(at)
            .and_then(|function| function.params.iter().find(|param| param.name == name))
            .map(|param| self.scope.lower_all(&param.types))
            .unwrap_or_default()
    }
}

fn property_types(class: &ClassLike, name: &str) -> Vec<Type> {
    class.property(name.trim_start_matches('$')).map(|p| p.types.clone()).unwrap_or_default()
}

fn return_types(class: &ClassLike, name: &str) -> Vec<Type> {
    class.method(name).map(|m| m.inferred_return_types().collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::SourceReflector;

    fn infer(source: &str) -> SymbolContext {
        let reflector = SourceReflector::new().with_source(source);
        let file = SourceFile::parse(source);
        let offset = TextSize::from(source.rfind("->").unwrap() as u32);
        infer_at(&file, offset, &reflector)
    }

    fn type_names(ctx: &SymbolContext) -> Vec<String> {
        ctx.types().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_this_is_enclosing_class() {
        let ctx = infer("<?php namespace App; class Foo { function f() { $this->");
        assert_eq!(ctx.symbol_name(), "this");
        assert_eq!(type_names(&ctx), vec![r"App\Foo"]);
    }

    #[test]
    fn test_variable_from_new_assignment() {
        let ctx = infer("<?php class Foo {} $f = new Foo(); $f->");
        assert_eq!(ctx.symbol_name(), "f");
        assert_eq!(type_names(&ctx), vec!["Foo"]);
    }

    #[test]
    fn test_latest_assignment_wins() {
        let ctx = infer("<?php $a = new Foo(); $a = 'text'; $a->");
        assert_eq!(type_names(&ctx), vec!["string"]);
    }

    #[test]
    fn test_typed_parameter() {
        let ctx = infer("<?php use Lib\\Bar; function g(?Bar $bar) { $bar->");
        assert_eq!(type_names(&ctx), vec![r"Lib\Bar"]);
    }

    #[test]
    fn test_chained_method_and_property() {
        let source = r"<?php
class Node {
    public ?Node $next;
    public function parent(): ?Node {}
    public function name(): string {}
}
$n = new Node();
$n->parent()->next->";
        let ctx = infer(source);
        assert_eq!(ctx.symbol_name(), "next");
        assert_eq!(type_names(&ctx), vec!["Node"]);
    }

    #[test]
    fn test_static_call_and_literals() {
        let ctx = infer("<?php class A { static function make(): self {} } A::make()->");
        assert_eq!(type_names(&ctx), vec!["A"]);
        assert_eq!(type_names(&infer("<?php (new A())->")), vec!["A"]);
        assert_eq!(type_names(&infer("<?php [1, 2]->")), vec!["array"]);
        assert_eq!(type_names(&infer("<?php 5->")), vec!["int"]);
    }

    #[test]
    fn test_unknown_expression() {
        assert!(infer("<?php foo()->").types().is_empty());
        assert!(infer("<?php $undefined->").types().is_empty());
        assert!(infer("<?php $list[0]->").types().is_empty());
    }
}
