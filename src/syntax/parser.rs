//! Declaration extraction over the token stream.
//!
//! This is not a full PHP parser. It walks the tokens once, picks out
//! namespaces, `use` statements, class-likes with their members and free
//! functions, and skips everything else. Broken or unfinished code never
//! aborts extraction: unknown tokens are stepped over and unterminated
//! bodies extend to the end of the file.

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};
use super::decl::*;
use super::lexer::{Token, TokenKind};
use super::literal::Literal;

/// Everything extracted from one file.
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub scopes: Vec<NamespaceScope>,
    pub classes: Vec<ClassDecl>,
    pub functions: Vec<FunctionDecl>,
}

pub(crate) fn extract(source: &str, tokens: &[Token]) -> Extracted {
    let mut parser = Parser { source, tokens, pos: 0 };
    let mut out = Extracted {
        scopes: vec![NamespaceScope {
            name: None,
            start: TextSize::from(0),
            imports: ImportTables::new(),
        }],
        ..Extracted::default()
    };

    while let Some(token) = parser.peek() {
        if token.kind != TokenKind::Name {
            parser.bump();
            continue;
        }
        let prev = parser.prev_kind();
        let text = parser.text(&token);
        if is_kw(text, "namespace") {
            parser.bump();
            if let Some(scope) = parser.namespace(token.range.start()) {
                out.scopes.push(scope);
            }
        } else if is_kw(text, "use") {
            parser.bump();
            if let Some(scope) = out.scopes.last_mut() {
                parser.use_statement(&mut scope.imports);
            }
        } else if is_kw(text, "function") && prev != Some(TokenKind::DoubleColon) {
            parser.bump();
            if let Some(function) = parser.function(Modifiers::default()) {
                out.functions.push(function);
            }
        } else if (is_kw(text, "class") || is_kw(text, "interface"))
            && !matches!(prev, Some(TokenKind::DoubleColon | TokenKind::Arrow))
            && !parser.prev_is_kw("new")
        {
            let kind = if is_kw(text, "class") {
                ClassDeclKind::Class
            } else {
                ClassDeclKind::Interface
            };
            let is_abstract = parser.prev_is_kw("abstract");
            parser.bump();
            if let Some(class) = parser.class(kind, is_abstract, token.range.start()) {
                out.classes.push(class);
            }
        } else {
            parser.bump();
        }
    }

    out
}

pub(crate) fn is_kw(text: &str, keyword: &str) -> bool {
    text.eq_ignore_ascii_case(keyword)
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn prev_kind(&self) -> Option<TokenKind> {
        self.pos.checked_sub(1).map(|i| self.tokens[i].kind)
    }

    fn prev_is_kw(&self, keyword: &str) -> bool {
        self.pos
            .checked_sub(1)
            .map(|i| self.tokens[i])
            .is_some_and(|t| t.kind == TokenKind::Name && is_kw(self.text(&t), keyword))
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    fn at_kw(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Name && is_kw(self.text(&t), keyword))
    }

    fn eat_kw(&mut self, keyword: &str) -> bool {
        if self.at_kw(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        if token.kind != TokenKind::Name {
            return None;
        }
        self.bump();
        Some(self.text(&token))
    }

    fn end_of_file(&self) -> TextSize {
        self.tokens
            .last()
            .map(|t| t.range.end())
            .unwrap_or_else(|| TextSize::of(self.source))
    }

    /// Skip a balanced `{...}` block starting at the current `{`.
    /// Returns the block range (to end of file when unterminated).
    fn skip_block(&mut self) -> TextRange {
        let start = self.peek().map(|t| t.range.start()).unwrap_or_else(|| self.end_of_file());
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            self.bump();
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return TextRange::new(start, token.range.end());
                    }
                }
                _ => {}
            }
        }
        TextRange::new(start, self.end_of_file())
    }

    /// Collect tokens up to (not including) one of `stops` at nesting depth 0.
    fn until_stop(&mut self, stops: &[TokenKind]) -> &'a [Token] {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                kind if depth == 0 && stops.contains(&kind) => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.bump();
        }
        &self.tokens[start..self.pos]
    }

    fn default_value(&mut self, stops: &[TokenKind]) -> Option<Literal> {
        if !self.eat(TokenKind::Eq) {
            return None;
        }
        let tokens = self.until_stop(stops);
        Literal::parse(tokens, self.source)
    }

    // ========================================================================
    // NAMESPACES & IMPORTS
    // ========================================================================

    fn namespace(&mut self, start: TextSize) -> Option<NamespaceScope> {
        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Name => {
                self.bump();
                Some(SmolStr::new(self.text(&t).trim_start_matches('\\')))
            }
            Some(t) if matches!(t.kind, TokenKind::LBrace | TokenKind::Semicolon) => None,
            _ => return None,
        };
        Some(NamespaceScope {
            name: name.filter(|n| !n.is_empty()),
            start,
            imports: ImportTables::new(),
        })
    }

    fn use_statement(&mut self, imports: &mut ImportTables) {
        if self.peek_kind() == Some(TokenKind::LParen) {
            // closure `use (...)`
            return;
        }
        let kind = if self.eat_kw("function") {
            ImportKind::Function
        } else if self.eat_kw("const") {
            ImportKind::Constant
        } else {
            ImportKind::Class
        };

        loop {
            let Some(prefix) = self.name() else { return };
            if self.eat(TokenKind::LBrace) {
                self.use_group(prefix, kind, imports);
            } else {
                let alias = self.eat_kw("as").then(|| self.name()).flatten();
                imports.add(kind, import_entry(prefix, alias));
            }
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
                return;
            }
        }
    }

    fn use_group(&mut self, prefix: &str, kind: ImportKind, imports: &mut ImportTables) {
        let prefix = prefix.trim_end_matches('\\');
        loop {
            match self.peek_kind() {
                Some(TokenKind::RBrace) => {
                    self.bump();
                    return;
                }
                Some(TokenKind::Comma) => self.bump(),
                Some(TokenKind::Name) => {
                    let Some(item) = self.name() else { return };
                    let alias = self.eat_kw("as").then(|| self.name()).flatten();
                    let full = format!("{prefix}\\{item}");
                    imports.add(kind, import_entry(&full, alias));
                }
                _ => return,
            }
        }
    }

    // ========================================================================
    // CLASS-LIKES
    // ========================================================================

    fn class(&mut self, kind: ClassDeclKind, is_abstract: bool, start: TextSize) -> Option<ClassDecl> {
        let name_token = self.peek().filter(|t| t.kind == TokenKind::Name)?;
        self.bump();

        let mut class = ClassDecl {
            kind,
            name: SmolStr::new(self.text(&name_token)),
            name_range: name_token.range,
            range: TextRange::new(start, name_token.range.end()),
            is_abstract,
            parent: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            constants: Vec::new(),
        };

        // Header: extends / implements lists, up to the body.
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::LBrace => break,
                TokenKind::Name if is_kw(self.text(&token), "extends") => {
                    self.bump();
                    while let Some(name) = self.name() {
                        match kind {
                            ClassDeclKind::Class if class.parent.is_none() => {
                                class.parent = Some(name.into())
                            }
                            _ => class.interfaces.push(name.into()),
                        }
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                TokenKind::Name if is_kw(self.text(&token), "implements") => {
                    self.bump();
                    while let Some(name) = self.name() {
                        class.interfaces.push(name.into());
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                TokenKind::Semicolon | TokenKind::RBrace => return Some(class),
                _ => self.bump(),
            }
        }

        if !self.eat(TokenKind::LBrace) {
            class.range = TextRange::new(start, self.end_of_file());
            return Some(class);
        }
        let end = self.class_body(&mut class);
        class.range = TextRange::new(start, end);
        Some(class)
    }

    /// Parse members until the closing brace; returns the end of the body.
    fn class_body(&mut self, class: &mut ClassDecl) -> TextSize {
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::RBrace {
                self.bump();
                return token.range.end();
            }

            let modifiers = self.modifiers();
            if self.eat_kw("const") {
                self.constants(class);
            } else if self.eat_kw("function") {
                if let Some(method) = self.function(modifiers) {
                    promote_params(&method, class);
                    class.methods.push(method);
                }
            } else if self.eat_kw("use") || self.eat_kw("case") {
                self.until_stop(&[TokenKind::Semicolon, TokenKind::LBrace]);
                if self.peek_kind() == Some(TokenKind::LBrace) {
                    self.skip_block();
                } else {
                    self.eat(TokenKind::Semicolon);
                }
            } else if self.at_type_start() || self.peek_kind() == Some(TokenKind::Variable) {
                self.properties(modifiers, class);
            } else if self.peek_kind() == Some(TokenKind::LBrace) {
                self.skip_block();
            } else if modifiers == Modifiers::default() {
                // unknown token inside the body: step over it
                self.bump();
            }
        }
        self.end_of_file()
    }

    fn modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Name {
                break;
            }
            let text = self.text(&token);
            if let Some(vis) = Visibility::from_keyword(text) {
                modifiers.visibility = Some(vis);
            } else if is_kw(text, "static") {
                modifiers.is_static = true;
            } else if is_kw(text, "abstract") {
                modifiers.is_abstract = true;
            } else if !(is_kw(text, "final") || is_kw(text, "readonly") || is_kw(text, "var")) {
                break;
            }
            self.bump();
        }
        modifiers
    }

    fn constants(&mut self, class: &mut ClassDecl) {
        // typed constants: `const int LIMIT = 1;`
        if self.peek_kind() == Some(TokenKind::Name)
            && self.tokens.get(self.pos + 1).is_some_and(|t| t.kind == TokenKind::Name)
        {
            self.bump();
        }
        loop {
            let Some(name) = self.name() else {
                self.until_stop(&[TokenKind::Semicolon]);
                self.eat(TokenKind::Semicolon);
                return;
            };
            class.constants.push(ConstDecl { name: name.into() });
            self.until_stop(&[TokenKind::Comma, TokenKind::Semicolon]);
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
                return;
            }
        }
    }

    fn properties(&mut self, modifiers: Modifiers, class: &mut ClassDecl) {
        let types = self.type_decl();
        loop {
            let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Variable) else {
                // `public Foo` with no variable yet: nothing to record
                if self.peek_kind() != Some(TokenKind::RBrace) {
                    self.until_stop(&[TokenKind::Semicolon]);
                    self.eat(TokenKind::Semicolon);
                }
                return;
            };
            self.bump();
            let default = self.default_value(&[TokenKind::Comma, TokenKind::Semicolon]);
            class.properties.push(PropertyDecl {
                name: SmolStr::new(&self.text(&token)[1..]),
                modifiers,
                types: types.clone(),
                default,
            });
            if !self.eat(TokenKind::Comma) {
                self.eat(TokenKind::Semicolon);
                return;
            }
        }
    }

    // ========================================================================
    // FUNCTIONS
    // ========================================================================

    /// Parse after the `function` keyword.
    fn function(&mut self, modifiers: Modifiers) -> Option<FunctionDecl> {
        self.eat(TokenKind::Amp);
        let name = self.name()?;
        let mut function = FunctionDecl {
            name: name.into(),
            modifiers,
            params: Vec::new(),
            return_types: Vec::new(),
            body: None,
        };
        if self.eat(TokenKind::LParen) {
            function.params = self.params();
        }
        if self.eat(TokenKind::Colon) {
            function.return_types = self.type_decl();
        }
        match self.peek_kind() {
            Some(TokenKind::LBrace) => function.body = Some(self.skip_block()),
            Some(TokenKind::Semicolon) => self.bump(),
            _ => {}
        }
        Some(function)
    }

    fn params(&mut self) -> Vec<ParamDecl> {
        let mut params = Vec::new();
        loop {
            match self.peek_kind() {
                None => return params,
                Some(TokenKind::RParen) => {
                    self.bump();
                    return params;
                }
                Some(TokenKind::Comma) => self.bump(),
                Some(_) => {
                    let modifiers = self.modifiers();
                    let types = self.type_decl();
                    self.eat(TokenKind::Amp);
                    self.eat(TokenKind::Ellipsis);
                    let Some(token) = self.peek().filter(|t| t.kind == TokenKind::Variable) else {
                        let skipped = self.until_stop(&[TokenKind::Comma, TokenKind::RParen]);
                        if skipped.is_empty() && modifiers == Modifiers::default() && types.is_empty() {
                            // unbalanced parameter list
                            return params;
                        }
                        continue;
                    };
                    self.bump();
                    let default = self.default_value(&[TokenKind::Comma, TokenKind::RParen]);
                    params.push(ParamDecl {
                        name: SmolStr::new(&self.text(&token)[1..]),
                        types,
                        default,
                        promoted: modifiers.visibility,
                    });
                }
            }
        }
    }

    fn at_type_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(TokenKind::Name | TokenKind::Question | TokenKind::LParen)
        )
    }

    /// Parse a declared type: `Foo`, `?Foo`, `A|B`, `A&B`, `(A&B)|null`.
    fn type_decl(&mut self) -> Vec<SmolStr> {
        let mut types = Vec::new();
        let mut nullable = false;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Question => nullable = true,
                TokenKind::Name => {
                    let text = self.text(&token);
                    if !types.iter().any(|t: &SmolStr| t == text) {
                        types.push(SmolStr::new(text));
                    }
                }
                TokenKind::Pipe | TokenKind::LParen | TokenKind::RParen => {}
                TokenKind::Amp => {
                    // by-reference marker unless another type follows
                    let next = self.tokens.get(self.pos + 1).map(|t| t.kind);
                    if !matches!(next, Some(TokenKind::Name | TokenKind::LParen)) {
                        break;
                    }
                }
                _ => break,
            }
            self.bump();
        }
        if nullable && !types.iter().any(|t| is_kw(t, "null")) {
            types.push(SmolStr::new_static("null"));
        }
        types
    }
}

fn import_entry(name: &str, alias: Option<&str>) -> ImportEntry {
    let fully_qualified = name.trim_start_matches('\\');
    let alias = alias.unwrap_or_else(|| {
        fully_qualified.rsplit('\\').next().unwrap_or(fully_qualified)
    });
    ImportEntry {
        alias: alias.into(),
        fully_qualified: fully_qualified.into(),
    }
}

/// Constructor property promotion: `__construct(private Foo $foo)`.
fn promote_params(method: &FunctionDecl, class: &mut ClassDecl) {
    if !is_kw(&method.name, "__construct") {
        return;
    }
    for param in &method.params {
        if let Some(visibility) = param.promoted {
            class.properties.push(PropertyDecl {
                name: param.name.clone(),
                modifiers: Modifiers {
                    visibility: Some(visibility),
                    ..Modifiers::default()
                },
                types: param.types.clone(),
                default: None,
            });
        }
    }
}
