//! Constant expressions as they appear in parameter and property defaults.

use smol_str::SmolStr;

use super::lexer::{Token, TokenKind};

/// A default value, parsed as far as a constant expression allows.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    /// Float as written; normalised when rendered.
    Float(SmolStr),
    String(SmolStr),
    Array(Vec<(Option<Literal>, Literal)>),
    /// A named constant such as `PHP_EOL` or `self::LIMIT`.
    Constant(SmolStr),
    /// Anything else, kept as raw source text.
    Expression(SmolStr),
}

impl Literal {
    /// Parse a literal from exactly `tokens`; anything that is not a
    /// constant expression falls back to [`Literal::Expression`].
    pub fn parse(tokens: &[Token], source: &str) -> Option<Literal> {
        let first = tokens.first()?;
        let last = tokens.last()?;
        let mut parser = LiteralParser { tokens, source, pos: 0 };
        match parser.literal() {
            Some(lit) if parser.pos == tokens.len() => Some(lit),
            _ => {
                let raw = &source[first.range.cover(last.range)];
                Some(Literal::Expression(SmolStr::new(raw)))
            }
        }
    }

    /// Render the value the way PHP's `var_export` prints it, with line
    /// breaks removed.
    pub fn to_export_string(&self) -> String {
        let mut out = String::new();
        self.export_into(&mut out);
        out.replace(['\n', '\r'], "")
    }

    fn export_into(&self, out: &mut String) {
        match self {
            Literal::Null => out.push_str("NULL"),
            Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Literal::Int(n) => out.push_str(&n.to_string()),
            Literal::Float(text) => out.push_str(&export_float(text)),
            Literal::String(s) => {
                out.push('\'');
                for c in s.chars() {
                    if c == '\'' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('\'');
            }
            Literal::Array(items) => {
                out.push_str("array (\n");
                let mut next_index = 0i64;
                for (key, value) in items {
                    out.push_str("  ");
                    match key {
                        Some(key) => {
                            if let Literal::Int(n) = key {
                                next_index = next_index.max(n.saturating_add(1));
                            }
                            key.export_into(out);
                        }
                        None => {
                            out.push_str(&next_index.to_string());
                            next_index = next_index.saturating_add(1);
                        }
                    }
                    out.push_str(" => ");
                    value.export_into(out);
                    out.push_str(",\n");
                }
                out.push(')');
            }
            Literal::Constant(name) | Literal::Expression(name) => out.push_str(name),
        }
    }
}

struct LiteralParser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn text(&self, token: &Token) -> &'a str {
        token.text(self.source)
    }

    fn literal(&mut self) -> Option<Literal> {
        let token = *self.peek()?;
        match token.kind {
            TokenKind::Integer => {
                self.pos += 1;
                parse_int(self.text(&token)).map(Literal::Int)
            }
            TokenKind::Float => {
                self.pos += 1;
                Some(Literal::Float(SmolStr::new(self.text(&token).replace('_', ""))))
            }
            TokenKind::Operator if self.text(&token) == "-" => {
                self.pos += 1;
                match self.literal()? {
                    Literal::Int(n) => Some(Literal::Int(-n)),
                    Literal::Float(text) => Some(Literal::Float(SmolStr::new(format!("-{text}")))),
                    _ => None,
                }
            }
            TokenKind::String => {
                self.pos += 1;
                Some(Literal::String(unquote(self.text(&token)).into()))
            }
            TokenKind::LBracket => {
                self.pos += 1;
                self.array_items(TokenKind::RBracket)
            }
            TokenKind::Name => {
                let text = self.text(&token);
                self.pos += 1;
                if text.eq_ignore_ascii_case("null") {
                    return Some(Literal::Null);
                }
                if text.eq_ignore_ascii_case("true") {
                    return Some(Literal::Bool(true));
                }
                if text.eq_ignore_ascii_case("false") {
                    return Some(Literal::Bool(false));
                }
                if text.eq_ignore_ascii_case("array") && self.peek_kind() == Some(TokenKind::LParen) {
                    self.pos += 1;
                    return self.array_items(TokenKind::RParen);
                }
                if self.peek_kind() == Some(TokenKind::DoubleColon) {
                    let member = *self.tokens.get(self.pos + 1)?;
                    if member.kind != TokenKind::Name {
                        return None;
                    }
                    self.pos += 2;
                    let name = format!("{}::{}", text, self.text(&member));
                    return Some(Literal::Constant(name.into()));
                }
                Some(Literal::Constant(text.into()))
            }
            _ => None,
        }
    }

    fn array_items(&mut self, close: TokenKind) -> Option<Literal> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind()? {
                kind if kind == close => {
                    self.pos += 1;
                    return Some(Literal::Array(items));
                }
                TokenKind::Comma => self.pos += 1,
                _ => {
                    let first = self.literal()?;
                    if self.peek_kind() == Some(TokenKind::FatArrow) {
                        self.pos += 1;
                        let value = self.literal()?;
                        items.push((Some(first), value));
                    } else {
                        items.push((None, first));
                    }
                }
            }
        }
    }
}

/// Shortest round-trip form with a `.0` on integral values, switching to
/// `1.0E+25` notation outside seventeen significant places.
fn export_float(text: &str) -> String {
    let Ok(value) = text.parse::<f64>() else {
        return text.to_string();
    };
    if value.is_infinite() {
        return if value < 0.0 { "-INF".into() } else { "INF".into() };
    }
    if value.is_nan() {
        return "NAN".into();
    }
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return text.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let decimal_point = exponent + 1;
    if value != 0.0 && !(-3..=17).contains(&decimal_point) {
        let mantissa = if mantissa.contains('.') { mantissa.to_string() } else { format!("{mantissa}.0") };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{}", exponent.abs());
    }
    let plain = value.to_string();
    if plain.contains('.') { plain } else { format!("{plain}.0") }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => digits.parse().ok(),
    }
}

/// Strip quotes and resolve the escapes that matter for display.
fn unquote(text: &str) -> String {
    let Some(quote) = text.chars().next() else {
        return String::new();
    };
    let inner = &text[1..];
    let inner = inner.strip_suffix(quote).unwrap_or(inner);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match (quote, chars.next()) {
            (_, Some('\\')) => out.push('\\'),
            ('\'', Some('\'')) => out.push('\''),
            ('"', Some('"')) => out.push('"'),
            ('"', Some('n')) => out.push('\n'),
            ('"', Some('t')) => out.push('\t'),
            ('"', Some('$')) => out.push('$'),
            (_, Some(other)) => {
                out.push('\\');
                out.push(other);
            }
            (_, None) => out.push('\\'),
        }
    }
    out
}
