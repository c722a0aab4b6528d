//! License expression syntax.
//!
//! `license_expression` values combine lowercase license keys with `AND`,
//! `OR`, `WITH` and parentheses. Validation is purely syntactic: the parser
//! builds an AST and reports what is wrong, it does not consult a registry
//! of known keys.

use anyhow::{bail, ensure, Result};

/// Parsed form of a `license_expression`.
#[derive(Debug, Clone, PartialEq)]
pub enum LicenseExpr {
    Key(String),
    /// `key WITH exception`, e.g. `gpl-2.0 WITH classpath-exception-2.0`.
    With { key: String, exception: String },
    And(Vec<LicenseExpr>),
    Or(Vec<LicenseExpr>),
}

impl LicenseExpr {
    /// Every license and exception key the expression mentions, in source order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            LicenseExpr::Key(key) => out.push(key),
            LicenseExpr::With { key, exception } => {
                out.push(key);
                out.push(exception);
            }
            LicenseExpr::And(parts) | LicenseExpr::Or(parts) => {
                for part in parts {
                    part.collect_keys(out);
                }
            }
        }
    }
}

/// True if `key` is a well-formed license key: lowercase alphanumeric start,
/// then lowercase alphanumerics, `.`, `+` or `-`.
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return false;
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
}

/// Tokens produced by [`tokenize`].
#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    And,
    Or,
    With,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Id(id) => write!(f, "{id}"),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::With => write!(f, "WITH"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// Tokenize a license expression into a flat [`Vec<Token>`].
fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = expr;
    while let Some(c) = rest.chars().next() {
        match c {
            c if c.is_whitespace() => rest = &rest[c.len_utf8()..],
            '(' => {
                tokens.push(Token::LParen);
                rest = &rest[1..];
            }
            ')' => {
                tokens.push(Token::RParen);
                rest = &rest[1..];
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                    .unwrap_or(rest.len());
                let (word, tail) = rest.split_at(end);
                tokens.push(match word {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "WITH" => Token::With,
                    _ => Token::Id(word.to_string()),
                });
                rest = tail;
            }
        }
    }
    tokens
}

/// Recursive descent parser over the token stream.
///
/// Grammar (AND binds tighter than OR):
/// ```text
/// expr     := or_expr
/// or_expr  := and_expr ( "OR" and_expr )*
/// and_expr := atom ( "AND" atom )*
/// atom     := "(" expr ")" | KEY ( "WITH" KEY )?
/// ```
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// Parse an OR-level expression (lowest precedence).
    fn parse_or(&mut self) -> Result<LicenseExpr> {
        let mut parts = vec![self.parse_and()?];
        while matches!(self.peek(), Some(Token::Or)) {
            self.consume();
            parts.push(self.parse_and()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(LicenseExpr::Or(parts))
        }
    }

    /// Parse an AND-level expression (higher precedence than OR).
    fn parse_and(&mut self) -> Result<LicenseExpr> {
        let mut parts = vec![self.parse_atom()?];
        while matches!(self.peek(), Some(Token::And)) {
            self.consume();
            parts.push(self.parse_atom()?);
        }
        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Ok(LicenseExpr::And(parts))
        }
    }

    /// Parse an atom: a parenthesised sub-expression or a key with an
    /// optional WITH exception.
    fn parse_atom(&mut self) -> Result<LicenseExpr> {
        match self.peek() {
            Some(Token::LParen) => {
                self.consume(); // consume '('
                let expr = self.parse_or()?;
                ensure!(
                    matches!(self.peek(), Some(Token::RParen)),
                    "missing closing parenthesis"
                );
                self.consume(); // consume ')'
                Ok(expr)
            }
            Some(Token::Id(_)) => {
                let key = if let Some(Token::Id(s)) = self.consume() {
                    s
                } else {
                    unreachable!()
                };
                if matches!(self.peek(), Some(Token::With)) {
                    self.consume(); // WITH
                    match self.consume() {
                        Some(Token::Id(exception)) => Ok(LicenseExpr::With { key, exception }),
                        _ => bail!("expected an exception key after WITH"),
                    }
                } else {
                    Ok(LicenseExpr::Key(key))
                }
            }
            Some(token) => bail!("unexpected `{token}`"),
            None => bail!("unexpected end of expression"),
        }
    }
}

/// Parse a full license expression string.
pub fn parse(expression: &str) -> Result<LicenseExpr> {
    let trimmed = expression.trim();
    ensure!(!trimmed.is_empty(), "empty license expression");

    let mut parser = ExprParser {
        tokens: tokenize(trimmed),
        pos: 0,
    };
    let expr = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        bail!("unexpected `{token}` after the expression");
    }
    Ok(expr)
}
