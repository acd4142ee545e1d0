use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::TokenizationError;
use crate::position::Position;

#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    Eof,
    Def,
    Extern,
    Identifier(String),
    Number(f64),
    Char(char),
}

/// Canonical source text of a token; `Eof` renders as nothing.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Eof => Ok(()),
            TokenKind::Def => f.write_str("def"),
            TokenKind::Extern => f.write_str("extern"),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::Number(value) => write!(f, "{}", value),
            TokenKind::Char(ch) => write!(f, "{}", ch),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn is_char(&self, ch: char) -> bool {
        self.kind == TokenKind::Char(ch)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

lazy_static! {
    static ref IDENT_RE: Regex = Regex::new(r"^[A-Za-z_]+").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"^[0-9.]+").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"^#[^\n]*").unwrap();
}

// same set as C's isspace
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

struct Lexer<'a> {
    rest: &'a str,
    position: Position,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn consume(&mut self, len: usize) -> &'a str {
        let (text, rest) = self.rest.split_at(len);
        for ch in text.chars() {
            self.position.step(ch);
        }
        self.rest = rest;
        text
    }

    fn skip_space(&mut self) {
        let len = self.rest.len() - self.rest.trim_start_matches(is_space).len();
        self.consume(len);
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizationError> {
        loop {
            self.skip_space();

            let start = self.position.clone();
            let next = match self.rest.chars().next() {
                Some(ch) => ch,
                None => break,
            };

            if let Some(ident) = IDENT_RE.find(self.rest) {
                let kind = match self.consume(ident.end()) {
                    "def" => TokenKind::Def,
                    "extern" => TokenKind::Extern,
                    name => TokenKind::Identifier(name.to_string()),
                };
                self.tokens.push(Token::new(kind, start));
            } else if let Some(number) = NUMBER_RE.find(self.rest) {
                // "1.2.3" is scanned whole and rejected here, as are runs too long for an f64
                let value = self
                    .consume(number.end())
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| TokenizationError::new(start.clone(), "invalid format of number"))?;
                self.tokens.push(Token::new(TokenKind::Number(value), start));
            } else if let Some(comment) = COMMENT_RE.find(self.rest) {
                self.consume(comment.end());
            } else {
                self.consume(next.len_utf8());
                self.tokens.push(Token::new(TokenKind::Char(next), start));
            }
        }

        self.tokens.push(Token::new(TokenKind::Eof, self.position.clone()));
        Ok(self.tokens)
    }
}

/// Split `source` into tokens. The result always ends with exactly one `Eof`.
///
/// `source_name` only labels the positions of the tokens. Fails on empty
/// input and on numeric literals that are not valid floating point numbers.
#[tracing::instrument(skip_all, fields(source_name = source_name, source_len = source.len()))]
pub fn tokenize(source: &str, source_name: &str) -> Result<Vec<Token>, TokenizationError> {
    if source.is_empty() {
        return Err(TokenizationError::new(
            Position::start(source_name),
            "unexpected end of file",
        ));
    }

    let tokens = Lexer {
        rest: source,
        position: Position::start(source_name),
        tokens: Vec::new(),
    }
    .run()?;
    tracing::trace!(token_count = tokens.len(), "tokenized");
    Ok(tokens)
}

/// Like [`tokenize`], for raw bytes. Invalid UTF-8 sequences become
/// `Char('\u{FFFD}')` tokens instead of failing the whole input.
pub fn tokenize_bytes(source: &[u8], source_name: &str) -> Result<Vec<Token>, TokenizationError> {
    tokenize(&String::from_utf8_lossy(source), source_name)
}

/// Print tokens back as source text, separated by single spaces.
///
/// Tokenizing the result again gives the same token kinds. A sequence holding
/// only `Eof` renders as the empty string, which `tokenize` rejects.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|token| token.kind != TokenKind::Eof)
        .map(|token| token.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
