use std::collections::HashMap;

use crate::ast::{Expression, Function, Prototype};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::position::Position;

/// Deepest expression nesting (parentheses, call arguments) accepted before
/// parsing fails instead of exhausting the stack.
pub const MAX_NESTING: usize = 256;

pub type PartialParseResult = Result<Expression, ParseError>;

/// Read position into a token sequence.
///
/// Every parse function takes the cursor by `&mut` and moves it past the
/// tokens it used. The cursor never moves past the final `Eof`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    index: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    /// # Panics
    ///
    /// Panics if `tokens` does not end with an `Eof` token, which every
    /// sequence returned by [`tokenize`](crate::lexer::tokenize) does.
    pub fn new(tokens: &'a [Token]) -> Self {
        assert!(
            matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })),
            "token sequence must end with Eof"
        );
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
    }

    pub fn current(&self) -> &'a Token {
        &self.tokens[self.index]
    }

    /// Move to the next token, returning the one moved past.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                self.current().position.clone(),
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Result of parsing one top-level construct.
#[derive(Debug, PartialEq, Clone)]
pub enum TopLevelItem {
    Definition(Function),
    ExternDeclaration(Prototype),
    /// A bare expression, wrapped in an anonymous zero-argument function.
    TopLevelExpression(Function),
    /// An empty statement, `;`.
    Skip,
    EndOfInput,
}

#[derive(Debug, Clone)]
pub struct Parser {
    operator_precedence: HashMap<char, i32>,
}

impl std::default::Default for Parser {
    fn default() -> Self {
        let mut operator_precedence = HashMap::new();
        operator_precedence.insert('<', 10);
        operator_precedence.insert('+', 20);
        operator_precedence.insert('-', 20);
        operator_precedence.insert('*', 40);
        Self {
            operator_precedence,
        }
    }
}

impl Parser {
    /// Binding strength of `token` as a binary operator, or `-1` if it is not one.
    pub fn precedence(&self, token: &Token) -> i32 {
        match token.kind {
            TokenKind::Char(ch) => self.operator_precedence.get(&ch).copied().unwrap_or(-1),
            _ => -1,
        }
    }

    fn parse_call_args(&self, cursor: &mut Cursor) -> Result<Vec<Expression>, ParseError> {
        let mut args = Vec::new();
        if cursor.current().is_char(')') {
            cursor.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression(cursor)?);

            let token = cursor.current();
            if token.is_char(')') {
                cursor.advance();
                return Ok(args);
            }
            if !token.is_char(',') {
                return Err(ParseError::new(
                    token.position.clone(),
                    "expected ')' or ',' in argument list",
                ));
            }
            cursor.advance();
        }
    }

    /// `name` has already been consumed; decides between a call and a variable.
    fn parse_identifier(
        &self,
        cursor: &mut Cursor,
        position: &Position,
        name: &str,
    ) -> PartialParseResult {
        let position = position.clone();
        let name = name.to_string();

        if cursor.current().is_char('(') {
            cursor.advance();
            let args = self.parse_call_args(cursor)?;
            Ok(Expression::Call {
                position,
                callee: name,
                args,
            })
        } else {
            Ok(Expression::Variable { position, name })
        }
    }

    fn parse_nested(&self, cursor: &mut Cursor) -> PartialParseResult {
        cursor.advance();
        let res = self.parse_expression(cursor)?;

        let token = cursor.current();
        if !token.is_char(')') {
            return Err(ParseError::new(token.position.clone(), "expected ')'"));
        }
        cursor.advance();
        Ok(res)
    }

    fn parse_primary(&self, cursor: &mut Cursor) -> PartialParseResult {
        let token = cursor.current();
        match &token.kind {
            TokenKind::Number(value) => {
                cursor.advance();
                Ok(Expression::Number {
                    position: token.position.clone(),
                    value: *value,
                })
            }
            TokenKind::Identifier(name) => {
                cursor.advance();
                self.parse_identifier(cursor, &token.position, name)
            }
            TokenKind::Char('(') => self.parse_nested(cursor),
            _ => Err(ParseError::new(
                token.position.clone(),
                "unknown token when expecting an expression",
            )),
        }
    }

    /// Precedence climbing: fold `lhs` with every following operator that
    /// binds at least as tightly as `expr_precedence`.
    fn parse_rhs(
        &self,
        cursor: &mut Cursor,
        expr_precedence: i32,
        mut lhs: Expression,
    ) -> PartialParseResult {
        loop {
            let token = cursor.current();
            let precedence = self.precedence(token);
            if precedence < 0 || precedence < expr_precedence {
                return Ok(lhs);
            }
            let op = match token.kind {
                TokenKind::Char(op) => op,
                _ => return Ok(lhs),
            };
            let position = token.position.clone();
            cursor.advance();

            let mut rhs = self.parse_primary(cursor)?;

            if precedence < self.precedence(cursor.current()) {
                rhs = self.parse_rhs(cursor, precedence + 1, rhs)?;
            }

            lhs = Expression::Binary {
                position,
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    pub fn parse_expression(&self, cursor: &mut Cursor) -> PartialParseResult {
        cursor.enter()?;
        let res = self
            .parse_primary(cursor)
            .and_then(|lhs| self.parse_rhs(cursor, 0, lhs));
        cursor.leave();
        res
    }

    pub fn parse_prototype(&self, cursor: &mut Cursor) -> Result<Prototype, ParseError> {
        let token = cursor.current();
        let name = match &token.kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => {
                return Err(ParseError::new(
                    token.position.clone(),
                    "expected function name in prototype",
                ))
            }
        };
        let position = token.position.clone();
        cursor.advance();

        let token = cursor.current();
        if !token.is_char('(') {
            return Err(ParseError::new(
                token.position.clone(),
                "expected '(' in prototype",
            ));
        }
        cursor.advance();

        let mut args = Vec::new();
        if cursor.current().is_char(')') {
            cursor.advance();
            return Ok(Prototype {
                position,
                name,
                args,
            });
        }

        loop {
            let token = cursor.current();
            match &token.kind {
                TokenKind::Identifier(arg) => args.push(arg.clone()),
                _ => {
                    return Err(ParseError::new(
                        token.position.clone(),
                        "expected parameter name in prototype",
                    ))
                }
            }
            cursor.advance();

            let token = cursor.current();
            if token.is_char(')') {
                cursor.advance();
                return Ok(Prototype {
                    position,
                    name,
                    args,
                });
            }
            if !token.is_char(',') {
                return Err(ParseError::new(
                    token.position.clone(),
                    "expected ')' or ',' in prototype",
                ));
            }
            cursor.advance();
        }
    }

    /// `def` prototype expression
    pub fn parse_definition(&self, cursor: &mut Cursor) -> Result<Function, ParseError> {
        self.expect_keyword(cursor, TokenKind::Def, "expected 'def'")?;
        let prototype = self.parse_prototype(cursor)?;
        let body = self.parse_expression(cursor)?;
        Ok(Function { prototype, body })
    }

    /// `extern` prototype
    pub fn parse_extern(&self, cursor: &mut Cursor) -> Result<Prototype, ParseError> {
        self.expect_keyword(cursor, TokenKind::Extern, "expected 'extern'")?;
        self.parse_prototype(cursor)
    }

    pub fn parse_top_level_expression(&self, cursor: &mut Cursor) -> Result<Function, ParseError> {
        let position = cursor.current().position.clone();
        let body = self.parse_expression(cursor)?;
        Ok(Function {
            prototype: Prototype::anonymous(position),
            body,
        })
    }

    pub fn parse_top_level_item(&self, cursor: &mut Cursor) -> Result<TopLevelItem, ParseError> {
        match cursor.current().kind {
            TokenKind::Eof => Ok(TopLevelItem::EndOfInput),
            TokenKind::Def => self.parse_definition(cursor).map(TopLevelItem::Definition),
            TokenKind::Extern => self
                .parse_extern(cursor)
                .map(TopLevelItem::ExternDeclaration),
            TokenKind::Char(';') => {
                cursor.advance();
                Ok(TopLevelItem::Skip)
            }
            _ => self
                .parse_top_level_expression(cursor)
                .map(TopLevelItem::TopLevelExpression),
        }
    }

    fn expect_keyword(
        &self,
        cursor: &mut Cursor,
        keyword: TokenKind,
        message: &str,
    ) -> Result<(), ParseError> {
        let token = cursor.current();
        if token.kind != keyword {
            return Err(ParseError::new(token.position.clone(), message));
        }
        cursor.advance();
        Ok(())
    }
}
