//! The top-level loop: parse statements one at a time, hand each completed
//! construct to a [`Sink`], and resynchronise on `;` after a parse error.

use crate::ast::ASTNode;
use crate::error::{ParseError, TokenizationError};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::parser::{Cursor, Parser, TopLevelItem};

/// Consumer of the driver loop's output, e.g. a printer or a code generator.
pub trait Sink {
    fn handle_node(&mut self, node: ASTNode);

    fn handle_error(&mut self, error: ParseError);
}

/// Sink that keeps everything it is given, in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Collector {
    pub nodes: Vec<ASTNode>,
    pub errors: Vec<ParseError>,
}

impl Sink for Collector {
    fn handle_node(&mut self, node: ASTNode) {
        self.nodes.push(node);
    }

    fn handle_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }
}

/// Skip tokens up to and including the next `;`, stopping early at `Eof`.
/// Returns how many tokens were discarded.
fn recover(cursor: &mut Cursor) -> usize {
    let mut skipped = 0;
    loop {
        match cursor.current().kind {
            TokenKind::Eof => return skipped,
            TokenKind::Char(';') => {
                cursor.advance();
                return skipped + 1;
            }
            _ => {
                cursor.advance();
                skipped += 1;
            }
        }
    }
}

/// Parse every top-level construct in `tokens`, forwarding results to `sink`.
///
/// A parse error only abandons the statement it occurred in. Returns the
/// number of errors reported.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn run<S: Sink>(parser: &Parser, tokens: &[Token], sink: &mut S) -> usize {
    let mut cursor = Cursor::new(tokens);
    let mut errors = 0;

    loop {
        match parser.parse_top_level_item(&mut cursor) {
            Ok(TopLevelItem::EndOfInput) => break,
            Ok(TopLevelItem::Skip) => {}
            Ok(TopLevelItem::Definition(func)) => {
                tracing::debug!(name = %func.prototype.name, position = %func.position(), "parsed definition");
                sink.handle_node(ASTNode::Function(func));
            }
            Ok(TopLevelItem::ExternDeclaration(proto)) => {
                tracing::debug!(name = %proto.name, position = %proto.position, "parsed extern");
                sink.handle_node(ASTNode::Extern(proto));
            }
            Ok(TopLevelItem::TopLevelExpression(func)) => {
                tracing::debug!(position = %func.position(), "parsed top-level expression");
                sink.handle_node(ASTNode::Function(func));
            }
            Err(err) => {
                let skipped = recover(&mut cursor);
                tracing::warn!(
                    position = %err.position,
                    skipped,
                    "{}, skipping to next statement",
                    err.message
                );
                errors += 1;
                sink.handle_error(err);
            }
        }
    }

    errors
}

impl Parser {
    /// Tokenize `source` and run the driver loop over it, collecting every
    /// node and parse error. Only a tokenization failure is returned as `Err`.
    pub fn parse_str(&self, source: &str, source_name: &str) -> Result<Collector, TokenizationError> {
        let tokens = tokenize(source, source_name)?;
        let mut collector = Collector::default();
        run(self, &tokens, &mut collector);
        Ok(collector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn drive(input: &str) -> Collector {
        let tokens = tokenize(input, "test").unwrap();
        let mut collector = Collector::default();
        let errors = run(&Parser::default(), &tokens, &mut collector);
        assert_eq!(errors, collector.errors.len());
        collector
    }

    fn rendered(collector: &Collector) -> Vec<String> {
        collector.nodes.iter().map(|node| node.to_string()).collect()
    }

    #[test]
    fn statements_work() {
        let out = drive("extern sin(x); def thing(x) sin(x) * x; thing(2);;");
        assert!(out.errors.is_empty());
        assert_eq!(
            rendered(&out),
            vec!["extern sin(x)", "def thing(x) (sin(x) * x)", "thing(2)"]
        );
    }

    #[test]
    fn statements_without_separators_work() {
        let out = drive("def f(x) x extern g() 1 2");
        assert!(out.errors.is_empty());
        assert_eq!(rendered(&out), vec!["def f(x) x", "extern g()", "1", "2"]);
    }

    #[test]
    fn recovery_works() {
        let out = drive("def foo(x y) x; foo(1) + 2;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].message, "expected ')' or ',' in prototype");
        assert_eq!(out.errors[0].position.column(), 11);
        assert_eq!(rendered(&out), vec!["(foo(1) + 2)"]);
    }

    #[test]
    fn error_on_separator_is_consumed() {
        let out = drive("1 + ; 3");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(rendered(&out), vec!["3"]);
    }

    #[test]
    fn recovery_can_swallow_next_statement() {
        let out = drive("(1 2) def f(x) x; 4");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(rendered(&out), vec!["4"]);
    }

    #[test]
    fn error_at_end_of_input_terminates() {
        let out = drive("def f(");
        assert_eq!(out.errors.len(), 1);
        assert!(out.nodes.is_empty());

        let out = drive("1; )");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(rendered(&out), vec!["1"]);
    }

    #[test]
    fn several_errors_are_reported() {
        let out = drive(") ; extern ; def x; 5");
        assert_eq!(out.errors.len(), 3);
        assert_eq!(rendered(&out), vec!["5"]);
    }

    #[test]
    fn parse_str_works() {
        let parser = Parser::default();
        let out = parser.parse_str("def id(x) x; id(3)", "test").unwrap();
        assert_eq!(rendered(&out), vec!["def id(x) x", "id(3)"]);

        let err = parser.parse_str("", "test").unwrap_err();
        assert_eq!(err.message, "unexpected end of file");
        let err = parser.parse_str("1..2", "test").unwrap_err();
        assert_eq!(err.message, "invalid format of number");
    }

    #[test]
    fn empty_program_works() {
        let out = drive("  # nothing here\n");
        assert_eq!(out, Collector::default());
    }
}
