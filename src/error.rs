use crate::position::Position;

/// Common shape of every diagnostic produced while compiling a source text.
///
/// Lexing and parsing errors implement it here; a code generator consuming
/// the AST can implement it for its own errors so a front end reports all of
/// them the same way.
pub trait SourceError: std::error::Error {
    fn position(&self) -> &Position;
    fn message(&self) -> &str;
}

/// The lexer could not produce a token sequence.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("{position}: {message}")]
pub struct TokenizationError {
    pub position: Position,
    pub message: String,
}

impl TokenizationError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// The token sequence does not follow the grammar at `position`.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl SourceError for TokenizationError {
    fn position(&self) -> &Position {
        &self.position
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl SourceError for ParseError {
    fn position(&self) -> &Position {
        &self.position
    }

    fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn errors_display_with_position() {
        let err = ParseError::new(Position::new("test", 2, 5), "expected ')'");
        assert_eq!(err.to_string(), "test:2:5: expected ')'");

        let err = TokenizationError::new(Position::start("stdin"), "unexpected end of file");
        assert_eq!(err.to_string(), "stdin:1:1: unexpected end of file");
    }

    #[test]
    fn source_error_is_uniform() {
        fn describe(err: &dyn SourceError) -> String {
            format!("{} @ {}", err.message(), err.position().line())
        }

        let lex = TokenizationError::new(Position::new("a", 4, 1), "invalid format of number");
        let parse = ParseError::new(Position::new("a", 7, 1), "expected ')'");
        assert_eq!(describe(&lex), "invalid format of number @ 4");
        assert_eq!(describe(&parse), "expected ')' @ 7");
    }
}
