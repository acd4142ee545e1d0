//! Front end for the kaleidoscope toy language: turns source text into an
//! AST, reporting malformed input with positioned diagnostics.
//!
//! ```
//! use kaleidoscope::Parser;
//!
//! let parsed = Parser::default().parse_str("def sq(x) x * x; sq(4)", "doc").unwrap();
//! assert!(parsed.errors.is_empty());
//! assert_eq!(parsed.nodes[0].to_string(), "def sq(x) (x * x)");
//! ```

pub mod ast;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod position;

pub use ast::{ASTNode, Expression, Function, Prototype};
pub use driver::{run, Collector, Sink};
pub use error::{ParseError, SourceError, TokenizationError};
pub use lexer::{render, tokenize, tokenize_bytes, Token, TokenKind};
pub use parser::{Cursor, Parser, TopLevelItem, MAX_NESTING};
pub use position::Position;
