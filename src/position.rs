use std::fmt;
use std::sync::Arc;

/// A location in a source text, used for diagnostics.
///
/// Lines and columns are 1-based. The source name is shared between every
/// position of one tokenization, so cloning a `Position` does not copy it.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Position {
    source_name: Arc<str>,
    line: usize,
    column: usize,
}

impl Position {
    pub fn new(source_name: impl Into<Arc<str>>, line: usize, column: usize) -> Self {
        Self {
            source_name: source_name.into(),
            line,
            column,
        }
    }

    /// The first character of `source_name`.
    pub fn start(source_name: impl Into<Arc<str>>) -> Self {
        Self::new(source_name, 1, 1)
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Position after reading `ch` from this one.
    pub(crate) fn step(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source_name, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_works() {
        assert_eq!(Position::new("stdin", 3, 14).to_string(), "stdin:3:14");
    }

    #[test]
    fn step_tracks_lines() {
        let mut pos = Position::start("test");
        for ch in "ab\nc".chars() {
            pos.step(ch);
        }
        assert_eq!((pos.line(), pos.column()), (2, 2));
    }
}
