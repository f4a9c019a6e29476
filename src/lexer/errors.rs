use thiserror::Error;

use crate::source::SourceId;

/// Position in a source unit. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub unit: SourceId,
}

impl Position {
    pub fn new(line: usize, column: usize, unit: SourceId) -> Self {
        Self { line, column, unit }
    }

    pub fn start(unit: SourceId) -> Self {
        Self::new(1, 1, unit)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[row={}; column={}] in {}", self.line, self.column, self.unit)
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("Character '{character}' is not recognized, at {position}")]
    UnrecognizedCharacter { character: char, position: Position },
}

impl LexerError {
    #[must_use]
    pub fn position(&self) -> &Position {
        match self {
            LexerError::UnrecognizedCharacter { position, .. } => position,
        }
    }
}
