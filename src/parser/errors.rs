use thiserror::Error;
use crate::lexer::{Lexeme, Position};

/// Renders an expected set as `'a' or 'b'`.
fn one_of(expected: &[Lexeme]) -> String {
    expected
        .iter()
        .map(|lexeme| format!("'{}'", lexeme))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Parser error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("Syntax Error: expected {} but found {found} '{text}' at {position}", one_of(.expected))]
    ExpectedLexeme {
        expected: Vec<Lexeme>,
        found: Lexeme,
        text: String,
        position: Position,
    },

    #[error("Syntax Error: expected {} after {position} but the tokens ran out", one_of(.expected))]
    UnexpectedEnd {
        expected: Vec<Lexeme>,
        position: Position,
    },

    #[error("Syntax Error: statement starting with {found} '{text}' at {position} is not recognized, expected include, define or make")]
    UnrecognizedStatement {
        found: Lexeme,
        text: String,
        position: Position,
    },
}

impl ParserError {
    pub fn position(&self) -> &Position {
        match self {
            ParserError::ExpectedLexeme { position, .. }
            | ParserError::UnexpectedEnd { position, .. }
            | ParserError::UnrecognizedStatement { position, .. } => position,
        }
    }
}
