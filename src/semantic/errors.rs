use thiserror::Error;

use crate::lexer::Position;
use crate::parser::NodeKind;
use crate::semantic::AssignmentKind;
use crate::source::ImageSize;
use crate::symbol::DuplicateSymbol;

/// Semantic error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error(
        "Semantic Error: Declaration duplicated of {name} located at {position}, the first declaration is at {original}"
    )]
    DuplicateDefinition {
        name: String,
        position: Position,
        original: Position,
    },

    #[error("Semantic Error: {kind} '{name}' used at {position} was never declared")]
    UndefinedName {
        kind: NodeKind,
        name: String,
        position: Position,
    },

    #[error("Semantic Error: '{name}' used at {position} is a {found}, expected a {expected}")]
    KindMismatch {
        name: String,
        expected: AssignmentKind,
        found: AssignmentKind,
        position: Position,
    },

    #[error("Semantic Error: quantity {quantity} of '{name}' at {position} must be greater than zero")]
    InvalidQuantity {
        name: String,
        quantity: i64,
        position: Position,
    },

    #[error("Semantic Error: the image of ingredient '{name}' declared at {position} has no area")]
    ImageZeroSize { name: String, position: Position },

    #[error(
        "Semantic Error: the image of ingredient '{name}' declared at {position} is {size}, it must be square"
    )]
    ImageNotSquare {
        name: String,
        size: ImageSize,
        position: Position,
    },

    #[error("Semantic Error: division by zero at {position}")]
    DivisionByZero { position: Position },

    #[error("Semantic Error: the value at {position} does not fit in a 64-bit integer")]
    ArithmeticOverflow { position: Position },

    #[error("Internal Error: unexpected {kind} node at {position}: {detail}")]
    Internal {
        kind: NodeKind,
        position: Position,
        detail: String,
    },
}

impl SemanticError {
    pub fn position(&self) -> &Position {
        match self {
            SemanticError::DuplicateDefinition { position, .. }
            | SemanticError::UndefinedName { position, .. }
            | SemanticError::KindMismatch { position, .. }
            | SemanticError::InvalidQuantity { position, .. }
            | SemanticError::ImageZeroSize { position, .. }
            | SemanticError::ImageNotSquare { position, .. }
            | SemanticError::DivisionByZero { position }
            | SemanticError::ArithmeticOverflow { position }
            | SemanticError::Internal { position, .. } => position,
        }
    }
}

impl From<DuplicateSymbol> for SemanticError {
    fn from(duplicate: DuplicateSymbol) -> Self {
        SemanticError::DuplicateDefinition {
            name: duplicate.name,
            position: duplicate.duplicate,
            original: duplicate.original,
        }
    }
}
