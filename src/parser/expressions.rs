use crate::lexer::{Lexeme, Position, Token};
use crate::parser::{Ast, NodeId, NodeKind, ParserError};
use crate::source::SourceId;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    pub(crate) unit: SourceId,
    pub(crate) ast: Ast,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>, unit: SourceId) -> Self {
        Self {
            tokens,
            current: 0,
            unit,
            ast: Ast::new(),
        }
    }

    /// Peek at current token without consuming it
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    /// Check if the current token is any of `lexemes`
    pub(crate) fn check(&self, lexemes: &[Lexeme]) -> bool {
        self.peek().is_some_and(|token| token.is_any(lexemes))
    }

    /// Advance to next token
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.current).cloned()?;
        self.current += 1;
        Some(token)
    }

    /// Consume the current token only if it is any of `lexemes`
    pub(crate) fn ask(&mut self, lexemes: &[Lexeme]) -> Option<Token> {
        if self.check(lexemes) {
            self.advance()
        } else {
            None
        }
    }

    /// Consume the current token, which must be any of `lexemes`
    pub(crate) fn expect(&mut self, lexemes: &[Lexeme]) -> Result<Token, ParserError> {
        match self.peek().cloned() {
            Some(token) if token.is_any(lexemes) => {
                self.current += 1;
                Ok(token)
            }
            Some(token) => Err(ParserError::ExpectedLexeme {
                expected: lexemes.to_vec(),
                found: token.lexeme,
                text: token.text,
                position: token.pos,
            }),
            None => Err(ParserError::UnexpectedEnd {
                expected: lexemes.to_vec(),
                position: self.last_position(),
            }),
        }
    }

    /// Position of the last consumed token, or the start of the unit
    pub(crate) fn last_position(&self) -> Position {
        self.current
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.pos.clone())
            .unwrap_or_else(|| Position::start(self.unit.clone()))
    }

    /// Parse a quantity expression.
    ///
    /// `expr := term (('+' | '-') expr)?`: chains group to the right, so
    /// `10 - 3 - 2` is `10 - (3 - 2)`.
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId, ParserError> {
        let left = self.parse_term()?;

        match self.ask(&[Lexeme::Plus, Lexeme::Minus]) {
            Some(op) => {
                let right = self.parse_expression()?;
                Ok(self.binary(&op, left, right))
            }
            None => Ok(left),
        }
    }

    /// `term := NUMBER (('*' | '/') term)?`
    fn parse_term(&mut self) -> Result<NodeId, ParserError> {
        let number = self.expect(&[Lexeme::Number])?;
        let left = self.ast.alloc(NodeKind::Number, number.text, number.pos);

        match self.ask(&[Lexeme::Multiply, Lexeme::Divide]) {
            Some(op) => {
                let right = self.parse_term()?;
                Ok(self.binary(&op, left, right))
            }
            None => Ok(left),
        }
    }

    fn binary(&mut self, op: &Token, left: NodeId, right: NodeId) -> NodeId {
        let kind = match op.lexeme {
            Lexeme::Plus => NodeKind::Plus,
            Lexeme::Minus => NodeKind::Minus,
            Lexeme::Multiply => NodeKind::Multiply,
            _ => NodeKind::Divide,
        };

        let node = self.ast.alloc_structural(kind, op.pos.clone());
        self.ast.attach(node, left);
        self.ast.attach(node, right);
        node
    }

    /// Parse quoted text into a PATH node. Adjacent quoted runs concatenate.
    pub(crate) fn parse_text(&mut self) -> Result<NodeId, ParserError> {
        let (value, pos) = self.parse_text_run()?;
        Ok(self.ast.alloc(NodeKind::Path, value, pos))
    }

    fn parse_text_run(&mut self) -> Result<(String, Position), ParserError> {
        self.expect(&[Lexeme::SingleQuote])?;
        let text = self.expect(&[Lexeme::Text])?;
        self.expect(&[Lexeme::SingleQuote])?;

        let mut value = text.text;
        if self.check(&[Lexeme::SingleQuote]) {
            let (rest, _) = self.parse_text_run()?;
            value.push_str(&rest);
        }

        Ok((value, text.pos))
    }
}
