use crate::lexer::{Lexeme, LexerError, Position, Token};
use crate::source::{SourceId, SourceUnit};

pub struct Scanner<'a> {
    lines: &'a [String],
    unit: SourceId,
    line: usize,
    column: usize,
    chars: Vec<char>,
    tokens: Vec<Token>,
    in_text: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(unit: &'a SourceUnit) -> Self {
        Self {
            lines: &unit.lines,
            unit: unit.id.clone(),
            line: 0,
            column: 0,
            chars: Vec::new(),
            tokens: Vec::new(),
            in_text: false,
        }
    }

    /// Scan every line of the unit.
    /// # Errors
    /// On the first character outside the language's alphabet.
    pub fn scan_all(mut self) -> Result<Vec<Token>, LexerError> {
        let lines = self.lines;
        for (index, line) in lines.iter().enumerate() {
            self.line = index + 1;
            self.column = 0;
            self.chars = line.chars().collect();
            self.scan_line()?;
        }

        Ok(self.tokens)
    }

    fn scan_line(&mut self) -> Result<(), LexerError> {
        while let Some(ch) = self.peek() {
            if self.in_text {
                self.scan_text();
                continue;
            }

            match ch {
                // Line comment
                '/' if self.peek_ahead(1) == Some('/') => break,
                ch if ch.is_whitespace() => self.column += 1,
                ch if ch.is_ascii_digit() => self.scan_number(),
                ch if ch.is_alphabetic() || ch == '_' => self.scan_word(),
                ch => self.scan_symbol(ch)?,
            }
        }

        // A quote left open at the end of a line keeps text mode for the next
        // one; a run that has started still stops at its own line end.
        Ok(())
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column + 1, self.unit.clone())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.column).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.chars.get(self.column + offset).copied()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.column;
        while self.peek().is_some_and(&pred) {
            self.column += 1;
        }
        self.chars[start..self.column].iter().collect()
    }

    fn push(&mut self, lexeme: Lexeme, text: String, pos: Position) {
        self.tokens.push(Token::new(lexeme, text, pos));
    }

    fn scan_number(&mut self) {
        let pos = self.current_position();
        let digits = self.take_while(|c| c.is_ascii_digit());
        self.push(Lexeme::Number, digits, pos);
    }

    fn scan_word(&mut self) {
        let pos = self.current_position();
        let word = self.take_while(|c| c.is_alphanumeric() || c == '_');
        let lexeme = Lexeme::keyword(&word).unwrap_or(Lexeme::Literal);
        self.push(lexeme, word, pos);
    }

    fn scan_text(&mut self) {
        let pos = self.current_position();
        let text = self.take_while(|c| c != '\'');
        self.in_text = false;
        self.push(Lexeme::Text, text, pos);
    }

    fn scan_symbol(&mut self, ch: char) -> Result<(), LexerError> {
        let pos = self.current_position();
        let lexeme = Lexeme::symbol(ch).ok_or_else(|| LexerError::UnrecognizedCharacter {
            character: ch,
            position: pos.clone(),
        })?;

        // A quote opens a text run unless it closes the one just read
        if lexeme == Lexeme::SingleQuote {
            let closes_text = self.tokens.last().is_some_and(|t| t.is(Lexeme::Text));
            self.in_text = !closes_text;
        }

        self.column += 1;
        self.push(lexeme, ch.to_string(), pos);
        Ok(())
    }
}

/// Tokenize a whole unit.
/// # Errors
/// See [`Scanner::scan_all`].
pub fn tokenize(unit: &SourceUnit) -> Result<Vec<Token>, LexerError> {
    Scanner::new(unit).scan_all()
}
