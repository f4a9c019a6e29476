use crate::lexer::Position;
use std::fmt;

/// Every kind of token the language knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lexeme {
    // Reserved words
    Include,
    Define,
    Ingredient,
    Specialty,
    Make,
    Pizza,
    Big,
    Medium,
    Personal,
    Add,
    Of,
    And,
    Resize,
    Save,
    As,

    // Literal categories
    Literal,
    Text,
    Number,

    // Arithmetic operators
    Plus,       // +
    Minus,      // -
    Multiply,   // *
    Divide,     // /

    // Punctuation
    OpenParen,  // (
    CloseParen, // )
    OpenBrace,  // {
    CloseBrace, // }
    Semicolon,  // ;
    SingleQuote, // '
}

impl Lexeme {
    /// Reserved word spelled exactly as `word`, if any.
    pub fn keyword(word: &str) -> Option<Self> {
        match word {
            "include" => Some(Lexeme::Include),
            "define" => Some(Lexeme::Define),
            "ingredient" => Some(Lexeme::Ingredient),
            "specialty" => Some(Lexeme::Specialty),
            "make" => Some(Lexeme::Make),
            "pizza" => Some(Lexeme::Pizza),
            "big" => Some(Lexeme::Big),
            "medium" => Some(Lexeme::Medium),
            "personal" => Some(Lexeme::Personal),
            "add" => Some(Lexeme::Add),
            "of" => Some(Lexeme::Of),
            "and" => Some(Lexeme::And),
            "resize" => Some(Lexeme::Resize),
            "save" => Some(Lexeme::Save),
            "as" => Some(Lexeme::As),
            _ => None,
        }
    }

    /// Single-character operator or punctuation.
    pub fn symbol(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Lexeme::Plus),
            '-' => Some(Lexeme::Minus),
            '*' => Some(Lexeme::Multiply),
            '/' => Some(Lexeme::Divide),
            '(' => Some(Lexeme::OpenParen),
            ')' => Some(Lexeme::CloseParen),
            '{' => Some(Lexeme::OpenBrace),
            '}' => Some(Lexeme::CloseBrace),
            ';' => Some(Lexeme::Semicolon),
            '\'' => Some(Lexeme::SingleQuote),
            _ => None,
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Lexeme::Include => "include",
            Lexeme::Define => "define",
            Lexeme::Ingredient => "ingredient",
            Lexeme::Specialty => "specialty",
            Lexeme::Make => "make",
            Lexeme::Pizza => "pizza",
            Lexeme::Big => "big",
            Lexeme::Medium => "medium",
            Lexeme::Personal => "personal",
            Lexeme::Add => "add",
            Lexeme::Of => "of",
            Lexeme::And => "and",
            Lexeme::Resize => "resize",
            Lexeme::Save => "save",
            Lexeme::As => "as",
            Lexeme::Literal => "literal",
            Lexeme::Text => "text",
            Lexeme::Number => "number",
            Lexeme::Plus => "+",
            Lexeme::Minus => "-",
            Lexeme::Multiply => "*",
            Lexeme::Divide => "/",
            Lexeme::OpenParen => "(",
            Lexeme::CloseParen => ")",
            Lexeme::OpenBrace => "{",
            Lexeme::CloseBrace => "}",
            Lexeme::Semicolon => ";",
            Lexeme::SingleQuote => "'",
        };
        write!(f, "{}", s)
    }
}

/// A token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: Lexeme,
    pub text: String,
    pub pos: Position,
}

impl Token {
    pub fn new(lexeme: Lexeme, text: String, pos: Position) -> Self {
        Self { lexeme, text, pos }
    }

    pub fn is(&self, lexeme: Lexeme) -> bool {
        self.lexeme == lexeme
    }

    pub fn is_any(&self, lexemes: &[Lexeme]) -> bool {
        lexemes.contains(&self.lexeme)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "token(id={:?}; value={}; source={})",
            self.lexeme, self.text, self.pos
        )
    }
}
