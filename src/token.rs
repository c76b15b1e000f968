// ABOUTME: Token types produced by the lexer

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    Float,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Lte,
    Gte,
    Eq,
    NotEq,
    PlusAssign,
    MinusAssign,
    AsteriskAssign,
    SlashAssign,
    PlusPlus,
    MinusMinus,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    Lparen,
    Rparen,
    Lbrace,
    Rbrace,
    Lbracket,
    Rbracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
    While,
    For,
    In,
    Break,
    Continue,
    And,
    Or,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexical token, with the exact source text it was read from and
/// its 1-based line/column for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }
}

/// Maps an identifier's literal text to a keyword token kind, or `Ident` if
/// it isn't a reserved word.
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "func" => TokenKind::Function,
        "let" => TokenKind::Let,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "in" => TokenKind::In,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        _ => TokenKind::Ident,
    }
}
