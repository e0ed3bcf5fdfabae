use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // identifiers and literals
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // arithmetic operators
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    Pow,

    // comparison operators
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    Assign,

    // punctuation
    LParen,
    RParen,
    Comma,

    // keywords
    No,
    Greg,
    If,
    Erm,
    Hermph,
    While,
    For,
    Return,
    And,
    Or,
    Not,
    Nolin,
    True,
    False,
    Nol,

    // layout tokens synthesized by the lexer
    Indent,
    Dedent,
    Newline,

    Eof,
}

impl TokenKind {
    pub fn as_literal(&self) -> String {
        match self {
            TokenKind::Ident(value) => value.clone(),
            TokenKind::Int(value) => value.to_string(),
            TokenKind::Float(value) => value.to_string(),
            TokenKind::Str(value) => value.clone(),

            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Mult => "*".to_string(),
            TokenKind::Div => "/".to_string(),
            TokenKind::Mod => "%".to_string(),
            TokenKind::Pow => "**".to_string(),

            TokenKind::Equal => "==".to_string(),
            TokenKind::NotEqual => "!=".to_string(),
            TokenKind::LessThan => "<".to_string(),
            TokenKind::LessThanOrEqual => "<=".to_string(),
            TokenKind::GreaterThan => ">".to_string(),
            TokenKind::GreaterThanOrEqual => ">=".to_string(),

            TokenKind::Assign => "=".to_string(),

            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Comma => ",".to_string(),

            TokenKind::No => "no".to_string(),
            TokenKind::Greg => "greg".to_string(),
            TokenKind::If => "if".to_string(),
            TokenKind::Erm => "erm".to_string(),
            TokenKind::Hermph => "hermph".to_string(),
            TokenKind::While => "while".to_string(),
            TokenKind::For => "for".to_string(),
            TokenKind::Return => "return".to_string(),
            TokenKind::And => "and".to_string(),
            TokenKind::Or => "or".to_string(),
            TokenKind::Not => "not".to_string(),
            TokenKind::Nolin => "nolin".to_string(),
            TokenKind::True => "True".to_string(),
            TokenKind::False => "False".to_string(),
            TokenKind::Nol => "nol".to_string(),

            TokenKind::Indent => "INDENT".to_string(),
            TokenKind::Dedent => "DEDENT".to_string(),
            TokenKind::Newline => "NEWLINE".to_string(),
            TokenKind::Eof => "EOF".to_string(),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nol
        )
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::No
                | TokenKind::Greg
                | TokenKind::If
                | TokenKind::Erm
                | TokenKind::Hermph
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Nolin
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nol
        )
    }
}

/// One lexed token. The decoded value of a literal lives in the kind's
/// payload; `lexeme` keeps the raw source text for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub unit: String,
    pub span: SrcSpan,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Newline | TokenKind::Eof => {
                write!(f, "{}", self.kind.as_literal())
            }
            _ => write!(f, "{}", self.lexeme),
        }
    }
}
