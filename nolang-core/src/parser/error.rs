use std::fmt::Display;

use crate::{
    lexer::prelude::{Token, TokenKind},
    parser::parser::MAX_PARAMETERS,
    utils::prelude::SrcSpan,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    UnexpectedEof,
    InvalidAssignmentTarget {
        target: String,
    },
    TooManyParameters,
    TooManyArguments,
    ReturnOutsideFunction,
}

/// A defect recorded while parsing. The parser recovers at the next
/// statement boundary and keeps going, so one pass can report every
/// defective statement in the unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub line: u32,
    pub unit: String,
    pub span: SrcSpan,
}

impl ParseError {
    pub fn message(&self) -> String {
        match &self.error {
            ParseErrorType::UnexpectedToken { token, .. } => {
                format!("Syntax error: '{token}'")
            }
            ParseErrorType::UnexpectedEof => "Reached end of input unexpectedly".to_string(),
            ParseErrorType::InvalidAssignmentTarget { target } => {
                format!("Cannot bind to non-lvalue expression {target}")
            }
            ParseErrorType::TooManyParameters => {
                format!("Too many parameters for function, MAX: {MAX_PARAMETERS}!")
            }
            ParseErrorType::TooManyArguments => {
                format!("Too many arguments for function call, MAX: {MAX_PARAMETERS}!")
            }
            ParseErrorType::ReturnOutsideFunction => {
                "Cannot return from outside a function".to_string()
            }
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match &token.kind {
                    TokenKind::Int(_) => "an Int".to_string(),
                    TokenKind::Float(_) => "a Float".to_string(),
                    TokenKind::Str(_) => "a String".to_string(),
                    TokenKind::Ident(_) => "an Identifier".to_string(),
                    kind if kind.is_keyword() => format!("the keyword `{}`", kind.as_literal()),
                    kind => format!("`{}`", kind.as_literal()),
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            }
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::InvalidAssignmentTarget { .. } => {
                ("Only identifiers can be assigned to", vec![])
            }
            ParseErrorType::TooManyParameters => (
                "Functions are limited to 255 parameters",
                vec![],
            ),
            ParseErrorType::TooManyArguments => (
                "Calls are limited to 255 arguments",
                vec![],
            ),
            ParseErrorType::ReturnOutsideFunction => {
                ("`return` is only valid inside a function body", vec![])
            }
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}':{}", self.message(), self.unit, self.line)
    }
}
