use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnexpectedCharacter { ch: char },
    UnterminatedString,
    InconsistentIndentation,
    IntegerOutOfRange,
}

/// A defect recorded while scanning. Scanning carries on after recording
/// so a single pass can surface every defect in the unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub line: u32,
    pub unit: String,
    pub span: SrcSpan,
}

impl LexicalError {
    pub fn message(&self) -> String {
        match self.error {
            LexicalErrorType::UnexpectedCharacter { ch } => {
                format!("Unexpected character: '{ch}'")
            }
            LexicalErrorType::UnterminatedString => "Unterminated string literal".to_string(),
            LexicalErrorType::InconsistentIndentation => "Inconsistent indentation".to_string(),
            LexicalErrorType::IntegerOutOfRange => "Integer literal out of range".to_string(),
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnexpectedCharacter { ch } => (
                "Unrecognized character",
                vec![format!("No lexical rule matches '{ch}'.")],
            ),
            LexicalErrorType::UnterminatedString => ("This string is never closed", vec![]),
            LexicalErrorType::InconsistentIndentation => (
                "This line's indentation matches no enclosing block",
                vec![],
            ),
            LexicalErrorType::IntegerOutOfRange => {
                ("Integer literals are limited to 64 bits", vec![])
            }
        }
    }
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}':{}", self.message(), self.unit, self.line)
    }
}
