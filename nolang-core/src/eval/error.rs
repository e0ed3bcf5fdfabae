use std::fmt::Display;

use crate::{
    environment::prelude::{Value, ValueType},
    lexer::prelude::Token,
    utils::prelude::SrcSpan,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    UndefinedVariable {
        name: String,
    },
    VariableRedefinition {
        name: String,
    },
    InvalidOperand {
        operator: String,
        operand: Value,
    },
    IncompatibleTypes {
        operator: String,
        left: Value,
        right: Value,
    },
    DivideByZero,
    WrongArity {
        callee: String,
        expected: usize,
        given: usize,
    },
    NotCallable {
        value: Value,
    },
    InvalidConversion {
        value: Value,
        target: ValueType,
    },
    Internal {
        message: String,
    },
}

/// The first runtime defect aborts evaluation of its unit; recovery, if
/// any, happens at the boundary that invoked the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub line: u32,
    pub unit: String,
    pub span: SrcSpan,
}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, token: &Token) -> Self {
        Self {
            error,
            line: token.line,
            unit: token.unit.clone(),
            span: token.span,
        }
    }

    pub fn message(&self) -> String {
        match &self.error {
            RuntimeErrorType::UndefinedVariable { name } => {
                format!("{name} has not been defined in this scope")
            }
            RuntimeErrorType::VariableRedefinition { name } => {
                format!("{name} has already been defined in this scope")
            }
            RuntimeErrorType::InvalidOperand { operator, operand } => format!(
                "Invalid operand {} ({}) for operator '{}'",
                operand._type(),
                operand,
                operator
            ),
            RuntimeErrorType::IncompatibleTypes {
                operator,
                left,
                right,
            } => format!(
                "Operator '{}' on incompatible types {} ({}) and {} ({})",
                operator,
                left._type(),
                left,
                right._type(),
                right
            ),
            RuntimeErrorType::DivideByZero => "Divide by zero".to_string(),
            RuntimeErrorType::WrongArity {
                callee,
                expected,
                given,
            } => format!("{callee} expects {expected} argument(s) but got {given}"),
            RuntimeErrorType::NotCallable { value } => {
                format!("{} ({}) is not callable", value._type(), value)
            }
            RuntimeErrorType::InvalidConversion { value, target } => {
                format!("Cannot convert {} ({}) to {}", value._type(), value, target)
            }
            RuntimeErrorType::Internal { message } => format!("Internal error: {message}"),
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::UndefinedVariable { .. } => {
                ("This name is not bound in any enclosing scope", vec![])
            }
            RuntimeErrorType::VariableRedefinition { name } => (
                "This name is already bound in the current scope",
                vec![format!("Assign with `{name} = ...` to change its value.")],
            ),
            RuntimeErrorType::InvalidOperand { operand, .. } => (
                "This operator cannot take such an operand",
                vec![format!("The operand evaluated to a {}.", operand._type())],
            ),
            RuntimeErrorType::IncompatibleTypes { left, right, .. } => (
                "These operand types do not mix",
                vec![format!(
                    "The operands evaluated to a {} and a {}.",
                    left._type(),
                    right._type()
                )],
            ),
            RuntimeErrorType::DivideByZero => ("The divisor evaluated to zero", vec![]),
            RuntimeErrorType::WrongArity {
                expected, given, ..
            } => (
                "Wrong number of arguments",
                vec![format!("This call supplies {given}, the callee takes {expected}.")],
            ),
            RuntimeErrorType::NotCallable { value } => (
                "Only functions can be called",
                vec![format!("The callee evaluated to a {}.", value._type())],
            ),
            RuntimeErrorType::InvalidConversion { target, .. } => (
                "This value has no such representation",
                vec![format!("No conversion to {target} exists for it.")],
            ),
            RuntimeErrorType::Internal { .. } => (
                "The evaluator failed on its own account; the script is not at fault",
                vec![],
            ),
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}':{}", self.message(), self.unit, self.line)
    }
}
