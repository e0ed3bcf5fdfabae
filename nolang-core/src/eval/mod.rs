//! Tree-walking evaluation. The interpreter executes a parsed program
//! directly against a chain of scope frames; functions close over the
//! frame they were declared in.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use crate::{
    environment::prelude::{Environment, Value, FALSE, NOL, TRUE},
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{
        BinaryExpression, Body, CallExpression, Expression, Program, Statement, UnaryExpression,
    },
    runtime::prelude::{Builtin, NolangFunction, GLOBALS},
};

use self::error::{RuntimeError, RuntimeErrorType};

pub mod error;

pub mod prelude {
    pub use super::error::*;
    pub use super::{Flow, Interpreter};
}

#[cfg(test)]
mod tests;

/// How a statement finished. `Returning` carries a `return` value up
/// through enclosing blocks until the active function call catches it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Returning(Value),
}

pub struct Interpreter {
    pub environment: Rc<RefCell<Environment>>,
    /// When set, expression statements print their value unless it is
    /// nol. The REPL turns this on; scripts leave it off.
    pub echo: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        let mut globals = Environment::new();
        for builtin in GLOBALS {
            globals
                .store
                .insert(builtin.name().to_string(), Value::Builtin { builtin });
        }

        Self {
            environment: Rc::new(RefCell::new(globals)),
            echo: false,
        }
    }

    /// Runs a whole program against the current global frame.
    pub fn explore(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in &program.statements {
            if let Flow::Returning(_) = self.execute(statement)? {
                // The parser rejects `return` outside a function, so a
                // signal surfacing here means the evaluator lost track.
                return Err(internal_error(
                    "return signal escaped to the top level",
                    statement.token(),
                ));
            }
        }

        Ok(())
    }

    fn execute(&mut self, statement: &Statement) -> Result<Flow, RuntimeError> {
        match statement {
            Statement::Var(statement) => {
                let value = match &statement.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => NOL,
                };

                self.define(&statement.name, value)?;
                Ok(Flow::Normal)
            }
            Statement::Fun(statement) => {
                let function =
                    NolangFunction::new(statement.clone(), Rc::clone(&self.environment));

                self.define(
                    &statement.name,
                    Value::Function {
                        function: Rc::new(function),
                    },
                )?;
                Ok(Flow::Normal)
            }
            Statement::If(statement) => {
                if self.evaluate(&statement.condition)?.is_truthy() {
                    return self.execute_block(&statement.consequence);
                }

                for (condition, body) in &statement.erm_branches {
                    if self.evaluate(condition)?.is_truthy() {
                        return self.execute_block(body);
                    }
                }

                match &statement.alternative {
                    Some(alternative) => self.execute_block(alternative),
                    None => Ok(Flow::Normal),
                }
            }
            Statement::While(statement) => {
                while self.evaluate(&statement.condition)?.is_truthy() {
                    if let Flow::Returning(value) = self.execute_block(&statement.body)? {
                        // A return abandons the loop before its hermph arm.
                        return Ok(Flow::Returning(value));
                    }
                }

                match &statement.alternative {
                    Some(alternative) => self.execute_block(alternative),
                    None => Ok(Flow::Normal),
                }
            }
            Statement::Return(statement) => {
                let value = match &statement.value {
                    Some(value) => self.evaluate(value)?,
                    None => NOL,
                };

                Ok(Flow::Returning(value))
            }
            Statement::Expr(statement) => {
                let value = self.evaluate(&statement.expression)?;

                if self.echo && value != NOL {
                    println!("{value}");
                }

                Ok(Flow::Normal)
            }
        }
    }

    fn define(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.environment.borrow_mut().define(&name.lexeme, value) {
            return Ok(());
        }

        Err(RuntimeError::new(
            RuntimeErrorType::VariableRedefinition {
                name: name.lexeme.clone(),
            },
            name,
        ))
    }

    fn execute_block(&mut self, body: &Body) -> Result<Flow, RuntimeError> {
        let env = Environment::enclosed(Rc::clone(&self.environment));
        self.execute_body(body, env)
    }

    /// Runs `body` inside `env`, restoring the previous frame afterwards
    /// whether or not the body completed.
    pub fn execute_body(&mut self, body: &Body, env: Environment) -> Result<Flow, RuntimeError> {
        let previous = mem::replace(&mut self.environment, Rc::new(RefCell::new(env)));

        let mut flow = Ok(Flow::Normal);
        for statement in &body.statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => {}
                other => {
                    flow = other;
                    break;
                }
            }
        }

        self.environment = previous;
        flow
    }

    pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Literal(expression) => Ok(literal_value(&expression.token)),
            Expression::Identifier(expression) => self
                .environment
                .borrow()
                .get(expression.name())
                .ok_or_else(|| {
                    RuntimeError::new(
                        RuntimeErrorType::UndefinedVariable {
                            name: expression.name().to_string(),
                        },
                        &expression.token,
                    )
                }),
            Expression::Assign(expression) => {
                let value = self.evaluate(&expression.value)?;

                if !self
                    .environment
                    .borrow_mut()
                    .assign(&expression.name.lexeme, value.clone())
                {
                    return Err(RuntimeError::new(
                        RuntimeErrorType::UndefinedVariable {
                            name: expression.name.lexeme.clone(),
                        },
                        &expression.name,
                    ));
                }

                Ok(value)
            }
            Expression::Unary(expression) => self.eval_unary(expression),
            Expression::Binary(expression) => self.eval_binary(expression),
            Expression::Call(expression) => self.eval_call(expression),
        }
    }

    fn eval_unary(&mut self, expression: &UnaryExpression) -> Result<Value, RuntimeError> {
        let operand = self.evaluate(&expression.operand)?;
        let operator = &expression.operator;

        match operator.kind {
            TokenKind::Not => Ok(Value::Boolean {
                value: !operand.is_truthy(),
            }),
            TokenKind::Minus => match operand {
                // Negating i64::MIN leaves the integer range.
                Value::Integer { value } => match value.checked_neg() {
                    Some(value) => Ok(Value::Integer { value }),
                    None => Ok(Value::Float {
                        value: -(value as f64),
                    }),
                },
                Value::Float { value } => Ok(Value::Float { value: -value }),
                operand => Err(invalid_operand(&operand, operator)),
            },
            TokenKind::Plus => match operand {
                Value::Integer { .. } | Value::Float { .. } => Ok(operand),
                operand => Err(invalid_operand(&operand, operator)),
            },
            TokenKind::Nolin => Builtin::Nolin.call(vec![operand], operator),
            _ => Err(internal_error("failed to interpret unary operator", operator)),
        }
    }

    fn eval_binary(&mut self, expression: &BinaryExpression) -> Result<Value, RuntimeError> {
        let operator = &expression.operator;

        // `or` and `and` decide on the left operand alone when they can;
        // the right operand is then never evaluated.
        match operator.kind {
            TokenKind::Or => {
                if self.evaluate(&expression.left)?.is_truthy() {
                    return Ok(TRUE);
                }

                let right = self.evaluate(&expression.right)?;
                return Ok(Value::Boolean {
                    value: right.is_truthy(),
                });
            }
            TokenKind::And => {
                if !self.evaluate(&expression.left)?.is_truthy() {
                    return Ok(FALSE);
                }

                let right = self.evaluate(&expression.right)?;
                return Ok(Value::Boolean {
                    value: right.is_truthy(),
                });
            }
            _ => {}
        }

        let left = self.evaluate(&expression.left)?;
        let right = self.evaluate(&expression.right)?;

        match operator.kind {
            TokenKind::Equal => Ok(Value::Boolean {
                value: left == right,
            }),
            TokenKind::NotEqual => Ok(Value::Boolean {
                value: left != right,
            }),
            TokenKind::LessThan
            | TokenKind::LessThanOrEqual
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanOrEqual => eval_ordering(&left, &right, operator),
            TokenKind::Plus => eval_sum(&left, &right, operator),
            TokenKind::Minus | TokenKind::Mult | TokenKind::Mod => {
                eval_arithmetic(&left, &right, operator)
            }
            TokenKind::Div => eval_division(&left, &right, operator),
            TokenKind::Pow => eval_power(&left, &right, operator),
            _ => Err(internal_error("failed to interpret binary operator", operator)),
        }
    }

    fn eval_call(&mut self, expression: &CallExpression) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&expression.callee)?;

        let mut args = Vec::with_capacity(expression.arguments.len());
        for argument in &expression.arguments {
            args.push(self.evaluate(argument)?);
        }

        match callee {
            Value::Function { function } => {
                check_arity(function.arity(), args.len(), function.name(), &expression.paren)?;
                function.call(self, args)
            }
            Value::Builtin { builtin } => {
                check_arity(builtin.arity(), args.len(), builtin.name(), &expression.paren)?;
                builtin.call(args, &expression.paren)
            }
            callee => Err(RuntimeError::new(
                RuntimeErrorType::NotCallable { value: callee },
                &expression.paren,
            )),
        }
    }
}

fn literal_value(token: &Token) -> Value {
    match &token.kind {
        TokenKind::Int(value) => Value::Integer { value: *value },
        TokenKind::Float(value) => Value::Float { value: *value },
        TokenKind::Str(value) => Value::String {
            value: value.clone(),
        },
        TokenKind::True => TRUE,
        TokenKind::False => FALSE,
        // The parser only builds literal nodes from literal tokens.
        _ => NOL,
    }
}

fn check_arity(
    expected: usize,
    given: usize,
    name: &str,
    paren: &Token,
) -> Result<(), RuntimeError> {
    if given == expected {
        return Ok(());
    }

    Err(RuntimeError::new(
        RuntimeErrorType::WrongArity {
            callee: format!("<greg {name}>"),
            expected,
            given,
        },
        paren,
    ))
}

/// Ordering comparisons. Numbers order among themselves, strings order
/// lexicographically against other strings, and nothing else orders.
fn eval_ordering(left: &Value, right: &Value, operator: &Token) -> Result<Value, RuntimeError> {
    if !is_orderable(left) {
        return Err(invalid_operand(left, operator));
    }
    if !is_orderable(right) {
        return Err(invalid_operand(right, operator));
    }

    let ordering = match (left, right) {
        (Value::String { value: a }, Value::String { value: b }) => Some(a.cmp(b)),
        (Value::Integer { value: a }, Value::Integer { value: b }) => Some(a.cmp(b)),
        (a, b) if a.is_numeric() && b.is_numeric() => as_float(a).partial_cmp(&as_float(b)),
        // One side a string, the other a number.
        _ => {
            return Err(RuntimeError::new(
                RuntimeErrorType::IncompatibleTypes {
                    operator: operator.lexeme.clone(),
                    left: left.clone(),
                    right: right.clone(),
                },
                operator,
            ))
        }
    };

    // NaN orders with nothing; every comparison against it is false.
    let Some(ordering) = ordering else {
        return Ok(FALSE);
    };

    let holds = match operator.kind {
        TokenKind::LessThan => ordering.is_lt(),
        TokenKind::LessThanOrEqual => ordering.is_le(),
        TokenKind::GreaterThan => ordering.is_gt(),
        TokenKind::GreaterThanOrEqual => ordering.is_ge(),
        _ => {
            return Err(internal_error(
                "failed to interpret ordering operator",
                operator,
            ))
        }
    };

    Ok(Value::Boolean { value: holds })
}

/// `+` concatenates when either operand is a string and adds otherwise.
/// Integer sums that leave the integer range degrade to floats.
fn eval_sum(left: &Value, right: &Value, operator: &Token) -> Result<Value, RuntimeError> {
    if matches!(left, Value::String { .. }) || matches!(right, Value::String { .. }) {
        return Ok(Value::String {
            value: format!("{left}{right}"),
        });
    }

    check_numeric(left, operator)?;
    check_numeric(right, operator)?;

    if let (Value::Integer { value: a }, Value::Integer { value: b }) = (left, right) {
        if let Some(value) = a.checked_add(*b) {
            return Ok(Value::Integer { value });
        }
    }

    Ok(Value::Float {
        value: as_float(left) + as_float(right),
    })
}

/// Integer `-` and `*` stay integer while the result fits in one and
/// degrade to floats otherwise. Integer `%` always fits.
fn eval_arithmetic(left: &Value, right: &Value, operator: &Token) -> Result<Value, RuntimeError> {
    check_numeric(left, operator)?;
    check_numeric(right, operator)?;

    if operator.kind == TokenKind::Mod && is_zero(right) {
        return Err(RuntimeError::new(RuntimeErrorType::DivideByZero, operator));
    }

    if let (Value::Integer { value: a }, Value::Integer { value: b }) = (left, right) {
        if operator.kind == TokenKind::Mod {
            // checked_rem balks at i64::MIN % -1, whose remainder is 0.
            return Ok(Value::Integer {
                value: a.checked_rem(*b).unwrap_or(0),
            });
        }

        let value = match operator.kind {
            TokenKind::Minus => a.checked_sub(*b),
            TokenKind::Mult => a.checked_mul(*b),
            _ => {
                return Err(internal_error(
                    "failed to interpret arithmetic operator",
                    operator,
                ))
            }
        };

        if let Some(value) = value {
            return Ok(Value::Integer { value });
        }
    }

    let (a, b) = (as_float(left), as_float(right));
    let value = match operator.kind {
        TokenKind::Minus => a - b,
        TokenKind::Mult => a * b,
        TokenKind::Mod => a % b,
        _ => {
            return Err(internal_error(
                "failed to interpret arithmetic operator",
                operator,
            ))
        }
    };

    Ok(Value::Float { value })
}

/// `/` yields a float even when both operands are integers.
fn eval_division(left: &Value, right: &Value, operator: &Token) -> Result<Value, RuntimeError> {
    check_numeric(left, operator)?;
    check_numeric(right, operator)?;

    if is_zero(right) {
        return Err(RuntimeError::new(RuntimeErrorType::DivideByZero, operator));
    }

    Ok(Value::Float {
        value: as_float(left) / as_float(right),
    })
}

/// An integer base with a non-negative integer exponent stays integer
/// while the result fits in one; everything else degrades to a float.
fn eval_power(left: &Value, right: &Value, operator: &Token) -> Result<Value, RuntimeError> {
    check_numeric(left, operator)?;
    check_numeric(right, operator)?;

    if let (Value::Integer { value: base }, Value::Integer { value: exponent }) = (left, right) {
        if *exponent >= 0 {
            let value = u32::try_from(*exponent)
                .ok()
                .and_then(|exponent| base.checked_pow(exponent));

            if let Some(value) = value {
                return Ok(Value::Integer { value });
            }
        }
    }

    Ok(Value::Float {
        value: as_float(left).powf(as_float(right)),
    })
}

fn is_orderable(value: &Value) -> bool {
    value.is_numeric() || matches!(value, Value::String { .. })
}

fn check_numeric(value: &Value, operator: &Token) -> Result<(), RuntimeError> {
    if value.is_numeric() {
        return Ok(());
    }

    Err(invalid_operand(value, operator))
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Integer { value } => *value as f64,
        Value::Float { value } => *value,
        // Callers check is_numeric first.
        _ => 0.0,
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Integer { value } => *value == 0,
        Value::Float { value } => *value == 0.0,
        _ => false,
    }
}

fn invalid_operand(operand: &Value, operator: &Token) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorType::InvalidOperand {
            operator: operator.lexeme.clone(),
            operand: operand.clone(),
        },
        operator,
    )
}

fn internal_error(message: &str, token: &Token) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorType::Internal {
            message: message.to_string(),
        },
        token,
    )
}
