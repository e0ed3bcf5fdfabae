use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::{
    environment::prelude::{Value, ValueType, NOL},
    eval::prelude::{RuntimeError, RuntimeErrorType},
    lexer::prelude::Token,
};

/// Host-implemented callables. All but `nolin` live in the global frame;
/// `nolin` has its own syntactic form and the evaluator dispatches to it
/// directly, so the name never resolves as an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Nolout,
    Nolin,
    Time,
    Random,
    Int,
    Float,
    RoundUp,
    RoundDown,
}

/// Builtins installed into the global frame at interpreter startup.
pub const GLOBALS: [Builtin; 7] = [
    Builtin::Nolout,
    Builtin::Time,
    Builtin::Random,
    Builtin::Int,
    Builtin::Float,
    Builtin::RoundUp,
    Builtin::RoundDown,
];

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Nolout => "nolout",
            Builtin::Nolin => "nolin",
            Builtin::Time => "time",
            Builtin::Random => "random",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::RoundUp => "roundup",
            Builtin::RoundDown => "rounddown",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::Time | Builtin::Random => 0,
            _ => 1,
        }
    }

    /// Runs the builtin. The caller has already checked arity, so `args`
    /// holds exactly `self.arity()` values.
    pub fn call(&self, args: Vec<Value>, token: &Token) -> Result<Value, RuntimeError> {
        match self {
            Builtin::Nolout => {
                println!("{}", args[0]);
                Ok(NOL)
            }
            Builtin::Nolin => {
                print!("{}", args[0]);
                io::stdout()
                    .flush()
                    .map_err(|error| host_error(error, token))?;

                let mut line = String::new();
                io::stdin()
                    .read_line(&mut line)
                    .map_err(|error| host_error(error, token))?;

                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }

                Ok(Value::String { value: line })
            }
            Builtin::Time => {
                let since_epoch = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_err(|error| host_error(error, token))?;

                Ok(Value::Integer {
                    value: since_epoch.as_millis() as i64,
                })
            }
            Builtin::Random => {
                let mut rng = rand::thread_rng();
                Ok(Value::Float {
                    value: rng.gen::<f64>(),
                })
            }
            Builtin::Int => match &args[0] {
                Value::Integer { value } => Ok(Value::Integer { value: *value }),
                Value::Float { value } if value.is_finite() => Ok(Value::Integer {
                    value: *value as i64,
                }),
                Value::Boolean { value } => Ok(Value::Integer {
                    value: *value as i64,
                }),
                Value::String { value } => match value.trim().parse::<i64>() {
                    Ok(value) => Ok(Value::Integer { value }),
                    Err(_) => Err(conversion_error(&args[0], ValueType::Integer, token)),
                },
                _ => Err(conversion_error(&args[0], ValueType::Integer, token)),
            },
            Builtin::Float => match &args[0] {
                Value::Float { value } => Ok(Value::Float { value: *value }),
                Value::Integer { value } => Ok(Value::Float {
                    value: *value as f64,
                }),
                Value::Boolean { value } => Ok(Value::Float {
                    value: u8::from(*value) as f64,
                }),
                Value::String { value } => match value.trim().parse::<f64>() {
                    Ok(value) => Ok(Value::Float { value }),
                    Err(_) => Err(conversion_error(&args[0], ValueType::Float, token)),
                },
                _ => Err(conversion_error(&args[0], ValueType::Float, token)),
            },
            Builtin::RoundUp => match &args[0] {
                Value::Integer { value } => Ok(Value::Integer { value: *value }),
                Value::Float { value } if value.is_finite() => Ok(Value::Integer {
                    value: value.ceil() as i64,
                }),
                _ => Err(conversion_error(&args[0], ValueType::Integer, token)),
            },
            Builtin::RoundDown => match &args[0] {
                Value::Integer { value } => Ok(Value::Integer { value: *value }),
                Value::Float { value } if value.is_finite() => Ok(Value::Integer {
                    value: value.floor() as i64,
                }),
                _ => Err(conversion_error(&args[0], ValueType::Integer, token)),
            },
        }
    }
}

fn conversion_error(value: &Value, target: ValueType, token: &Token) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorType::InvalidConversion {
            value: value.clone(),
            target,
        },
        token,
    )
}

fn host_error(error: impl std::fmt::Display, token: &Token) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorType::Internal {
            message: error.to_string(),
        },
        token,
    )
}
