use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use crate::runtime::prelude::{Builtin, NolangFunction};

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };
pub const NOL: Value = Value::Nol;

#[derive(Debug, Clone)]
pub enum Value {
    Integer {
        value: i64,
    },
    Float {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool,
    },
    Array {
        elements: Rc<RefCell<Vec<Value>>>,
    },
    Function {
        function: Rc<NolangFunction>,
    },
    Builtin {
        builtin: Builtin,
    },
    Nol,
}

impl Value {
    pub fn _type(&self) -> ValueType {
        match self {
            Self::Integer { .. } => ValueType::Integer,
            Self::Float { .. } => ValueType::Float,
            Self::String { .. } => ValueType::String,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::Array { .. } => ValueType::Array,
            Self::Function { .. } | Self::Builtin { .. } => ValueType::Callable,
            Self::Nol => ValueType::Nol,
        }
    }

    /// Nol and the zero numbers are false, Booleans pass through, and
    /// everything else (the empty string included) is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nol => false,
            Value::Boolean { value } => *value,
            Value::Integer { value } => *value != 0,
            Value::Float { value } => *value != 0.0,
            _ => true,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer { .. } | Value::Float { .. })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer { value: a }, Value::Integer { value: b }) => a == b,
            (Value::Float { value: a }, Value::Float { value: b }) => a == b,
            (Value::Integer { value: a }, Value::Float { value: b })
            | (Value::Float { value: b }, Value::Integer { value: a }) => *a as f64 == *b,
            (Value::String { value: a }, Value::String { value: b }) => a == b,
            (Value::Boolean { value: a }, Value::Boolean { value: b }) => a == b,
            (Value::Array { elements: a }, Value::Array { elements: b }) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Function { function: a }, Value::Function { function: b }) => {
                Rc::ptr_eq(a, b)
            }
            (Value::Builtin { builtin: a }, Value::Builtin { builtin: b }) => a == b,
            (Value::Nol, Value::Nol) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer { value } => write!(f, "{value}"),
            // Debug keeps the trailing `.0` on whole floats.
            Value::Float { value } => write!(f, "{value:?}"),
            Value::String { value } => write!(f, "{value}"),
            Value::Boolean { value } => {
                write!(f, "{}", if *value { "True" } else { "False" })
            }
            Value::Array { elements } => {
                let elements = elements
                    .borrow()
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");

                write!(f, "[{elements}]")
            }
            Value::Function { function } => write!(f, "<greg {}>", function.name()),
            Value::Builtin { builtin } => write!(f, "<greg {}>", builtin.name()),
            Value::Nol => write!(f, "nol"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
    Array,
    Callable,
    Nol,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Integer => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Boolean => "bool",
            ValueType::Array => "array",
            ValueType::Callable => "greg",
            ValueType::Nol => "nol",
        };

        write!(f, "{name}")
    }
}
