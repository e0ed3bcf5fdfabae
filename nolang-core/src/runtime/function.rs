use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    environment::prelude::{Environment, Value, NOL},
    eval::prelude::{Flow, Interpreter, RuntimeError, RuntimeErrorType},
    parser::prelude::FunDeclaration,
};

/// A user-declared function together with the environment it closed
/// over. The captured frame, not the caller's, becomes the parent of
/// each invocation frame.
#[derive(Debug)]
pub struct NolangFunction {
    pub declaration: FunDeclaration,
    pub env: Rc<RefCell<Environment>>,
}

impl NolangFunction {
    pub fn new(declaration: FunDeclaration, env: Rc<RefCell<Environment>>) -> Self {
        Self { declaration, env }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut env = Environment::enclosed(Rc::clone(&self.env));

        for (param, arg) in self.declaration.params.iter().zip(args) {
            if !env.define(&param.lexeme, arg) {
                return Err(RuntimeError::new(
                    RuntimeErrorType::VariableRedefinition {
                        name: param.lexeme.clone(),
                    },
                    param,
                ));
            }
        }

        match interpreter.execute_body(&self.declaration.body, env)? {
            Flow::Returning(value) => Ok(value),
            Flow::Normal => Ok(NOL),
        }
    }
}
