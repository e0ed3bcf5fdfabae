use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::prelude::Value;

/// One scope frame. Frames form a chain through `enclosing`; the global
/// frame is the only one without a parent. Shared ownership keeps a frame
/// alive for as long as any closure captured it.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
    pub store: HashMap<String, Value>,
    pub enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            enclosing: Some(outer),
        }
    }

    /// Binds a fresh name in this frame. Returns false when the frame
    /// already binds the name; shadowing an enclosing frame is fine.
    pub fn define(&mut self, name: &str, value: Value) -> bool {
        if self.store.contains_key(name) {
            return false;
        }

        self.store.insert(name.to_string(), value);
        true
    }

    /// Rebinds the nearest visible binding, searching outward. Returns
    /// false when no frame binds the name.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(stored) = self.store.get_mut(name) {
            *stored = value;
            return true;
        }

        match &self.enclosing {
            Some(outer) => outer.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// Resolves a name against this frame and its enclosing chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.get(name) {
            return Some(value.clone());
        }

        self.enclosing
            .as_ref()
            .and_then(|outer| outer.borrow().get(name))
    }
}
