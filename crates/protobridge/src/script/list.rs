// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native script list.

use crate::error::{BridgeError, Result};
use crate::script::Value;
use std::cell::{Cell, RefCell};

/// Mutable, freezable script list.
#[derive(Debug, Default)]
pub struct List {
    items: RefCell<Vec<Value>>,
    frozen: Cell<bool>,
}

impl List {
    /// Create a list holding `items`.
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: RefCell::new(items),
            frozen: Cell::new(false),
        }
    }

    /// Snapshot of the current elements.
    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Element at a resolved (non-negative) position.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    /// Append one element.
    pub fn push(&self, value: Value) -> Result<()> {
        self.check_mutable("append to")?;
        self.items.borrow_mut().push(value);
        Ok(())
    }

    /// Replace the element at a resolved position.
    pub fn set(&self, index: usize, value: Value) -> Result<()> {
        self.check_mutable("set item of")?;
        let mut items = self.items.borrow_mut();
        let length = items.len();
        let slot = items.get_mut(index).ok_or(BridgeError::IndexOutOfRange {
            index: index as i64,
            length,
        })?;
        *slot = value;
        Ok(())
    }

    /// Freeze the list and every element.
    pub fn freeze(&self) {
        if self.frozen.replace(true) {
            return;
        }
        for item in self.items.borrow().iter() {
            item.freeze();
        }
    }

    /// Whether the list rejects mutation.
    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    fn check_mutable(&self, verb: &str) -> Result<()> {
        if self.frozen.get() {
            return Err(BridgeError::frozen(verb, "list"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_set() {
        let list = List::new(vec![Value::Int(1)]);
        list.push(Value::Int(2)).expect("push");
        list.set(0, Value::Int(10)).expect("set");
        assert_eq!(list.len(), 2);
        assert!(matches!(list.get(0), Some(Value::Int(10))));
        assert!(list.set(5, Value::None).is_err());
    }

    #[test]
    fn test_frozen_list_rejects_push() {
        let list = List::new(Vec::new());
        list.freeze();
        let err = list.push(Value::Int(1)).expect_err("frozen");
        assert_eq!(err.to_string(), "cannot append to frozen list");
    }
}
