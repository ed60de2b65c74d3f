// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native script dict (insertion ordered).

use crate::error::{BridgeError, Result};
use crate::script::Value;
use std::cell::{Cell, RefCell};

/// Mutable, freezable, insertion-ordered script dict.
///
/// Keys must be hashable script values; lookups compare keys with script
/// equality.
#[derive(Debug, Default)]
pub struct Dict {
    entries: RefCell<Vec<(Value, Value)>>,
    frozen: Cell<bool>,
}

impl Dict {
    /// Create an empty dict.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dict from key/value pairs. Later duplicates win.
    pub fn from_entries(entries: Vec<(Value, Value)>) -> Result<Self> {
        let dict = Self::new();
        for (key, value) in entries {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    /// Build a dict from distinct scalar keys, as read out of a map field.
    pub(crate) fn from_scalar_keys(entries: Vec<(Value, Value)>) -> Self {
        Self {
            entries: RefCell::new(entries),
            frozen: Cell::new(false),
        }
    }

    /// Look up `key`.
    pub fn get(&self, key: &Value) -> Result<Option<Value>> {
        key.hash()?;
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|(k, _)| keys_equal(k, key))
            .map(|(_, v)| v.clone()))
    }

    /// Insert or replace `key`, keeping the original position on replace.
    pub fn insert(&self, key: Value, value: Value) -> Result<()> {
        self.check_mutable("set item of")?;
        key.hash()?;
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(k, _)| keys_equal(k, &key)) {
            Some(slot) => slot.1 = value,
            None => entries.push((key, value)),
        }
        Ok(())
    }

    /// Remove `key`, returning its value if present.
    pub fn remove(&self, key: &Value) -> Result<Option<Value>> {
        self.check_mutable("delete from")?;
        let mut entries = self.entries.borrow_mut();
        let position = entries.iter().position(|(k, _)| keys_equal(k, key));
        Ok(position.map(|p| entries.remove(p).1))
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }

    /// Snapshot of the keys in insertion order.
    pub fn keys(&self) -> Vec<Value> {
        self.entries.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the dict is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Freeze the dict and every key and value.
    pub fn freeze(&self) {
        if self.frozen.replace(true) {
            return;
        }
        for (key, value) in self.entries.borrow().iter() {
            key.freeze();
            value.freeze();
        }
    }

    /// Whether the dict rejects mutation.
    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    fn check_mutable(&self, verb: &str) -> Result<()> {
        if self.frozen.get() {
            return Err(BridgeError::frozen(verb, "dict"));
        }
        Ok(())
    }
}

/// Key equality for hashable script values.
pub(crate) fn keys_equal(a: &Value, b: &Value) -> bool {
    a.equals(b).unwrap_or(false)
}
