// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed list view over a repeated field.

use crate::codec;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::script::{self, resolve_index, slice_bounds, unpack, Builtin, Value};
use prost_reflect::{FieldDescriptor, Kind, Value as ProtoValue};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A repeated field as a script list.
///
/// Every element is validated against the element kind before it is
/// stored. Bulk operations validate all incoming elements first and leave
/// the list untouched on failure.
#[derive(Debug)]
pub struct RepeatedField {
    field: FieldDescriptor,
    items: RefCell<Vec<Value>>,
    frozen: Cell<bool>,
    config: Arc<BridgeConfig>,
}

impl RepeatedField {
    /// Script-visible method names.
    pub const METHODS: [&'static str; 7] =
        ["append", "clear", "extend", "index", "insert", "pop", "remove"];

    /// Empty list for `field`.
    pub fn new(field: FieldDescriptor, config: Arc<BridgeConfig>) -> Self {
        Self {
            field,
            items: RefCell::new(Vec::new()),
            frozen: Cell::new(false),
            config,
        }
    }

    /// Wrap stored elements.
    pub fn from_proto(field: FieldDescriptor, items: &[ProtoValue], config: &Arc<BridgeConfig>) -> Self {
        let kind = field.kind();
        let values = items
            .iter()
            .map(|item| codec::scalar_to_script(item, &kind, config))
            .collect();
        Self {
            field,
            items: RefCell::new(values),
            frozen: Cell::new(false),
            config: Arc::clone(config),
        }
    }

    /// Validate any script sequence against `field`.
    pub fn from_script(field: FieldDescriptor, value: &Value, config: &Arc<BridgeConfig>) -> Result<Self> {
        let list = Self::new(field, Arc::clone(config));
        let incoming = match value {
            Value::List(_) | Value::Tuple(_) | Value::Repeated(_) => value.iterate()?,
            other => {
                return Err(BridgeError::type_mismatch(
                    other,
                    other.type_name(),
                    list.type_name(),
                ))
            }
        };
        let checked = list.check_all(&incoming)?;
        *list.items.borrow_mut() = checked;
        Ok(list)
    }

    /// Stored form of the current elements.
    pub fn to_proto(&self) -> Result<Vec<ProtoValue>> {
        let kind = self.kind();
        self.items
            .borrow()
            .iter()
            .map(|item| codec::to_proto(&kind, item, &self.config))
            .collect()
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    fn kind(&self) -> Kind {
        self.field.kind()
    }

    /// `list<elem>`.
    pub fn type_name(&self) -> String {
        format!("list<{}>", codec::kind_name(&self.kind()))
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Snapshot of the elements.
    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    /// Element at `index` (negative counts from the end).
    pub fn get(&self, index: i128) -> Result<Value> {
        let items = self.items.borrow();
        let position = resolve_index(index, items.len())?;
        Ok(items[position].clone())
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    pub fn append(&self, value: &Value) -> Result<()> {
        self.check_mutable("append to")?;
        let checked = self.check(value)?;
        self.items.borrow_mut().push(checked);
        Ok(())
    }

    /// Append every element of a script sequence, all or nothing.
    pub fn extend(&self, iterable: &Value) -> Result<()> {
        self.check_mutable("extend")?;
        let incoming = iterable.iterate()?;
        let checked = self.check_all(&incoming)?;
        self.items.borrow_mut().extend(checked);
        Ok(())
    }

    pub fn set_index(&self, index: i128, value: &Value) -> Result<()> {
        self.check_mutable("set item of")?;
        let checked = self.check(value)?;
        let mut items = self.items.borrow_mut();
        let position = resolve_index(index, items.len())?;
        items[position] = checked;
        Ok(())
    }

    /// Insert before `index`, clamped to the list bounds.
    pub fn insert(&self, index: i128, value: &Value) -> Result<()> {
        self.check_mutable("insert into")?;
        let checked = self.check(value)?;
        let mut items = self.items.borrow_mut();
        let (position, _) = slice_bounds(Some(index), None, items.len());
        items.insert(position, checked);
        Ok(())
    }

    /// Remove the first element equal to `value`.
    pub fn remove(&self, value: &Value) -> Result<()> {
        self.check_mutable("remove from")?;
        let position = self.index_of(value)?;
        self.items.borrow_mut().remove(position);
        Ok(())
    }

    /// Remove and return the element at `index` (default: last).
    pub fn pop(&self, index: Option<i128>) -> Result<Value> {
        self.check_mutable("pop from")?;
        let mut items = self.items.borrow_mut();
        let position = resolve_index(index.unwrap_or(-1), items.len())?;
        Ok(items.remove(position))
    }

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value: &Value) -> Result<usize> {
        let items = self.items();
        for (position, item) in items.iter().enumerate() {
            if item.equals(value)? {
                return Ok(position);
            }
        }
        Err(BridgeError::ElementNotFound(value.to_string()))
    }

    pub fn clear(&self) -> Result<()> {
        self.check_mutable("clear")?;
        self.items.borrow_mut().clear();
        Ok(())
    }

    /// `self[start:end]` as a plain list.
    pub fn slice(&self, start: Option<i128>, end: Option<i128>) -> Value {
        let items = self.items.borrow();
        let (lo, hi) = slice_bounds(start, end, items.len());
        Value::list(items[lo..hi].to_vec())
    }

    /// `self + other`: a new list of the same element type.
    pub fn concat(&self, other: &Value) -> Result<RepeatedField> {
        let incoming = other.iterate()?;
        let checked = self.check_all(&incoming)?;
        let mut items = self.items();
        items.extend(checked);
        let result = Self::new(self.field.clone(), Arc::clone(&self.config));
        *result.items.borrow_mut() = items;
        Ok(result)
    }

    pub fn freeze(&self) {
        if self.frozen.replace(true) {
            return;
        }
        for item in self.items.borrow().iter() {
            item.freeze();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    fn check(&self, value: &Value) -> Result<Value> {
        codec::normalize(&self.kind(), value, &self.config)
    }

    fn check_all(&self, values: &[Value]) -> Result<Vec<Value>> {
        let kind = self.kind();
        values
            .iter()
            .map(|v| codec::normalize(&kind, v, &self.config))
            .collect()
    }

    fn check_mutable(&self, verb: &str) -> Result<()> {
        if self.frozen.get() {
            return Err(BridgeError::frozen(verb, "list"));
        }
        Ok(())
    }

    // ========================================================================
    // Script methods
    // ========================================================================

    /// Bound method `name`, if the list has one.
    pub fn method(this: &Rc<Self>, name: &str) -> Option<Value> {
        let list = Rc::clone(this);
        let receiver = this.type_name();
        let callee = format!("{}.{}", receiver, name);
        let builtin = match name {
            "append" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["x"], 1)?;
                list.append(&bound.take(0))?;
                Ok(Value::None)
            }),
            "extend" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["x"], 1)?;
                list.extend(&bound.take(0))?;
                Ok(Value::None)
            }),
            "clear" => Builtin::method(receiver, name, move |args, kwargs| {
                unpack(&callee, args, kwargs, &[], 0)?;
                list.clear()?;
                Ok(Value::None)
            }),
            "index" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["x"], 1)?;
                let position = list.index_of(&bound.take(0))?;
                Ok(Value::Int(position as i128))
            }),
            "insert" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["index", "x"], 2)?;
                let index = int_arg(&callee, "index", &bound.take(0))?;
                list.insert(index, &bound.take(1))?;
                Ok(Value::None)
            }),
            "pop" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["index"], 0)?;
                let index = match bound.take_opt(0) {
                    Some(v) => Some(int_arg(&callee, "index", &v)?),
                    None => None,
                };
                list.pop(index)
            }),
            "remove" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["x"], 1)?;
                list.remove(&bound.take(0))?;
                Ok(Value::None)
            }),
            _ => return None,
        };
        Some(Value::builtin(builtin))
    }
}

fn int_arg(callee: &str, param: &str, value: &Value) -> Result<i128> {
    value.as_int().ok_or_else(|| BridgeError::ArgumentType {
        callee: callee.to_string(),
        param: param.to_string(),
        expected: "int".to_string(),
        got: value.type_name(),
    })
}

impl fmt::Display for RepeatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        script::write_list(f, &self.items.borrow())
    }
}
