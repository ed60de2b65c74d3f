// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed dict view over a map field.

use crate::codec;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::script::{self, keys_equal, unpack, Builtin, Kwargs, Value};
use prost_reflect::{FieldDescriptor, Kind, MapKey, Value as ProtoValue};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// A map field as a script dict.
///
/// Keys and values are validated on every write. Under legacy proto2
/// rules, assigning `None` to a key deletes it; otherwise `None` values are
/// rejected.
#[derive(Debug)]
pub struct MapField {
    field: FieldDescriptor,
    key_field: FieldDescriptor,
    value_field: FieldDescriptor,
    entries: RefCell<Vec<(Value, Value)>>,
    frozen: Cell<bool>,
    legacy: bool,
    config: Arc<BridgeConfig>,
}

/// A validated write: `None` deletes the key.
type Update = (Value, Option<Value>);

impl MapField {
    /// Script-visible method names.
    pub const METHODS: [&'static str; 9] = [
        "clear",
        "get",
        "items",
        "keys",
        "pop",
        "popitem",
        "setdefault",
        "update",
        "values",
    ];

    /// Empty map for `field`.
    pub fn new(field: FieldDescriptor, config: Arc<BridgeConfig>) -> Result<Self> {
        let Kind::Message(entry) = field.kind() else {
            return Err(BridgeError::type_mismatch(
                field.name(),
                "field",
                "map",
            ));
        };
        let legacy = codec::is_legacy(&field, &config);
        Ok(Self {
            key_field: entry.map_entry_key_field(),
            value_field: entry.map_entry_value_field(),
            field,
            entries: RefCell::new(Vec::new()),
            frozen: Cell::new(false),
            legacy,
            config,
        })
    }

    /// Wrap stored entries, ordered by key.
    pub fn from_proto(
        field: FieldDescriptor,
        entries: &HashMap<MapKey, ProtoValue>,
        config: &Arc<BridgeConfig>,
    ) -> Result<Self> {
        let map = Self::new(field, Arc::clone(config))?;
        let value_kind = map.value_field.kind();
        let mut pairs: Vec<(Value, Value)> = entries
            .iter()
            .map(|(k, v)| {
                (
                    codec::map_key_to_script(k),
                    codec::scalar_to_script(v, &value_kind, config),
                )
            })
            .collect();
        pairs.sort_by(|(a, _), (b, _)| codec::key_order(a, b));
        *map.entries.borrow_mut() = pairs;
        Ok(map)
    }

    /// Validate a script dict (or map) against `field`.
    pub fn from_script(field: FieldDescriptor, value: &Value, config: &Arc<BridgeConfig>) -> Result<Self> {
        let map = Self::new(field, Arc::clone(config))?;
        let pairs = match value {
            Value::Dict(d) => d.entries(),
            Value::Map(m) => m.entries(),
            other => {
                return Err(BridgeError::type_mismatch(
                    other,
                    other.type_name(),
                    map.type_name(),
                ))
            }
        };
        let updates = map.check_pairs(pairs)?;
        map.commit(updates);
        Ok(map)
    }

    /// Stored form of the current entries.
    pub fn to_proto(&self) -> Result<HashMap<MapKey, ProtoValue>> {
        let key_kind = self.key_field.kind();
        let value_kind = self.value_field.kind();
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| {
                Ok((
                    codec::map_key_from_script(&key_kind, k, &self.config)?,
                    codec::to_proto(&value_kind, v, &self.config)?,
                ))
            })
            .collect()
    }

    pub fn field(&self) -> &FieldDescriptor {
        &self.field
    }

    /// `map<key, value>`.
    pub fn type_name(&self) -> String {
        format!(
            "map<{}, {}>",
            codec::kind_name(&self.key_field.kind()),
            codec::kind_name(&self.value_field.kind())
        )
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of the entries.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.borrow().iter().map(|(_, v)| v.clone()).collect()
    }

    /// Entries as `(key, value)` tuples.
    pub fn items(&self) -> Vec<Value> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
            .collect()
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &Value) -> Option<Value> {
        let entries = self.entries.borrow();
        entries
            .iter()
            .find(|(k, _)| keys_equal(k, key))
            .map(|(_, v)| v.clone())
    }

    /// `self[key]`.
    pub fn index(&self, key: &Value) -> Result<Value> {
        self.get(key)
            .ok_or_else(|| BridgeError::KeyNotFound(key.to_string()))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// `self[key] = value`.
    pub fn set(&self, key: &Value, value: &Value) -> Result<()> {
        self.check_mutable("set item of")?;
        let update = self.check_pair(key, value)?;
        self.commit(vec![update]);
        Ok(())
    }

    /// Return the value for `key`, inserting `default` first if absent.
    pub fn setdefault(&self, key: &Value, default: &Value) -> Result<Value> {
        self.check_mutable("set item of")?;
        if let Some(existing) = self.get(key) {
            return Ok(existing);
        }
        let (key, value) = self.check_pair(key, default)?;
        match value {
            Some(value) => {
                self.commit(vec![(key, Some(value.clone()))]);
                Ok(value)
            }
            None => Ok(Value::None),
        }
    }

    /// Apply pairs from a dict, map or sequence of pairs, then keywords.
    ///
    /// Every pair is validated before any is applied.
    pub fn update(&self, source: Option<&Value>, kwargs: &Kwargs) -> Result<()> {
        self.check_mutable("update")?;
        let mut pairs = match source {
            None => Vec::new(),
            Some(value) => pairs_of(value)?,
        };
        pairs.extend(
            kwargs
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), v.clone())),
        );
        let updates = self.check_pairs(pairs)?;
        self.commit(updates);
        Ok(())
    }

    /// Remove `key` and return its value, or `default` when absent.
    pub fn pop(&self, key: &Value, default: Option<Value>) -> Result<Value> {
        self.check_mutable("pop from")?;
        let position = self.position(key);
        match (position, default) {
            (Some(p), _) => Ok(self.entries.borrow_mut().remove(p).1),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(BridgeError::KeyNotFound(key.to_string())),
        }
    }

    /// Remove and return the first `(key, value)` pair.
    pub fn popitem(&self) -> Result<Value> {
        self.check_mutable("pop from")?;
        let mut entries = self.entries.borrow_mut();
        if entries.is_empty() {
            return Err(BridgeError::KeyNotFound("popitem(): map is empty".to_string()));
        }
        let (key, value) = entries.remove(0);
        Ok(Value::tuple(vec![key, value]))
    }

    pub fn clear(&self) -> Result<()> {
        self.check_mutable("clear")?;
        self.entries.borrow_mut().clear();
        Ok(())
    }

    pub fn freeze(&self) {
        if self.frozen.replace(true) {
            return;
        }
        for (key, value) in self.entries.borrow().iter() {
            key.freeze();
            value.freeze();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries
            .borrow()
            .iter()
            .position(|(k, _)| keys_equal(k, key))
    }

    fn check_pair(&self, key: &Value, value: &Value) -> Result<Update> {
        let key = codec::normalize(&self.key_field.kind(), key, &self.config)?;
        if value.is_none() {
            if self.legacy {
                return Ok((key, None));
            }
            return Err(BridgeError::NoneInProto3 {
                expected: codec::kind_name(&self.value_field.kind()),
            });
        }
        let value = codec::normalize(&self.value_field.kind(), value, &self.config)?;
        Ok((key, Some(value)))
    }

    fn check_pairs(&self, pairs: Vec<(Value, Value)>) -> Result<Vec<Update>> {
        pairs
            .iter()
            .map(|(k, v)| self.check_pair(k, v))
            .collect()
    }

    fn commit(&self, updates: Vec<Update>) {
        let mut entries = self.entries.borrow_mut();
        for (key, value) in updates {
            let position = entries.iter().position(|(k, _)| keys_equal(k, &key));
            match (position, value) {
                (Some(p), Some(value)) => entries[p].1 = value,
                (None, Some(value)) => entries.push((key, value)),
                (Some(p), None) => {
                    log::trace!("[proto] legacy None removes map key {}", key);
                    entries.remove(p);
                }
                (None, None) => {}
            }
        }
    }

    fn check_mutable(&self, verb: &str) -> Result<()> {
        if self.frozen.get() {
            return Err(BridgeError::frozen(verb, "map"));
        }
        Ok(())
    }

    // ========================================================================
    // Script methods
    // ========================================================================

    /// Bound method `name`, if the map has one.
    pub fn method(this: &Rc<Self>, name: &str) -> Option<Value> {
        let map = Rc::clone(this);
        let receiver = this.type_name();
        let callee = format!("{}.{}", receiver, name);
        let builtin = match name {
            "clear" => Builtin::method(receiver, name, move |args, kwargs| {
                unpack(&callee, args, kwargs, &[], 0)?;
                map.clear()?;
                Ok(Value::None)
            }),
            "get" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["key", "default"], 1)?;
                Ok(map.get(&bound.take(0)).unwrap_or_else(|| bound.take(1)))
            }),
            "items" => Builtin::method(receiver, name, move |args, kwargs| {
                unpack(&callee, args, kwargs, &[], 0)?;
                Ok(Value::list(map.items()))
            }),
            "keys" => Builtin::method(receiver, name, move |args, kwargs| {
                unpack(&callee, args, kwargs, &[], 0)?;
                Ok(Value::list(map.keys()))
            }),
            "values" => Builtin::method(receiver, name, move |args, kwargs| {
                unpack(&callee, args, kwargs, &[], 0)?;
                Ok(Value::list(map.values()))
            }),
            "pop" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["key", "default"], 1)?;
                let key = bound.take(0);
                map.pop(&key, bound.take_opt(1))
            }),
            "popitem" => Builtin::method(receiver, name, move |args, kwargs| {
                unpack(&callee, args, kwargs, &[], 0)?;
                map.popitem()
            }),
            "setdefault" => Builtin::method(receiver, name, move |args, kwargs| {
                let mut bound = unpack(&callee, args, kwargs, &["key", "default"], 1)?;
                let key = bound.take(0);
                map.setdefault(&key, &bound.take(1))
            }),
            "update" => Builtin::method(receiver, name, move |args, kwargs| {
                if args.len() > 1 {
                    return Err(BridgeError::TooManyArguments {
                        callee: callee.clone(),
                        max: 1,
                        got: args.len(),
                    });
                }
                map.update(args.first(), kwargs)?;
                Ok(Value::None)
            }),
            _ => return None,
        };
        Some(Value::builtin(builtin))
    }
}

/// Key/value pairs from a mapping or a sequence of 2-element sequences.
fn pairs_of(value: &Value) -> Result<Vec<(Value, Value)>> {
    match value {
        Value::Dict(d) => Ok(d.entries()),
        Value::Map(m) => Ok(m.entries()),
        Value::List(_) | Value::Tuple(_) | Value::Repeated(_) => value
            .iterate()?
            .into_iter()
            .map(|pair| {
                let parts = pair.iterate()?;
                match <[Value; 2]>::try_from(parts) {
                    Ok([k, v]) => Ok((k, v)),
                    Err(parts) => Err(BridgeError::UnsupportedOperation {
                        op: "update".to_string(),
                        operands: format!("sequence element of length {}", parts.len()),
                    }),
                }
            })
            .collect(),
        other => Err(BridgeError::UnsupportedOperation {
            op: "update".to_string(),
            operands: other.type_name(),
        }),
    }
}

impl fmt::Display for MapField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        script::write_mapping(f, &self.entries.borrow())
    }
}
