// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Script-side value model.
//!
//! [`Value`] is the closed set of values a host evaluator exchanges with the
//! bridge. Every variant answers the same capability protocol (attribute
//! access, field assignment, indexing, iteration, equality, hashing,
//! freezing, calling), dispatched by `match` rather than through trait
//! objects.
//!
//! Aggregates use interior mutability (`RefCell` + a frozen flag) and are
//! shared through `Rc`, so values are single-threaded like the evaluator
//! that owns them. Schema handles (`MessageType`, `EnumType`, `Package`)
//! are immutable and shared through `Arc` so a loader can cache them.

pub mod args;
mod builtin;
mod dict;
mod list;

pub use args::{unpack, BoundArgs};
pub use builtin::{Builtin, Module, NativeFn};
pub use dict::Dict;
pub use list::List;

pub(crate) use dict::keys_equal;

use crate::container::{MapField, RepeatedField};
use crate::error::{BridgeError, Result};
use crate::message::MessageValue;
use crate::types::{EnumType, EnumValue, MessageType, Package};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

/// Keyword arguments, in call order.
pub type Kwargs = [(String, Value)];

/// A script value.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value.
    None,
    Bool(bool),
    /// Arbitrary-width integer (wide enough for every 64-bit schema type).
    Int(i128),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Tuple(Rc<Vec<Value>>),
    List(Rc<List>),
    Dict(Rc<Dict>),
    /// Protobuf message instance.
    Message(Rc<MessageValue>),
    /// Typed wrapper over a repeated field.
    Repeated(Rc<RepeatedField>),
    /// Typed wrapper over a map field.
    Map(Rc<MapField>),
    /// Protobuf enum value.
    Enum(EnumValue),
    MessageType(Arc<MessageType>),
    EnumType(Arc<EnumType>),
    Package(Arc<Package>),
    Builtin(Rc<Builtin>),
    Module(Rc<Module>),
}

/// Comparison operator passed to [`Value::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl Value {
    /// New mutable list.
    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Rc::new(List::new(items)))
    }

    /// New tuple.
    pub fn tuple(items: Vec<Value>) -> Self {
        Self::Tuple(Rc::new(items))
    }

    /// New dict from key/value pairs.
    pub fn dict(entries: Vec<(Value, Value)>) -> Result<Self> {
        Ok(Self::Dict(Rc::new(Dict::from_entries(entries)?)))
    }

    /// Wrap a message instance.
    pub fn message(message: MessageValue) -> Self {
        Self::Message(Rc::new(message))
    }

    /// Wrap a native function.
    pub fn builtin(builtin: Builtin) -> Self {
        Self::Builtin(Rc::new(builtin))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i128::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(i128::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i128::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Int(i128::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Value {
    /// Check for the absent value.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Integer payload, if any.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// String payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Message payload, if any.
    pub fn as_message(&self) -> Option<&Rc<MessageValue>> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Script type name.
    pub fn type_name(&self) -> String {
        match self {
            Self::None => "NoneType".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::String(_) => "string".to_string(),
            Self::Bytes(_) => "bytes".to_string(),
            Self::Tuple(_) => "tuple".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Dict(_) => "dict".to_string(),
            Self::Message(m) => m.type_name(),
            Self::Repeated(r) => r.type_name(),
            Self::Map(m) => m.type_name(),
            Self::Enum(_) => "proto.EnumValue".to_string(),
            Self::MessageType(_) => "proto.MessageType".to_string(),
            Self::EnumType(_) => "proto.EnumType".to_string(),
            Self::Package(_) => "proto.Package".to_string(),
            Self::Builtin(_) => "builtin_function_or_method".to_string(),
            Self::Module(_) => "module".to_string(),
        }
    }

    /// Script truthiness.
    pub fn truth(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Bytes(b) => !b.is_empty(),
            Self::Tuple(t) => !t.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Dict(d) => !d.is_empty(),
            Self::Repeated(r) => !r.is_empty(),
            Self::Map(m) => !m.is_empty(),
            Self::Enum(e) => e.number() != 0,
            Self::Message(_)
            | Self::MessageType(_)
            | Self::EnumType(_)
            | Self::Package(_)
            | Self::Builtin(_)
            | Self::Module(_) => true,
        }
    }
}

// ============================================================================
// Capability protocol
// ============================================================================

impl Value {
    /// Make the value and everything reachable from it immutable.
    pub fn freeze(&self) {
        match self {
            Self::Tuple(items) => items.iter().for_each(Value::freeze),
            Self::List(l) => l.freeze(),
            Self::Dict(d) => d.freeze(),
            Self::Message(m) => m.freeze(),
            Self::Repeated(r) => r.freeze(),
            Self::Map(m) => m.freeze(),
            _ => {}
        }
    }

    /// Hash for use as a dict or map key.
    ///
    /// Messages and containers are unhashable.
    pub fn hash(&self) -> Result<u64> {
        let mut hasher = DefaultHasher::new();
        self.hash_into(&mut hasher)?;
        Ok(hasher.finish())
    }

    fn hash_into(&self, hasher: &mut DefaultHasher) -> Result<()> {
        match self {
            Self::None => 0u8.hash(hasher),
            Self::Bool(b) => b.hash(hasher),
            Self::Int(i) => i.hash(hasher),
            Self::Float(f) => {
                // Integral floats hash like the equal int.
                if f.fract() == 0.0 && f.is_finite() {
                    (*f as i128).hash(hasher)
                } else {
                    f.to_bits().hash(hasher)
                }
            }
            Self::String(s) => s.hash(hasher),
            Self::Bytes(b) => b.hash(hasher),
            Self::Tuple(items) => {
                for item in items.iter() {
                    item.hash_into(hasher)?;
                }
            }
            Self::Enum(e) => {
                e.enum_name().hash(hasher);
                e.number().hash(hasher);
            }
            Self::MessageType(t) => t.full_name().hash(hasher),
            Self::EnumType(t) => t.full_name().hash(hasher),
            Self::Package(p) => p.name().hash(hasher),
            Self::Builtin(b) => (Rc::as_ptr(b) as usize).hash(hasher),
            Self::Module(m) => m.name().hash(hasher),
            Self::List(_) | Self::Dict(_) | Self::Message(_) | Self::Repeated(_) | Self::Map(_) => {
                return Err(BridgeError::Unhashable(self.type_name()));
            }
        }
        Ok(())
    }

    /// Read an attribute. `Ok(None)` means no such attribute.
    pub fn attr(&self, name: &str) -> Result<Option<Value>> {
        match self {
            Self::Message(m) => m.attr(name),
            Self::Repeated(r) => Ok(RepeatedField::method(r, name)),
            Self::Map(m) => Ok(MapField::method(m, name)),
            Self::MessageType(t) => Ok(t.nested(name).map(|n| n.to_value())),
            Self::EnumType(t) => t.value(name).map(|v| Some(Value::Enum(v))),
            Self::Package(p) => p.member(name).map(Some),
            Self::Module(m) => Ok(m.get(name)),
            Self::Enum(e) => Ok(match name {
                "name" => Some(Value::String(e.name().unwrap_or_default())),
                "number" => Some(Value::Int(i128::from(e.number()))),
                _ => None,
            }),
            _ => Ok(None),
        }
    }

    /// Names of the attributes this value exposes.
    pub fn attr_names(&self) -> Vec<String> {
        match self {
            Self::Message(m) => m.attr_names(),
            Self::Repeated(_) => RepeatedField::METHODS.iter().map(|s| s.to_string()).collect(),
            Self::Map(_) => MapField::METHODS.iter().map(|s| s.to_string()).collect(),
            Self::MessageType(t) => t.nested_names(),
            Self::EnumType(t) => t.names(),
            Self::Package(p) => p.names(),
            Self::Module(m) => m.names().into_iter().map(str::to_string).collect(),
            Self::Enum(_) => vec!["name".to_string(), "number".to_string()],
            _ => Vec::new(),
        }
    }

    /// Assign a field. Only messages have assignable fields.
    pub fn set_field(&self, name: &str, value: Value) -> Result<()> {
        match self {
            Self::Message(m) => m.set_field(name, value),
            _ => Err(BridgeError::NoSuchAttribute {
                type_name: self.type_name(),
                name: name.to_string(),
            }),
        }
    }

    /// Call the value.
    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
        match self {
            Self::MessageType(t) => t.construct(args, kwargs),
            Self::Builtin(b) => b.call(args, kwargs),
            _ => Err(BridgeError::NotCallable(self.type_name())),
        }
    }

    /// `self[key]`.
    pub fn index(&self, key: &Value) -> Result<Value> {
        match self {
            Self::Tuple(items) => {
                let position = resolve_index(self.index_operand(key)?, items.len())?;
                Ok(items[position].clone())
            }
            Self::List(l) => {
                let position = resolve_index(self.index_operand(key)?, l.len())?;
                l.get(position).ok_or(BridgeError::IndexOutOfRange {
                    index: position as i64,
                    length: l.len(),
                })
            }
            Self::Repeated(r) => r.get(self.index_operand(key)?),
            Self::Dict(d) => d
                .get(key)?
                .ok_or_else(|| BridgeError::KeyNotFound(key.to_string())),
            Self::Map(m) => m.index(key),
            _ => Err(self.unsupported("[]", Some(key))),
        }
    }

    /// `self[key] = value`.
    pub fn set_index(&self, key: &Value, value: Value) -> Result<()> {
        match self {
            Self::List(l) => {
                let position = resolve_index(self.index_operand(key)?, l.len())?;
                l.set(position, value)
            }
            Self::Repeated(r) => r.set_index(self.index_operand(key)?, &value),
            Self::Dict(d) => d.insert(key.clone(), value),
            Self::Map(m) => m.set(key, &value),
            _ => Err(self.unsupported("[]=", Some(key))),
        }
    }

    /// `self[start:end]`. Always produces a plain list or tuple.
    pub fn slice(&self, start: Option<i128>, end: Option<i128>) -> Result<Value> {
        match self {
            Self::Tuple(items) => {
                let (lo, hi) = slice_bounds(start, end, items.len());
                Ok(Value::tuple(items[lo..hi].to_vec()))
            }
            Self::List(l) => {
                let items = l.items();
                let (lo, hi) = slice_bounds(start, end, items.len());
                Ok(Value::list(items[lo..hi].to_vec()))
            }
            Self::Repeated(r) => Ok(r.slice(start, end)),
            _ => Err(self.unsupported("slice", None)),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> Result<usize> {
        match self {
            Self::String(s) => Ok(s.len()),
            Self::Bytes(b) => Ok(b.len()),
            Self::Tuple(t) => Ok(t.len()),
            Self::List(l) => Ok(l.len()),
            Self::Dict(d) => Ok(d.len()),
            Self::Repeated(r) => Ok(r.len()),
            Self::Map(m) => Ok(m.len()),
            _ => Err(self.unsupported("len", None)),
        }
    }

    /// Snapshot of the elements (mapping keys for dicts and maps).
    pub fn iterate(&self) -> Result<Vec<Value>> {
        match self {
            Self::Tuple(t) => Ok(t.to_vec()),
            Self::List(l) => Ok(l.items()),
            Self::Dict(d) => Ok(d.keys()),
            Self::Repeated(r) => Ok(r.items()),
            Self::Map(m) => Ok(m.keys()),
            _ => Err(self.unsupported("iterate", None)),
        }
    }

    /// `needle in self`.
    pub fn contains(&self, needle: &Value) -> Result<bool> {
        match self {
            Self::String(s) => match needle {
                Self::String(sub) => Ok(s.contains(sub.as_str())),
                _ => Err(self.unsupported("in", Some(needle))),
            },
            Self::Dict(d) => Ok(d.get(needle)?.is_some()),
            Self::Map(m) => Ok(m.contains(needle)),
            Self::Tuple(_) | Self::List(_) | Self::Repeated(_) => {
                Ok(self.iterate()?.iter().any(|item| keys_equal(item, needle)))
            }
            _ => Err(self.unsupported("in", Some(needle))),
        }
    }

    /// Structural equality.
    pub fn equals(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Self::None, Self::None) => Ok(true),
            (Self::Bool(a), Self::Bool(b)) => Ok(a == b),
            (Self::Int(a), Self::Int(b)) => Ok(a == b),
            (Self::Float(a), Self::Float(b)) => Ok(a == b),
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                Ok((*a as f64) == *b)
            }
            (Self::String(a), Self::String(b)) => Ok(a == b),
            (Self::Bytes(a), Self::Bytes(b)) => Ok(a == b),
            (Self::Enum(a), Self::Enum(b)) => Ok(a == b),
            (Self::Message(a), Self::Message(b)) => {
                if Rc::ptr_eq(a, b) {
                    return Ok(true);
                }
                if a.full_name() != b.full_name() {
                    return Ok(false);
                }
                a.equals(b)
            }
            (Self::Tuple(a), Self::Tuple(b)) => sequences_equal(a, b),
            (
                Self::List(_) | Self::Repeated(_),
                Self::List(_) | Self::Repeated(_),
            ) => sequences_equal(&self.iterate()?, &other.iterate()?),
            (Self::Dict(_) | Self::Map(_), Self::Dict(_) | Self::Map(_)) => {
                let (left, right) = (self.mapping_entries(), other.mapping_entries());
                if left.len() != right.len() {
                    return Ok(false);
                }
                for (key, value) in &left {
                    let Some((_, theirs)) = right.iter().find(|(k, _)| keys_equal(k, key)) else {
                        return Ok(false);
                    };
                    if !value.equals(theirs)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Self::MessageType(a), Self::MessageType(b)) => Ok(a.full_name() == b.full_name()),
            (Self::EnumType(a), Self::EnumType(b)) => Ok(a.full_name() == b.full_name()),
            (Self::Package(a), Self::Package(b)) => Ok(a.name() == b.name()),
            (Self::Builtin(a), Self::Builtin(b)) => Ok(Rc::ptr_eq(a, b)),
            (Self::Module(a), Self::Module(b)) => Ok(Rc::ptr_eq(a, b)),
            _ => Ok(false),
        }
    }

    /// Apply a comparison operator.
    ///
    /// Messages and containers support only `==` and `!=`.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool> {
        match op {
            CompareOp::Eq => return self.equals(other),
            CompareOp::Ne => return self.equals(other).map(|eq| !eq),
            _ => {}
        }

        let ordering = match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Bytes(a), Self::Bytes(b)) => Some(a.cmp(b)),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            _ => {
                return Err(BridgeError::UnsupportedOperation {
                    op: op.symbol().to_string(),
                    operands: format!("{} and {}", self.type_name(), other.type_name()),
                })
            }
        };

        // NaN compares false on every ordering operator.
        let Some(ordering) = ordering else {
            return Ok(false);
        };
        Ok(match op {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Eq | CompareOp::Ne => false,
        })
    }

    /// `self + other`.
    pub fn add(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(*b)
                .map(Value::Int)
                .ok_or_else(|| self.unsupported("+", Some(other))),
            (Self::Float(a), Self::Float(b)) => Ok(Value::Float(a + b)),
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                Ok(Value::Float(*a as f64 + b))
            }
            (Self::String(a), Self::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Self::Bytes(a), Self::Bytes(b)) => Ok(Value::Bytes([a.as_slice(), b.as_slice()].concat())),
            (Self::Tuple(a), Self::Tuple(b)) => Ok(Value::tuple([a.as_slice(), b.as_slice()].concat())),
            (Self::Repeated(r), Self::List(_) | Self::Repeated(_)) => {
                Ok(Value::Repeated(Rc::new(r.concat(other)?)))
            }
            (Self::List(a), Self::List(_) | Self::Repeated(_)) => {
                let mut items = a.items();
                items.extend(other.iterate()?);
                Ok(Value::list(items))
            }
            _ => Err(self.unsupported("+", Some(other))),
        }
    }

    fn index_operand(&self, key: &Value) -> Result<i128> {
        key.as_int().ok_or_else(|| self.unsupported("[]", Some(key)))
    }

    fn mapping_entries(&self) -> Vec<(Value, Value)> {
        match self {
            Self::Dict(d) => d.entries(),
            Self::Map(m) => m.entries(),
            _ => Vec::new(),
        }
    }

    fn unsupported(&self, op: &str, other: Option<&Value>) -> BridgeError {
        let operands = match other {
            Some(other) => format!("{} and {}", self.type_name(), other.type_name()),
            None => self.type_name(),
        };
        BridgeError::UnsupportedOperation {
            op: op.to_string(),
            operands,
        }
    }
}

fn sequences_equal(a: &[Value], b: &[Value]) -> Result<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (left, right) in a.iter().zip(b) {
        if !left.equals(right)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Resolve a possibly negative index against `length`.
pub(crate) fn resolve_index(index: i128, length: usize) -> Result<usize> {
    let len = length as i128;
    let resolved = if index < 0 { index + len } else { index };
    if resolved < 0 || resolved >= len {
        return Err(BridgeError::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            length,
        });
    }
    Ok(resolved as usize)
}

/// Clamp slice bounds the way the script language does.
pub(crate) fn slice_bounds(start: Option<i128>, end: Option<i128>, length: usize) -> (usize, usize) {
    let len = length as i128;
    let clamp = |bound: i128| -> usize {
        let resolved = if bound < 0 { bound + len } else { bound };
        resolved.clamp(0, len) as usize
    };
    let lo = start.map_or(0, clamp);
    let hi = end.map_or(length, clamp);
    (lo, hi.max(lo))
}

// ============================================================================
// Display (script repr)
// ============================================================================

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

pub(crate) fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;
    write_sequence(f, items)?;
    write!(f, "]")
}

pub(crate) fn write_mapping(f: &mut fmt::Formatter<'_>, entries: &[(Value, Value)]) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", key, value)?;
    }
    write!(f, "}}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Self::Tuple(items) => {
                write!(f, "(")?;
                write_sequence(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Self::List(l) => write_list(f, &l.items()),
            Self::Dict(d) => write_mapping(f, &d.entries()),
            Self::Message(m) => write!(f, "{}", m),
            Self::Repeated(r) => write!(f, "{}", r),
            Self::Map(m) => write!(f, "{}", m),
            Self::Enum(e) => write!(f, "{}", e),
            Self::MessageType(t) => write!(f, "{}", t),
            Self::EnumType(t) => write!(f, "{}", t),
            Self::Package(p) => write!(f, "{}", p),
            Self::Builtin(b) => write!(f, "{}", b),
            Self::Module(m) => write!(f, "<module \"{}\">", m.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repr() {
        assert_eq!(Value::None.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::Bytes(b"a\x00".to_vec()).to_string(), "b\"a\\x00\"");
        assert_eq!(Value::tuple(vec![Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::from("x")]).to_string(),
            "[1, \"x\"]"
        );
    }

    #[test]
    fn test_negative_index() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(matches!(list.index(&Value::Int(-1)).expect("index"), Value::Int(3)));
        let err = list.index(&Value::Int(3)).expect_err("out of range");
        assert!(matches!(err, BridgeError::IndexOutOfRange { index: 3, length: 3 }));
    }

    #[test]
    fn test_slice_bounds_clamp() {
        assert_eq!(slice_bounds(None, None, 4), (0, 4));
        assert_eq!(slice_bounds(Some(-2), None, 4), (2, 4));
        assert_eq!(slice_bounds(Some(3), Some(1), 4), (3, 3));
        assert_eq!(slice_bounds(Some(-10), Some(10), 4), (0, 4));
    }

    #[test]
    fn test_numeric_equality_and_ordering() {
        assert!(Value::Int(1).equals(&Value::Float(1.0)).expect("eq"));
        assert!(Value::Int(1)
            .compare(CompareOp::Lt, &Value::Float(1.5))
            .expect("lt"));
        assert!(!Value::Float(f64::NAN)
            .compare(CompareOp::Ge, &Value::Float(0.0))
            .expect("nan"));
        assert_eq!(Value::Int(2).hash().ok(), Value::Float(2.0).hash().ok());
    }

    #[test]
    fn test_unhashable_list() {
        let err = Value::list(Vec::new()).hash().expect_err("unhashable");
        assert_eq!(err.to_string(), "TypeError: unhashable type: list");
    }

    #[test]
    fn test_freeze_nested_list() {
        let inner = Value::list(vec![Value::Int(1)]);
        let outer = Value::list(vec![inner.clone()]);
        outer.freeze();
        let err = inner
            .set_index(&Value::Int(0), Value::Int(2))
            .expect_err("frozen");
        assert_eq!(err.kind(), crate::error::ErrorKind::Frozen);
    }

    #[test]
    fn test_add_and_contains() {
        let joined = Value::list(vec![Value::Int(1)])
            .add(&Value::list(vec![Value::Int(2)]))
            .expect("add");
        assert_eq!(joined.len().expect("len"), 2);
        assert!(joined.contains(&Value::Int(2)).expect("in"));
        assert!(Value::from("hello")
            .contains(&Value::from("ell"))
            .expect("substring"));
    }
}
