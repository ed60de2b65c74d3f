// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native callables and namespaces.

use crate::error::Result;
use crate::script::{Kwargs, Value};
use std::fmt;

/// Signature of a native function body.
pub type NativeFn = dyn Fn(&[Value], &Kwargs) -> Result<Value>;

/// A native function or a method bound to a receiver.
pub struct Builtin {
    name: String,
    receiver_type: Option<String>,
    func: Box<NativeFn>,
}

impl Builtin {
    /// Create a free function.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[Value], &Kwargs) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            receiver_type: None,
            func: Box::new(func),
        }
    }

    /// Create a method bound to a value of type `receiver_type`.
    pub fn method(
        receiver_type: impl Into<String>,
        name: impl Into<String>,
        func: impl Fn(&[Value], &Kwargs) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            receiver_type: Some(receiver_type.into()),
            func: Box::new(func),
        }
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
        (self.func)(args, kwargs)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("receiver_type", &self.receiver_type)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.receiver_type {
            Some(receiver) => write!(f, "<built-in method {} of {} value>", self.name, receiver),
            None => write!(f, "<built-in function {}>", self.name),
        }
    }
}

/// A named, read-only namespace of values.
#[derive(Debug)]
pub struct Module {
    name: String,
    members: Vec<(String, Value)>,
}

impl Module {
    /// Create an empty namespace.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Add a member (builder style).
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.push((name.into(), value));
        self
    }

    /// Namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a member.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.members
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Member names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|(n, _)| n.as_str()).collect()
    }
}
