// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::error::{BridgeError, Result};
use crate::script::Value;
use crate::types::NestedType;
use std::collections::HashMap;
use std::fmt;

/// Namespace of the top-level messages and enums of one protobuf package.
#[derive(Debug)]
pub struct Package {
    name: String,
    members: HashMap<String, NestedType>,
}

impl Package {
    pub fn new(name: impl Into<String>, members: HashMap<String, NestedType>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve a member by short name.
    pub fn member(&self, name: &str) -> Result<Value> {
        match self.members.get(name) {
            Some(member) => Ok(member.to_value()),
            None if self.name.is_empty() => Err(BridgeError::TypeNotFound(name.to_string())),
            None => Err(BridgeError::TypeNotFound(format!("{}.{}", self.name, name))),
        }
    }

    /// Member names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<proto.Package \"{}\">", self.name)
    }
}
