// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enum types and enum values.

use crate::error::{BridgeError, Result};
use prost_reflect::EnumDescriptor;
use std::collections::HashMap;
use std::fmt;

/// A value of a protobuf enum.
///
/// Numbers outside the declared set are kept (open enums) and print
/// without a name.
#[derive(Debug, Clone)]
pub struct EnumValue {
    descriptor: EnumDescriptor,
    number: i32,
}

impl EnumValue {
    pub fn new(descriptor: EnumDescriptor, number: i32) -> Self {
        Self { descriptor, number }
    }

    /// Wire number.
    pub fn number(&self) -> i32 {
        self.number
    }

    /// Declared name, if the number is known.
    pub fn name(&self) -> Option<String> {
        self.descriptor
            .get_value(self.number)
            .map(|v| v.name().to_string())
    }

    /// Full name of the owning enum type.
    pub fn enum_name(&self) -> &str {
        self.descriptor.full_name()
    }

    pub fn descriptor(&self) -> &EnumDescriptor {
        &self.descriptor
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number && self.enum_name() == other.enum_name()
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "<{} {}={}>", self.enum_name(), name, self.number),
            None => write!(f, "<{} {}>", self.enum_name(), self.number),
        }
    }
}

/// Script handle for a protobuf enum type.
#[derive(Debug)]
pub struct EnumType {
    descriptor: EnumDescriptor,
    values: HashMap<String, EnumValue>,
}

impl EnumType {
    /// Build the handle and its name table.
    pub fn new(descriptor: EnumDescriptor) -> Self {
        let values = descriptor
            .values()
            .map(|v| {
                (
                    v.name().to_string(),
                    EnumValue::new(descriptor.clone(), v.number()),
                )
            })
            .collect();
        Self { descriptor, values }
    }

    pub fn full_name(&self) -> &str {
        self.descriptor.full_name()
    }

    pub fn descriptor(&self) -> &EnumDescriptor {
        &self.descriptor
    }

    /// Look up a value by name.
    pub fn value(&self, name: &str) -> Result<EnumValue> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::EnumValueNotFound {
                enum_name: self.full_name().to_string(),
                name: name.to_string(),
            })
    }

    /// Value names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.descriptor
            .values()
            .map(|v| v.name().to_string())
            .collect()
    }
}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<proto.EnumType \"{}\">", self.full_name())
    }
}
