// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message types: callable constructors plus a namespace of nested types.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::message::MessageValue;
use crate::script::{Kwargs, Value};
use crate::types::EnumType;
use prost_reflect::{DynamicMessage, MessageDescriptor};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A type reachable by name from a message type or package.
#[derive(Debug, Clone)]
pub enum NestedType {
    Message(Arc<MessageType>),
    Enum(Arc<EnumType>),
}

impl NestedType {
    /// Script value for this type handle.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Message(t) => Value::MessageType(Arc::clone(t)),
            Self::Enum(t) => Value::EnumType(Arc::clone(t)),
        }
    }
}

/// Script handle for a protobuf message type.
///
/// The nested-type namespace is built on first access, so self-referencing
/// schemas never recurse during construction.
#[derive(Debug)]
pub struct MessageType {
    descriptor: MessageDescriptor,
    template: DynamicMessage,
    config: Arc<BridgeConfig>,
    nested: OnceLock<HashMap<String, NestedType>>,
}

impl MessageType {
    pub fn new(descriptor: MessageDescriptor, config: Arc<BridgeConfig>) -> Self {
        let template = DynamicMessage::new(descriptor.clone());
        Self {
            descriptor,
            template,
            config,
            nested: OnceLock::new(),
        }
    }

    pub fn full_name(&self) -> &str {
        self.descriptor.full_name()
    }

    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &Arc<BridgeConfig> {
        &self.config
    }

    /// Look up a nested message or enum type by short name.
    pub fn nested(&self, name: &str) -> Option<NestedType> {
        self.nested_types().get(name).cloned()
    }

    /// Short names of the nested types.
    pub fn nested_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nested_types().keys().cloned().collect();
        names.sort();
        names
    }

    fn nested_types(&self) -> &HashMap<String, NestedType> {
        self.nested.get_or_init(|| {
            let mut types = HashMap::new();
            // Map entry types are synthetic and stay hidden.
            for child in self.descriptor.child_messages() {
                if child.is_map_entry() {
                    continue;
                }
                let name = child.name().to_string();
                let handle = MessageType::new(child, Arc::clone(&self.config));
                types.insert(name, NestedType::Message(Arc::new(handle)));
            }
            for child in self.descriptor.child_enums() {
                let name = child.name().to_string();
                types.insert(name, NestedType::Enum(Arc::new(EnumType::new(child))));
            }
            log::trace!(
                "[proto] built namespace for {} ({} nested types)",
                self.full_name(),
                types.len()
            );
            types
        })
    }

    /// Fresh, empty instance.
    pub fn new_message(&self) -> MessageValue {
        MessageValue::from_message(self.template.clone(), Arc::clone(&self.config))
    }

    /// `Type(field=value, ...)`: keyword arguments only.
    pub fn construct(&self, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
        if !args.is_empty() {
            return Err(BridgeError::PositionalArguments {
                callee: self.full_name().to_string(),
            });
        }
        let message = self.new_message();
        for (name, value) in kwargs {
            if self.descriptor.get_field_by_name(name).is_none() {
                return Err(BridgeError::UnexpectedKeyword {
                    callee: self.full_name().to_string(),
                    name: name.clone(),
                });
            }
            message.set_field(name, value.clone())?;
        }
        Ok(Value::message(message))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<proto.MessageType \"{}\">", self.full_name())
    }
}
