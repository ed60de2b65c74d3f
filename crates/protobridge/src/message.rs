// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Script view of a protobuf message instance.
//!
//! A [`MessageValue`] owns its [`DynamicMessage`] storage plus a cache of
//! the script values handed out for its fields. Container and sub-message
//! views stay cached so in-place edits (`msg.items.append(x)`,
//! `msg.sub.x = 1`) are visible on the next read, and [`to_message`]
//! flushes them back into storage.
//!
//! Assigning a message or container into a field stores a validated copy,
//! so two fields never alias and reference cycles cannot form.
//!
//! [`to_message`]: MessageValue::to_message

use crate::codec;
use crate::config::BridgeConfig;
use crate::container::{MapField, RepeatedField};
use crate::error::{BridgeError, Result};
use crate::reflect;
use crate::script::Value;
use prost_reflect::{
    DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, ReflectMessage, Value as ProtoValue,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug)]
struct MessageState {
    message: DynamicMessage,
    cache: HashMap<String, Value>,
}

/// A protobuf message exposed to scripts.
#[derive(Debug)]
pub struct MessageValue {
    state: RefCell<MessageState>,
    frozen: Cell<bool>,
    config: Arc<BridgeConfig>,
}

impl MessageValue {
    /// Wrap existing storage.
    pub fn from_message(message: DynamicMessage, config: Arc<BridgeConfig>) -> Self {
        Self {
            state: RefCell::new(MessageState {
                message,
                cache: HashMap::new(),
            }),
            frozen: Cell::new(false),
            config,
        }
    }

    pub fn descriptor(&self) -> MessageDescriptor {
        self.state.borrow().message.descriptor()
    }

    /// Fully-qualified schema name.
    pub fn full_name(&self) -> String {
        self.descriptor().full_name().to_string()
    }

    /// Script type name (the fully-qualified schema name).
    pub fn type_name(&self) -> String {
        self.full_name()
    }

    pub fn config(&self) -> &Arc<BridgeConfig> {
        &self.config
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// Freeze this message and every field value read from it so far.
    ///
    /// Values read later are frozen on the way out.
    pub fn freeze(&self) {
        if self.frozen.replace(true) {
            return;
        }
        for value in self.state.borrow().cache.values() {
            value.freeze();
        }
    }

    // ========================================================================
    // Field access
    // ========================================================================

    /// Read field `name`. `Ok(None)` when the message has no such field.
    pub fn attr(&self, name: &str) -> Result<Option<Value>> {
        if let Some(cached) = self.state.borrow().cache.get(name) {
            return Ok(Some(cached.clone()));
        }

        let descriptor = self.descriptor();
        let Some(field) = descriptor.get_field_by_name(name) else {
            return Ok(None);
        };

        let value = self.read_field(&field)?;
        if self.frozen.get() {
            value.freeze();
        }
        self.state
            .borrow_mut()
            .cache
            .insert(name.to_string(), value.clone());
        Ok(Some(value))
    }

    /// Field names, in declaration order.
    pub fn attr_names(&self) -> Vec<String> {
        self.descriptor()
            .fields()
            .map(|f| f.name().to_string())
            .collect()
    }

    fn read_field(&self, field: &FieldDescriptor) -> Result<Value> {
        let state = self.state.borrow();
        let message = &state.message;

        if field.is_map() {
            let stored = message.get_field(field);
            let map = match stored.as_ref() {
                ProtoValue::Map(entries) => MapField::from_proto(field.clone(), entries, &self.config)?,
                _ => MapField::new(field.clone(), Arc::clone(&self.config))?,
            };
            return Ok(Value::Map(Rc::new(map)));
        }

        if field.is_list() {
            let stored = message.get_field(field);
            let items: &[ProtoValue] = match stored.as_ref() {
                ProtoValue::List(items) => items,
                _ => &[],
            };
            let list = RepeatedField::from_proto(field.clone(), items, &self.config);
            return Ok(Value::Repeated(Rc::new(list)));
        }

        // Unselected oneof members and unset sub-messages read as None.
        let unset = !message.has_field(field);
        if unset
            && (field.containing_oneof().is_some() || matches!(field.kind(), Kind::Message(_)))
        {
            return Ok(Value::None);
        }
        if unset && codec::is_legacy(field, &self.config) {
            return Ok(Value::None);
        }

        let stored = message.get_field(field);
        Ok(codec::scalar_to_script(&stored, &field.kind(), &self.config))
    }

    /// Assign field `name`.
    pub fn set_field(&self, name: &str, value: Value) -> Result<()> {
        self.check_mutable("set field of")?;

        let descriptor = self.descriptor();
        let field = descriptor
            .get_field_by_name(name)
            .ok_or_else(|| BridgeError::FieldNotFound {
                message: descriptor.full_name().to_string(),
                field: name.to_string(),
            })?;

        let stored = self.convert_for_field(&field, &value)?;
        {
            let mut state = self.state.borrow_mut();
            match stored {
                Some(v) => {
                    reflect::select_oneof(&mut state.message, &field);
                    state.message.set_field(&field, v);
                }
                None => state.message.clear_field(&field),
            }
        }
        self.invalidate(&field);
        Ok(())
    }

    fn convert_for_field(&self, field: &FieldDescriptor, value: &Value) -> Result<Option<ProtoValue>> {
        if field.is_map() {
            if value.is_none() {
                let expected = MapField::new(field.clone(), Arc::clone(&self.config))?.type_name();
                return Err(BridgeError::type_mismatch(value, value.type_name(), expected));
            }
            let map = MapField::from_script(field.clone(), value, &self.config)?;
            return Ok(Some(ProtoValue::Map(map.to_proto()?)));
        }

        if field.is_list() {
            if value.is_none() {
                let expected = RepeatedField::new(field.clone(), Arc::clone(&self.config)).type_name();
                return Err(BridgeError::type_mismatch(value, value.type_name(), expected));
            }
            let list = RepeatedField::from_script(field.clone(), value, &self.config)?;
            return Ok(Some(ProtoValue::List(list.to_proto()?)));
        }

        codec::scalar_from_script(field, value, &self.config)
    }

    fn invalidate(&self, field: &FieldDescriptor) {
        let mut state = self.state.borrow_mut();
        state.cache.remove(field.name());
        if let Some(oneof) = field.containing_oneof() {
            for sibling in oneof.fields() {
                state.cache.remove(sibling.name());
            }
        }
    }

    fn check_mutable(&self, verb: &str) -> Result<()> {
        if self.frozen.get() {
            return Err(BridgeError::frozen(verb, "message"));
        }
        Ok(())
    }

    /// Replace storage wholesale and drop every cached view.
    fn replace(&self, message: DynamicMessage) {
        let mut state = self.state.borrow_mut();
        state.message = message;
        state.cache.clear();
    }

    // ========================================================================
    // Whole-message operations
    // ========================================================================

    /// Current contents as a standalone schema message.
    ///
    /// Cached sub-message and container views are written back first.
    pub fn to_message(&self) -> Result<DynamicMessage> {
        let state = self.state.borrow();
        let mut message = state.message.clone();
        let descriptor = message.descriptor();

        for (name, cached) in &state.cache {
            let Some(field) = descriptor.get_field_by_name(name) else {
                continue;
            };
            match cached {
                Value::Message(child) => {
                    message.set_field(&field, ProtoValue::Message(child.to_message()?));
                }
                Value::Repeated(list) => {
                    message.set_field(&field, ProtoValue::List(list.to_proto()?));
                }
                Value::Map(map) => {
                    message.set_field(&field, ProtoValue::Map(map.to_proto()?));
                }
                _ => {}
            }
        }
        Ok(message)
    }

    /// Structural equality with another message of any type.
    pub fn equals(&self, other: &MessageValue) -> Result<bool> {
        Ok(reflect::messages_equal(&self.to_message()?, &other.to_message()?))
    }

    /// Reset every field.
    pub fn clear(&self) -> Result<()> {
        self.check_mutable("clear")?;
        let descriptor = self.descriptor();
        self.replace(DynamicMessage::new(descriptor));
        Ok(())
    }

    /// Populate unset fields that declare defaults, recursively.
    pub fn set_defaults(&self) -> Result<()> {
        self.check_mutable("set defaults of")?;
        let mut message = self.to_message()?;
        reflect::apply_defaults(&mut message);
        self.replace(message);
        Ok(())
    }

    /// Merge `src` into this message. Both must share a schema type.
    pub fn merge_from(&self, src: &MessageValue) -> Result<()> {
        self.check_mutable("merge into")?;
        let (dst_name, src_name) = (self.full_name(), src.full_name());
        if dst_name != src_name {
            return Err(BridgeError::MergeMismatch {
                dst: dst_name,
                src: src_name,
            });
        }
        let incoming = src.to_message()?;
        let mut message = self.to_message()?;
        reflect::merge_messages(&mut message, &incoming);
        self.replace(message);
        Ok(())
    }

    /// Independent, unfrozen deep copy.
    pub fn deep_clone(&self) -> Result<MessageValue> {
        Ok(Self::from_message(self.to_message()?, Arc::clone(&self.config)))
    }
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.full_name();
        let text = match self.to_message() {
            Ok(m) => m.to_text_format(),
            Err(e) => return write!(f, "<{} !{}>", name, e),
        };
        if text.is_empty() {
            write!(f, "<{}>", name)
        } else {
            write!(f, "<{} {}>", name, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{pool_from_files, FieldType, FileBuilder, MessageBuilder};

    fn counters() -> MessageDescriptor {
        let file = FileBuilder::proto3("counters.proto", "acme")
            .message(MessageBuilder::new("Counters").repeated("hits", 1, FieldType::Int32))
            .build();
        let pool = pool_from_files(vec![file]).expect("pool");
        pool.get_message_by_name("acme.Counters").expect("descriptor")
    }

    #[test]
    fn test_display_renders_text_format() {
        let config = Arc::new(BridgeConfig::default());
        let m = MessageValue::from_message(DynamicMessage::new(counters()), config);
        assert_eq!(m.to_string(), "<acme.Counters>");
    }

    #[test]
    fn test_display_reports_flush_error() {
        let config = Arc::new(BridgeConfig::default());
        let descriptor = counters();
        let field = descriptor.get_field_by_name("hits").expect("field");
        let m = MessageValue::from_message(DynamicMessage::new(descriptor), Arc::clone(&config));

        // A cached element that no longer converts makes the flush fail.
        let bad = RepeatedField::from_proto(field, &[ProtoValue::String("x".into())], &config);
        m.state
            .borrow_mut()
            .cache
            .insert("hits".to_string(), Value::Repeated(Rc::new(bad)));

        let text = m.to_string();
        assert!(text.starts_with("<acme.Counters !TypeError:"), "{}", text);
        assert!(m.to_message().is_err());
    }
}
