// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural operations on stored messages: equality, merge, defaults.
//!
//! These run on [`DynamicMessage`] storage, after any cached script views
//! have been flushed back.

use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, ReflectMessage, Value as ProtoValue};

// ============================================================================
// Equality
// ============================================================================

/// Presence-aware structural equality of two stored messages.
///
/// Fields with presence must be set on both sides or on neither. Repeated
/// fields compare element-wise and maps compare by key, recursing into
/// nested messages.
pub fn messages_equal(a: &DynamicMessage, b: &DynamicMessage) -> bool {
    let descriptor = a.descriptor();
    if descriptor.full_name() != b.descriptor().full_name() {
        return false;
    }

    for field in descriptor.fields() {
        if field.supports_presence() {
            let present = a.has_field(&field);
            if present != b.has_field(&field) {
                return false;
            }
            if !present {
                continue;
            }
        }
        if !values_equal(&a.get_field(&field), &b.get_field(&field)) {
            return false;
        }
    }
    true
}

fn values_equal(a: &ProtoValue, b: &ProtoValue) -> bool {
    match (a, b) {
        (ProtoValue::Message(x), ProtoValue::Message(y)) => messages_equal(x, y),
        (ProtoValue::List(x), ProtoValue::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (ProtoValue::Map(x), ProtoValue::Map(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

// ============================================================================
// Mutation helpers
// ============================================================================

/// Clear every other member of the oneof containing `field`.
pub fn select_oneof(message: &mut DynamicMessage, field: &FieldDescriptor) {
    let Some(oneof) = field.containing_oneof() else {
        return;
    };
    for sibling in oneof.fields() {
        if sibling.number() != field.number() {
            message.clear_field(&sibling);
        }
    }
}

/// Merge `src` into `dst`.
///
/// Repeated fields are appended, map entries overlay, singular messages
/// merge recursively and every other field set in `src` overwrites.
pub fn merge_messages(dst: &mut DynamicMessage, src: &DynamicMessage) {
    let descriptor = src.descriptor();
    for field in descriptor.fields() {
        if !src.has_field(&field) {
            continue;
        }
        let incoming = src.get_field(&field);

        if field.is_map() {
            if let (ProtoValue::Map(entries), ProtoValue::Map(target)) =
                (incoming.as_ref(), dst.get_field_mut(&field))
            {
                for (key, value) in entries {
                    target.insert(key.clone(), value.clone());
                }
            }
        } else if field.is_list() {
            if let (ProtoValue::List(items), ProtoValue::List(target)) =
                (incoming.as_ref(), dst.get_field_mut(&field))
            {
                target.extend(items.iter().cloned());
            }
        } else if let ProtoValue::Message(child) = incoming.as_ref() {
            if dst.has_field(&field) {
                if let ProtoValue::Message(target) = dst.get_field_mut(&field) {
                    merge_messages(target, child);
                }
            } else {
                select_oneof(dst, &field);
                dst.set_field(&field, ProtoValue::Message(child.clone()));
            }
        } else {
            select_oneof(dst, &field);
            dst.set_field(&field, incoming.as_ref().clone());
        }
    }
}

/// Populate unset fields that declare an explicit default, recursively.
///
/// Oneof members are left alone so no variant gets selected implicitly.
pub fn apply_defaults(message: &mut DynamicMessage) {
    let descriptor = message.descriptor();
    for field in descriptor.fields() {
        let present = message.has_field(&field);
        if field.is_map() {
            if present {
                if let ProtoValue::Map(entries) = message.get_field_mut(&field) {
                    for value in entries.values_mut() {
                        if let ProtoValue::Message(child) = value {
                            apply_defaults(child);
                        }
                    }
                }
            }
        } else if field.is_list() {
            if present {
                if let ProtoValue::List(items) = message.get_field_mut(&field) {
                    for item in items.iter_mut() {
                        if let ProtoValue::Message(child) = item {
                            apply_defaults(child);
                        }
                    }
                }
            }
        } else if matches!(field.kind(), Kind::Message(_)) {
            if present {
                if let ProtoValue::Message(child) = message.get_field_mut(&field) {
                    apply_defaults(child);
                }
            }
        } else if !present && has_declared_default(&field) {
            message.set_field(&field, ProtoValue::default_value_for_field(&field));
        }
    }
}

fn has_declared_default(field: &FieldDescriptor) -> bool {
    field.containing_oneof().is_none() && field.field_descriptor_proto().default_value.is_some()
}
