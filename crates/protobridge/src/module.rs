// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `proto` script namespace.
//!
//! | function | arguments |
//! |----------|-----------|
//! | `package` | `name` |
//! | `clear`, `clone`, `set_defaults` | `msg` |
//! | `merge` | `dst, src` (returns `dst`) |
//! | `encode_any` / `decode_any` | `msg` / `any` |
//! | `encode_json` / `encode_text` | `msg, compact=True` |
//! | `encode_yaml` | `msg` |
//! | `decode_json` / `decode_text` / `decode_yaml` | `type, value` |
//!
//! JSON and YAML use the schema field names verbatim. Neither JSON nor text
//! output is guaranteed stable across schema library versions.

use crate::error::{BridgeError, Result};
use crate::loader::Loader;
use crate::message::MessageValue;
use crate::script::{unpack, Builtin, Kwargs, Module, Value};
use crate::types::MessageType;
use crate::wellknown;
use prost_reflect::text_format::FormatOptions;
use prost_reflect::{DynamicMessage, SerializeOptions};
use serde_json::ser::PrettyFormatter;
use std::rc::Rc;
use std::sync::Arc;

type Body = fn(&str, &[Value], &Kwargs) -> Result<Value>;

/// Build the `proto` namespace bound to `loader`.
pub fn proto_module(loader: Arc<Loader>) -> Value {
    let package_loader = Arc::clone(&loader);
    let any_loader = loader;

    let module = Module::new("proto")
        .with(
            "package",
            Value::builtin(Builtin::new("package", move |args, kwargs| {
                package(&package_loader, args, kwargs)
            })),
        )
        .with("clear", function("clear", clear))
        .with("clone", function("clone", clone))
        .with("merge", function("merge", merge))
        .with("set_defaults", function("set_defaults", set_defaults))
        .with("encode_any", function("encode_any", encode_any))
        .with(
            "decode_any",
            Value::builtin(Builtin::new("decode_any", move |args, kwargs| {
                decode_any(&any_loader, args, kwargs)
            })),
        )
        .with("encode_json", function("encode_json", encode_json))
        .with("decode_json", function("decode_json", decode_json))
        .with("encode_text", function("encode_text", encode_text))
        .with("decode_text", function("decode_text", decode_text))
        .with("encode_yaml", function("encode_yaml", encode_yaml))
        .with("decode_yaml", function("decode_yaml", decode_yaml));

    Value::Module(Rc::new(module))
}

fn function(name: &'static str, body: Body) -> Value {
    let callee = format!("proto.{}", name);
    Value::builtin(Builtin::new(name, move |args, kwargs| body(&callee, args, kwargs)))
}

// ============================================================================
// Argument helpers
// ============================================================================

fn wrong_arg(callee: &str, param: &str, expected: &str, got: &Value) -> BridgeError {
    BridgeError::ArgumentType {
        callee: callee.to_string(),
        param: param.to_string(),
        expected: expected.to_string(),
        got: got.type_name(),
    }
}

fn message_arg(callee: &str, param: &str, value: Value) -> Result<Rc<MessageValue>> {
    match value {
        Value::Message(m) => Ok(m),
        other => Err(wrong_arg(callee, param, "proto.Message", &other)),
    }
}

fn type_arg(callee: &str, param: &str, value: Value) -> Result<Arc<MessageType>> {
    match value {
        Value::MessageType(t) => Ok(t),
        other => Err(wrong_arg(callee, param, "proto.MessageType", &other)),
    }
}

fn string_arg(callee: &str, param: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(wrong_arg(callee, param, "string", &other)),
    }
}

fn compact_arg(callee: &str, value: Option<Value>) -> Result<bool> {
    match value {
        None => Ok(true),
        Some(Value::Bool(b)) => Ok(b),
        Some(other) => Err(wrong_arg(callee, "compact", "bool", &other)),
    }
}

fn single_message(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Rc<MessageValue>> {
    let mut bound = unpack(callee, args, kwargs, &["msg"], 1)?;
    message_arg(callee, "msg", bound.take(0))
}

fn wrap(message: DynamicMessage, ty: &MessageType) -> Value {
    Value::message(MessageValue::from_message(message, Arc::clone(ty.config())))
}

// ============================================================================
// Namespace and instance operations
// ============================================================================

fn package(loader: &Loader, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let callee = "proto.package";
    let mut bound = unpack(callee, args, kwargs, &["name"], 1)?;
    let name = string_arg(callee, "name", bound.take(0))?;
    Ok(Value::Package(loader.package(&name)?))
}

fn clear(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let msg = single_message(callee, args, kwargs)?;
    msg.clear()?;
    Ok(Value::Message(msg))
}

fn clone(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let msg = single_message(callee, args, kwargs)?;
    Ok(Value::message(msg.deep_clone()?))
}

fn merge(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let mut bound = unpack(callee, args, kwargs, &["dst", "src"], 2)?;
    let dst = message_arg(callee, "dst", bound.take(0))?;
    let src = message_arg(callee, "src", bound.take(1))?;
    dst.merge_from(&src)?;
    Ok(Value::Message(dst))
}

fn set_defaults(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let msg = single_message(callee, args, kwargs)?;
    msg.set_defaults()?;
    Ok(Value::Message(msg))
}

// ============================================================================
// Any
// ============================================================================

fn encode_any(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let msg = single_message(callee, args, kwargs)?;
    let packed = wellknown::pack_any(&msg.to_message()?, msg.config())?;
    Ok(Value::message(MessageValue::from_message(
        packed,
        Arc::clone(msg.config()),
    )))
}

fn decode_any(loader: &Loader, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let callee = "proto.decode_any";
    let mut bound = unpack(callee, args, kwargs, &["any"], 1)?;
    let any = message_arg(callee, "any", bound.take(0))?;
    let unpacked = wellknown::unpack_any(&any.to_message()?, loader.pool())?;
    Ok(Value::message(MessageValue::from_message(
        unpacked,
        Arc::clone(any.config()),
    )))
}

// ============================================================================
// JSON / text / YAML
// ============================================================================

fn json_options() -> SerializeOptions {
    SerializeOptions::new().use_proto_field_name(true)
}

fn encode_json(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let mut bound = unpack(callee, args, kwargs, &["msg", "compact"], 1)?;
    let msg = message_arg(callee, "msg", bound.take(0))?;
    let compact = compact_arg(callee, bound.take_opt(1))?;
    let message = msg.to_message()?;

    let mut out = Vec::new();
    if compact {
        let mut serializer = serde_json::Serializer::new(&mut out);
        message.serialize_with_options(&mut serializer, &json_options())?;
    } else {
        let indent = vec![b' '; msg.config().json_indent];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        message.serialize_with_options(&mut serializer, &json_options())?;
    }
    let text = String::from_utf8(out).map_err(|e| BridgeError::Json(e.to_string()))?;
    Ok(Value::String(text))
}

fn decode_json(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let mut bound = unpack(callee, args, kwargs, &["type", "value"], 2)?;
    let ty = type_arg(callee, "type", bound.take(0))?;
    let text = string_arg(callee, "value", bound.take(1))?;

    let mut deserializer = serde_json::Deserializer::from_str(&text);
    let message = DynamicMessage::deserialize(ty.descriptor().clone(), &mut deserializer)?;
    deserializer.end()?;
    Ok(wrap(message, &ty))
}

fn encode_text(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let mut bound = unpack(callee, args, kwargs, &["msg", "compact"], 1)?;
    let msg = message_arg(callee, "msg", bound.take(0))?;
    let compact = compact_arg(callee, bound.take_opt(1))?;
    let message = msg.to_message()?;

    let text = if compact {
        message.to_text_format()
    } else {
        message.to_text_format_with_options(&FormatOptions::new().pretty(true))
    };
    Ok(Value::String(text))
}

fn decode_text(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let mut bound = unpack(callee, args, kwargs, &["type", "value"], 2)?;
    let ty = type_arg(callee, "type", bound.take(0))?;
    let text = string_arg(callee, "value", bound.take(1))?;

    let message = DynamicMessage::parse_text_format(ty.descriptor().clone(), &text)
        .map_err(|e| BridgeError::Text(e.to_string()))?;
    Ok(wrap(message, &ty))
}

fn encode_yaml(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let msg = single_message(callee, args, kwargs)?;
    let message = msg.to_message()?;
    let tree = message.serialize_with_options(serde_json::value::Serializer, &json_options())?;
    Ok(Value::String(serde_yaml::to_string(&tree)?))
}

fn decode_yaml(callee: &str, args: &[Value], kwargs: &Kwargs) -> Result<Value> {
    let mut bound = unpack(callee, args, kwargs, &["type", "value"], 2)?;
    let ty = type_arg(callee, "type", bound.take(0))?;
    let text = string_arg(callee, "value", bound.take(1))?;

    let tree: serde_json::Value = serde_yaml::from_str(&text)?;
    let message = DynamicMessage::deserialize(ty.descriptor().clone(), tree)?;
    Ok(wrap(message, &ty))
}
