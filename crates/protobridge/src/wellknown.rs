// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Well-known types: scalar wrappers and `google.protobuf.Any`.

use crate::codec;
use crate::config::{BridgeConfig, ANY_FULL_NAME};
use crate::error::{BridgeError, Result};
use crate::script::Value;
use bytes::Bytes;
use prost::Message as _;
use prost_reflect::{
    DescriptorPool, DynamicMessage, Kind, MessageDescriptor, ReflectMessage, Value as ProtoValue,
};

/// Box a bare scalar into a wrapper message's `value` field.
pub fn box_scalar(
    descriptor: &MessageDescriptor,
    value: &Value,
    config: &BridgeConfig,
) -> Result<DynamicMessage> {
    let field = descriptor
        .get_field_by_name("value")
        .filter(|f| !f.is_list() && !f.is_map() && !matches!(f.kind(), Kind::Message(_)))
        .ok_or_else(|| BridgeError::FieldNotFound {
            message: descriptor.full_name().to_string(),
            field: "value".to_string(),
        })?;
    let inner = codec::to_proto(&field.kind(), value, config)?;
    let mut message = DynamicMessage::new(descriptor.clone());
    message.set_field(&field, inner);
    Ok(message)
}

/// Pack `message` into an Any drawn from the same descriptor pool.
pub fn pack_any(message: &DynamicMessage, config: &BridgeConfig) -> Result<DynamicMessage> {
    let descriptor = message.descriptor();
    let pool = descriptor.parent_pool();
    let any = pool
        .get_message_by_name(ANY_FULL_NAME)
        .ok_or_else(|| BridgeError::TypeNotFound(ANY_FULL_NAME.to_string()))?;

    let mut packed = DynamicMessage::new(any);
    packed.set_field_by_name(
        "type_url",
        ProtoValue::String(config.type_url(descriptor.full_name())),
    );
    packed.set_field_by_name(
        "value",
        ProtoValue::Bytes(Bytes::from(message.encode_to_vec())),
    );
    log::trace!("[proto] packed {} into Any", descriptor.full_name());
    Ok(packed)
}

/// Unpack an Any, resolving the payload type from `pool` by the last
/// path segment of its type URL.
pub fn unpack_any(any: &DynamicMessage, pool: &DescriptorPool) -> Result<DynamicMessage> {
    let descriptor = any.descriptor();
    if descriptor.full_name() != ANY_FULL_NAME {
        return Err(BridgeError::NotAnAny(descriptor.full_name().to_string()));
    }

    let type_url = match any.get_field_by_name("type_url").as_deref() {
        Some(ProtoValue::String(url)) => url.clone(),
        _ => String::new(),
    };
    let payload = match any.get_field_by_name("value").as_deref() {
        Some(ProtoValue::Bytes(bytes)) => bytes.clone(),
        _ => Bytes::new(),
    };

    let type_name = type_url.rsplit('/').next().unwrap_or_default();
    let target = pool
        .get_message_by_name(type_name)
        .ok_or_else(|| BridgeError::TypeNotFound(type_name.to_string()))?;
    log::trace!("[proto] unpacking Any as {}", target.full_name());
    Ok(DynamicMessage::decode(target, payload)?)
}
