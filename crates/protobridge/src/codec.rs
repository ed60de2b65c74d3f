// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar codec: script values <-> schema values, driven by field kinds.
//!
//! Integers are range-checked against the exact width and signedness of the
//! target kind. Floats accept ints. Strings assign to bytes fields. Enum
//! and message values must come from the same schema type, except that
//! configured scalar wrappers are boxed from a bare scalar.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::message::MessageValue;
use crate::script::{Dict, Value};
use crate::types::EnumValue;
use crate::wellknown;
use bytes::Bytes;
use prost::Message as _;
use prost_reflect::{
    DynamicMessage, FieldDescriptor, Kind, MapKey, MessageDescriptor, ReflectMessage, Syntax,
    Value as ProtoValue,
};
use std::rc::Rc;
use std::sync::Arc;

// ============================================================================
// Type names
// ============================================================================

/// Schema type name used in error messages and container type names.
pub fn kind_name(kind: &Kind) -> String {
    let name = match kind {
        Kind::Double => "double",
        Kind::Float => "float",
        Kind::Int32 => "int32",
        Kind::Int64 => "int64",
        Kind::Uint32 => "uint32",
        Kind::Uint64 => "uint64",
        Kind::Sint32 => "sint32",
        Kind::Sint64 => "sint64",
        Kind::Fixed32 => "fixed32",
        Kind::Fixed64 => "fixed64",
        Kind::Sfixed32 => "sfixed32",
        Kind::Sfixed64 => "sfixed64",
        Kind::Bool => "bool",
        Kind::String => "string",
        Kind::Bytes => "bytes",
        Kind::Message(m) => return m.full_name().to_string(),
        Kind::Enum(e) => return e.full_name().to_string(),
    };
    name.to_string()
}

/// Whether legacy proto2 `None` rules apply to `field`.
pub fn is_legacy(field: &FieldDescriptor, config: &BridgeConfig) -> bool {
    config.legacy_proto2_none
        && matches!(field.parent_message().parent_file().syntax(), Syntax::Proto2)
}

// ============================================================================
// Script -> schema
// ============================================================================

/// Convert a script value for assignment to a singular `field`.
///
/// `Ok(None)` means "leave the field unset": `None` assigned to a message
/// field, or to a proto2 scalar under legacy rules.
pub fn scalar_from_script(
    field: &FieldDescriptor,
    value: &Value,
    config: &BridgeConfig,
) -> Result<Option<ProtoValue>> {
    let kind = field.kind();
    if value.is_none() {
        if matches!(kind, Kind::Message(_)) || is_legacy(field, config) {
            return Ok(None);
        }
        return Err(BridgeError::NoneInProto3 {
            expected: kind_name(&kind),
        });
    }
    to_proto(&kind, value, config).map(Some)
}

/// Convert a non-`None` script value to a schema value of `kind`.
pub fn to_proto(kind: &Kind, value: &Value, config: &BridgeConfig) -> Result<ProtoValue> {
    let mismatch = || BridgeError::type_mismatch(value, value.type_name(), kind_name(kind));
    match kind {
        Kind::Bool => match value {
            Value::Bool(b) => Ok(ProtoValue::Bool(*b)),
            _ => Err(mismatch()),
        },
        Kind::String => match value {
            Value::String(s) => Ok(ProtoValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        Kind::Bytes => match value {
            Value::String(s) => Ok(ProtoValue::Bytes(Bytes::from(s.clone().into_bytes()))),
            Value::Bytes(b) => Ok(ProtoValue::Bytes(Bytes::from(b.clone()))),
            _ => Err(mismatch()),
        },
        Kind::Float => match value {
            Value::Float(f) => Ok(ProtoValue::F32(*f as f32)),
            Value::Int(i) => Ok(ProtoValue::F32(*i as f32)),
            _ => Err(mismatch()),
        },
        Kind::Double => match value {
            Value::Float(f) => Ok(ProtoValue::F64(*f)),
            Value::Int(i) => Ok(ProtoValue::F64(*i as f64)),
            _ => Err(mismatch()),
        },
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => {
            int_in_range::<i32>(kind, value).map(ProtoValue::I32)
        }
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => {
            int_in_range::<i64>(kind, value).map(ProtoValue::I64)
        }
        Kind::Uint32 | Kind::Fixed32 => int_in_range::<u32>(kind, value).map(ProtoValue::U32),
        Kind::Uint64 | Kind::Fixed64 => int_in_range::<u64>(kind, value).map(ProtoValue::U64),
        Kind::Enum(descriptor) => match value {
            Value::Enum(e) if e.enum_name() == descriptor.full_name() => {
                Ok(ProtoValue::EnumNumber(e.number()))
            }
            _ => Err(mismatch()),
        },
        Kind::Message(descriptor) => message_to_proto(descriptor, value, config),
    }
}

fn int_in_range<T: TryFrom<i128>>(kind: &Kind, value: &Value) -> Result<T> {
    match value {
        Value::Int(i) => T::try_from(*i).map_err(|_| BridgeError::Overflow {
            value: i.to_string(),
            target: kind_name(kind),
        }),
        _ => Err(BridgeError::type_mismatch(
            value,
            value.type_name(),
            kind_name(kind),
        )),
    }
}

fn message_to_proto(
    descriptor: &MessageDescriptor,
    value: &Value,
    config: &BridgeConfig,
) -> Result<ProtoValue> {
    match value {
        Value::Message(m) => {
            let got = m.full_name();
            if got != descriptor.full_name() {
                return Err(BridgeError::MessageTypeMismatch {
                    expected: descriptor.full_name().to_string(),
                    got,
                });
            }
            let message = m.to_message()?;
            if message.descriptor() == *descriptor {
                return Ok(ProtoValue::Message(message));
            }
            // Same name from another pool: re-read under our descriptor.
            let transcoded = DynamicMessage::decode(descriptor.clone(), message.encode_to_vec().as_slice())?;
            Ok(ProtoValue::Message(transcoded))
        }
        other if config.is_scalar_wrapper(descriptor.full_name()) => {
            wellknown::box_scalar(descriptor, other, config).map(ProtoValue::Message)
        }
        other => Err(BridgeError::type_mismatch(
            other,
            other.type_name(),
            descriptor.full_name(),
        )),
    }
}

/// Convert a script value to a map key of `kind`.
pub fn map_key_from_script(kind: &Kind, value: &Value, config: &BridgeConfig) -> Result<MapKey> {
    match to_proto(kind, value, config)? {
        ProtoValue::Bool(b) => Ok(MapKey::Bool(b)),
        ProtoValue::I32(v) => Ok(MapKey::I32(v)),
        ProtoValue::I64(v) => Ok(MapKey::I64(v)),
        ProtoValue::U32(v) => Ok(MapKey::U32(v)),
        ProtoValue::U64(v) => Ok(MapKey::U64(v)),
        ProtoValue::String(s) => Ok(MapKey::String(s)),
        _ => Err(BridgeError::type_mismatch(
            value,
            value.type_name(),
            kind_name(kind),
        )),
    }
}

/// Validate a script value against `kind` and return its canonical form.
///
/// Message values come back as fresh copies. `None` is rejected.
pub fn normalize(kind: &Kind, value: &Value, config: &Arc<BridgeConfig>) -> Result<Value> {
    if value.is_none() {
        return Err(BridgeError::type_mismatch(value, value.type_name(), kind_name(kind)));
    }
    let stored = to_proto(kind, value, config)?;
    Ok(scalar_to_script(&stored, kind, config))
}

// ============================================================================
// Schema -> script
// ============================================================================

/// Convert a schema value of `kind` to a script value.
pub fn scalar_to_script(value: &ProtoValue, kind: &Kind, config: &Arc<BridgeConfig>) -> Value {
    match value {
        ProtoValue::Bool(b) => Value::Bool(*b),
        ProtoValue::I32(v) => Value::Int(i128::from(*v)),
        ProtoValue::I64(v) => Value::Int(i128::from(*v)),
        ProtoValue::U32(v) => Value::Int(i128::from(*v)),
        ProtoValue::U64(v) => Value::Int(i128::from(*v)),
        ProtoValue::F32(v) => Value::Float(f64::from(*v)),
        ProtoValue::F64(v) => Value::Float(*v),
        ProtoValue::String(s) => Value::String(s.clone()),
        // Bytes read back as the string they were written from.
        ProtoValue::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => Value::Bytes(b.to_vec()),
        },
        ProtoValue::EnumNumber(n) => match kind {
            Kind::Enum(descriptor) => Value::Enum(EnumValue::new(descriptor.clone(), *n)),
            _ => Value::Int(i128::from(*n)),
        },
        ProtoValue::Message(m) => Value::message(MessageValue::from_message(m.clone(), config.clone())),
        ProtoValue::List(items) => Value::list(
            items
                .iter()
                .map(|item| scalar_to_script(item, kind, config))
                .collect(),
        ),
        ProtoValue::Map(entries) => {
            let mut pairs: Vec<(Value, Value)> = entries
                .iter()
                .map(|(k, v)| (map_key_to_script(k), scalar_to_script(v, kind, config)))
                .collect();
            pairs.sort_by(|(a, _), (b, _)| key_order(a, b));
            // Map keys are scalars and always hashable.
            Value::Dict(Rc::new(Dict::from_scalar_keys(pairs)))
        }
    }
}

/// Convert a map key to a script value.
pub fn map_key_to_script(key: &MapKey) -> Value {
    match key {
        MapKey::Bool(b) => Value::Bool(*b),
        MapKey::I32(v) => Value::Int(i128::from(*v)),
        MapKey::I64(v) => Value::Int(i128::from(*v)),
        MapKey::U32(v) => Value::Int(i128::from(*v)),
        MapKey::U64(v) => Value::Int(i128::from(*v)),
        MapKey::String(s) => Value::String(s.clone()),
    }
}

/// Deterministic ordering for map keys read back from storage.
pub(crate) fn key_order(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => std::cmp::Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Arc<BridgeConfig> {
        Arc::new(BridgeConfig::default())
    }

    #[test]
    fn test_int32_bounds() {
        let cfg = config();
        assert_eq!(
            to_proto(&Kind::Int32, &Value::Int(2_147_483_647), &cfg).expect("max"),
            ProtoValue::I32(i32::MAX)
        );
        assert_eq!(
            to_proto(&Kind::Int32, &Value::Int(-2_147_483_648), &cfg).expect("min"),
            ProtoValue::I32(i32::MIN)
        );
        let err = to_proto(&Kind::Sint32, &Value::Int(2_147_483_648), &cfg).expect_err("overflow");
        assert_eq!(
            err.to_string(),
            "ValueError: value 2147483648 overflows type \"sint32\"."
        );
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let cfg = config();
        let err = to_proto(&Kind::Fixed32, &Value::Int(-1), &cfg).expect_err("negative");
        assert!(matches!(err, BridgeError::Overflow { ref target, .. } if target == "fixed32"));
        assert_eq!(
            to_proto(&Kind::Uint64, &Value::Int(i128::from(u64::MAX)), &cfg).expect("max"),
            ProtoValue::U64(u64::MAX)
        );
        assert!(to_proto(&Kind::Uint64, &Value::Int(i128::from(u64::MAX) + 1), &cfg).is_err());
    }

    #[test]
    fn test_int64_bounds() {
        let cfg = config();
        assert!(to_proto(&Kind::Sfixed64, &Value::Int(i128::from(i64::MIN)), &cfg).is_ok());
        assert!(to_proto(&Kind::Int64, &Value::Int(i128::from(i64::MAX) + 1), &cfg).is_err());
    }

    #[test]
    fn test_float_accepts_int() {
        let cfg = config();
        assert_eq!(
            to_proto(&Kind::Double, &Value::Int(3), &cfg).expect("double"),
            ProtoValue::F64(3.0)
        );
        assert_eq!(
            to_proto(&Kind::Float, &Value::Float(1.5), &cfg).expect("float"),
            ProtoValue::F32(1.5)
        );
    }

    #[test]
    fn test_string_to_bytes() {
        let cfg = config();
        assert_eq!(
            to_proto(&Kind::Bytes, &Value::from("ab"), &cfg).expect("bytes"),
            ProtoValue::Bytes(Bytes::from_static(b"ab"))
        );
    }

    #[test]
    fn test_kind_mismatches() {
        let cfg = config();
        let err = to_proto(&Kind::Int32, &Value::from("1"), &cfg).expect_err("string");
        assert_eq!(
            err.to_string(),
            "TypeError: value \"1\" (type `string') can't be assigned to type `int32'."
        );
        assert!(to_proto(&Kind::Bool, &Value::Int(1), &cfg).is_err());
        assert!(to_proto(&Kind::Int64, &Value::Bool(true), &cfg).is_err());
        assert!(to_proto(&Kind::String, &Value::Bytes(vec![1]), &cfg).is_err());
    }

    fn color() -> prost_reflect::EnumDescriptor {
        use crate::schema::{pool_from_files, EnumBuilder, FileBuilder};
        let file = FileBuilder::proto3("color.proto", "paint")
            .enumeration(EnumBuilder::new("Color").variant("NONE").variant("RED"))
            .build();
        let pool = pool_from_files(vec![file]).expect("pool");
        pool.get_enum_by_name("paint.Color").expect("enum")
    }

    #[test]
    fn test_scalar_round_trip() {
        let cfg = config();
        let color = color();
        for (kind, value) in [
            (Kind::Int32, Value::Int(-7)),
            (Kind::Sint32, Value::Int(i128::from(i32::MIN))),
            (Kind::Sfixed32, Value::Int(-1)),
            (Kind::Int64, Value::Int(i128::from(i64::MIN))),
            (Kind::Sint64, Value::Int(i128::from(i64::MAX))),
            (Kind::Sfixed64, Value::Int(-42)),
            (Kind::Uint32, Value::Int(i128::from(u32::MAX))),
            (Kind::Fixed32, Value::Int(7)),
            (Kind::Uint64, Value::Int(i128::from(u64::MAX))),
            (Kind::Fixed64, Value::Int(1 << 40)),
            (Kind::Double, Value::Float(0.25)),
            (Kind::Float, Value::Float(1.5)),
            (Kind::String, Value::from("héllo")),
            (Kind::Bytes, Value::from("ab")),
            (Kind::Bytes, Value::Bytes(vec![0xff, 0x00])),
            (Kind::Bool, Value::Bool(true)),
            (Kind::Enum(color.clone()), Value::Enum(EnumValue::new(color.clone(), 1))),
            (Kind::Enum(color.clone()), Value::Enum(EnumValue::new(color.clone(), 99))),
        ] {
            let stored = to_proto(&kind, &value, &cfg).expect("to proto");
            let back = scalar_to_script(&stored, &kind, &cfg);
            assert!(back.equals(&value).expect("eq"), "{} round trip: {}", kind_name(&kind), back);
        }
    }

    #[test]
    fn test_unknown_enum_number_has_no_name() {
        let cfg = config();
        let back = scalar_to_script(&ProtoValue::EnumNumber(99), &Kind::Enum(color()), &cfg);
        match back {
            Value::Enum(e) => {
                assert_eq!(e.number(), 99);
                assert_eq!(e.name(), None);
            }
            other => panic!("expected enum, got {}", other),
        }
    }

    #[test]
    fn test_map_reads_sorted_by_key() {
        let cfg = config();
        let mut entries = std::collections::HashMap::new();
        entries.insert(MapKey::String("b".into()), ProtoValue::I32(2));
        entries.insert(MapKey::String("a".into()), ProtoValue::I32(1));
        let back = scalar_to_script(&ProtoValue::Map(entries), &Kind::Int32, &cfg);
        match back {
            Value::Dict(d) => {
                let keys: Vec<String> = d.keys().iter().map(ToString::to_string).collect();
                assert_eq!(keys, vec!["\"a\"", "\"b\""]);
            }
            other => panic!("expected dict, got {}", other),
        }
    }

    #[test]
    fn test_normalize_rejects_none() {
        let cfg = config();
        let err = normalize(&Kind::Int32, &Value::None, &cfg).expect_err("none");
        assert!(matches!(err, BridgeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_map_keys() {
        let cfg = config();
        assert_eq!(
            map_key_from_script(&Kind::String, &Value::from("k"), &cfg).expect("key"),
            MapKey::String("k".into())
        );
        assert!(map_key_to_script(&MapKey::U32(4)).equals(&Value::Int(4)).expect("eq"));
    }
}
