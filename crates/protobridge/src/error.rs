// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every bridge operation.
//!
//! All failures are synchronous, string-described and meant to be surfaced
//! unchanged by the script evaluator. Nothing here is retried.

use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Script value kind incompatible with the schema type.
    Type,
    /// Compatible kind, but numerically out of range.
    Value,
    /// Unknown field, nested type, package member or enum value.
    Lookup,
    /// Mutation attempted on a frozen value.
    Frozen,
    /// Operation across two different message types.
    Mismatch,
    /// Wrong number or kind of call arguments.
    Argument,
    /// JSON / text / YAML / binary encoding or decoding failed.
    Codec,
    /// Configuration could not be loaded.
    Config,
}

/// Errors produced by the script/message bridge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    // ========================================================================
    // Conversion Errors
    // ========================================================================
    /// Script value of the wrong kind for the target schema type.
    #[error("TypeError: value {value} (type `{value_type}') can't be assigned to type `{expected}'.")]
    TypeMismatch {
        /// Script repr of the offending value.
        value: String,
        /// Script type name of the offending value.
        value_type: String,
        /// Schema type name that was expected.
        expected: String,
    },
    /// `None` assigned to a scalar field under strict (proto3) rules.
    #[error("TypeError: value None can't be assigned to type `{expected}' in proto3 mode.")]
    NoneInProto3 {
        /// Schema type name of the field.
        expected: String,
    },
    /// Integer does not fit the target width or signedness.
    #[error("ValueError: value {value} overflows type \"{target}\".")]
    Overflow {
        /// Script repr of the offending value.
        value: String,
        /// Schema type name that overflowed.
        target: String,
    },
    /// Message of one schema type assigned where another is required.
    #[error("TypeError: message of type `{got}' can't be assigned to type `{expected}'.")]
    MessageTypeMismatch {
        /// Full name of the required message type.
        expected: String,
        /// Full name of the supplied message type.
        got: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Message has no field with this name.
    #[error("AttributeError: {message} has no field \"{field}\"")]
    FieldNotFound {
        /// Full name of the message type.
        message: String,
        /// Requested field name.
        field: String,
    },
    /// No message or enum with this fully-qualified name.
    #[error("Protobuf type \"{0}\" not found")]
    TypeNotFound(String),
    /// Enum type has no value with this name.
    #[error("proto.EnumType {enum_name} has no such field: {name}")]
    EnumValueNotFound {
        /// Full name of the enum type.
        enum_name: String,
        /// Requested value name.
        name: String,
    },
    /// Value does not carry the requested attribute.
    #[error("AttributeError: {type_name} has no attribute \"{name}\"")]
    NoSuchAttribute {
        /// Script type name of the receiver.
        type_name: String,
        /// Requested attribute.
        name: String,
    },
    /// Index outside the bounds of a sequence.
    #[error("IndexError: index {index} out of range: length is {length}")]
    IndexOutOfRange {
        /// Requested index.
        index: i64,
        /// Sequence length.
        length: usize,
    },
    /// Key not present in a mapping.
    #[error("KeyError: key {0} not in map")]
    KeyNotFound(String),
    /// Element not present in a sequence.
    #[error("ValueError: {0} not found in list")]
    ElementNotFound(String),

    // ========================================================================
    // Mutation Errors
    // ========================================================================
    /// Mutation attempted on a frozen value.
    #[error("cannot {verb} frozen {target}")]
    Frozen {
        /// Mutation verb (e.g. "set field of", "append to").
        verb: String,
        /// Kind of the frozen value ("message", "list", "map").
        target: &'static str,
    },
    /// `merge` called with two different message types.
    #[error("merge: types are not compatible: `{dst}' <- `{src}'")]
    MergeMismatch {
        /// Full name of the destination type.
        dst: String,
        /// Full name of the source type.
        src: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Operation not supported between the given operand types.
    #[error("TypeError: unsupported operation {op} for {operands}")]
    UnsupportedOperation {
        /// Operator or operation name.
        op: String,
        /// Script type name(s) involved.
        operands: String,
    },
    /// Value cannot be used as a hash key.
    #[error("TypeError: unhashable type: {0}")]
    Unhashable(String),
    /// Value is not callable.
    #[error("TypeError: value of type {0} is not callable")]
    NotCallable(String),
    /// Positional arguments passed to a keyword-only callee.
    #[error("{callee}: unexpected positional arguments")]
    PositionalArguments {
        /// Name of the callee.
        callee: String,
    },
    /// Keyword argument not accepted by the callee.
    #[error("{callee}: unexpected keyword argument \"{name}\"")]
    UnexpectedKeyword {
        /// Name of the callee.
        callee: String,
        /// Offending keyword.
        name: String,
    },
    /// Required argument not supplied.
    #[error("{callee}: missing argument for {name}")]
    MissingArgument {
        /// Name of the callee.
        callee: String,
        /// Parameter name.
        name: String,
    },
    /// Argument supplied both positionally and by keyword.
    #[error("{callee}: got multiple values for parameter \"{name}\"")]
    DuplicateArgument {
        /// Name of the callee.
        callee: String,
        /// Parameter name.
        name: String,
    },
    /// More positional arguments than parameters.
    #[error("{callee}: got {got} positional arguments, want at most {max}")]
    TooManyArguments {
        /// Name of the callee.
        callee: String,
        /// Maximum accepted.
        max: usize,
        /// Number supplied.
        got: usize,
    },
    /// Argument of the wrong script type.
    #[error("{callee}: for parameter {param}: got {got}, want {expected}")]
    ArgumentType {
        /// Name of the callee.
        callee: String,
        /// Parameter name.
        param: String,
        /// Expected script type description.
        expected: String,
        /// Script type name received.
        got: String,
    },

    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// `decode_any` received a message that is not `google.protobuf.Any`.
    #[error("decode_any: expected google.protobuf.Any, got {0}")]
    NotAnAny(String),
    /// JSON encoding or decoding failed.
    #[error("JSON codec error: {0}")]
    Json(String),
    /// Text format encoding or decoding failed.
    #[error("text format error: {0}")]
    Text(String),
    /// YAML encoding or decoding failed.
    #[error("YAML codec error: {0}")]
    Yaml(String),
    /// Binary protobuf decoding failed.
    #[error("protobuf decode error: {0}")]
    Decode(String),
    /// Descriptor pool could not be built.
    #[error("descriptor error: {0}")]
    Descriptor(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration file unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Build a [`BridgeError::TypeMismatch`] from the offending value's repr and type.
    pub fn type_mismatch(
        value: impl fmt::Display,
        value_type: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            value: value.to_string(),
            value_type: value_type.into(),
            expected: expected.into(),
        }
    }

    /// Build a [`BridgeError::Frozen`].
    pub fn frozen(verb: impl Into<String>, target: &'static str) -> Self {
        Self::Frozen {
            verb: verb.into(),
            target,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch { .. }
            | Self::NoneInProto3 { .. }
            | Self::MessageTypeMismatch { .. }
            | Self::UnsupportedOperation { .. }
            | Self::Unhashable(_)
            | Self::NotCallable(_)
            | Self::NotAnAny(_) => ErrorKind::Type,
            Self::Overflow { .. } => ErrorKind::Value,
            Self::FieldNotFound { .. }
            | Self::TypeNotFound(_)
            | Self::EnumValueNotFound { .. }
            | Self::NoSuchAttribute { .. }
            | Self::IndexOutOfRange { .. }
            | Self::KeyNotFound(_)
            | Self::ElementNotFound(_) => ErrorKind::Lookup,
            Self::Frozen { .. } => ErrorKind::Frozen,
            Self::MergeMismatch { .. } => ErrorKind::Mismatch,
            Self::PositionalArguments { .. }
            | Self::UnexpectedKeyword { .. }
            | Self::MissingArgument { .. }
            | Self::DuplicateArgument { .. }
            | Self::TooManyArguments { .. }
            | Self::ArgumentType { .. } => ErrorKind::Argument,
            Self::Json(_)
            | Self::Text(_)
            | Self::Yaml(_)
            | Self::Decode(_)
            | Self::Descriptor(_) => ErrorKind::Codec,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

impl From<prost::DecodeError> for BridgeError {
    fn from(e: prost::DecodeError) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<prost_reflect::DescriptorError> for BridgeError {
    fn from(e: prost_reflect::DescriptorError) -> Self {
        Self::Descriptor(e.to_string())
    }
}

/// Convenient alias for bridge results.
pub type Result<T> = core::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_message() {
        let err = BridgeError::Overflow {
            value: "2147483648".into(),
            target: "int32".into(),
        };
        assert_eq!(
            err.to_string(),
            "ValueError: value 2147483648 overflows type \"int32\"."
        );
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = BridgeError::type_mismatch("\"x\"", "string", "int32");
        assert_eq!(
            err.to_string(),
            "TypeError: value \"x\" (type `string') can't be assigned to type `int32'."
        );
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_frozen_message() {
        let err = BridgeError::frozen("set field of", "message");
        assert_eq!(err.to_string(), "cannot set field of frozen message");
        assert_eq!(err.kind(), ErrorKind::Frozen);
    }

    #[test]
    fn test_boxed_as_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BridgeError::MergeMismatch {
            dst: "a.A".into(),
            src: "b.B".into(),
        });
        assert_eq!(err.to_string(), "merge: types are not compatible: `a.A' <- `b.B'");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_proto3_none_mentions_mode() {
        let err = BridgeError::NoneInProto3 {
            expected: "int32".into(),
        };
        assert!(err.to_string().contains("proto3 mode"));
    }
}
