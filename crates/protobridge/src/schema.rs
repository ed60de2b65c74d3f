// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for descriptor protos.
//!
//! Lets hosts assemble a [`DescriptorPool`] at runtime without running
//! `protoc`, and provides the `google.protobuf` Any and wrapper files.
//!
//! ```rust
//! use protobridge::schema::{FieldType, FileBuilder, MessageBuilder, pool_from_files};
//!
//! let file = FileBuilder::proto3("sensor.proto", "acme")
//!     .message(
//!         MessageBuilder::new("Reading")
//!             .field("sensor_id", 1, FieldType::Uint32)
//!             .field("celsius", 2, FieldType::Double)
//!             .repeated("tags", 3, FieldType::String),
//!     )
//!     .build();
//! let pool = pool_from_files(vec![file]).unwrap();
//! assert!(pool.get_message_by_name("acme.Reading").is_some());
//! ```

use crate::error::Result;
use prost_reflect::DescriptorPool;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, OneofDescriptorProto,
};

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
    /// Message type by fully-qualified name.
    Message(String),
    /// Enum type by fully-qualified name.
    Enum(String),
}

impl FieldType {
    fn proto_type(&self) -> Type {
        match self {
            Self::Double => Type::Double,
            Self::Float => Type::Float,
            Self::Int32 => Type::Int32,
            Self::Int64 => Type::Int64,
            Self::Uint32 => Type::Uint32,
            Self::Uint64 => Type::Uint64,
            Self::Sint32 => Type::Sint32,
            Self::Sint64 => Type::Sint64,
            Self::Fixed32 => Type::Fixed32,
            Self::Fixed64 => Type::Fixed64,
            Self::Sfixed32 => Type::Sfixed32,
            Self::Sfixed64 => Type::Sfixed64,
            Self::Bool => Type::Bool,
            Self::String => Type::String,
            Self::Bytes => Type::Bytes,
            Self::Message(_) => Type::Message,
            Self::Enum(_) => Type::Enum,
        }
    }

    fn type_name(&self) -> Option<String> {
        match self {
            Self::Message(name) | Self::Enum(name) => Some(absolute(name)),
            _ => None,
        }
    }
}

fn absolute(name: &str) -> String {
    if name.starts_with('.') {
        name.to_string()
    } else {
        format!(".{}", name)
    }
}

fn join(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn map_entry_name(field: &str) -> String {
    let mut camel = json_name(field);
    if let Some(first) = camel.get(..1) {
        camel = format!("{}{}", first.to_uppercase(), &camel[1..]);
    }
    format!("{}Entry", camel)
}

#[derive(Debug, Clone)]
struct PendingField {
    proto: FieldDescriptorProto,
    /// Map entry type declared inside this message.
    map_entry: Option<String>,
}

/// Builder for one message type.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    name: String,
    fields: Vec<PendingField>,
    oneofs: Vec<String>,
    nested: Vec<MessageBuilder>,
    enums: Vec<EnumBuilder>,
    map_entry: bool,
}

impl MessageBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
            nested: Vec::new(),
            enums: Vec::new(),
            map_entry: false,
        }
    }

    fn push(mut self, name: &str, number: i32, ty: FieldType, label: Label) -> Self {
        let proto = FieldDescriptorProto {
            name: Some(name.to_string()),
            json_name: Some(json_name(name)),
            number: Some(number),
            label: Some(label as i32),
            r#type: Some(ty.proto_type() as i32),
            type_name: ty.type_name(),
            ..Default::default()
        };
        self.fields.push(PendingField {
            proto,
            map_entry: None,
        });
        self
    }

    /// Add a singular field.
    pub fn field(self, name: &str, number: i32, ty: FieldType) -> Self {
        self.push(name, number, ty, Label::Optional)
    }

    /// Add a singular field with a declared default (proto2 only).
    pub fn field_with_default(mut self, name: &str, number: i32, ty: FieldType, default: &str) -> Self {
        self = self.push(name, number, ty, Label::Optional);
        if let Some(last) = self.fields.last_mut() {
            last.proto.default_value = Some(default.to_string());
        }
        self
    }

    /// Add a repeated field.
    pub fn repeated(self, name: &str, number: i32, ty: FieldType) -> Self {
        self.push(name, number, ty, Label::Repeated)
    }

    /// Add a map field and its synthetic entry type.
    pub fn map(mut self, name: &str, number: i32, key: FieldType, value: FieldType) -> Self {
        let entry_name = map_entry_name(name);
        let mut entry = MessageBuilder::new(entry_name.clone())
            .field("key", 1, key)
            .field("value", 2, value);
        entry.map_entry = true;
        self.nested.push(entry);

        self = self.push(name, number, FieldType::Message(String::new()), Label::Repeated);
        if let Some(last) = self.fields.last_mut() {
            last.map_entry = Some(entry_name);
        }
        self
    }

    /// Add a field to the oneof `group`, declaring the group on first use.
    pub fn oneof_field(mut self, group: &str, name: &str, number: i32, ty: FieldType) -> Self {
        let index = match self.oneofs.iter().position(|g| g == group) {
            Some(i) => i,
            None => {
                self.oneofs.push(group.to_string());
                self.oneofs.len() - 1
            }
        };
        self = self.push(name, number, ty, Label::Optional);
        if let Some(last) = self.fields.last_mut() {
            last.proto.oneof_index = Some(index as i32);
        }
        self
    }

    /// Nest a message type.
    pub fn message(mut self, nested: MessageBuilder) -> Self {
        self.nested.push(nested);
        self
    }

    /// Nest an enum type.
    pub fn enumeration(mut self, nested: EnumBuilder) -> Self {
        self.enums.push(nested);
        self
    }

    /// Build the descriptor; `scope` is the package or enclosing message.
    pub fn build(self, scope: &str) -> DescriptorProto {
        let full_name = join(scope, &self.name);
        let field = self
            .fields
            .into_iter()
            .map(|pending| {
                let mut proto = pending.proto;
                if let Some(entry) = pending.map_entry {
                    proto.type_name = Some(absolute(&join(&full_name, &entry)));
                }
                proto
            })
            .collect();
        let options = self.map_entry.then(|| MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        });

        DescriptorProto {
            name: Some(self.name),
            field,
            nested_type: self.nested.into_iter().map(|m| m.build(&full_name)).collect(),
            enum_type: self.enums.into_iter().map(EnumBuilder::build).collect(),
            oneof_decl: self
                .oneofs
                .into_iter()
                .map(|name| OneofDescriptorProto {
                    name: Some(name),
                    ..Default::default()
                })
                .collect(),
            options,
            ..Default::default()
        }
    }
}

/// Builder for an enum type. Values auto-increment from zero.
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    name: String,
    values: Vec<EnumValueDescriptorProto>,
    next_value: i32,
}

impl EnumBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            next_value: 0,
        }
    }

    /// Add a value numbered one past the previous.
    pub fn variant(self, name: &str) -> Self {
        let number = self.next_value;
        self.variant_value(name, number)
    }

    /// Add a value with an explicit number.
    pub fn variant_value(mut self, name: &str, number: i32) -> Self {
        self.values.push(EnumValueDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            ..Default::default()
        });
        self.next_value = number + 1;
        self
    }

    pub fn build(self) -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some(self.name),
            value: self.values,
            ..Default::default()
        }
    }
}

/// Builder for one `.proto` file.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    name: String,
    package: String,
    syntax: &'static str,
    dependencies: Vec<String>,
    messages: Vec<MessageBuilder>,
    enums: Vec<EnumBuilder>,
}

impl FileBuilder {
    /// A proto3 file.
    pub fn proto3(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self::with_syntax(name.into(), package.into(), "proto3")
    }

    /// A proto2 file.
    pub fn proto2(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self::with_syntax(name.into(), package.into(), "proto2")
    }

    fn with_syntax(name: String, package: String, syntax: &'static str) -> Self {
        Self {
            name,
            package,
            syntax,
            dependencies: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
        }
    }

    /// Import another file by path.
    pub fn dependency(mut self, path: impl Into<String>) -> Self {
        self.dependencies.push(path.into());
        self
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumBuilder) -> Self {
        self.enums.push(enumeration);
        self
    }

    pub fn build(self) -> FileDescriptorProto {
        let package = self.package;
        FileDescriptorProto {
            name: Some(self.name),
            package: (!package.is_empty()).then(|| package.clone()),
            dependency: self.dependencies,
            message_type: self.messages.into_iter().map(|m| m.build(&package)).collect(),
            enum_type: self.enums.into_iter().map(EnumBuilder::build).collect(),
            syntax: Some(self.syntax.to_string()),
            ..Default::default()
        }
    }
}

/// Build a pool from files listed dependencies first.
pub fn pool_from_files(files: Vec<FileDescriptorProto>) -> Result<DescriptorPool> {
    Ok(DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: files })?)
}

// ============================================================================
// Well-known files
// ============================================================================

/// `google/protobuf/any.proto`.
pub fn any_file() -> FileDescriptorProto {
    FileBuilder::proto3("google/protobuf/any.proto", "google.protobuf")
        .message(
            MessageBuilder::new("Any")
                .field("type_url", 1, FieldType::String)
                .field("value", 2, FieldType::Bytes),
        )
        .build()
}

/// `google/protobuf/wrappers.proto`.
pub fn wrappers_file() -> FileDescriptorProto {
    let wrappers = [
        ("DoubleValue", FieldType::Double),
        ("FloatValue", FieldType::Float),
        ("Int64Value", FieldType::Int64),
        ("UInt64Value", FieldType::Uint64),
        ("Int32Value", FieldType::Int32),
        ("UInt32Value", FieldType::Uint32),
        ("BoolValue", FieldType::Bool),
        ("StringValue", FieldType::String),
        ("BytesValue", FieldType::Bytes),
    ];
    wrappers
        .into_iter()
        .fold(
            FileBuilder::proto3("google/protobuf/wrappers.proto", "google.protobuf"),
            |file, (name, ty)| file.message(MessageBuilder::new(name).field("value", 1, ty)),
        )
        .build()
}
