// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # protobridge - Protobuf messages as script values
//!
//! Exposes schema-typed Protocol Buffer messages to an embedded,
//! dynamically-typed configuration language. Scripts construct messages,
//! read and assign fields with strict type checking, manipulate repeated
//! and map fields as typed lists and dicts, and convert messages to and
//! from JSON, text format, YAML and `google.protobuf.Any`.
//!
//! ## Quick Start
//!
//! ```rust
//! use protobridge::schema::{FieldType, FileBuilder, MessageBuilder, pool_from_files};
//! use protobridge::{BridgeConfig, Loader, Value};
//! use std::sync::Arc;
//!
//! # fn main() -> protobridge::Result<()> {
//! let file = FileBuilder::proto3("demo.proto", "demo")
//!     .message(
//!         MessageBuilder::new("Job")
//!             .field("name", 1, FieldType::String)
//!             .field("replicas", 2, FieldType::Int32),
//!     )
//!     .build();
//! let loader = Arc::new(Loader::new(pool_from_files(vec![file])?, BridgeConfig::default()));
//!
//! let job_type = Value::MessageType(loader.message_type("demo.Job")?);
//! let job = job_type.call(&[], &[("replicas".to_string(), Value::Int(3))])?;
//! job.set_field("name", Value::from("web"))?;
//!
//! let proto = loader.module();
//! let encode_json = proto.attr("encode_json")?.expect("encode_json");
//! let json = encode_json.call(&[job], &[])?;
//! assert_eq!(json.as_str(), Some(r#"{"name":"web","replicas":3}"#));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |                   script evaluator (host)                     |
//! +---------------------------------------------------------------+
//! |  script::Value protocol: attr / set_field / index / call ...  |
//! +---------------+------------------+----------------------------+
//! | MessageValue  | RepeatedField    | MessageType / EnumType /   |
//! | (field cache) | MapField         | Package (Loader caches)    |
//! +---------------+------------------+----------------------------+
//! |           codec (kind-driven scalar conversion)               |
//! +---------------------------------------------------------------+
//! |       prost-reflect DescriptorPool / DynamicMessage           |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`script`] - script value model and capability protocol
//! - [`codec`] - scalar conversion and range checks
//! - [`container`] - typed repeated and map views
//! - [`message`] - message values
//! - [`types`] - message/enum/package handles
//! - [`loader`] - descriptor pool front-end
//! - [`module`] - the `proto` namespace
//! - [`schema`] - runtime descriptor builders
//!
//! ## Threading
//!
//! Message values and containers are `Rc`-based and owned by a single
//! evaluation. Type handles and the [`Loader`] are `Send + Sync` and may be
//! shared read-only across evaluations.

pub mod codec;
pub mod config;
pub mod container;
pub mod error;
pub mod loader;
pub mod message;
pub mod module;
pub mod reflect;
pub mod schema;
pub mod script;
pub mod types;
pub mod wellknown;


pub use config::BridgeConfig;
pub use container::{MapField, RepeatedField};
pub use error::{BridgeError, ErrorKind, Result};
pub use loader::Loader;
pub use message::MessageValue;
pub use script::{CompareOp, Kwargs, Value};
pub use types::{EnumType, EnumValue, MessageType, NestedType, Package};
