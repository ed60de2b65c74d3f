// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Script handles for schema types.
//!
//! - [`MessageType`]: callable constructor with a lazily built namespace of
//!   nested types
//! - [`EnumType`] / [`EnumValue`]: name lookup and typed enum values
//! - [`Package`]: top-level types of one protobuf package

mod enum_type;
mod message_type;
mod package;

pub use enum_type::{EnumType, EnumValue};
pub use message_type::{MessageType, NestedType};
pub use package::Package;
