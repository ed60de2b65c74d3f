// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor pool front-end with cached type handles.
//!
//! A [`Loader`] owns the schema oracle (a `prost_reflect::DescriptorPool`)
//! and the bridge configuration, and hands out shared
//! [`MessageType`] / [`EnumType`] / [`Package`] handles. Handles are cached
//! by full name, so repeated lookups return the same `Arc`.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::message::MessageValue;
use crate::script::Value;
use crate::types::{EnumType, MessageType, NestedType, Package};
use dashmap::DashMap;
use prost_reflect::{DescriptorPool, DynamicMessage};
use prost_types::FileDescriptorSet;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves schema names to script handles.
#[derive(Debug)]
pub struct Loader {
    pool: DescriptorPool,
    config: Arc<BridgeConfig>,
    packages: DashMap<String, Arc<Package>>,
    message_types: DashMap<String, Arc<MessageType>>,
    enum_types: DashMap<String, Arc<EnumType>>,
}

impl Loader {
    pub fn new(pool: DescriptorPool, config: BridgeConfig) -> Self {
        Self::with_shared_config(pool, Arc::new(config))
    }

    pub fn with_shared_config(pool: DescriptorPool, config: Arc<BridgeConfig>) -> Self {
        log::debug!(
            "[proto] loader ready: {} files, legacy_proto2_none={}",
            pool.files().count(),
            config.legacy_proto2_none
        );
        Self {
            pool,
            config,
            packages: DashMap::new(),
            message_types: DashMap::new(),
            enum_types: DashMap::new(),
        }
    }

    /// Build a loader from a compiled `FileDescriptorSet`.
    pub fn from_file_descriptor_set(set: FileDescriptorSet, config: BridgeConfig) -> Result<Self> {
        let pool = DescriptorPool::from_file_descriptor_set(set)?;
        Ok(Self::new(pool, config))
    }

    /// Build a loader from an encoded `FileDescriptorSet`.
    pub fn decode_file_descriptor_set(bytes: &[u8], config: BridgeConfig) -> Result<Self> {
        let pool = DescriptorPool::decode(bytes)?;
        Ok(Self::new(pool, config))
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    pub fn config(&self) -> &Arc<BridgeConfig> {
        &self.config
    }

    // ========================================================================
    // Type handles
    // ========================================================================

    /// Handle for the message type `full_name`.
    pub fn message_type(&self, full_name: &str) -> Result<Arc<MessageType>> {
        if let Some(cached) = self.message_types.get(full_name) {
            return Ok(Arc::clone(cached.value()));
        }
        let descriptor = self
            .pool
            .get_message_by_name(full_name)
            .ok_or_else(|| BridgeError::TypeNotFound(full_name.to_string()))?;
        let handle = Arc::new(MessageType::new(descriptor, Arc::clone(&self.config)));
        log::trace!("[proto] cached message type {}", full_name);
        Ok(Arc::clone(
            self.message_types
                .entry(full_name.to_string())
                .or_insert(handle)
                .value(),
        ))
    }

    /// Handle for the enum type `full_name`.
    pub fn enum_type(&self, full_name: &str) -> Result<Arc<EnumType>> {
        if let Some(cached) = self.enum_types.get(full_name) {
            return Ok(Arc::clone(cached.value()));
        }
        let descriptor = self
            .pool
            .get_enum_by_name(full_name)
            .ok_or_else(|| BridgeError::TypeNotFound(full_name.to_string()))?;
        let handle = Arc::new(EnumType::new(descriptor));
        log::trace!("[proto] cached enum type {}", full_name);
        Ok(Arc::clone(
            self.enum_types
                .entry(full_name.to_string())
                .or_insert(handle)
                .value(),
        ))
    }

    /// Namespace of the top-level types of `name`.
    ///
    /// Unknown packages resolve to an empty namespace; the error surfaces
    /// when a member is looked up.
    pub fn package(&self, name: &str) -> Result<Arc<Package>> {
        if let Some(cached) = self.packages.get(name) {
            return Ok(Arc::clone(cached.value()));
        }

        let mut members = HashMap::new();
        for message in self.pool.all_messages() {
            if message.package_name() == name && message.parent_message().is_none() {
                let handle = self.message_type(message.full_name())?;
                members.insert(message.name().to_string(), NestedType::Message(handle));
            }
        }
        for enumeration in self.pool.all_enums() {
            if enumeration.package_name() == name && enumeration.parent_message().is_none() {
                let handle = self.enum_type(enumeration.full_name())?;
                members.insert(enumeration.name().to_string(), NestedType::Enum(handle));
            }
        }

        log::debug!("[proto] package {} resolved ({} members)", name, members.len());
        let package = Arc::new(Package::new(name, members));
        Ok(Arc::clone(
            self.packages
                .entry(name.to_string())
                .or_insert(package)
                .value(),
        ))
    }

    // ========================================================================
    // Host API
    // ========================================================================

    /// Wrap host-owned storage as a script message.
    pub fn wrap_message(&self, message: DynamicMessage) -> Value {
        Value::message(MessageValue::from_message(message, Arc::clone(&self.config)))
    }

    /// Decode wire bytes as `full_name` and wrap the result.
    pub fn decode_message(&self, full_name: &str, bytes: &[u8]) -> Result<Value> {
        let descriptor = self.message_type(full_name)?.descriptor().clone();
        let message = DynamicMessage::decode(descriptor, bytes)?;
        Ok(self.wrap_message(message))
    }

    /// Extract storage from a script message.
    pub fn unwrap_message(&self, value: &Value) -> Result<DynamicMessage> {
        match value {
            Value::Message(m) => m.to_message(),
            other => Err(BridgeError::type_mismatch(
                other,
                other.type_name(),
                "proto.Message",
            )),
        }
    }

    /// The `proto` namespace bound to this loader.
    pub fn module(self: &Arc<Self>) -> Value {
        crate::module::proto_module(Arc::clone(self))
    }
}
