// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge configuration.
//!
//! All knobs live in one [`BridgeConfig`], shared as `Arc<BridgeConfig>` by
//! every value a [`Loader`](crate::Loader) hands out.
//!
//! # Example YAML
//!
//! ```yaml
//! # protobridge.yaml
//! legacy_proto2_none: false
//! any_type_url_prefix: "type.googleapis.com/"
//! json_indent: 4
//! scalar_wrappers:
//!   - google.protobuf.Int32Value
//!   - google.protobuf.StringValue
//!   - acme.types.Money
//! ```

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default prefix used when packing `google.protobuf.Any`.
pub const DEFAULT_TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Full name of the Any envelope message.
pub const ANY_FULL_NAME: &str = "google.protobuf.Any";

/// Well-known wrapper messages that accept a bare scalar on assignment.
pub const DEFAULT_SCALAR_WRAPPERS: [&str; 8] = [
    "google.protobuf.BoolValue",
    "google.protobuf.StringValue",
    "google.protobuf.DoubleValue",
    "google.protobuf.Int32Value",
    "google.protobuf.Int64Value",
    "google.protobuf.BytesValue",
    "google.protobuf.UInt32Value",
    "google.protobuf.UInt64Value",
];

/// Runtime configuration of the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Deprecated proto2 compatibility behaviour.
    ///
    /// When set, proto2 fields accept `None` (unsetting scalars, deleting map
    /// entries) and unset proto2 scalars read back as `None`. When cleared,
    /// proto2 messages follow the same strict rules as proto3.
    pub legacy_proto2_none: bool,

    /// Message types that are auto-boxed from a bare scalar on assignment.
    ///
    /// Each type must have a single scalar field named `value`.
    pub scalar_wrappers: Vec<String>,

    /// Prefix prepended to the full type name when packing an Any.
    pub any_type_url_prefix: String,

    /// Indentation width for non-compact JSON output.
    pub json_indent: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            legacy_proto2_none: true,
            scalar_wrappers: DEFAULT_SCALAR_WRAPPERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            any_type_url_prefix: DEFAULT_TYPE_URL_PREFIX.to_string(),
            json_indent: 2,
        }
    }
}

impl BridgeConfig {
    /// Strict configuration: legacy proto2 `None` handling disabled.
    pub fn strict() -> Self {
        Self {
            legacy_proto2_none: false,
            ..Self::default()
        }
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| BridgeError::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            BridgeError::Config(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Enable or disable legacy proto2 `None` handling.
    pub fn with_legacy_proto2_none(mut self, enabled: bool) -> Self {
        self.legacy_proto2_none = enabled;
        self
    }

    /// Register an extra auto-boxed wrapper type.
    pub fn with_scalar_wrapper(mut self, full_name: impl Into<String>) -> Self {
        self.scalar_wrappers.push(full_name.into());
        self
    }

    /// Whether `full_name` is auto-boxed from a bare scalar.
    pub fn is_scalar_wrapper(&self, full_name: &str) -> bool {
        self.scalar_wrappers.iter().any(|w| w == full_name)
    }

    /// Build the Any type URL for a message type.
    pub fn type_url(&self, full_name: &str) -> String {
        format!("{}{}", self.any_type_url_prefix, full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(config.legacy_proto2_none);
        assert!(config.is_scalar_wrapper("google.protobuf.Int32Value"));
        assert!(!config.is_scalar_wrapper("google.protobuf.FloatValue"));
        assert_eq!(
            config.type_url("test.v3.M"),
            "type.googleapis.com/test.v3.M"
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BridgeConfig::from_yaml_str("legacy_proto2_none: false\n").expect("parse");
        assert!(!config.legacy_proto2_none);
        assert_eq!(config.scalar_wrappers.len(), DEFAULT_SCALAR_WRAPPERS.len());
        assert_eq!(config.json_indent, 2);
    }

    #[test]
    fn test_wrapper_table_is_configurable() {
        let yaml = "scalar_wrappers:\n  - acme.Money\n";
        let config = BridgeConfig::from_yaml_str(yaml).expect("parse");
        assert!(config.is_scalar_wrapper("acme.Money"));
        assert!(!config.is_scalar_wrapper("google.protobuf.Int32Value"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "any_type_url_prefix: \"example.com/types/\"").expect("write");
        let config = BridgeConfig::from_yaml_file(file.path()).expect("load");
        assert_eq!(config.type_url("a.B"), "example.com/types/a.B");
    }

    #[test]
    fn test_malformed_yaml() {
        let err = BridgeConfig::from_yaml_str("json_indent: [").expect_err("must fail");
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = BridgeConfig::from_yaml_file("/nonexistent/protobridge.yaml")
            .expect_err("must fail");
        assert!(err.to_string().contains("Failed to read"));
    }
}
