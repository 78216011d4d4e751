//! Check bundle DTOs.
//!
//! # Design
//! Field names follow the service's wire format, including its
//! `_last_modifed_by` spelling. Underscore-prefixed fields are assigned by
//! the server and left out of request bodies while empty; every other field
//! is always sent, even when empty or zero, because PUT replaces the whole
//! record.
//!
//! Decoding is lenient: missing fields and explicit `null`s decode to the
//! empty value, unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Check-type specific settings. Keys are defined by the service per check
/// type and are not validated here.
pub type CheckBundleConfig = BTreeMap<String, String>;

/// One telemetry stream collected by a check.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckBundleMetric {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub metric_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub units: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl CheckBundleMetric {
    /// An active metric with no units or tags.
    pub fn new(name: impl Into<String>, metric_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metric_type: metric_type.into(),
            status: "active".to_string(),
            ..Self::default()
        }
    }
}

/// A check bundle as stored by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckBundle {
    #[serde(
        rename = "_check_uuids",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub check_uuids: Vec<String>,
    #[serde(
        rename = "_checks",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub checks: Vec<String>,
    #[serde(
        rename = "_cid",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub cid: String,
    #[serde(
        rename = "_created",
        skip_serializing_if = "is_zero",
        deserialize_with = "null_as_default"
    )]
    pub created: i64,
    #[serde(
        rename = "_last_modified",
        skip_serializing_if = "is_zero",
        deserialize_with = "null_as_default"
    )]
    pub last_modified: i64,
    #[serde(
        rename = "_last_modifed_by",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub last_modified_by: String,
    #[serde(
        rename = "_reverse_connection_urls",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub reverse_connection_urls: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub brokers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub config: CheckBundleConfig,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metrics: Vec<CheckBundleMetric>,
    #[serde(deserialize_with = "null_as_default")]
    pub metric_limit: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub target: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timeout: i64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub bundle_type: String,
}

impl CheckBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The server-assigned identifier, or `None` before creation.
    pub fn cid(&self) -> Option<&str> {
        if self.cid.is_empty() {
            None
        } else {
            Some(&self.cid)
        }
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
