//! Admin-configured allow-lists
//!
//! Settings documents store each list either as an array of strings or as a
//! single comma-separated string. Both shapes are accepted at
//! deserialization and converted straight into an [`AllowList`]; nothing
//! past this module sees the raw form.

use crate::access_control::address::normalize_address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Set of normalized, non-empty address strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    /// Build from individual entries, normalizing each and dropping blanks
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            entries
                .into_iter()
                .map(|entry| normalize_address(entry.as_ref()))
                .filter(|entry| !entry.is_empty())
                .collect(),
        )
    }

    /// Build from a comma-separated string (`"10.0.0.1, 10.0.0.2"`)
    pub fn from_delimited(value: &str) -> Self {
        Self::from_entries(value.split(','))
    }

    /// Check whether an already-normalized address is on the list
    pub fn contains(&self, address: &str) -> bool {
        self.0.contains(address)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Raw on-disk shape of an allow-list field
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAllowList {
    Entries(Vec<String>),
    Delimited(String),
}

impl<'de> Deserialize<'de> for AllowList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An explicit null is treated like an absent field
        Ok(match Option::<RawAllowList>::deserialize(deserializer)? {
            Some(RawAllowList::Entries(entries)) => Self::from_entries(entries),
            Some(RawAllowList::Delimited(value)) => Self::from_delimited(&value),
            None => Self::default(),
        })
    }
}

/// The single admin settings record consulted by the gate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    /// Office network addresses
    #[serde(alias = "allowedIPs")]
    pub allowed_ips: AllowList,

    /// Individually registered devices
    #[serde(alias = "allowedDevices")]
    pub allowed_devices: AllowList,
}

impl AccessPolicy {
    pub fn new(allowed_ips: AllowList, allowed_devices: AllowList) -> Self {
        Self {
            allowed_ips,
            allowed_devices,
        }
    }
}
