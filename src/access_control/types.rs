//! Access control types
//!
//! Core types shared by the gate and its downstream consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-request result of checking the client address against the allow-lists.
///
/// Inserted into the request extensions when the gate forwards a request,
/// so handlers can read it with `Extension<AccessDecision>`. Also embedded in
/// the body of a 403 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    /// Normalized client address
    #[serde(rename = "clientIP")]
    pub client_ip: String,
    /// Address is on the office IP list
    pub ip_allowed: bool,
    /// Address is on the registered device list
    pub device_allowed: bool,
}

impl AccessDecision {
    pub fn new(client_ip: impl Into<String>, ip_allowed: bool, device_allowed: bool) -> Self {
        Self {
            client_ip: client_ip.into(),
            ip_allowed,
            device_allowed,
        }
    }

    /// Decision recorded for the loopback bypass: both flags set
    pub fn bypass(client_ip: impl Into<String>) -> Self {
        Self::new(client_ip, true, true)
    }

    /// Whether either list admitted the address
    pub const fn is_allowed(&self) -> bool {
        self.ip_allowed || self.device_allowed
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ip_allowed={}, device_allowed={})",
            self.client_ip, self.ip_allowed, self.device_allowed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed() {
        assert!(AccessDecision::new("a", true, false).is_allowed());
        assert!(AccessDecision::new("a", false, true).is_allowed());
        assert!(AccessDecision::bypass("127.0.0.1").is_allowed());
        assert!(!AccessDecision::new("a", false, false).is_allowed());
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(AccessDecision::new("10.0.0.5", true, false)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "clientIP": "10.0.0.5",
                "ipAllowed": true,
                "deviceAllowed": false
            })
        );
    }
}
