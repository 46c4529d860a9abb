//! Configuration types for office-gate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::{AccessPolicy, AllowList, DEFAULT_CLIENT_IP_HEADER};
use serde::Deserialize;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Gate behaviour
    pub gate: GateConfig,

    /// Where the admin settings record lives
    pub policy: PolicyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Gate configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Header carrying the original client address when behind a proxy
    pub client_ip_header: String,

    /// Forward requests from 127.0.0.1 without checking the allow-lists
    pub loopback_bypass: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            client_ip_header: DEFAULT_CLIENT_IP_HEADER.to_string(),
            loopback_bypass: true,
        }
    }
}

/// Where the policy record is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySource {
    /// Separate settings document, re-read on every request
    #[default]
    File,
    /// Lists declared in this configuration
    Inline,
}

/// Policy store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Store selection
    pub source: PolicySource,

    /// Settings document path (for `source = "file"`)
    pub path: String,

    /// Office IPs (for `source = "inline"`)
    pub allowed_ips: AllowList,

    /// Registered devices (for `source = "inline"`)
    pub allowed_devices: AllowList,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            source: PolicySource::File,
            path: "admin-settings.json".to_string(),
            allowed_ips: AllowList::default(),
            allowed_devices: AllowList::default(),
        }
    }
}

impl PolicyConfig {
    /// Policy record built from the inline lists
    pub fn inline_policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.allowed_ips.clone(), self.allowed_devices.clone())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
