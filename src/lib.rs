//! Office network gate
//!
//! Admits HTTP requests only from administrator-approved addresses: office
//! network IPs and individually registered devices.
//!
//! ## Features
//!
//! - **Axum middleware** that checks every request against two allow-lists
//! - **Proxy aware**: uses the forwarding header when present, else the peer address
//! - **Fails closed** when no admin settings record exists
//! - **Settings re-read per request** from a JSON/TOML document or inline configuration
//!
//! ## Decision Outcomes
//!
//! ```text
//! 127.0.0.1 (incl. ::1, ::ffff:127.0.0.1)  → forward, both flags true
//! no settings record                      → 500 {message}
//! on allowed_ips or allowed_devices       → forward with AccessDecision
//! on neither                              → 403 {message, clientIP, ipAllowed, deviceAllowed}
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5000
//!
//! [gate]
//! client_ip_header = "x-forwarded-for"
//!
//! [policy]
//! source = "file"
//! path = "/var/lib/office-gate/admin-settings.json"
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod server;
pub mod store;

// Re-export main types
pub use access_control::{AccessDecision, AccessGate, AccessPolicy, AllowList};
pub use config::{AppConfig, load_config};
pub use error::{ConfigError, GateError, StoreError};
pub use store::{PolicyStore, SharedPolicyStore, create_policy_store};
