//! Access control module
//!
//! Network allow-list gate for HTTP routes.
//!
//! ## Decision Model
//!
//! ```text
//! forwarding header → peer address → ""      (extract)
//!        → normalize → loopback? forward      (bypass)
//!        → load policy → none? 500            (fail closed)
//!        → allowed_ips ∪ allowed_devices      (exact match)
//!        → forward with AccessDecision | 403
//! ```
//!
//! Matching is exact string equality after normalization. Entries are not
//! CIDR ranges or patterns.
//!
//! ## Example Settings Document
//!
//! ```json
//! {
//!   "allowed_ips": ["203.0.113.10", "203.0.113.11"],
//!   "allowed_devices": "192.168.1.20,192.168.1.21"
//! }
//! ```

pub mod address;
pub mod gate;
pub mod policy;
pub mod types;

pub use address::{LOOPBACK, extract_client_address, normalize_address};
pub use gate::{AccessGate, DEFAULT_CLIENT_IP_HEADER, enforce};
pub use policy::{AccessPolicy, AllowList};
pub use types::AccessDecision;
