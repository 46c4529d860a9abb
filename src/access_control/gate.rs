//! Access gate
//!
//! Evaluates one request at a time:
//! 1. Extract the client address (forwarding header, then transport peer)
//! 2. Normalize it
//! 3. Loopback bypass: forward without consulting the store
//! 4. Load the policy record (missing record fails closed)
//! 5. Check the address against both allow-lists
//! 6. Forward with the decision attached, or deny

use crate::access_control::address::{LOOPBACK, extract_client_address, normalize_address};
use crate::access_control::types::AccessDecision;
use crate::config::GateConfig;
use crate::error::{ConfigError, GateError};
use crate::store::SharedPolicyStore;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Default header carrying the original client address behind a proxy
pub const DEFAULT_CLIENT_IP_HEADER: &str = "x-forwarded-for";

/// Allow-list gate in front of application routes
pub struct AccessGate {
    store: SharedPolicyStore,
    client_ip_header: HeaderName,
    loopback_bypass: bool,
}

impl AccessGate {
    /// Create a gate with the default header and loopback bypass enabled
    pub fn new(store: SharedPolicyStore) -> Self {
        Self {
            store,
            client_ip_header: HeaderName::from_static(DEFAULT_CLIENT_IP_HEADER),
            loopback_bypass: true,
        }
    }

    /// Create a gate from configuration
    pub fn from_config(store: SharedPolicyStore, config: &GateConfig) -> Result<Self, ConfigError> {
        let header = HeaderName::try_from(config.client_ip_header.as_str()).map_err(|e| {
            ConfigError::Invalid {
                message: format!(
                    "gate.client_ip_header '{}' is not a valid header name: {}",
                    config.client_ip_header, e
                ),
            }
        })?;

        Ok(Self::new(store)
            .with_client_ip_header(header)
            .with_loopback_bypass(config.loopback_bypass))
    }

    pub fn with_client_ip_header(mut self, header: HeaderName) -> Self {
        self.client_ip_header = header;
        self
    }

    pub fn with_loopback_bypass(mut self, enabled: bool) -> Self {
        self.loopback_bypass = enabled;
        self
    }

    pub fn client_ip_header(&self) -> &HeaderName {
        &self.client_ip_header
    }

    pub fn loopback_bypass(&self) -> bool {
        self.loopback_bypass
    }

    /// Normalized client address for a request
    pub fn client_address(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        let client_ip = normalize_address(&extract_client_address(
            headers,
            &self.client_ip_header,
            peer,
        ));
        debug!(client_ip = %client_ip, "Client address extracted");
        client_ip
    }

    /// Decide whether a request may proceed.
    ///
    /// `Ok` means forward, carrying the decision for downstream handlers.
    /// Every `Err` is terminal for the request.
    pub async fn evaluate(
        &self,
        headers: &HeaderMap,
        peer: Option<SocketAddr>,
    ) -> Result<AccessDecision, GateError> {
        let client_ip = self.client_address(headers, peer);
        self.evaluate_address(client_ip).await
    }

    /// Decide for an already-normalized client address
    pub async fn evaluate_address(&self, client_ip: String) -> Result<AccessDecision, GateError> {
        if self.loopback_bypass && client_ip == LOOPBACK {
            info!(client_ip = %client_ip, "Loopback address, skipping allow-list check");
            return Ok(AccessDecision::bypass(client_ip));
        }

        let policy = match self.store.find_policy().await {
            Ok(Some(policy)) => policy,
            Ok(None) => {
                warn!(
                    store = self.store.store_type(),
                    "No admin settings found, denying request"
                );
                return Err(GateError::ConfigurationMissing);
            }
            Err(e) => {
                error!(
                    error = %e,
                    store = self.store.store_type(),
                    client_ip = %client_ip,
                    "Failed to load admin settings"
                );
                return Err(GateError::Unexpected(e));
            }
        };

        let ip_allowed = policy.allowed_ips.contains(&client_ip);
        let device_allowed = policy.allowed_devices.contains(&client_ip);
        let decision = AccessDecision::new(client_ip, ip_allowed, device_allowed);

        if !decision.is_allowed() {
            warn!(client_ip = %decision.client_ip, "Blocked address not on any allow-list");
            return Err(GateError::AccessDenied(decision));
        }

        debug!(%decision, "Access granted");
        Ok(decision)
    }
}

/// Axum middleware enforcing the gate.
///
/// Install with `axum::middleware::from_fn_with_state(gate, enforce)`. The
/// transport peer is read from `ConnectInfo<SocketAddr>` when the server was
/// started with connect info; without it only the forwarding header is used.
pub async fn enforce(
    State(gate): State<Arc<AccessGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    // Resolve the address before awaiting so no borrow of the request is held
    let client_ip = gate.client_address(request.headers(), peer);

    match gate.evaluate_address(client_ip).await {
        Ok(decision) => {
            request.extensions_mut().insert(decision);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPolicyStore;

    fn gate() -> AccessGate {
        AccessGate::new(Arc::new(MemoryPolicyStore::empty()))
    }

    #[test]
    fn test_defaults() {
        let gate = gate();
        assert_eq!(gate.client_ip_header().as_str(), DEFAULT_CLIENT_IP_HEADER);
        assert!(gate.loopback_bypass());
    }

    #[test]
    fn test_from_config() {
        let config = GateConfig {
            client_ip_header: "X-Real-IP".to_string(),
            loopback_bypass: false,
        };
        let gate = AccessGate::from_config(Arc::new(MemoryPolicyStore::empty()), &config).unwrap();
        assert_eq!(gate.client_ip_header().as_str(), "x-real-ip");
        assert!(!gate.loopback_bypass());
    }

    #[test]
    fn test_from_config_invalid_header() {
        let config = GateConfig {
            client_ip_header: "bad header".to_string(),
            loopback_bypass: true,
        };
        let result = AccessGate::from_config(Arc::new(MemoryPolicyStore::empty()), &config);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_client_address_normalizes_peer() {
        let peer: SocketAddr = "[::1]:51000".parse().unwrap();
        assert_eq!(gate().client_address(&HeaderMap::new(), Some(peer)), LOOPBACK);
    }
}
