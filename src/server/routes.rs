//! Router assembly
//!
//! `/health` is always reachable; everything under `/api` sits behind the gate.

use crate::access_control::{AccessDecision, AccessGate, enforce};
use axum::{Extension, Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Put every route of `router` behind the gate.
///
/// Handlers inside can extract `Extension<AccessDecision>`.
pub fn protect<S>(router: Router<S>, gate: Arc<AccessGate>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, enforce))
}

/// Build the service router
pub fn build_router(gate: Arc<AccessGate>) -> Router {
    let api = protect(
        Router::new().route("/network-check", get(network_check)),
        gate,
    );

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Echo the decision the gate attached to this request
async fn network_check(Extension(decision): Extension<AccessDecision>) -> Json<AccessDecision> {
    Json(decision)
}
