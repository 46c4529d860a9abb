//! Error types for office-gate
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert gate failures to HTTP responses at the middleware boundary.

use crate::access_control::AccessDecision;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Errors raised while reading the admin settings record
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Policy store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a failed gate evaluation.
///
/// Every variant is terminal for the request: the middleware turns it into
/// a response and the downstream handler never runs.
#[derive(Error, Debug)]
pub enum GateError {
    /// No admin settings record exists. The gate fails closed.
    #[error("Admin settings not configured")]
    ConfigurationMissing,

    /// The client address is on neither allow-list.
    #[error("Access denied. Not on office WiFi or allowed device.")]
    AccessDenied(AccessDecision),

    /// Anything else, most commonly an unreachable or corrupt store.
    #[error("Internal error during IP/device check")]
    Unexpected(#[from] StoreError),
}

impl GateError {
    /// HTTP status code reported to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::AccessDenied(_) => StatusCode::FORBIDDEN,
            GateError::ConfigurationMissing | GateError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body for gate failures.
///
/// Denials carry the computed decision so callers can see which list
/// they missed; server errors carry only the message.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(flatten)]
    decision: Option<&'a AccessDecision>,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        let decision = match &self {
            GateError::AccessDenied(decision) => Some(decision),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            decision,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for policy store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
