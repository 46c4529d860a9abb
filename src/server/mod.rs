//! Server module
//!
//! Router assembly and the HTTP listener hosting the gate.

pub mod http;
pub mod routes;

pub use http::{HttpConfig, RunningServer, run_http, run_http_blocking};
pub use routes::{build_router, protect};
