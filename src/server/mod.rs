//! Authenticated HTTP API
//!
//! - `GET /`: health, no key required
//! - `GET /api/v1/secure/`: health behind the key gate
//! - `GET /api/v1/secure/[fr/]graphs/{id}`: figure JSON envelope
//! - `GET /api/v1/secure/[fr/]maps/{id}`: HTML map envelope
//!
//! Every `/api/v1/secure` route checks `X-API-Key` before any registry
//! lookup or file read.

mod auth;
mod listener;
mod routes;
mod signal;

pub use auth::ApiKeyGate;
pub use listener::{ServerHandle, start};
pub use routes::{ApiRequest, ApiResponse, CONTENT_JSON, Router};
pub use signal::shutdown_on_signal;
