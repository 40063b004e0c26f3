//! HTTP surface of the auth service: login, refresh exchange, logout,
//! token introspection, JWKS and health endpoints.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod telemetry;

pub use app::{create_app, AppState, HttpSettings};

/// Sent as `Version-Id` on every `/v1` response
pub const API_VERSION: &str = "v1";
