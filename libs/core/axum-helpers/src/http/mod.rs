//! HTTP middleware shared across services.

pub mod cors;
pub mod security;

pub use cors::cors_layer;
pub use security::security_headers;
