//! # Axum Helpers
//!
//! A collection of utilities, middleware, and helpers for building Axum web
//! applications.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT bearer authentication and role-based route guards
//! - **[`server`]**: Router assembly, health endpoint, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses
//! - **[`extractors`]**: Custom extractors (validated JSON)

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export auth types
pub use auth::{
    jwt_auth_middleware, role_guard_middleware, BearerToken, JwtAuth, JwtClaims, RoleGuard,
};

// Re-export server types
pub use server::{create_app, create_router, health_router, shutdown_signal, HealthResponse};

// Re-export HTTP middleware
pub use http::{cors_layer, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::ValidatedJson;
