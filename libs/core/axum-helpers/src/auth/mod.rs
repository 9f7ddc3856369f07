//! Authentication and authorization module.
//!
//! This module provides:
//! - JWT bearer token verification ([`JwtAuth`], [`JwtClaims`])
//! - Authentication middleware that also exposes the raw token for
//!   downstream pass-through ([`BearerToken`])
//! - A capability-check middleware keyed on HTTP method and required role
//!   ([`RoleGuard`])
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{jwt_auth_middleware, role_guard_middleware, JwtAuth, RoleGuard};
//!
//! let auth = JwtAuth::from_env();
//! let guard = RoleGuard::new()
//!     .require(Method::POST, "Admin")
//!     .require(Method::PUT, "Admin")
//!     .require(Method::DELETE, "Admin");
//!
//! let routes = Router::new()
//!     .route("/", get(list).post(create))
//!     .layer(axum::middleware::from_fn_with_state(guard, role_guard_middleware))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod jwt;
pub mod middleware;

pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::{jwt_auth_middleware, role_guard_middleware, BearerToken, RoleGuard};
