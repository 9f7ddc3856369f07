use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

/// Raw bearer token, stored in request extensions so handlers can forward
/// it to downstream services.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Extract the bearer token from the Authorization header
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// JWT authentication middleware.
///
/// Validates the bearer token from the Authorization header, then inserts
/// both the decoded [`JwtClaims`] and the raw [`BearerToken`] into request
/// extensions.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No bearer token in Authorization header");
            return Err(AppError::Unauthorized("No token provided".to_string()));
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
    };

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

/// Capability table mapping HTTP methods to the role they require.
///
/// Methods without an entry pass through with authentication only.
#[derive(Clone, Debug, Default)]
pub struct RoleGuard {
    rules: Vec<(Method, String)>,
}

impl RoleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `role` for requests using `method` on the guarded routes.
    pub fn require(mut self, method: Method, role: impl Into<String>) -> Self {
        self.rules.push((method, role.into()));
        self
    }

    fn required_role(&self, method: &Method) -> Option<&str> {
        self.rules
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, role)| role.as_str())
    }
}

/// Role-check middleware. Must run after [`jwt_auth_middleware`], which
/// inserts the claims this reads.
pub async fn role_guard_middleware(
    State(guard): State<RoleGuard>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(role) = guard.required_role(request.method()) {
        let claims = request
            .extensions()
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !claims.has_role(role) {
            tracing::debug!(
                user = %claims.sub,
                required_role = %role,
                "Role check failed"
            );
            return Err(AppError::Forbidden(format!(
                "This operation requires the {} role",
                role
            )));
        }
    }

    Ok(next.run(request).await)
}
