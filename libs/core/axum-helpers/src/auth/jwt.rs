use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User display name
    pub name: String,
    /// User roles
    pub roles: Vec<String>,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
}

impl JwtClaims {
    /// Check if the user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Stateless JWT verification with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Read the secret from `JWT_SECRET`, falling back to a development
    /// default.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "default-secret-key-change-me-in-production".to_string());
        Self::new(secret)
    }

    /// Create a signed token. Used by tests and local tooling; this service
    /// verifies tokens, the identity service issues them.
    pub fn create_token(
        &self,
        user_id: &str,
        name: &str,
        roles: Vec<String>,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            name: name.to_string(),
            roles,
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Verify the signature and expiry of a token and decode its claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let auth = JwtAuth::new("test-secret");
        let token = auth
            .create_token("user-1", "Alice", vec!["Admin".to_string()], 900)
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.name, "Alice");
        assert!(claims.has_role("Admin"));
        assert!(!claims.has_role("Auditor"));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = JwtAuth::new("secret-a");
        let verifier = JwtAuth::new("secret-b");

        let token = issuer.create_token("user-1", "Alice", vec![], 900).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let auth = JwtAuth::new("test-secret");
        let token = auth
            .create_token("user-1", "Alice", vec![], -3600)
            .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }
}
