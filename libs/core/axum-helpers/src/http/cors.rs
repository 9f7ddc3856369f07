use axum::http::{HeaderValue, Method};
use core_config::env_or_default;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Build the CORS layer from `CORS_ALLOWED_ORIGIN` (comma-separated
/// origins, defaults to the local frontend).
///
/// Examples:
/// - Development: `CORS_ALLOWED_ORIGIN=http://localhost:3000`
/// - Production: `CORS_ALLOWED_ORIGIN=https://example.com,https://app.example.com`
pub fn cors_layer() -> std::io::Result<CorsLayer> {
    let origins_str = env_or_default("CORS_ALLOWED_ORIGIN", "http://localhost:3000");

    let allowed_origins: Vec<HeaderValue> = origins_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN cannot be empty",
        ));
    }

    info!("CORS configured with allowed origins: {}", origins_str);

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_default() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert!(cors_layer().is_ok());
        });
    }

    #[test]
    fn test_cors_layer_multiple_origins() {
        temp_env::with_var(
            "CORS_ALLOWED_ORIGIN",
            Some("http://localhost:3000, https://example.com"),
            || {
                assert!(cors_layer().is_ok());
            },
        );
    }

    #[test]
    fn test_cors_layer_invalid_origin() {
        temp_env::with_var("CORS_ALLOWED_ORIGIN", Some("not a header\nvalue"), || {
            assert!(cors_layer().is_err());
        });
    }
}
