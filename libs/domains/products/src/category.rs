//! Category-name enrichment from the external category service.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::models::CategoryDto;

/// Resolves category names by ID.
///
/// Enrichment is best-effort by policy: implementations return an empty
/// string on any failure instead of surfacing an error to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryProvider: Send + Sync {
    /// Fetch the category name, forwarding the caller's bearer token when
    /// present.
    async fn category_name<'a>(&self, category_id: i32, token: Option<&'a str>) -> String;
}

/// HTTP client for the category service.
#[derive(Clone)]
pub struct HttpCategoryClient {
    http: Client,
    base_url: String,
}

impl HttpCategoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CategoryProvider for HttpCategoryClient {
    async fn category_name<'a>(&self, category_id: i32, token: Option<&'a str>) -> String {
        let url = format!("{}/api/categories/{}", self.base_url, category_id);

        let mut request = self.http.get(&url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(category_id, error = %e, "Category service unreachable");
                return String::new();
            }
        };

        if !response.status().is_success() {
            debug!(
                category_id,
                status = %response.status(),
                "Category lookup returned non-success status"
            );
            return String::new();
        }

        match response.json::<CategoryDto>().await {
            Ok(category) => category.name,
            Err(e) => {
                warn!(category_id, error = %e, "Failed to parse category response");
                String::new()
            }
        }
    }
}
