//! Integration tests for the shop directory API.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the server
//! cargo run -p shop-directory-cli -- migrate
//! cargo run -p shop-directory-api
//!
//! # Run integration tests
//! SHOP_API_ADMIN_TOKEN=... cargo test -p shop-directory-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_API_BASE_URL` - Server under test (default: `http://localhost:3000`)
//! - `SHOP_API_ADMIN_TOKEN` - One of the server's admin tokens
//! - `SHOP_API_USER_TOKEN` - One of the server's logged-user tokens (optional)

use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

/// Shared client and credentials for talking to a running server.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    admin_token: Option<SecretString>,
    user_token: Option<SecretString>,
}

impl TestContext {
    /// Build a context from the environment.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn from_env() -> Self {
        let token = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|t| !t.is_empty())
                .map(SecretString::from)
        };

        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: std::env::var("SHOP_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            admin_token: token("SHOP_API_ADMIN_TOKEN"),
            user_token: token("SHOP_API_USER_TOKEN"),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    /// Unauthenticated request.
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Request carrying the admin token.
    ///
    /// # Panics
    ///
    /// Panics if `SHOP_API_ADMIN_TOKEN` is unset.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn admin(&self, method: Method, path: &str) -> RequestBuilder {
        let token = self
            .admin_token
            .as_ref()
            .expect("SHOP_API_ADMIN_TOKEN must be set");
        self.request(method, path).bearer_auth(token.expose_secret())
    }

    /// Request carrying the logged-user token, if one is configured.
    #[must_use]
    pub fn user(&self, method: Method, path: &str) -> Option<RequestBuilder> {
        let token = self.user_token.as_ref()?;
        Some(self.request(method, path).bearer_auth(token.expose_secret()))
    }
}

/// An email no other test run has used.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}
