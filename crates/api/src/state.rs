//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::ShopStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    auth: AuthConfig,
    store: Arc<dyn ShopStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(auth: AuthConfig, store: Arc<dyn ShopStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { auth, store }),
        }
    }

    /// Get a reference to the bearer-token configuration.
    #[must_use]
    pub fn auth(&self) -> &AuthConfig {
        &self.inner.auth
    }

    /// Get a reference to the shop store.
    #[must_use]
    pub fn store(&self) -> &dyn ShopStore {
        self.inner.store.as_ref()
    }
}
