//! Application state shared across handlers.

use std::sync::Arc;

use lapak_core::RoleSet;
use lapak_core::geo::{StoreDirectoryError, StoreLocation, load_store_directory};
use lapak_core::guard::{AccessGuard, GuardConfig};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Nothing in here changes after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    stores: Vec<StoreLocation>,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, stores: Vec<StoreLocation>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, stores }),
        }
    }

    /// Build state from configuration, loading the store directory if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory file cannot be read or parsed.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StoreDirectoryError> {
        let stores = match &config.stores_file {
            Some(path) => load_store_directory(path)?,
            None => Vec::new(),
        };
        Ok(Self::new(config, stores))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The nearby-store directory, in file order.
    #[must_use]
    pub fn stores(&self) -> &[StoreLocation] {
        &self.inner.stores
    }

    /// Access guard for a page allowing `allowed`, redirecting to the configured login path.
    #[must_use]
    pub fn guard(&self, allowed: RoleSet) -> AccessGuard {
        AccessGuard::new(
            GuardConfig::new()
                .allow_set(allowed)
                .redirect_to(self.inner.config.login_path.clone())
                .reject_expired(self.inner.config.reject_expired),
        )
    }
}
