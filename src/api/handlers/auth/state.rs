//! Auth configuration and the shared state handed to every handler.

use crate::provider::IdentityProvider;
use std::sync::Arc;

const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    site_url: String,
}

impl AuthConfig {
    #[must_use]
    pub fn new(site_url: String) -> Self {
        Self { site_url }
    }

    #[must_use]
    pub fn with_site_url(mut self, site_url: String) -> Self {
        self.site_url = site_url;
        self
    }

    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_URL.to_string())
    }
}

pub struct AuthState {
    config: AuthConfig,
    provider: Arc<dyn IdentityProvider>,
}

impl AuthState {
    pub fn new(config: AuthConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { config, provider }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
