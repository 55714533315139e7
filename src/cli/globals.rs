use crate::provider::{GoTrueClient, ProviderError};
use secrecy::SecretString;
use std::time::Duration;

/// Identity provider connection settings shared by every action.
#[derive(Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_anon_key: SecretString,
    pub provider_timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(provider_url: String, provider_anon_key: SecretString) -> Self {
        Self {
            provider_url,
            provider_anon_key,
            provider_timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Build the `GoTrue` client for the configured project.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn identity_provider(&self) -> Result<GoTrueClient, ProviderError> {
        GoTrueClient::new(
            &self.provider_url,
            self.provider_anon_key.clone(),
            self.provider_timeout,
        )
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("provider_url", &self.provider_url)
            .field("provider_anon_key", &"***")
            .field("provider_timeout", &self.provider_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(
            "https://project.example.co".to_string(),
            SecretString::from("anon-key"),
        )
        .with_timeout(Duration::from_secs(3));
        assert_eq!(args.provider_url, "https://project.example.co");
        assert_eq!(args.provider_anon_key.expose_secret(), "anon-key");
        assert_eq!(args.provider_timeout, Duration::from_secs(3));
    }

    #[test]
    fn debug_redacts_anon_key() {
        let args = GlobalArgs::new(
            "https://project.example.co".to_string(),
            SecretString::from("anon-key"),
        );
        let debug = format!("{args:?}");
        assert!(debug.contains("***"));
        assert!(!debug.contains("anon-key"));
    }

    #[test]
    fn identity_provider_builds_client() -> Result<()> {
        let args = GlobalArgs::new(
            "https://project.example.co".to_string(),
            SecretString::from("anon-key"),
        );
        let client = args.identity_provider()?;
        assert!(format!("{client:?}").contains("project.example.co"));
        Ok(())
    }
}
