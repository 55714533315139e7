//! Identity provider abstraction.
//!
//! Everything credential related is owned by the provider: account creation,
//! password checks, OAuth, reset emails and sessions. This module only
//! describes the calls the gateway makes and the shape of their outcome.
//! User and session records stay opaque JSON; the gateway forwards them
//! without looking inside.

pub mod gotrue;

pub use gotrue::GoTrueClient;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Message used by the provider client when an operation needs a session and
/// the caller did not present one.
pub const SESSION_MISSING_MESSAGE: &str = "Auth session missing!";

/// Opaque user record as returned by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(pub Value);

/// Opaque session record (tokens, expiry, embedded user).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(pub Value);

/// Result of account creation or password sign-in.
///
/// Sign-up returns only a user when the provider requires email confirmation;
/// sign-in always carries a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthOutcome {
    pub user: Option<User>,
    pub session: Option<Session>,
}

/// Validated email/password pair handed to the provider.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// OAuth providers the gateway is willing to redirect to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthProvider {
    Apple,
    Azure,
    Bitbucket,
    Discord,
    Facebook,
    Github,
    Gitlab,
    Google,
    LinkedinOidc,
    SlackOidc,
    Twitter,
}

impl OAuthProvider {
    pub const ALL: [Self; 11] = [
        Self::Apple,
        Self::Azure,
        Self::Bitbucket,
        Self::Discord,
        Self::Facebook,
        Self::Github,
        Self::Gitlab,
        Self::Google,
        Self::LinkedinOidc,
        Self::SlackOidc,
        Self::Twitter,
    ];

    /// Identifier used by the provider's `authorize` endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Azure => "azure",
            Self::Bitbucket => "bitbucket",
            Self::Discord => "discord",
            Self::Facebook => "facebook",
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Google => "google",
            Self::LinkedinOidc => "linkedin_oidc",
            Self::SlackOidc => "slack_oidc",
            Self::Twitter => "twitter",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == wanted)
            .ok_or_else(|| format!("unsupported OAuth provider: {value}"))
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Error reported by the provider itself, with a message meant for users.
    #[error("{message}")]
    Auth {
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unexpected provider response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
    #[error("provider call panicked: {0}")]
    Panicked(String),
}

impl ProviderError {
    #[must_use]
    pub fn auth(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn session_missing() -> Self {
        Self::Auth {
            status: Some(401),
            code: Some("session_missing".to_string()),
            message: SESSION_MISSING_MESSAGE.to_string(),
        }
    }

    /// Message safe to show to callers, only for recognized auth errors.
    #[must_use]
    pub fn auth_message(&self) -> Option<&str> {
        match self {
            Self::Auth { message, .. } => Some(message),
            _ => None,
        }
    }

    /// HTTP status reported by the provider for recognized auth errors.
    #[must_use]
    pub fn auth_status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } => *status,
            _ => None,
        }
    }
}

/// Calls the gateway makes against the identity provider.
///
/// `access_token` is the caller's bearer token, `None` when the request did
/// not carry one.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: &str,
    ) -> Result<AuthOutcome, ProviderError>;

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthOutcome, ProviderError>;

    /// Build the URL the browser must visit to start the OAuth flow.
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, ProviderError>;

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError>;

    async fn update_password(
        &self,
        access_token: Option<&str>,
        password: &SecretString,
    ) -> Result<User, ProviderError>;

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError>;

    async fn get_user(&self, access_token: Option<&str>) -> Result<Option<User>, ProviderError>;

    async fn health(&self) -> Result<(), ProviderError>;
}
