//! Small helpers for auth handlers: email normalization, bearer tokens and redirect targets.

use super::state::AuthConfig;
use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Environment variable holding the public application URL.
pub const SITE_URL_ENV: &str = "VESTIBULE_SITE_URL";

/// Normalize an email before validation and before it reaches the provider.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Extract the caller's access token from `Authorization: Bearer <token>`.
pub(super) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(token)
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Application base URL, read from the environment at call time with the
/// startup value as fallback.
pub(super) fn site_url(config: &AuthConfig) -> String {
    resolve_site_url(std::env::var(SITE_URL_ENV).ok(), config.site_url())
}

fn resolve_site_url(from_env: Option<String>, configured: &str) -> String {
    from_env
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| configured.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Landing page for the password reset link sent by email.
pub(super) fn reset_password_redirect(site_url: &str) -> String {
    format!("{site_url}/auth/reset-password")
}

/// Landing page for OAuth and email confirmation callbacks.
pub(super) fn callback_redirect(site_url: &str) -> String {
    format!("{site_url}/auth/callback")
}
