//! `GoTrue` (Supabase Auth) REST client.
//!
//! Every request carries the project `apikey`. Calls that act on the caller's
//! session send the caller's access token as bearer, otherwise the anon key is
//! used as bearer.

use super::{
    AuthOutcome, Credentials, IdentityProvider, OAuthProvider, ProviderError, Session, User,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const AUTH_PATH: &str = "/auth/v1";

#[derive(Clone)]
pub struct GoTrueClient {
    base_url: Url,
    anon_key: SecretString,
    client: Client,
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &"***")
            .finish_non_exhaustive()
    }
}

impl GoTrueClient {
    /// Build a client for the provider at `base_url` (project URL, without `/auth/v1`).
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        anon_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)?;

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url,
            anon_key,
            client,
        })
    }

    /// Resolve an auth endpoint, keeping any path prefix of the project URL.
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ProviderError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}{AUTH_PATH}{endpoint}"))?;

        debug!("endpoint URL: {}", url);

        Ok(url)
    }

    fn request(&self, method: Method, url: Url, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or_else(|| self.anon_key.expose_secret());
        self.client
            .request(method, url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(bearer)
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: &str,
    ) -> Result<AuthOutcome, ProviderError> {
        let mut url = self.endpoint_url("/signup")?;
        url.query_pairs_mut()
            .append_pair("redirect_to", email_redirect_to);

        let response = self
            .request(Method::POST, url, None)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await?;

        read_json(response).await.map(auth_outcome)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthOutcome, ProviderError> {
        let mut url = self.endpoint_url("/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .request(Method::POST, url, None)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await?;

        read_json(response).await.map(auth_outcome)
    }

    #[instrument(skip(self))]
    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, ProviderError> {
        let mut url = self.endpoint_url("/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);

        Ok(url.to_string())
    }

    #[instrument(skip(self))]
    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError> {
        let mut url = self.endpoint_url("/recover")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let response = self
            .request(Method::POST, url, None)
            .json(&json!({ "email": email }))
            .send()
            .await?;

        read_json(response).await.map(|_| ())
    }

    #[instrument(skip_all)]
    async fn update_password(
        &self,
        access_token: Option<&str>,
        password: &SecretString,
    ) -> Result<User, ProviderError> {
        let Some(token) = access_token else {
            return Err(ProviderError::session_missing());
        };

        let url = self.endpoint_url("/user")?;
        let response = self
            .request(Method::PUT, url, Some(token))
            .json(&json!({ "password": password.expose_secret() }))
            .send()
            .await?;

        read_json(response).await.map(User)
    }

    #[instrument(skip_all)]
    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError> {
        // Without a session there is nothing to revoke.
        let Some(token) = access_token else {
            return Ok(());
        };

        let mut url = self.endpoint_url("/logout")?;
        url.query_pairs_mut().append_pair("scope", "global");

        let response = self.request(Method::POST, url, Some(token)).send().await?;

        // Expired or already revoked sessions count as signed out.
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        ) {
            debug!("session already gone: {}", response.status());
            return Ok(());
        }

        read_json(response).await.map(|_| ())
    }

    #[instrument(skip_all)]
    async fn get_user(&self, access_token: Option<&str>) -> Result<Option<User>, ProviderError> {
        let Some(token) = access_token else {
            return Ok(None);
        };

        let url = self.endpoint_url("/user")?;
        let response = self.request(Method::GET, url, Some(token)).send().await?;

        let body = read_json(response).await?;
        Ok((!body.is_null()).then_some(User(body)))
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<(), ProviderError> {
        let url = self.endpoint_url("/health")?;
        let response = self.request(Method::GET, url, None).send().await?;

        read_json(response).await.map(|_| ())
    }
}

/// Read a JSON body, turning non-2xx answers into a [`ProviderError`].
async fn read_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|_| ProviderError::UnexpectedResponse {
        status: status.as_u16(),
        body,
    })
}

/// Decode a provider error body.
///
/// `GoTrue` has used several layouts over time (`msg`, `error_description`,
/// `message`); any of them makes the error a recognized auth error. Bodies
/// without a message (HTML from a proxy, empty bodies) are not.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ProviderError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed.as_ref().and_then(|value| {
        ["msg", "error_description", "message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    });

    match message {
        Some(message) => ProviderError::Auth {
            status: Some(status.as_u16()),
            code: parsed.as_ref().and_then(|value| {
                value
                    .get("error_code")
                    .or_else(|| value.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            }),
            message,
        },
        None => ProviderError::UnexpectedResponse {
            status: status.as_u16(),
            body: body.to_string(),
        },
    }
}

/// Split a sign-up/sign-in body into user and session.
///
/// A body with `access_token` is a session embedding its user; anything else is
/// a bare user record (sign-up pending email confirmation).
fn auth_outcome(body: Value) -> AuthOutcome {
    if body.is_null() {
        return AuthOutcome::default();
    }

    if body.get("access_token").is_some() {
        let user = body
            .get("user")
            .filter(|user| !user.is_null())
            .cloned()
            .map(User);
        AuthOutcome {
            user,
            session: Some(Session(body)),
        }
    } else {
        AuthOutcome {
            user: Some(User(body)),
            session: None,
        }
    }
}
