//! In-memory identity provider for handler tests.

use super::state::{AuthConfig, AuthState};
use crate::provider::{
    AuthOutcome, Credentials, IdentityProvider, OAuthProvider, ProviderError, Session, User,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

pub(crate) const TEST_SITE_URL: &str = "https://app.example";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    SignUp {
        email: String,
        password: String,
        redirect_to: String,
    },
    SignIn {
        email: String,
        password: String,
    },
    OAuth { provider: OAuthProvider, redirect_to: String },
    ResetPasswordForEmail { email: String, redirect_to: String },
    UpdatePassword {
        access_token: Option<String>,
        password: String,
    },
    SignOut { access_token: Option<String> },
    GetUser { access_token: Option<String> },
    Health,
}

#[derive(Clone, Debug)]
enum Behavior {
    Succeed,
    Reject { status: Option<u16>, message: String },
    Unexpected,
    Panic,
}

#[derive(Debug)]
pub(crate) struct StubProvider {
    behavior: Behavior,
    user: Option<User>,
    session: Option<Session>,
    calls: Mutex<Vec<Call>>,
}

impl StubProvider {
    pub(crate) fn new() -> Self {
        Self {
            behavior: Behavior::Succeed,
            user: None,
            session: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn rejecting(status: Option<u16>, message: &str) -> Self {
        Self {
            behavior: Behavior::Reject {
                status,
                message: message.to_string(),
            },
            ..Self::new()
        }
    }

    pub(crate) fn unexpected() -> Self {
        Self {
            behavior: Behavior::Unexpected,
            ..Self::new()
        }
    }

    pub(crate) fn panicking() -> Self {
        Self {
            behavior: Behavior::Panic,
            ..Self::new()
        }
    }

    pub(crate) fn with_user(mut self, user: Value) -> Self {
        self.user = Some(User(user));
        self
    }

    pub(crate) fn with_session(mut self, session: Value) -> Self {
        self.session = Some(Session(session));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn respond<T>(&self, call: Call, ok: impl FnOnce() -> T) -> Result<T, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        match &self.behavior {
            Behavior::Succeed => Ok(ok()),
            Behavior::Reject { status, message } => {
                Err(ProviderError::auth(*status, message.clone()))
            }
            Behavior::Unexpected => Err(ProviderError::UnexpectedResponse {
                status: 503,
                body: "upstream connect error".to_string(),
            }),
            Behavior::Panic => panic!("stub provider panicked"),
        }
    }

    fn outcome(&self) -> AuthOutcome {
        AuthOutcome {
            user: self.user.clone(),
            session: self.session.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        email_redirect_to: &str,
    ) -> Result<AuthOutcome, ProviderError> {
        self.respond(
            Call::SignUp {
                email: credentials.email.clone(),
                password: credentials.password.expose_secret().to_string(),
                redirect_to: email_redirect_to.to_string(),
            },
            || self.outcome(),
        )
    }

    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthOutcome, ProviderError> {
        self.respond(
            Call::SignIn {
                email: credentials.email.clone(),
                password: credentials.password.expose_secret().to_string(),
            },
            || self.outcome(),
        )
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<String, ProviderError> {
        self.respond(
            Call::OAuth {
                provider,
                redirect_to: redirect_to.to_string(),
            },
            || format!("https://idp.example/authorize?provider={provider}"),
        )
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError> {
        self.respond(
            Call::ResetPasswordForEmail {
                email: email.to_string(),
                redirect_to: redirect_to.to_string(),
            },
            || (),
        )
    }

    async fn update_password(
        &self,
        access_token: Option<&str>,
        password: &SecretString,
    ) -> Result<User, ProviderError> {
        let user = self.respond(
            Call::UpdatePassword {
                access_token: access_token.map(str::to_string),
                password: password.expose_secret().to_string(),
            },
            || self.user.clone().unwrap_or(User(Value::Null)),
        )?;
        if access_token.is_none() {
            return Err(ProviderError::session_missing());
        }
        Ok(user)
    }

    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), ProviderError> {
        self.respond(
            Call::SignOut {
                access_token: access_token.map(str::to_string),
            },
            || (),
        )
    }

    async fn get_user(&self, access_token: Option<&str>) -> Result<Option<User>, ProviderError> {
        let user = self.respond(
            Call::GetUser {
                access_token: access_token.map(str::to_string),
            },
            || self.user.clone(),
        )?;
        Ok(access_token.and(user))
    }

    async fn health(&self) -> Result<(), ProviderError> {
        self.respond(Call::Health, || ())
    }
}

/// Auth state backed by `stub`, pointing redirects at [`TEST_SITE_URL`].
pub(crate) fn auth_state(stub: &Arc<StubProvider>) -> AuthState {
    AuthState::new(AuthConfig::new(TEST_SITE_URL.to_string()), stub.clone())
}
