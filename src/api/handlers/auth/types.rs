//! Request payloads and the response envelope shared by every auth endpoint.

use super::schema::FieldErrors;
use crate::provider::{AuthOutcome, ProviderError, User};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const VALIDATION_FAILED_MESSAGE: &str = "Form validation error";
pub const FALLBACK_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

// Missing fields deserialize as empty strings so they fail validation with a
// field message instead of being rejected by the extractor. A value of the
// wrong JSON type only blanks its own field.
#[derive(ToSchema, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignUpRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(
        rename = "confirmPassword",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_string"
    )]
    pub confirm_password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SignInRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct OAuthRequest {
    /// Provider identifier, e.g. `google` or `github`.
    #[serde(deserialize_with = "lenient_string")]
    pub provider: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResetPasswordRequest {
    #[serde(deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(rename = "confirmPassword", deserialize_with = "lenient_string")]
    pub confirm_password: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

// `null` means "not sent"; any other non-string is a present but blank value.
fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(value) => Some(value),
        _ => Some(String::new()),
    })
}

/// Uniform outcome returned by every auth endpoint.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub field_errors: Option<FieldErrors>,
    /// Provider user record; `null` on session lookups without a signed-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub user: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub session: Option<Value>,
    /// Where the browser must go next (OAuth).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl ActionResponse {
    #[must_use]
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            field_errors: None,
            user: None,
            session: None,
            url: None,
            status: StatusCode::OK,
        }
    }

    #[must_use]
    pub fn validation_failed(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: VALIDATION_FAILED_MESSAGE.to_string(),
            field_errors: Some(errors),
            user: None,
            session: None,
            url: None,
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// Failure envelope for a provider error.
    ///
    /// Only recognized auth errors leak their message and status; everything
    /// else becomes the generic message with `502 Bad Gateway`.
    #[must_use]
    pub fn provider_failed(err: &ProviderError) -> Self {
        let (message, status) = match err.auth_message() {
            Some(message) => (
                message.to_string(),
                err.auth_status()
                    .and_then(|status| StatusCode::from_u16(status).ok())
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_REQUEST),
            ),
            None => (FALLBACK_FAILURE_MESSAGE.to_string(), StatusCode::BAD_GATEWAY),
        };

        Self {
            success: false,
            message,
            field_errors: None,
            user: None,
            session: None,
            url: None,
            status,
        }
    }

    /// Attach the user payload; `None` is kept as an explicit `null`.
    #[must_use]
    pub fn with_user(mut self, user: Option<User>) -> Self {
        self.user = Some(user.map_or(Value::Null, |user| user.0));
        self
    }

    /// Attach whatever the provider issued; absent parts stay omitted.
    #[must_use]
    pub fn with_outcome(mut self, outcome: AuthOutcome) -> Self {
        self.user = outcome.user.map(|user| user.0);
        self.session = outcome.session.map(|session| session.0);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
