//! Forgotten password email and password reset.

use super::{
    boundary::{failure, guarded, invalid},
    schema::{validate_forgot_password, validate_reset_password},
    state::AuthState,
    types::{ActionResponse, ForgotPasswordRequest, ResetPasswordRequest},
    utils::{bearer_token, reset_password_redirect, site_url},
};
use axum::{extract::Extension, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

const FORGOT_ACTION: &str = "forgot_password";
const RESET_ACTION: &str = "reset_password";
const FORGOT_PASSWORD_SUCCESS: &str = "Password reset email sent";
const RESET_PASSWORD_SUCCESS: &str = "Password updated successfully";

/// Ask the provider to email a reset link pointing at `<site>/auth/reset-password`.
pub async fn perform_forgot_password(
    auth_state: &AuthState,
    request: &ForgotPasswordRequest,
) -> ActionResponse {
    let email = match validate_forgot_password(request) {
        Ok(email) => email,
        Err(errors) => return invalid(FORGOT_ACTION, errors),
    };

    let redirect_to = reset_password_redirect(&site_url(auth_state.config()));
    match guarded(
        auth_state
            .provider()
            .reset_password_for_email(&email, &redirect_to),
    )
    .await
    {
        Ok(()) => {
            info!(action = FORGOT_ACTION, "Password reset email requested");
            ActionResponse::success(FORGOT_PASSWORD_SUCCESS)
        }
        Err(err) => failure(FORGOT_ACTION, &err),
    }
}

/// Set a new password for the user behind `access_token`, the recovery
/// session opened by the reset link.
pub async fn perform_reset_password(
    auth_state: &AuthState,
    request: &ResetPasswordRequest,
    access_token: Option<&str>,
) -> ActionResponse {
    let password = match validate_reset_password(request) {
        Ok(password) => password,
        Err(errors) => return invalid(RESET_ACTION, errors),
    };

    match guarded(
        auth_state
            .provider()
            .update_password(access_token, &password),
    )
    .await
    {
        Ok(_) => {
            info!(action = RESET_ACTION, "Password updated");
            ActionResponse::success(RESET_PASSWORD_SUCCESS)
        }
        Err(err) => failure(RESET_ACTION, &err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email requested", body = ActionResponse),
        (status = 400, description = "Validation error or rejected by the provider", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    perform_forgot_password(&auth_state, &request).await
}

#[utoipa::path(
    post,
    path = "/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer token of the recovery session")
    ),
    responses(
        (status = 200, description = "Password updated", body = ActionResponse),
        (status = 400, description = "Validation error", body = ActionResponse),
        (status = 401, description = "No recovery session", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn reset_password(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let access_token = bearer_token(&headers);
    perform_reset_password(&auth_state, &request, access_token.as_deref()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::handlers::auth::{
            schema::{FIELD_CONFIRM_PASSWORD, FIELD_EMAIL, FIELD_PASSWORD},
            test_support::{auth_state, Call, StubProvider},
        },
        provider::SESSION_MISSING_MESSAGE,
    };
    use axum::http::StatusCode;

    fn reset(password: &str, confirm: &str) -> ResetPasswordRequest {
        ResetPasswordRequest {
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn forgot_password_sends_reset_redirect() {
        let stub = Arc::new(StubProvider::new());
        let state = auth_state(&stub);

        let response = perform_forgot_password(
            &state,
            &ForgotPasswordRequest {
                email: "User@Example.com".to_string(),
            },
        )
        .await;

        assert!(response.success);
        assert_eq!(response.message, FORGOT_PASSWORD_SUCCESS);
        assert_eq!(
            stub.calls(),
            vec![Call::ResetPasswordForEmail {
                email: "user@example.com".to_string(),
                redirect_to: "https://app.example/auth/reset-password".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn forgot_password_rejects_bad_email() {
        let stub = Arc::new(StubProvider::new());
        let state = auth_state(&stub);

        let response = perform_forgot_password(
            &state,
            &ForgotPasswordRequest {
                email: "not-an-email".to_string(),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response
            .field_errors
            .unwrap_or_default()
            .get(FIELD_EMAIL)
            .is_some());
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn reset_password_updates_with_session_token() {
        let stub = Arc::new(StubProvider::new());
        let state = auth_state(&stub);

        let response =
            perform_reset_password(&state, &reset("Abcdef1!", "Abcdef1!"), Some("recovery")).await;

        assert!(response.success);
        assert_eq!(response.message, RESET_PASSWORD_SUCCESS);
        assert_eq!(response.user, None);
        assert_eq!(
            stub.calls(),
            vec![Call::UpdatePassword {
                access_token: Some("recovery".to_string()),
                password: "Abcdef1!".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn reset_password_without_session_fails() {
        let stub = Arc::new(StubProvider::new());
        let state = auth_state(&stub);

        let response = perform_reset_password(&state, &reset("Abcdef1!", "Abcdef1!"), None).await;

        assert!(!response.success);
        assert_eq!(response.message, SESSION_MISSING_MESSAGE);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reset_password_checks_match_alongside_strength() {
        let stub = Arc::new(StubProvider::new());
        let state = auth_state(&stub);

        let weak = perform_reset_password(&state, &reset("abc", "xyz"), Some("t")).await;
        let errors = weak.field_errors.unwrap_or_default();
        assert!(errors.get(FIELD_PASSWORD).is_some());
        assert!(errors.get(FIELD_CONFIRM_PASSWORD).is_some());

        let weak_match = perform_reset_password(&state, &reset("abc", "abc"), Some("t")).await;
        let errors = weak_match.field_errors.unwrap_or_default();
        assert!(errors.get(FIELD_PASSWORD).is_some());
        assert!(errors.get(FIELD_CONFIRM_PASSWORD).is_none());

        let mismatch = perform_reset_password(&state, &reset("Abcdef1!", "Abcdef1?"), Some("t")).await;
        let errors = mismatch.field_errors.unwrap_or_default();
        assert!(errors.get(FIELD_PASSWORD).is_none());
        assert!(errors.get(FIELD_CONFIRM_PASSWORD).is_some());

        assert!(stub.calls().is_empty());
    }
}
