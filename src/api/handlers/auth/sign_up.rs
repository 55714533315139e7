//! Email and password registration.

use super::{
    boundary::{failure, guarded, invalid},
    schema::validate_sign_up,
    state::AuthState,
    types::{ActionResponse, SignUpRequest},
    utils::{callback_redirect, site_url},
};
use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

const ACTION: &str = "sign_up";
const SIGN_UP_SUCCESS: &str = "Sign up successful. Check your email to confirm your account.";

/// Validate a registration and create the account with the provider.
///
/// The confirmation email links back to `<site>/auth/callback`.
pub async fn perform_sign_up(auth_state: &AuthState, request: &SignUpRequest) -> ActionResponse {
    let credentials = match validate_sign_up(request) {
        Ok(credentials) => credentials,
        Err(errors) => return invalid(ACTION, errors),
    };

    let redirect_to = callback_redirect(&site_url(auth_state.config()));
    match guarded(auth_state.provider().sign_up(&credentials, &redirect_to)).await {
        Ok(outcome) => {
            info!(action = ACTION, "User signed up");
            ActionResponse::success(SIGN_UP_SUCCESS).with_outcome(outcome)
        }
        Err(err) => failure(ACTION, &err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created, confirmation pending", body = ActionResponse),
        (status = 400, description = "Validation error or rejected by the provider", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn sign_up(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignUpRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    perform_sign_up(&auth_state, &request).await
}
