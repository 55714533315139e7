//! Sign out of the caller's session.

use super::{
    boundary::{failure, guarded},
    state::AuthState,
    types::ActionResponse,
    utils::bearer_token,
};
use axum::{extract::Extension, http::HeaderMap, response::IntoResponse};
use std::sync::Arc;
use tracing::info;

const ACTION: &str = "sign_out";
const SIGN_OUT_SUCCESS: &str = "Sign out successful";

/// Revoke the session behind `access_token`.
///
/// Signing out without a session, or of one the provider already dropped,
/// still succeeds.
pub async fn perform_sign_out(auth_state: &AuthState, access_token: Option<&str>) -> ActionResponse {
    match guarded(auth_state.provider().sign_out(access_token)).await {
        Ok(()) => {
            info!(action = ACTION, "User signed out");
            ActionResponse::success(SIGN_OUT_SUCCESS)
        }
        Err(err) => failure(ACTION, &err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/sign-out",
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer token of the session to end")
    ),
    responses(
        (status = 200, description = "Signed out", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn sign_out(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let access_token = bearer_token(&headers);
    perform_sign_out(&auth_state, access_token.as_deref()).await
}
