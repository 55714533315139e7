//! Current user lookup.

use super::{
    boundary::{failure, guarded},
    state::AuthState,
    types::ActionResponse,
    utils::bearer_token,
};
use axum::{extract::Extension, http::HeaderMap, response::IntoResponse};
use std::sync::Arc;
use tracing::debug;

const ACTION: &str = "get_session";
const SESSION_RETRIEVED: &str = "Session retrieved";

/// Fetch the user behind `access_token`; `user` is `null` without a session.
pub async fn perform_get_session(
    auth_state: &AuthState,
    access_token: Option<&str>,
) -> ActionResponse {
    match guarded(auth_state.provider().get_user(access_token)).await {
        Ok(user) => {
            debug!(action = ACTION, signed_in = user.is_some(), "Session resolved");
            ActionResponse::success(SESSION_RETRIEVED).with_user(user)
        }
        Err(err) => failure(ACTION, &err),
    }
}

#[utoipa::path(
    get,
    path = "/v1/auth/session",
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer token of the session")
    ),
    responses(
        (status = 200, description = "Current user, or null when signed out", body = ActionResponse),
        (status = 401, description = "Token rejected by the provider", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let access_token = bearer_token(&headers);
    perform_get_session(&auth_state, access_token.as_deref()).await
}
