//! OAuth sign in initiation.

use super::{
    boundary::{failure, guarded, invalid},
    schema::validate_oauth,
    state::AuthState,
    types::{ActionResponse, OAuthRequest},
    utils::{callback_redirect, site_url},
};
use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

const ACTION: &str = "oauth";
const OAUTH_SUCCESS: &str = "Redirecting to provider";

/// Resolve the authorization URL for `request.provider`.
///
/// Nothing is signed in yet: the browser follows `url` and comes back to
/// `<site>/auth/callback`.
pub async fn perform_oauth(auth_state: &AuthState, request: &OAuthRequest) -> ActionResponse {
    let provider = match validate_oauth(request) {
        Ok(provider) => provider,
        Err(errors) => return invalid(ACTION, errors),
    };

    let redirect_to = callback_redirect(&site_url(auth_state.config()));
    match guarded(
        auth_state
            .provider()
            .sign_in_with_oauth(provider, &redirect_to),
    )
    .await
    {
        Ok(url) => {
            info!(action = ACTION, %provider, "OAuth flow started");
            ActionResponse::success(OAUTH_SUCCESS).with_url(url)
        }
        Err(err) => failure(ACTION, &err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/oauth",
    request_body = OAuthRequest,
    responses(
        (status = 200, description = "Authorization URL to redirect to", body = ActionResponse),
        (status = 400, description = "Unsupported provider", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn oauth(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<OAuthRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    perform_oauth(&auth_state, &request).await
}
