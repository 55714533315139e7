//! Email and password sign in.

use super::{
    boundary::{failure, guarded, invalid},
    schema::validate_sign_in,
    state::AuthState,
    types::{ActionResponse, SignInRequest},
};
use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

const ACTION: &str = "sign_in";
const SIGN_IN_SUCCESS: &str = "Sign in successful";

pub async fn perform_sign_in(auth_state: &AuthState, request: &SignInRequest) -> ActionResponse {
    let credentials = match validate_sign_in(request) {
        Ok(credentials) => credentials,
        Err(errors) => return invalid(ACTION, errors),
    };

    match guarded(auth_state.provider().sign_in_with_password(&credentials)).await {
        Ok(outcome) => {
            info!(action = ACTION, "User signed in");
            ActionResponse::success(SIGN_IN_SUCCESS).with_outcome(outcome)
        }
        Err(err) => failure(ACTION, &err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in; session issued by the provider", body = ActionResponse),
        (status = 400, description = "Validation error or invalid credentials", body = ActionResponse),
        (status = 502, description = "Identity provider failure", body = ActionResponse)
    ),
    tag = "auth"
)]
pub async fn sign_in(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignInRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    perform_sign_in(&auth_state, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::{
        schema::{FIELD_PASSWORD, PASSWORD_TOO_SHORT},
        test_support::{auth_state, Call, StubProvider},
        types::FALLBACK_FAILURE_MESSAGE,
    };
    use axum::http::StatusCode;
    use serde_json::json;

    fn request(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn sign_in_does_not_enforce_strength() {
        let stub = Arc::new(
            StubProvider::new()
                .with_user(json!({"id": "u-1"}))
                .with_session(json!({"access_token": "jwt"})),
        );
        let state = auth_state(&stub);

        let response = perform_sign_in(&state, &request("a@b.com", "longpassword1")).await;

        assert!(response.success);
        assert_eq!(response.message, SIGN_IN_SUCCESS);
        assert_eq!(response.session, Some(json!({"access_token": "jwt"})));
        assert_eq!(
            stub.calls(),
            vec![Call::SignIn {
                email: "a@b.com".to_string(),
                password: "longpassword1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn short_password_is_rejected_locally() {
        let stub = Arc::new(StubProvider::new());
        let state = auth_state(&stub);

        let response = perform_sign_in(&state, &request("a@b.com", "short")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.field_errors.unwrap_or_default().get(FIELD_PASSWORD),
            Some(&[PASSWORD_TOO_SHORT.to_string()][..])
        );
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_credentials_message_is_passed_through() {
        let stub = Arc::new(StubProvider::rejecting(
            Some(400),
            "Invalid login credentials",
        ));
        let state = auth_state(&stub);

        let response = perform_sign_in(&state, &request("a@b.com", "wrongpassword")).await;

        assert!(!response.success);
        assert_eq!(response.message, "Invalid login credentials");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn provider_panic_becomes_fallback_failure() {
        let stub = Arc::new(StubProvider::panicking());
        let state = auth_state(&stub);

        let response = perform_sign_in(&state, &request("a@b.com", "longpassword1")).await;

        assert!(!response.success);
        assert_eq!(response.message, FALLBACK_FAILURE_MESSAGE);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
