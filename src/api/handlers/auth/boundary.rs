//! Shared failure handling for auth actions.
//!
//! Provider calls run under [`guarded`] so that a panic inside the client is
//! reported as a provider failure instead of tearing down the connection.

use super::{schema::FieldErrors, types::ActionResponse};
use crate::provider::ProviderError;
use futures_util::FutureExt;
use std::{any::Any, future::Future, panic::AssertUnwindSafe};
use tracing::{error, warn};

/// Await a provider call, converting a panic into [`ProviderError::Panicked`].
pub(super) async fn guarded<T, F>(call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ProviderError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

pub(super) fn invalid(action: &str, errors: FieldErrors) -> ActionResponse {
    let fields: Vec<&str> = errors.fields().collect();
    warn!(action, ?fields, "Validation failed");
    ActionResponse::validation_failed(errors)
}

pub(super) fn failure(action: &str, err: &ProviderError) -> ActionResponse {
    if err.auth_message().is_some() {
        warn!(action, "Provider rejected request: {err}");
    } else {
        error!(action, "Provider call failed: {err}");
    }
    ActionResponse::provider_failed(err)
}
